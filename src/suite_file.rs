//! Loading suites from disk
//!
//! Suite files use the same shape as `swipecheck show <suite>` prints, in
//! JSON (`.json`), YAML (`.yaml`, `.yml`) or TOML (`.toml`).

use crate::scenario::Suite;
use crate::suites;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SuiteError {
    #[error("Unknown suite '{name}'. Built-in suites: {available}. Or pass a path to a .json, .yaml or .toml file.")]
    Unknown { name: String, available: String },

    #[error("Unsupported suite file '{path}': expected .json, .yaml, .yml or .toml")]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {details}")]
    Parse { path: PathBuf, details: String },

    #[error("Suite '{suite}' refers to undeclared actor '{actor}'")]
    UndeclaredActor { suite: String, actor: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }
}

/// Resolve a command-line suite argument: a built-in name, else a file path
pub fn resolve(arg: &str) -> Result<Suite, SuiteError> {
    if let Some(suite) = suites::builtin(arg) {
        return Ok(suite);
    }

    let path = Path::new(arg);
    if Format::from_path(path).is_some() || path.exists() {
        return load(path);
    }

    Err(SuiteError::Unknown {
        name: arg.to_string(),
        available: suites::names().join(", "),
    })
}

/// Load and check a suite file
pub fn load(path: &Path) -> Result<Suite, SuiteError> {
    let format = Format::from_path(path).ok_or_else(|| SuiteError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let content = fs::read_to_string(path).map_err(|source| SuiteError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let suite = parse(&content, format).map_err(|details| SuiteError::Parse {
        path: path.to_path_buf(),
        details,
    })?;

    check_actors(&suite)?;
    tracing::debug!(path = %path.display(), suite = %suite.name, "loaded suite file");
    Ok(suite)
}

fn parse(content: &str, format: Format) -> Result<Suite, String> {
    match format {
        Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        Format::Yaml => serde_yml::from_str(content).map_err(|e| e.to_string()),
        Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
    }
}

/// Setup actors must be declared; step actors may come from the config file instead
fn check_actors(suite: &Suite) -> Result<(), SuiteError> {
    for actor in &suite.setup {
        if !suite.actors.contains_key(actor) {
            return Err(SuiteError::UndeclaredActor {
                suite: suite.name.clone(),
                actor: actor.clone(),
            });
        }
    }
    Ok(())
}
