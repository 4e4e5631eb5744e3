use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scripted integration checks against a swipe-matching REST API
#[derive(Parser, Debug)]
#[command(name = "swipecheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Base URL of the service API, e.g. http://localhost:3000/api
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Config file to read instead of ~/.config/swipecheck/config.json
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log requests and scenario progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run suites by built-in name or suite file path
    Run {
        /// Built-in suite names or .json/.yaml/.toml files
        #[arg(default_value = "backend")]
        suites: Vec<String>,
    },
    /// List built-in suites
    List,
    /// Print a suite definition as JSON
    Show {
        /// Built-in suite name or suite file path
        suite: String,
    },
}
