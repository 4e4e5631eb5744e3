//! Declarative scenario model
//!
//! A [`Suite`] is a list of [`Scenario`]s, each a list of [`Check`]s. A check
//! is one [`Step`] (a tagged variant: register, swipe, update profile, ...)
//! plus an optional display name. The same structures are built in code by
//! [`crate::suites`] and loaded from disk by [`crate::suite_file`], and one
//! generic runner executes them.
//!
//! Serialized form (JSON shown, YAML and TOML mirror it):
//!
//! ```json
//! {
//!   "name": "smoke",
//!   "actors": { "a": { "email": "a.{run}@test.com", "password": "p1", "name": "A" } },
//!   "setup": ["a"],
//!   "scenarios": [
//!     { "name": "Profile", "category": "profile", "steps": [
//!       { "kind": "updateProfile", "actor": "a", "profile": { "bio": "x" } },
//!       { "kind": "verifyProfile", "actor": "a" }
//!     ]}
//!   ]
//! }
//! ```

use crate::payload::{Direction, ProfileUpdate, RegisterRequest, TargetType};
use crate::results::Category;
use crate::session::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suite {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Default credentials per actor name; the config file may override them
    #[serde(default)]
    pub actors: BTreeMap<String, RegisterRequest>,
    /// Actors authenticated before any scenario runs; failure aborts the suite
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub setup: Vec<String>,
    pub scenarios: Vec<Scenario>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub category: Category,
    pub steps: Vec<Check>,
}

impl Scenario {
    pub fn new(name: &str, category: Category, steps: Vec<Check>) -> Self {
        Self {
            name: name.to_string(),
            category,
            steps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub step: Step,
}

impl Check {
    pub fn named(name: &str, step: Step) -> Self {
        Self {
            name: Some(name.to_string()),
            step,
        }
    }

    /// Display name: the explicit one, else a description of the step
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.step.to_string(),
        }
    }
}

impl From<Step> for Check {
    fn from(step: Step) -> Self {
        Self { name: None, step }
    }
}

/// Who a request is sent as
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Caller {
    #[default]
    Anonymous,
    Actor(String),
    /// A literal bearer token, e.g. a deliberately invalid one
    Token(String),
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Caller::Anonymous => write!(f, "anonymous"),
            Caller::Actor(name) => write!(f, "{}", name),
            Caller::Token(_) => write!(f, "explicit token"),
        }
    }
}

/// Explore feeds exposed by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feed {
    People,
    Projects,
    Hackathons,
}

impl Feed {
    pub fn path(&self) -> &'static str {
        match self {
            Feed::People => "/explore/people",
            Feed::Projects => "/explore/projects",
            Feed::Hackathons => "/explore/hackathons",
        }
    }

    /// Key of the item array in the response body
    pub fn list_key(&self) -> &'static str {
        match self {
            Feed::People => "people",
            Feed::Projects | Feed::Hackathons => "posts",
        }
    }

    pub fn target_type(&self) -> TargetType {
        match self {
            Feed::People => TargetType::Person,
            Feed::Projects => TargetType::Project,
            Feed::Hackathons => TargetType::Hackathon,
        }
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feed::People => write!(f, "people"),
            Feed::Projects => write!(f, "projects"),
            Feed::Hackathons => write!(f, "hackathons"),
        }
    }
}

/// What a swipe is aimed at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Target {
    /// Another actor, by the user id its session received
    Actor(String),
    /// An item returned by the most recent `explore` of that feed
    Explored {
        feed: Feed,
        #[serde(default)]
        index: usize,
    },
    Id { target_type: TargetType, id: String },
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Actor(name) => write!(f, "{}", name),
            Target::Explored { feed, index } => write!(f, "{} #{}", feed, index),
            Target::Id { target_type, id } => write!(f, "{} {}", target_type, id),
        }
    }
}

/// Expected result of a swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwipeExpect {
    /// 200 with the swipe echoed back
    Recorded,
    /// 200 and no match
    NoMatch,
    /// 200 and a match with an id
    Match,
    /// 400 because the same target was already swiped
    Duplicate,
}

fn ok_status() -> u16 {
    200
}

fn default_reads() -> u32 {
    3
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Step {
    /// Register, or log in if the account exists
    Authenticate { actor: String },
    Register {
        actor: String,
        #[serde(default = "ok_status")]
        expect_status: u16,
    },
    Login {
        actor: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        password: Option<String>,
        #[serde(default = "ok_status")]
        expect_status: u16,
    },
    CurrentUser {
        #[serde(default)]
        caller: Caller,
        #[serde(default = "ok_status")]
        expect_status: u16,
        #[serde(default)]
        expect_profile: bool,
    },
    Logout { actor: String },
    UpdateProfile {
        actor: String,
        profile: ProfileUpdate,
    },
    ExtendProfile {
        actor: String,
        additions: ProfileUpdate,
    },
    /// Round trip: the last written profile comes back from GET /profile and GET /auth/me
    VerifyProfile { actor: String },
    ProfileConsistency {
        actor: String,
        #[serde(default = "default_reads")]
        reads: u32,
    },
    ProfileShape { actor: String },
    Explore {
        actor: String,
        feed: Feed,
        #[serde(default)]
        min_items: usize,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        required_fields: Vec<String>,
    },
    Swipe {
        actor: String,
        target: Target,
        direction: Direction,
        expect: SwipeExpect,
        /// Also record whether the swipe answered within this many milliseconds
        #[serde(default, skip_serializing_if = "Option::is_none")]
        budget_ms: Option<u64>,
    },
    Matches {
        actor: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        with_actor: Option<String>,
        #[serde(default)]
        min_count: usize,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        required_fields: Vec<String>,
    },
    SeedDummyData { actor: String },
    Request {
        #[serde(default)]
        caller: Caller,
        method: Method,
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<Value>,
        #[serde(default = "ok_status")]
        expect_status: u16,
    },
    Timing {
        actor: String,
        path: String,
        budget_ms: u64,
    },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Authenticate { actor } => write!(f, "Authenticate {}", actor),
            Step::Register { actor, .. } => write!(f, "Register {}", actor),
            Step::Login { actor, .. } => write!(f, "Login {}", actor),
            Step::CurrentUser { caller, .. } => write!(f, "Current user ({})", caller),
            Step::Logout { actor } => write!(f, "Logout {}", actor),
            Step::UpdateProfile { actor, .. } => write!(f, "Update profile of {}", actor),
            Step::ExtendProfile { actor, .. } => write!(f, "Extend profile of {}", actor),
            Step::VerifyProfile { actor } => write!(f, "Verify profile of {}", actor),
            Step::ProfileConsistency { actor, .. } => {
                write!(f, "Profile consistency of {}", actor)
            }
            Step::ProfileShape { actor } => write!(f, "Profile structure of {}", actor),
            Step::Explore { feed, .. } => write!(f, "Explore {}", feed),
            Step::Swipe {
                actor,
                target,
                direction,
                ..
            } => write!(f, "{} swipes {} on {}", actor, direction, target),
            Step::Matches { actor, .. } => write!(f, "Matches of {}", actor),
            Step::SeedDummyData { .. } => write!(f, "Seed dummy data"),
            Step::Request {
                caller,
                method,
                path,
                ..
            } => write!(f, "{} {} ({})", method, path, caller),
            Step::Timing { path, .. } => write!(f, "Response time of {}", path),
        }
    }
}

/// Check that every field in `expected` appears in `actual` with the same value
///
/// Objects are compared key by key (extra keys in `actual` are allowed, the
/// service adds ids and timestamps). Arrays must have the same length and
/// order. Returns the JSON path of the first mismatch.
pub fn json_subset(expected: &Value, actual: &Value) -> Result<(), String> {
    subset_at(expected, actual, "$")
}

fn subset_at(expected: &Value, actual: &Value, path: &str) -> Result<(), String> {
    match (expected, actual) {
        (Value::Object(want), Value::Object(have)) => {
            for (key, value) in want {
                let child = format!("{}.{}", path, key);
                match have.get(key) {
                    Some(found) => subset_at(value, found, &child)?,
                    None if value.is_null() => {}
                    None => return Err(format!("{} is missing", child)),
                }
            }
            Ok(())
        }
        (Value::Array(want), Value::Array(have)) => {
            if want.len() != have.len() {
                return Err(format!(
                    "{} has {} items, expected {}",
                    path,
                    have.len(),
                    want.len()
                ));
            }
            for (index, (w, h)) in want.iter().zip(have).enumerate() {
                subset_at(w, h, &format!("{}[{}]", path, index))?;
            }
            Ok(())
        }
        (Value::Number(want), Value::Number(have)) => {
            if want.as_f64() == have.as_f64() {
                Ok(())
            } else {
                Err(format!("{} is {}, expected {}", path, have, want))
            }
        }
        (want, have) if want == have => Ok(()),
        (want, have) => Err(format!("{} is {}, expected {}", path, have, want)),
    }
}

/// Names from `fields` that `item` lacks
pub fn missing_fields<'a>(item: &Value, fields: &'a [String]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|field| item.get(field.as_str()).is_none())
        .map(|field| field.as_str())
        .collect()
}
