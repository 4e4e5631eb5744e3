//! Typed request bodies sent to the matching service
//!
//! Fixtures are plain structs rather than free-form JSON so that a malformed
//! fixture is caught by [`validate`](ProfileUpdate::validate) before anything
//! is submitted, instead of surfacing later as a confusing assertion mismatch.
//! Field names follow the service's camelCase wire format.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FixtureError {
    #[error("Invalid email '{0}': expected an address containing '@'")]
    InvalidEmail(String),

    #[error("Field '{0}' cannot be empty")]
    EmptyField(&'static str),

    #[error("Invalid date '{value}' in {field}: expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("Invalid URL '{value}' in {field}: expected an http:// or https:// URL")]
    InvalidUrl { field: &'static str, value: String },
}

/// `POST /auth/register` body; also the credential set of an actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl RegisterRequest {
    pub fn new(email: &str, password: &str, name: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), FixtureError> {
        validate_email(&self.email)?;
        require("password", &self.password)?;
        require("name", &self.name)
    }

    /// Substitute `{run}` in every field with the given run id
    pub fn for_run(&self, run_id: &str) -> Self {
        Self {
            email: self.email.replace("{run}", run_id),
            password: self.password.replace("{run}", run_id),
            name: self.name.replace("{run}", run_id),
        }
    }
}

/// `POST /auth/login` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SocialKind {
    Linkedin,
    Github,
    Twitter,
    Website,
}

impl SocialKind {
    pub const ALL: [SocialKind; 4] = [
        SocialKind::Linkedin,
        SocialKind::Github,
        SocialKind::Twitter,
        SocialKind::Website,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SocialKind::Linkedin => "LINKEDIN",
            SocialKind::Github => "GITHUB",
            SocialKind::Twitter => "TWITTER",
            SocialKind::Website => "WEBSITE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    #[serde(rename = "type")]
    pub kind: SocialKind,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_roles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_radius_km: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_ok: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_hrs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_people: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_projects: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_hackathons: Option<bool>,
}

/// `PUT /profile` body; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub looks_to_connect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<Experience>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<ProjectEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socials: Option<Vec<SocialLink>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awards: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), FixtureError> {
        for exp in self.experience.iter().flatten() {
            require("experience.title", &exp.title)?;
            if let Some(date) = &exp.start_date {
                validate_date("experience.startDate", date)?;
            }
            if let Some(date) = &exp.end_date {
                validate_date("experience.endDate", date)?;
            }
        }

        for project in self.projects.iter().flatten() {
            require("projects.name", &project.name)?;
            if let Some(url) = &project.repo_url {
                validate_url("projects.repoUrl", url)?;
            }
            if let Some(url) = &project.demo_url {
                validate_url("projects.demoUrl", url)?;
            }
        }

        for social in self.socials.iter().flatten() {
            validate_url("socials.url", &social.url)?;
        }

        for skill in self.skills.iter().flatten() {
            require("skills", skill)?;
        }

        Ok(())
    }

    /// Apply `additions` on top of this profile
    ///
    /// List fields are appended, scalar fields and preferences are replaced.
    pub fn extend(&mut self, additions: &ProfileUpdate) {
        if let Some(bio) = &additions.bio {
            self.bio = Some(bio.clone());
        }
        if let Some(looks) = &additions.looks_to_connect {
            self.looks_to_connect = Some(looks.clone());
        }
        append(&mut self.skills, &additions.skills);
        append(&mut self.interests, &additions.interests);
        append(&mut self.experience, &additions.experience);
        append(&mut self.projects, &additions.projects);
        append(&mut self.socials, &additions.socials);
        append(&mut self.awards, &additions.awards);
        if let Some(prefs) = &additions.preferences {
            self.preferences = Some(prefs.clone());
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        // Only strings, numbers, bools and nested structs of those: serialization cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn append<T: Clone>(target: &mut Option<Vec<T>>, extra: &Option<Vec<T>>) {
    if let Some(extra) = extra {
        target.get_or_insert_with(Vec::new).extend(extra.iter().cloned());
    }
}

/// Kind of entity a swipe targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetType {
    Person,
    Project,
    Hackathon,
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Person => write!(f, "PERSON"),
            TargetType::Project => write!(f, "PROJECT"),
            TargetType::Hackathon => write!(f, "HACKATHON"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `POST /swipe` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeRequest {
    pub target_type: TargetType,
    pub target_id: String,
    pub direction: Direction,
}

impl SwipeRequest {
    pub fn validate(&self) -> Result<(), FixtureError> {
        require("targetId", &self.target_id)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn require(field: &'static str, value: &str) -> Result<(), FixtureError> {
    if value.trim().is_empty() {
        return Err(FixtureError::EmptyField(field));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), FixtureError> {
    require("email", email)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(FixtureError::InvalidEmail(email.to_string())),
    }
}

/// Accepts `YYYY-MM-DD` with plausible month and day ranges
pub fn is_iso_date(value: &str) -> bool {
    let parts: Vec<&str> = value.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return false;
    };
    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return false;
    }
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(year) || !all_digits(month) || !all_digits(day) {
        return false;
    }
    let month: u32 = month.parse().unwrap_or(0);
    let day: u32 = day.parse().unwrap_or(0);
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

pub fn is_http_url(value: &str) -> bool {
    let lower = value.to_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty())
}

fn validate_date(field: &'static str, value: &str) -> Result<(), FixtureError> {
    if is_iso_date(value) {
        Ok(())
    } else {
        Err(FixtureError::InvalidDate {
            field,
            value: value.to_string(),
        })
    }
}

fn validate_url(field: &'static str, value: &str) -> Result<(), FixtureError> {
    if is_http_url(value) {
        Ok(())
    } else {
        Err(FixtureError::InvalidUrl {
            field,
            value: value.to_string(),
        })
    }
}
