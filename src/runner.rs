//! Scenario runner
//!
//! Executes a [`Suite`] strictly in order against one [`Session`] per actor.
//! Setup failures abort the suite; everything else is recorded as a result
//! and the run moves on. A step that errors or panics ends its scenario with
//! a failed result named after the scenario.

use crate::config::HarnessConfig;
use crate::output;
use crate::payload::{
    FixtureError, LoginRequest, ProfileUpdate, RegisterRequest, SocialKind, SwipeRequest,
    TargetType, is_http_url, is_iso_date,
};
use crate::results::{Category, ResultLog};
use crate::scenario::{
    Caller, Feed, Scenario, Step, Suite, SwipeExpect, Target, json_subset, missing_fields,
};
use crate::session::{Auth, AuthError, Method, Outcome, Session, TransportError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;
use thiserror::Error;

/// A fault that ends the current scenario
#[derive(Error, Debug)]
pub enum StepError {
    #[error("Unknown actor '{0}'")]
    UnknownActor(String),

    #[error("Actor '{0}' is not authenticated")]
    NotAuthenticated(String),

    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Invalid fixture: {0}")]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Authentication of a setup actor failed; nothing else can run
#[derive(Error, Debug)]
#[error("Setup failed for actor '{actor}': {reason}")]
pub struct SetupFailure {
    pub actor: String,
    pub reason: String,
}

/// State shared between the steps of one suite run
struct World {
    base_url: String,
    timeout: Duration,
    credentials: BTreeMap<String, RegisterRequest>,
    sessions: BTreeMap<String, Session>,
    anonymous: Session,
    explored: BTreeMap<Feed, Vec<Value>>,
    /// Last profile body each actor wrote
    written: BTreeMap<String, Value>,
}

pub struct Runner {
    config: HarnessConfig,
    world: World,
    log: ResultLog,
    echo: bool,
    echoed: usize,
}

impl Runner {
    pub fn new(config: HarnessConfig) -> Self {
        let world = World::new(&config.base_url, config.timeout);
        Self {
            config,
            world,
            log: ResultLog::new(),
            echo: false,
            echoed: 0,
        }
    }

    /// Print each result as it is recorded
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn log(&self) -> &ResultLog {
        &self.log
    }

    pub fn into_log(self) -> ResultLog {
        self.log
    }

    /// Run setup and every scenario; returns whether all results passed
    pub fn run(&mut self, suite: &Suite) -> Result<bool, SetupFailure> {
        self.world.credentials = self.config.actor_credentials(&suite.actors);
        tracing::debug!(suite = %suite.name, base_url = %self.config.base_url, "starting suite");

        self.setup(&suite.setup)?;

        for scenario in &suite.scenarios {
            self.run_scenario(scenario);
        }

        Ok(self.log.summarize().all_passed)
    }

    fn setup(&mut self, actors: &[String]) -> Result<(), SetupFailure> {
        for actor in actors {
            let name = format!("Setup {}", actor);
            let outcome = self.world.authenticate(actor);
            match outcome {
                Ok(path) => {
                    self.log
                        .pass(Category::Setup, name, format!("{} {}", actor, path));
                    self.flush_echo();
                }
                Err(reason) => {
                    self.log.fail(Category::Setup, name, reason.clone(), None);
                    self.flush_echo();
                    return Err(SetupFailure {
                        actor: actor.clone(),
                        reason,
                    });
                }
            }
        }
        Ok(())
    }

    fn run_scenario(&mut self, scenario: &Scenario) {
        if self.echo {
            output::print_section(&scenario.name);
        }
        tracing::debug!(scenario = %scenario.name, "running scenario");
        let before = self.log.len();

        for check in &scenario.steps {
            let label = check.label();
            let world = &mut self.world;
            let log = &mut self.log;
            let fault = isolate(|| world.execute(log, scenario.category, &label, &check.step));

            if let Some(message) = fault {
                tracing::warn!(scenario = %scenario.name, step = %label, "{}", message);
                self.log.fail(
                    scenario.category,
                    scenario.name.clone(),
                    format!("{}: {}", label, message),
                    None,
                );
                self.flush_echo();
                break;
            }
            self.flush_echo();
        }

        if self.log.len() == before {
            self.log.fail(
                scenario.category,
                scenario.name.clone(),
                "Scenario recorded no assertions",
                None,
            );
            self.flush_echo();
        }
    }

    fn flush_echo(&mut self) {
        if self.echo {
            for result in &self.log.results()[self.echoed..] {
                output::print_result(result);
            }
        }
        self.echoed = self.log.len();
    }
}

/// Run one step, turning an error or a panic into a fault description
fn isolate(step: impl FnOnce() -> Result<(), StepError>) -> Option<String> {
    match panic::catch_unwind(AssertUnwindSafe(step)) {
        Ok(Ok(())) => None,
        Ok(Err(err)) => Some(err.to_string()),
        Err(payload) => Some(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}

/// Record a failure when `outcome` does not carry the expected status
fn expect_status(
    log: &mut ResultLog,
    category: Category,
    name: &str,
    outcome: &Outcome,
    expected: u16,
) -> bool {
    if outcome.status == expected {
        return true;
    }
    log.fail(
        category,
        name,
        format!("Expected status {}, got {}", expected, outcome.describe()),
        outcome.detail(),
    );
    false
}

/// Record whether a swipe response meets its expectation
fn check_swipe(
    log: &mut ResultLog,
    category: Category,
    name: &str,
    request: &SwipeRequest,
    expect: SwipeExpect,
    outcome: &Outcome,
) {
    if expect == SwipeExpect::Duplicate {
        if expect_status(log, category, name, outcome, 400) {
            log.pass(category, name, "Duplicate swipe rejected");
        }
        return;
    }

    if !expect_status(log, category, name, outcome, 200) {
        return;
    }
    let Some(swipe) = outcome.field("swipe") else {
        log.fail(category, name, "Missing swipe in response", outcome.detail());
        return;
    };
    let recorded = swipe.get("direction").and_then(|d| d.as_str());
    if recorded != Some(request.direction.as_str()) {
        log.fail(
            category,
            name,
            format!(
                "Swipe direction recorded as {:?}, expected {}",
                recorded, request.direction
            ),
            None,
        );
        return;
    }

    let matched = outcome.field("match");
    match expect {
        SwipeExpect::Recorded => log.pass(
            category,
            name,
            format!(
                "{} swipe on {} recorded{}",
                request.direction,
                request.target_type,
                if matched.is_some() { " (match)" } else { "" }
            ),
        ),
        SwipeExpect::NoMatch => match matched {
            None => log.pass(category, name, "Swipe recorded, no match yet"),
            Some(_) => log.fail(category, name, "Unexpected match", outcome.detail()),
        },
        SwipeExpect::Match => {
            let match_id = matched
                .and_then(|m| m.get("id"))
                .and_then(|id| id.as_str())
                .filter(|id| !id.is_empty());
            match match_id {
                Some(id) => log.pass(category, name, format!("Match created: {}", id)),
                None => log.fail(
                    category,
                    name,
                    "No match created from reciprocal swipe",
                    outcome.detail(),
                ),
            }
        }
        SwipeExpect::Duplicate => {}
    }
}

/// Record whether a response arrived within `budget_ms`
fn check_budget(log: &mut ResultLog, category: Category, name: &str, outcome: &Outcome, budget_ms: u64) {
    let elapsed_ms = outcome.elapsed.as_millis() as u64;
    if elapsed_ms <= budget_ms {
        log.pass(
            category,
            name,
            format!("{}ms within {}ms budget", elapsed_ms, budget_ms),
        );
    } else {
        log.fail(
            category,
            name,
            format!("{}ms exceeds {}ms budget", elapsed_ms, budget_ms),
            None,
        );
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

impl World {
    fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout,
            credentials: BTreeMap::new(),
            sessions: BTreeMap::new(),
            anonymous: Session::new(base_url, timeout),
            explored: BTreeMap::new(),
            written: BTreeMap::new(),
        }
    }

    fn credentials(&self, actor: &str) -> Result<RegisterRequest, StepError> {
        self.credentials
            .get(actor)
            .cloned()
            .ok_or_else(|| StepError::UnknownActor(actor.to_string()))
    }

    /// The actor's session, created on first use
    fn session_mut(&mut self, actor: &str) -> Result<&mut Session, StepError> {
        if !self.credentials.contains_key(actor) {
            return Err(StepError::UnknownActor(actor.to_string()));
        }
        let (base_url, timeout) = (self.base_url.clone(), self.timeout);
        Ok(self
            .sessions
            .entry(actor.to_string())
            .or_insert_with(|| Session::new(&base_url, timeout)))
    }

    /// The actor's session, which must hold a token
    fn authed(&self, actor: &str) -> Result<&Session, StepError> {
        match self.sessions.get(actor) {
            Some(session) if session.is_authenticated() => Ok(session),
            Some(_) => Err(StepError::NotAuthenticated(actor.to_string())),
            None if self.credentials.contains_key(actor) => {
                Err(StepError::NotAuthenticated(actor.to_string()))
            }
            None => Err(StepError::UnknownActor(actor.to_string())),
        }
    }

    fn user_id(&self, actor: &str) -> Result<String, StepError> {
        self.authed(actor)?
            .user_id()
            .map(str::to_string)
            .ok_or_else(|| StepError::MissingData(format!("no user id known for '{}'", actor)))
    }

    /// Register-or-login for setup; errors become a reason string
    fn authenticate(&mut self, actor: &str) -> Result<String, String> {
        let creds = self.credentials(actor).map_err(|e| e.to_string())?;
        creds.validate().map_err(|e| format!("Invalid fixture: {}", e))?;
        let session = self.session_mut(actor).map_err(|e| e.to_string())?;
        session
            .authenticate(&creds)
            .map(|path| format!("{} ({})", path, creds.email))
            .map_err(|e| e.to_string())
    }

    fn call(
        &self,
        caller: &Caller,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Outcome, StepError> {
        let outcome = match caller {
            Caller::Anonymous => self.anonymous.request_as(method, path, body, Auth::Anonymous)?,
            Caller::Actor(actor) => self.authed(actor)?.request(method, path, body)?,
            Caller::Token(token) => self
                .anonymous
                .request_as(method, path, body, Auth::Token(token))?,
        };
        Ok(outcome)
    }

    fn execute(
        &mut self,
        log: &mut ResultLog,
        category: Category,
        name: &str,
        step: &Step,
    ) -> Result<(), StepError> {
        match step {
            Step::Authenticate { actor } => {
                let creds = self.credentials(actor)?;
                creds.validate()?;
                match self.session_mut(actor)?.authenticate(&creds) {
                    Ok(path) => log.pass(category, name, format!("{} {}", actor, path)),
                    Err(AuthError::Transport(err)) => return Err(err.into()),
                    Err(err) => log.fail(category, name, err.to_string(), None),
                }
                Ok(())
            }
            Step::Register {
                actor,
                expect_status: expected,
            } => self.register(log, category, name, actor, *expected),
            Step::Login {
                actor,
                email,
                password,
                expect_status: expected,
            } => self.login(
                log,
                category,
                name,
                actor,
                email.as_deref(),
                password.as_deref(),
                *expected,
            ),
            Step::CurrentUser {
                caller,
                expect_status: expected,
                expect_profile,
            } => self.current_user(log, category, name, caller, *expected, *expect_profile),
            Step::Logout { actor } => self.logout(log, category, name, actor),
            Step::UpdateProfile { actor, profile } => {
                self.update_profile(log, category, name, actor, profile)
            }
            Step::ExtendProfile { actor, additions } => {
                self.extend_profile(log, category, name, actor, additions)
            }
            Step::VerifyProfile { actor } => self.verify_profile(log, category, name, actor),
            Step::ProfileConsistency { actor, reads } => {
                self.profile_consistency(log, category, name, actor, *reads)
            }
            Step::ProfileShape { actor } => self.profile_shape(log, category, name, actor),
            Step::Explore {
                actor,
                feed,
                min_items,
                required_fields,
            } => self.explore(log, category, name, actor, *feed, *min_items, required_fields),
            Step::Swipe {
                actor,
                target,
                direction,
                expect,
                budget_ms,
            } => {
                let (target_type, target_id) = self.resolve_target(target)?;
                let request = SwipeRequest {
                    target_type,
                    target_id,
                    direction: *direction,
                };
                self.swipe(log, category, name, actor, &request, *expect, *budget_ms)
            }
            Step::Matches {
                actor,
                with_actor,
                min_count,
                required_fields,
            } => self.matches(
                log,
                category,
                name,
                actor,
                with_actor.as_deref(),
                *min_count,
                required_fields,
            ),
            Step::SeedDummyData { actor } => {
                let outcome = self.call(&Caller::Actor(actor.clone()), Method::Post, "/dummy-data", None)?;
                if expect_status(log, category, name, &outcome, 200) {
                    let message = match outcome.field("created").and_then(|c| c.as_u64()) {
                        Some(created) => format!("Seeded {} records", created),
                        None => "Dummy data created".to_string(),
                    };
                    log.pass(category, name, message);
                }
                Ok(())
            }
            Step::Request {
                caller,
                method,
                path,
                body,
                expect_status: expected,
            } => {
                let outcome = self.call(caller, *method, path, body.as_ref())?;
                if expect_status(log, category, name, &outcome, *expected) {
                    log.pass(category, name, format!("Responded with status {}", outcome.status));
                }
                Ok(())
            }
            Step::Timing {
                actor,
                path,
                budget_ms,
            } => {
                let outcome = self.call(&Caller::Actor(actor.clone()), Method::Get, path, None)?;
                if !expect_status(log, category, name, &outcome, 200) {
                    return Ok(());
                }
                check_budget(log, category, name, &outcome, *budget_ms);
                Ok(())
            }
        }
    }

    fn register(
        &mut self,
        log: &mut ResultLog,
        category: Category,
        name: &str,
        actor: &str,
        expected: u16,
    ) -> Result<(), StepError> {
        let creds = self.credentials(actor)?;
        creds.validate()?;
        let session = self.session_mut(actor)?;
        let outcome =
            session.request_as(Method::Post, "/auth/register", Some(&to_value(&creds)), Auth::Anonymous)?;

        if !expect_status(log, category, name, &outcome, expected) {
            return Ok(());
        }
        if expected != 200 {
            log.pass(category, name, format!("Rejected with {}", outcome.describe()));
            return Ok(());
        }
        if outcome.field("user").is_none() || !session.attach(&outcome) {
            log.fail(category, name, "Missing user or token in response", outcome.detail());
            return Ok(());
        }
        log.pass(category, name, format!("User created: {}", creds.name));
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn login(
        &mut self,
        log: &mut ResultLog,
        category: Category,
        name: &str,
        actor: &str,
        email: Option<&str>,
        password: Option<&str>,
        expected: u16,
    ) -> Result<(), StepError> {
        let creds = self.credentials(actor)?;
        let body = LoginRequest {
            email: email.unwrap_or(&creds.email).to_string(),
            password: password.unwrap_or(&creds.password).to_string(),
        };
        let session = self.session_mut(actor)?;
        let outcome =
            session.request_as(Method::Post, "/auth/login", Some(&to_value(&body)), Auth::Anonymous)?;

        if !expect_status(log, category, name, &outcome, expected) {
            return Ok(());
        }
        if expected != 200 {
            log.pass(category, name, format!("Rejected with {}", outcome.describe()));
            return Ok(());
        }
        if outcome.field("user").is_none() || !session.attach(&outcome) {
            log.fail(category, name, "Missing user or token in response", outcome.detail());
            return Ok(());
        }
        log.pass(category, name, format!("Logged in as {}", body.email));
        Ok(())
    }

    fn current_user(
        &mut self,
        log: &mut ResultLog,
        category: Category,
        name: &str,
        caller: &Caller,
        expected: u16,
        expect_profile: bool,
    ) -> Result<(), StepError> {
        let outcome = self.call(caller, Method::Get, "/auth/me", None)?;
        if !expect_status(log, category, name, &outcome, expected) {
            return Ok(());
        }
        if expected != 200 {
            log.pass(category, name, format!("Rejected with {}", outcome.describe()));
            return Ok(());
        }

        let Some(user) = outcome.field("user") else {
            log.fail(category, name, "Missing user in response", outcome.detail());
            return Ok(());
        };

        if let Caller::Actor(actor) = caller {
            let creds = self.credentials(actor)?;
            let email = user.get("email").and_then(|e| e.as_str()).unwrap_or_default();
            if !email.eq_ignore_ascii_case(&creds.email) {
                log.fail(
                    category,
                    name,
                    format!("Expected user {}, got '{}'", creds.email, email),
                    None,
                );
                return Ok(());
            }
        }

        if expect_profile {
            let Some(profile) = outcome.field("profile") else {
                log.fail(category, name, "Missing profile in response", outcome.detail());
                return Ok(());
            };
            let written = match caller {
                Caller::Actor(actor) => self.written.get(actor),
                _ => None,
            };
            if let Some(Err(mismatch)) = written.map(|w| json_subset(w, profile)) {
                log.fail(category, name, format!("Profile differs: {}", mismatch), None);
                return Ok(());
            }
        }

        let user_name = user.get("name").and_then(|n| n.as_str()).unwrap_or("?");
        log.pass(category, name, format!("Retrieved user: {}", user_name));
        Ok(())
    }

    fn logout(
        &mut self,
        log: &mut ResultLog,
        category: Category,
        name: &str,
        actor: &str,
    ) -> Result<(), StepError> {
        let old_token = self
            .authed(actor)?
            .token()
            .map(str::to_string)
            .unwrap_or_default();
        let outcome = self.session_mut(actor)?.logout()?;

        if !expect_status(log, category, name, &outcome, 200) {
            return Ok(());
        }
        if outcome.field("success").and_then(|s| s.as_bool()) != Some(true) {
            log.fail(category, name, "Success flag not returned", outcome.detail());
            return Ok(());
        }
        log.pass(category, name, "Logout successful");

        let revoked_name = format!("{} - token revoked", name);
        let check = self.anonymous.request_as(
            Method::Get,
            "/auth/me",
            None,
            Auth::Token(&old_token),
        )?;
        if expect_status(log, category, &revoked_name, &check, 401) {
            log.pass(category, revoked_name, "Old token rejected after logout");
        }
        Ok(())
    }

    fn update_profile(
        &mut self,
        log: &mut ResultLog,
        category: Category,
        name: &str,
        actor: &str,
        profile: &ProfileUpdate,
    ) -> Result<(), StepError> {
        profile.validate()?;
        let body = profile.to_json();
        let outcome = self.authed(actor)?.request(Method::Put, "/profile", Some(&body))?;
        if !expect_status(log, category, name, &outcome, 200) {
            return Ok(());
        }
        self.written.insert(actor.to_string(), body.clone());

        let Some(saved) = outcome.field("profile") else {
            log.fail(category, name, "Missing profile in response", outcome.detail());
            return Ok(());
        };
        match json_subset(&body, saved) {
            Ok(()) => {
                let fields = body.as_object().map(|o| o.len()).unwrap_or(0);
                log.pass(category, name, format!("Profile saved with {} fields", fields));
            }
            Err(mismatch) => log.fail(
                category,
                name,
                format!("Saved profile differs: {}", mismatch),
                None,
            ),
        }
        Ok(())
    }

    fn extend_profile(
        &mut self,
        log: &mut ResultLog,
        category: Category,
        name: &str,
        actor: &str,
        additions: &ProfileUpdate,
    ) -> Result<(), StepError> {
        additions.validate()?;
        let session = self.authed(actor)?;
        let current = session.request(Method::Get, "/profile", None)?;
        if current.status != 200 {
            log.fail(
                category,
                name,
                format!("Could not read current profile: {}", current.describe()),
                current.detail(),
            );
            return Ok(());
        }

        let stored = current.field("profile").cloned().unwrap_or(Value::Null);
        let mut merged: ProfileUpdate = if stored.is_null() {
            ProfileUpdate::default()
        } else {
            match serde_json::from_value(stored) {
                Ok(profile) => profile,
                Err(e) => {
                    log.fail(
                        category,
                        name,
                        format!("Stored profile has an unexpected shape: {}", e),
                        current.detail(),
                    );
                    return Ok(());
                }
            }
        };
        let before = merged.clone();
        merged.extend(additions);
        let body = merged.to_json();

        let outcome = session.request(Method::Put, "/profile", Some(&body))?;
        if !expect_status(log, category, name, &outcome, 200) {
            return Ok(());
        }
        self.written.insert(actor.to_string(), body.clone());
        let Some(saved) = outcome.field("profile") else {
            log.fail(category, name, "Missing profile in response", outcome.detail());
            return Ok(());
        };
        if let Err(mismatch) = json_subset(&body, saved) {
            log.fail(category, name, format!("Saved profile differs: {}", mismatch), None);
            return Ok(());
        }

        let count = |p: &ProfileUpdate| {
            (
                p.skills.as_ref().map_or(0, Vec::len),
                p.experience.as_ref().map_or(0, Vec::len),
                p.projects.as_ref().map_or(0, Vec::len),
            )
        };
        let (skills_before, exp_before, proj_before) = count(&before);
        let (skills_after, exp_after, proj_after) = count(&merged);
        log.pass(
            category,
            name,
            format!(
                "Profile extended: skills {}->{}, experience {}->{}, projects {}->{}",
                skills_before, skills_after, exp_before, exp_after, proj_before, proj_after
            ),
        );
        Ok(())
    }

    fn verify_profile(
        &mut self,
        log: &mut ResultLog,
        category: Category,
        name: &str,
        actor: &str,
    ) -> Result<(), StepError> {
        let written = self
            .written
            .get(actor)
            .cloned()
            .ok_or_else(|| StepError::MissingData(format!("'{}' has not written a profile", actor)))?;
        let session = self.authed(actor)?;

        for (path, label) in [("/profile", "GET /profile"), ("/auth/me", "GET /auth/me")] {
            let check_name = format!("{} - {}", name, label);
            let outcome = session.request(Method::Get, path, None)?;
            if !expect_status(log, category, &check_name, &outcome, 200) {
                continue;
            }
            let Some(profile) = outcome.field("profile") else {
                log.fail(category, check_name, "Profile not found or empty", outcome.detail());
                continue;
            };
            match json_subset(&written, profile) {
                Ok(()) => log.pass(category, check_name, "Profile matches what was written"),
                Err(mismatch) => {
                    log.fail(category, check_name, format!("Profile differs: {}", mismatch), None)
                }
            }
        }
        Ok(())
    }

    fn profile_consistency(
        &mut self,
        log: &mut ResultLog,
        category: Category,
        name: &str,
        actor: &str,
        reads: u32,
    ) -> Result<(), StepError> {
        let session = self.authed(actor)?;
        let reads = reads.max(2);
        let mut profiles = Vec::new();

        for attempt in 1..=reads {
            let outcome = session.request(Method::Get, "/profile", None)?;
            if outcome.status != 200 {
                log.fail(
                    category,
                    name,
                    format!("Read {} of {} failed: {}", attempt, reads, outcome.describe()),
                    outcome.detail(),
                );
                return Ok(());
            }
            profiles.push(outcome.field("profile").cloned().unwrap_or(Value::Null));
        }

        let first = &profiles[0];
        for (index, profile) in profiles.iter().enumerate().skip(1) {
            if profile != first {
                let difference = json_subset(first, profile)
                    .err()
                    .unwrap_or_else(|| "extra fields appeared".to_string());
                log.fail(
                    category,
                    name,
                    format!("Read {} differs from read 1: {}", index + 1, difference),
                    None,
                );
                return Ok(());
            }
        }
        log.pass(category, name, format!("{} consecutive reads identical", reads));
        Ok(())
    }

    fn profile_shape(
        &mut self,
        log: &mut ResultLog,
        category: Category,
        name: &str,
        actor: &str,
    ) -> Result<(), StepError> {
        let outcome = self.authed(actor)?.request(Method::Get, "/profile", None)?;
        if !expect_status(log, category, name, &outcome, 200) {
            return Ok(());
        }
        let Some(profile) = outcome.field("profile") else {
            log.fail(category, name, "No profile found", outcome.detail());
            return Ok(());
        };

        let list = |key: &str| -> Vec<Value> {
            profile
                .get(key)
                .and_then(|v| v.as_array())
                .cloned()
                .unwrap_or_default()
        };
        let text = |item: &Value, key: &str| -> String {
            item.get(key)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };

        let mut checks: Vec<(&str, bool)> = Vec::new();

        let experience = list("experience");
        if !experience.is_empty() {
            checks.push((
                "experience fields",
                experience.iter().all(|e| {
                    !text(e, "title").is_empty()
                        && (!text(e, "org").is_empty() || !text(e, "company").is_empty())
                }),
            ));
            checks.push((
                "experience dates",
                experience
                    .iter()
                    .filter(|e| e.get("startDate").is_some())
                    .all(|e| is_iso_date(&text(e, "startDate"))),
            ));
        }

        let projects = list("projects");
        if !projects.is_empty() {
            checks.push((
                "project fields",
                projects
                    .iter()
                    .all(|p| !text(p, "name").is_empty() && !text(p, "description").is_empty()),
            ));
            checks.push((
                "project urls",
                projects.iter().all(|p| {
                    ["repoUrl", "demoUrl"]
                        .iter()
                        .filter(|key| p.get(**key).is_some_and(|v| !v.is_null()))
                        .all(|key| is_http_url(&text(p, key)))
                }),
            ));
        }

        let socials = list("socials");
        if !socials.is_empty() {
            checks.push((
                "social links",
                socials.iter().all(|s| {
                    let kind = text(s, "type");
                    SocialKind::ALL.iter().any(|k| k.as_str() == kind) && is_http_url(&text(s, "url"))
                }),
            ));
        }

        for (key, check) in [
            ("skills", "skills array"),
            ("interests", "interests array"),
            ("awards", "awards array"),
        ] {
            checks.push((check, profile.get(key).is_some_and(|v| v.is_array())));
        }

        if let Some(prefs) = profile.get("preferences").filter(|p| !p.is_null()) {
            const PREFERENCE_KEYS: [&str; 6] = [
                "desiredRoles",
                "techStack",
                "interestTags",
                "locationRadiusKm",
                "remoteOk",
                "availabilityHrs",
            ];
            checks.push((
                "preference keys",
                PREFERENCE_KEYS.iter().all(|k| prefs.get(*k).is_some()),
            ));
        }

        for (check, ok) in &checks {
            let check_name = format!("{} - {}", name, check);
            if *ok {
                log.pass(category, check_name, "Structure valid");
            } else {
                log.fail(category, check_name, "Structure invalid", None);
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn explore(
        &mut self,
        log: &mut ResultLog,
        category: Category,
        name: &str,
        actor: &str,
        feed: Feed,
        min_items: usize,
        required_fields: &[String],
    ) -> Result<(), StepError> {
        let outcome = self.authed(actor)?.request(Method::Get, feed.path(), None)?;
        if !expect_status(log, category, name, &outcome, 200) {
            return Ok(());
        }
        let Some(items) = outcome.field(feed.list_key()).and_then(|v| v.as_array()) else {
            log.fail(
                category,
                name,
                format!("Missing '{}' in response", feed.list_key()),
                outcome.detail(),
            );
            return Ok(());
        };
        self.explored.insert(feed, items.clone());

        if items.len() < min_items {
            log.fail(
                category,
                name,
                format!("Retrieved {} {}, expected at least {}", items.len(), feed, min_items),
                None,
            );
            return Ok(());
        }
        if let Some(first) = items.first() {
            let missing = missing_fields(first, required_fields);
            if !missing.is_empty() {
                log.fail(
                    category,
                    name,
                    format!("First item lacks fields: {}", missing.join(", ")),
                    Some(first.to_string()),
                );
                return Ok(());
            }
        }
        log.pass(category, name, format!("Retrieved {} {}", items.len(), feed));
        Ok(())
    }

    fn resolve_target(&self, target: &Target) -> Result<(TargetType, String), StepError> {
        match target {
            Target::Actor(actor) => Ok((TargetType::Person, self.user_id(actor)?)),
            Target::Explored { feed, index } => {
                let items = self.explored.get(feed).ok_or_else(|| {
                    StepError::MissingData(format!("{} feed has not been explored", feed))
                })?;
                let id = items
                    .get(*index)
                    .and_then(|item| item.get("id"))
                    .and_then(|id| id.as_str())
                    .ok_or_else(|| {
                        StepError::MissingData(format!(
                            "{} feed has no item #{} with an id ({} items)",
                            feed,
                            index,
                            items.len()
                        ))
                    })?;
                Ok((feed.target_type(), id.to_string()))
            }
            Target::Id { target_type, id } => Ok((*target_type, id.clone())),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn swipe(
        &mut self,
        log: &mut ResultLog,
        category: Category,
        name: &str,
        actor: &str,
        request: &SwipeRequest,
        expect: SwipeExpect,
        budget_ms: Option<u64>,
    ) -> Result<(), StepError> {
        request.validate()?;
        let outcome = self
            .authed(actor)?
            .request(Method::Post, "/swipe", Some(&request.to_json()))?;

        check_swipe(log, category, name, request, expect, &outcome);
        if let Some(budget) = budget_ms {
            check_budget(log, category, &format!("{} - response time", name), &outcome, budget);
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn matches(
        &mut self,
        log: &mut ResultLog,
        category: Category,
        name: &str,
        actor: &str,
        with_actor: Option<&str>,
        min_count: usize,
        required_fields: &[String],
    ) -> Result<(), StepError> {
        let partner_id = match with_actor {
            Some(other) => Some(self.user_id(other)?),
            None => None,
        };
        let outcome = self.authed(actor)?.request(Method::Get, "/matches", None)?;
        if !expect_status(log, category, name, &outcome, 200) {
            return Ok(());
        }
        let Some(matches) = outcome.field("matches").and_then(|v| v.as_array()) else {
            log.fail(category, name, "Missing matches in response", outcome.detail());
            return Ok(());
        };

        if matches.len() < min_count {
            log.fail(
                category,
                name,
                format!("Retrieved {} matches, expected at least {}", matches.len(), min_count),
                None,
            );
            return Ok(());
        }

        if let Some(first) = matches.first() {
            let missing = missing_fields(first, required_fields);
            if !missing.is_empty() {
                log.fail(
                    category,
                    name,
                    format!("Match lacks fields: {}", missing.join(", ")),
                    Some(first.to_string()),
                );
                return Ok(());
            }
        }

        if let (Some(partner), Some(other)) = (&partner_id, with_actor) {
            let found = matches.iter().any(|m| {
                let other_user = m
                    .get("otherUser")
                    .and_then(|u| u.get("id"))
                    .and_then(|id| id.as_str());
                let side = |key: &str| m.get(key).and_then(|id| id.as_str());
                other_user == Some(partner.as_str())
                    || side("aId") == Some(partner.as_str())
                    || side("bId") == Some(partner.as_str())
            });
            if !found {
                log.fail(
                    category,
                    name,
                    format!("No match with {} among {} matches", other, matches.len()),
                    None,
                );
                return Ok(());
            }
        }

        log.pass(category, name, format!("Retrieved {} matches", matches.len()));
        Ok(())
    }
}
