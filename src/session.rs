//! HTTP session against the matching service
//!
//! A [`Session`] represents one actor: it owns a base URL, a blocking ureq
//! agent with a global timeout, and (once authenticated) a bearer token that
//! is attached to every subsequent request.
//!
//! Non-2xx responses are never errors here. [`Session::request`] hands back an
//! [`Outcome`] and the caller decides whether the status was expected. Only
//! connection failures and timeouts surface as [`TransportError`].

use crate::payload::{LoginRequest, RegisterRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{method} {url} timed out after {secs}s")]
    Timeout {
        method: Method,
        url: String,
        secs: u64,
    },

    #[error("{method} {url} failed: {message}")]
    Connection {
        method: Method,
        url: String,
        message: String,
    },

    #[error("Failed to read response from {method} {url}: {message}")]
    Body {
        method: Method,
        url: String,
        message: String,
    },

    #[error("Failed to encode request body for {url}: {source}")]
    Encode {
        url: String,
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Registration for {email} failed with status {status}: {message}")]
    Registration {
        email: String,
        status: u16,
        message: String,
    },

    #[error("Login for {email} failed with status {status}: {message}")]
    Login {
        email: String,
        status: u16,
        message: String,
    },

    #[error("Authentication response for {email} did not include a token")]
    MissingToken { email: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// HTTP methods the service exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// Which credential to send with a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth<'a> {
    /// The session's own token, if any
    Session,
    /// No Authorization header at all
    Anonymous,
    /// An explicit token, e.g. a deliberately invalid one
    Token(&'a str),
}

/// Response of a single call, whatever its status
#[derive(Debug, Clone)]
pub struct Outcome {
    pub status: u16,
    /// Parsed JSON body, `Value::Null` when the body is empty or not JSON
    pub body: Value,
    /// The service's `{"error": "..."}` message, if present
    pub error: Option<String>,
    pub raw: String,
    pub elapsed: Duration,
}

impl Outcome {
    fn new(status: u16, raw: String, elapsed: Duration) -> Self {
        let body: Value = serde_json::from_str(&raw).unwrap_or(Value::Null);
        let error = body
            .get("error")
            .and_then(|e| e.as_str())
            .map(str::to_string);
        Self {
            status,
            body,
            error,
            raw,
            elapsed,
        }
    }

    /// Look up a field of the body; missing keys and explicit nulls both yield `None`
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.body.get(key).filter(|v| !v.is_null())
    }

    /// Short description for failure messages: status plus the error text when known
    pub fn describe(&self) -> String {
        match &self.error {
            Some(error) => format!("status {} ({})", self.status, error),
            None => format!("status {}", self.status),
        }
    }

    /// Raw body trimmed to a size that fits in a report line
    pub fn detail(&self) -> Option<String> {
        const MAX_DETAIL: usize = 300;
        let raw = self.raw.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.len() <= MAX_DETAIL {
            return Some(raw.to_string());
        }
        let mut end = MAX_DETAIL;
        while !raw.is_char_boundary(end) {
            end -= 1;
        }
        Some(format!("{}...", &raw[..end]))
    }
}

/// How [`Session::authenticate`] obtained its token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPath {
    Registered,
    LoggedIn,
}

impl fmt::Display for AuthPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthPath::Registered => write!(f, "registered"),
            AuthPath::LoggedIn => write!(f, "logged in"),
        }
    }
}

/// One actor's connection to the service
pub struct Session {
    base_url: String,
    agent: ureq::Agent,
    timeout: Duration,
    token: Option<String>,
    user: Option<Value>,
}

impl Session {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: ureq::Agent::new_with_config(config),
            timeout,
            token: None,
            user: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.get("id")).and_then(|id| id.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Store the credential issued by an auth response (`{user, token}`)
    ///
    /// Returns false when the body carries no token.
    pub fn attach(&mut self, outcome: &Outcome) -> bool {
        let Some(token) = outcome.field("token").and_then(|t| t.as_str()) else {
            return false;
        };
        if token.is_empty() {
            return false;
        }
        self.token = Some(token.to_string());
        self.user = outcome.field("user").cloned();
        true
    }

    pub fn clear_credential(&mut self) {
        self.token = None;
    }

    /// Register, falling back to login when the account already exists
    pub fn authenticate(&mut self, credentials: &RegisterRequest) -> Result<AuthPath, AuthError> {
        let register = self.request_as(
            Method::Post,
            "/auth/register",
            Some(&to_body(credentials)),
            Auth::Anonymous,
        )?;

        if register.status == 200 {
            if !self.attach(&register) {
                return Err(AuthError::MissingToken {
                    email: credentials.email.clone(),
                });
            }
            tracing::info!(email = %credentials.email, "registered new account");
            return Ok(AuthPath::Registered);
        }

        if !is_already_exists(&register) {
            return Err(AuthError::Registration {
                email: credentials.email.clone(),
                status: register.status,
                message: register.error.unwrap_or_else(|| register.raw.clone()),
            });
        }

        tracing::debug!(email = %credentials.email, "account exists, falling back to login");
        let login = LoginRequest {
            email: credentials.email.clone(),
            password: credentials.password.clone(),
        };
        let response = self.request_as(
            Method::Post,
            "/auth/login",
            Some(&to_body(&login)),
            Auth::Anonymous,
        )?;

        if response.status != 200 {
            return Err(AuthError::Login {
                email: credentials.email.clone(),
                status: response.status,
                message: response.error.unwrap_or_else(|| response.raw.clone()),
            });
        }
        if !self.attach(&response) {
            return Err(AuthError::MissingToken {
                email: credentials.email.clone(),
            });
        }
        tracing::info!(email = %credentials.email, "logged in to existing account");
        Ok(AuthPath::LoggedIn)
    }

    /// Issue a request with the session's current credential
    pub fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Outcome, TransportError> {
        self.request_as(method, path, body, Auth::Session)
    }

    pub fn request_as(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        auth: Auth<'_>,
    ) -> Result<Outcome, TransportError> {
        let url = self.url(path);
        let token = match auth {
            Auth::Session => self.token.as_deref(),
            Auth::Anonymous => None,
            Auth::Token(token) => Some(token),
        };
        let authorization = token.map(|t| format!("Bearer {}", t));

        let payload = match body {
            Some(value) => Some(serde_json::to_string(value).map_err(|source| {
                TransportError::Encode {
                    url: url.clone(),
                    source,
                }
            })?),
            None => None,
        };

        let started = Instant::now();
        let result = match method {
            Method::Get => {
                let mut req = self.agent.get(&url).header("Accept", "application/json");
                if let Some(value) = &authorization {
                    req = req.header("Authorization", value);
                }
                req.call()
            }
            Method::Delete => {
                let mut req = self.agent.delete(&url).header("Accept", "application/json");
                if let Some(value) = &authorization {
                    req = req.header("Authorization", value);
                }
                req.call()
            }
            Method::Post | Method::Put => {
                let mut req = if method == Method::Post {
                    self.agent.post(&url)
                } else {
                    self.agent.put(&url)
                };
                req = req.header("Accept", "application/json");
                if let Some(value) = &authorization {
                    req = req.header("Authorization", value);
                }
                match &payload {
                    Some(json) => req
                        .header("Content-Type", "application/json")
                        .send(json.as_bytes()),
                    None => req.send_empty(),
                }
            }
        };

        let response = result.map_err(|e| {
            let err = self.transport_error(method, &url, e);
            tracing::warn!("{}", err);
            err
        })?;

        let status = response.status().as_u16();
        let raw = response
            .into_body()
            .read_to_string()
            .map_err(|e| TransportError::Body {
                method,
                url: url.clone(),
                message: e.to_string(),
            })?;
        let elapsed = started.elapsed();

        tracing::debug!(
            %method,
            url = %url,
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            "request completed"
        );

        Ok(Outcome::new(status, raw, elapsed))
    }

    /// `POST /auth/logout` and drop the stored token
    pub fn logout(&mut self) -> Result<Outcome, TransportError> {
        let outcome = self.request(Method::Post, "/auth/logout", None)?;
        self.clear_credential();
        Ok(outcome)
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn transport_error(&self, method: Method, url: &str, error: ureq::Error) -> TransportError {
        match error {
            ureq::Error::Timeout(_) => TransportError::Timeout {
                method,
                url: url.to_string(),
                secs: self.timeout.as_secs(),
            },
            other => TransportError::Connection {
                method,
                url: url.to_string(),
                message: other.to_string(),
            },
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .field("user_id", &self.user_id())
            .finish()
    }
}

/// Join a base URL and an endpoint path with exactly one slash between them
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}

/// True for the service's "account already exists" registration rejection
fn is_already_exists(outcome: &Outcome) -> bool {
    outcome.status == 400
        && outcome
            .error
            .as_deref()
            .unwrap_or(&outcome.raw)
            .to_lowercase()
            .contains("already exists")
}

fn to_body<T: Serialize>(value: &T) -> Value {
    // Plain structs of strings always serialize.
    serde_json::to_value(value).unwrap_or(Value::Null)
}
