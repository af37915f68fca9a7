//! Credential and authentication mode handling
//!
//! A credential's authentication style is always chosen explicitly through
//! configuration. Nothing here looks at the secret's contents.

use reqwest::RequestBuilder;
use std::fmt;

/// How a credential is attached to an outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Sent as the `key` query parameter
    QueryKey,
    /// Sent as `Authorization: Bearer <secret>`
    Bearer,
}

impl AuthMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "query_key" | "query-key" | "key" => Some(AuthMode::QueryKey),
            "bearer" | "bearer_token" | "oauth" => Some(AuthMode::Bearer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::QueryKey => "query_key",
            AuthMode::Bearer => "bearer",
        }
    }

    /// Attach `secret` to the request in this mode's style
    pub fn apply(&self, builder: RequestBuilder, secret: &str) -> RequestBuilder {
        match self {
            AuthMode::QueryKey => builder.query(&[("key", secret)]),
            AuthMode::Bearer => builder.bearer_auth(secret),
        }
    }
}

/// A labelled credential resolved from the environment
///
/// `secret` is `None` when the environment variable named by `env` was not
/// set at load time.
#[derive(Clone)]
pub struct Credential {
    pub label: String,
    pub auth: AuthMode,
    pub env: String,
    pub secret: Option<String>,
}

impl Credential {
    pub fn new(label: impl Into<String>, auth: AuthMode, env: impl Into<String>, secret: Option<String>) -> Self {
        Self {
            label: label.into(),
            auth,
            env: env.into(),
            secret,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("label", &self.label)
            .field("auth", &self.auth)
            .field("env", &self.env)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
