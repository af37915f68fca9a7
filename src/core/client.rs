//! Shared HTTP plumbing for all probes
//!
//! Wraps a `reqwest::Client` and turns every exchange into either a
//! `ProbeResponse` or a typed `ProbeError`, depending on which statuses the
//! caller accepts.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, warn};

/// Error types that can occur during a probe exchange
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("{0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response body (HTTP {status}): {message}")]
    MalformedBody { status: u16, message: String },

    #[error("Credential {label} not provided (environment variable {env} is unset)")]
    MissingCredential { label: String, env: String },
}

impl ProbeError {
    /// HTTP status code carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ProbeError::Status { status, .. } | ProbeError::MalformedBody { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Statuses a caller treats as success
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// Exactly 200 OK
    Ok,
    /// Any 2xx
    Success,
}

impl Expect {
    pub fn accepts(&self, status: StatusCode) -> bool {
        match self {
            Expect::Ok => status == StatusCode::OK,
            Expect::Success => status.is_success(),
        }
    }
}

/// An accepted reply: status code and raw body text
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: String,
}

impl ProbeResponse {
    /// Parse the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ProbeError> {
        serde_json::from_str(&self.body).map_err(|e| ProbeError::MalformedBody {
            status: self.status,
            message: e.to_string(),
        })
    }
}

/// HTTP client used by every probe
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `timeout` - Optional request timeout in seconds; `None` keeps the
    ///   library default
    pub fn new(timeout: Option<u64>) -> Result<Self, ProbeError> {
        let mut builder = Client::builder();
        if let Some(secs) = timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ProbeError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client
            .post(url)
            .header("Content-Type", "application/json")
    }

    /// Send a request and read the whole body
    ///
    /// # Errors
    ///
    /// `Transport` when no response could be read, `Status` for any reply
    /// `expect` does not accept (body kept verbatim).
    pub async fn send(
        &self,
        request: RequestBuilder,
        expect: Expect,
    ) -> Result<ProbeResponse, ProbeError> {
        let response = request.send().await.map_err(|e| {
            warn!("Request failed before a response arrived: {}", e);
            ProbeError::Transport(describe_transport_error(&e))
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProbeError::Transport(describe_transport_error(&e)))?;

        debug!("Received HTTP {} ({} bytes)", status.as_u16(), body.len());

        if !expect.accepts(status) {
            return Err(ProbeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(ProbeResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Flatten a reqwest error and its sources into one line
fn describe_transport_error(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
