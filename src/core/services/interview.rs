//! Local interview-simulation service client

use crate::core::client::{Expect, HttpProbe, ProbeError};
use crate::models::interview::{ChatReply, ChatRequest, ValidateReply, ValidateRequest};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Client for the `/api/interview` endpoint
pub struct InterviewClient {
    http: HttpProbe,
    url: String,
    origin: Option<String>,
}

impl InterviewClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `url` - Full endpoint URL, e.g. `http://localhost:3000/api/interview`
    /// * `timeout` - Per-request timeout in seconds
    pub fn new(url: impl Into<String>, timeout: u64) -> Result<Self, ProbeError> {
        Ok(Self {
            http: HttpProbe::new(Some(timeout))?,
            url: url.into(),
            origin: None,
        })
    }

    /// Send an `Origin` header with every request
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    async fn post_json<B, R>(&self, body: &B, expect: Expect) -> Result<R, ProbeError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let mut builder = self.http.post(&self.url).json(body);
        if let Some(origin) = &self.origin {
            builder = builder.header("Origin", origin);
        }
        let response = self.http.send(builder, expect).await?;
        response.json()
    }

    /// POST a chat turn; only 200 counts as a reply
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ProbeError> {
        debug!("Chat round {} with {} messages", request.round, request.messages.len());
        self.post_json(request, Expect::Ok).await
    }

    /// POST a code or design submission for validation; any 2xx counts as a reply
    pub async fn validate(&self, request: &ValidateRequest) -> Result<ValidateReply, ProbeError> {
        debug!("Validate {} submission ({} chars)", request.round.as_str(), request.code.len());
        self.post_json(request, Expect::Success).await
    }
}
