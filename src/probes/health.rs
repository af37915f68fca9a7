//! Health ping against the Gemini API

use crate::core::auth::Credential;
use crate::core::client::{Expect, ProbeError};
use crate::core::constants::{prompt, status};
use crate::core::services::GeminiClient;
use crate::models::gemini::{GenerateContentRequest, GenerateContentResponse};
use serde::Serialize;
use std::io::{self, Write};
use tracing::{error, info};

/// Connectivity report for one ping
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub timestamp: String,
}

impl HealthReport {
    pub fn is_ok(&self) -> bool {
        self.status == status::OK
    }

    fn error(code: Option<u16>, message: String, details: Option<String>) -> Self {
        Self {
            status: status::ERROR,
            model: None,
            response: None,
            code,
            message: Some(message),
            details,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Ping `model` once and describe the outcome
pub async fn check(client: &GeminiClient, credential: &Credential, model: &str) -> HealthReport {
    info!("[Health Check] Testing connectivity to {}...", model);

    let request = GenerateContentRequest::prompt(prompt::PING)
        .with_role("user")
        .with_max_output_tokens(prompt::PING_MAX_TOKENS);

    let parsed = client
        .generate_content(credential, model, &request, Expect::Success)
        .await
        .and_then(|r| r.json::<GenerateContentResponse>());

    match parsed {
        Ok(response) => HealthReport {
            status: status::OK,
            model: Some(model.to_string()),
            response: response.first_text().map(str::to_string),
            code: None,
            message: None,
            details: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        },
        Err(ProbeError::Status { status: code, body }) => {
            let reason = reqwest::StatusCode::from_u16(code)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown")
                .to_string();
            error!("[Health Check] Failed: {} {}", code, reason);
            HealthReport::error(Some(code), reason, Some(body))
        }
        Err(e) => {
            error!("[Health Check] Network/Unknown Error: {}", e);
            HealthReport::error(None, e.to_string(), None)
        }
    }
}

/// Ping and print the report as pretty JSON
pub async fn run<W: Write>(
    client: &GeminiClient,
    credential: &Credential,
    model: &str,
    out: &mut W,
) -> io::Result<HealthReport> {
    let report = check(client, credential, model).await;
    let rendered = serde_json::to_string_pretty(&report).map_err(io::Error::other)?;
    writeln!(out, "{}", rendered)?;
    Ok(report)
}
