//! Interview service data models
//!
//! Request and response bodies for the local `/api/interview` endpoint.

use serde::{Deserialize, Serialize};

/// One message of the conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewMessage {
    pub role: String,
    pub text: String,
}

impl InterviewMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            text: text.into(),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            role: "ai".to_string(),
            text: text.into(),
        }
    }
}

/// `type: "chat"` request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(rename = "type")]
    pub request_type: String,
    pub selected_job_id: String,
    pub round: u32,
    pub current_question: String,
    pub custom_skills: Vec<String>,
    pub messages: Vec<InterviewMessage>,
}

/// Reply to a chat request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub candidate_note: Option<String>,
}

/// Round names accepted by the `validate` action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationRound {
    Coding,
    SystemDesign,
}

impl ValidationRound {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationRound::Coding => "CODING",
            ValidationRound::SystemDesign => "SYSTEM_DESIGN",
        }
    }

    /// Question the submission is supposed to answer
    pub fn question(&self) -> &'static str {
        match self {
            ValidationRound::Coding => "Find the longest substring without repeating characters",
            ValidationRound::SystemDesign => "Design a URL shortener system",
        }
    }
}

/// `type: "validate"` request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    #[serde(rename = "type")]
    pub request_type: String,
    pub selected_job_id: String,
    pub code: String,
    pub round: ValidationRound,
    pub current_question: String,
    pub custom_instructions: String,
}

/// Reply to a validate request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidateReply {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub metrics: Option<serde_json::Value>,
    #[serde(default)]
    pub detailed_analysis: Option<String>,
}
