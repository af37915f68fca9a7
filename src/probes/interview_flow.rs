//! Interview-flow smoke test
//!
//! Replays three scripted chat turns against the local interview service and
//! prints a warning when a reply's apparent topic does not fit its round.
//! The topic check is a keyword placeholder; it never fails the run.

use crate::core::client::ProbeError;
use crate::core::constants::interview;
use crate::core::services::InterviewClient;
use crate::models::interview::{ChatReply, ChatRequest, InterviewMessage};
use std::fmt;
use std::io::{self, Write};
use tracing::info;

/// Conceptual question round
pub const CONCEPTUAL_ROUND: u32 = 1;

/// Coding round
pub const CODING_ROUND: u32 = 2;

const CODING_KEYWORDS: [&str; 2] = ["code", "function"];

/// Advisory mismatch between a reply and its round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicWarning {
    /// A coding-round reply that mentions no coding terms
    CodingRoundOffTopic,
    /// A conceptual-round reply that reads like a coding question
    ConceptualRoundLooksLikeCoding,
}

impl fmt::Display for TopicWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicWarning::CodingRoundOffTopic => write!(
                f,
                "⚠️ WARNING: Round 2 (Coding) response might be off-topic (expected coding problem)."
            ),
            TopicWarning::ConceptualRoundLooksLikeCoding => write!(
                f,
                "⚠️ WARNING: Round 1 (Conceptual) response looks like a coding question."
            ),
        }
    }
}

/// Keyword check of a reply against its round
pub fn check_topic(round: u32, text: &str) -> Option<TopicWarning> {
    let text = text.to_lowercase();
    let mentions_code = CODING_KEYWORDS.iter().any(|k| text.contains(k));

    match round {
        CODING_ROUND if !mentions_code => Some(TopicWarning::CodingRoundOffTopic),
        CONCEPTUAL_ROUND if mentions_code => Some(TopicWarning::ConceptualRoundLooksLikeCoding),
        _ => None,
    }
}

/// One scripted chat turn
#[derive(Debug, Clone)]
pub struct Scenario {
    pub round: u32,
    pub history: Vec<InterviewMessage>,
    pub message: String,
}

/// Start of round 1, mid round 1, start of round 2 with a clean history
pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            round: CONCEPTUAL_ROUND,
            history: Vec::new(),
            message: "I am ready to start the interview.".to_string(),
        },
        Scenario {
            round: CONCEPTUAL_ROUND,
            history: vec![
                InterviewMessage::user("I am ready."),
                InterviewMessage::ai(
                    "Great. Let's start with Java. What is the difference between an Interface and an Abstract Class?",
                ),
            ],
            message: "An interface only has method signatures, but an abstract class can have implementation. Also you can implement multiple interfaces.".to_string(),
        },
        Scenario {
            round: CODING_ROUND,
            history: Vec::new(),
            message: "I am ready for the coding round.".to_string(),
        },
    ]
}

/// Build the chat request for a scenario: its history plus the new user message
pub fn build_request(job_id: &str, custom_skills: &[String], scenario: &Scenario) -> ChatRequest {
    let mut messages = scenario.history.clone();
    messages.push(InterviewMessage::user(scenario.message.clone()));

    ChatRequest {
        request_type: interview::CHAT.to_string(),
        selected_job_id: job_id.to_string(),
        round: scenario.round,
        current_question: interview::CURRENT_QUESTION.to_string(),
        custom_skills: custom_skills.to_vec(),
        messages,
    }
}

/// Result of one scenario
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub round: u32,
    pub result: Result<ChatReply, ProbeError>,
    pub warning: Option<TopicWarning>,
}

/// Run `scenarios` in order, printing each exchange to `out`
pub async fn run<W: Write>(
    client: &InterviewClient,
    job_id: &str,
    custom_skills: &[String],
    scenarios: &[Scenario],
    out: &mut W,
) -> io::Result<Vec<ScenarioOutcome>> {
    let mut outcomes = Vec::with_capacity(scenarios.len());

    for scenario in scenarios {
        write!(out, "\n--- Testing Round {} Interaction ---\n", scenario.round)?;

        let request = build_request(job_id, custom_skills, scenario);
        let result = client.chat(&request).await;

        let mut warning = None;
        match &result {
            Ok(reply) => {
                writeln!(out, "User: {}", scenario.message)?;
                writeln!(out, "AI: {}", reply.text.as_deref().unwrap_or("No text response"))?;
                writeln!(out, "Note: {}", reply.candidate_note.as_deref().unwrap_or("No note"))?;

                warning = check_topic(scenario.round, reply.text.as_deref().unwrap_or(""));
                if let Some(w) = warning {
                    writeln!(out, "{}", w)?;
                }
            }
            Err(ProbeError::Status { status, body }) => {
                writeln!(out, "❌ Error {}: {}", status, body)?;
            }
            Err(e) => writeln!(out, "❌ Exception: {}", e)?,
        }

        info!("Round {} scenario finished (warning: {:?})", scenario.round, warning);
        outcomes.push(ScenarioOutcome {
            round: scenario.round,
            result,
            warning,
        });
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_coding_round_without_keywords_warns() {
        assert_eq!(
            check_topic(2, "Tell me about your last project."),
            Some(TopicWarning::CodingRoundOffTopic)
        );
    }

    #[test]
    fn test_conceptual_round_with_keywords_warns() {
        assert_eq!(
            check_topic(1, "Write a FUNCTION that reverses a list."),
            Some(TopicWarning::ConceptualRoundLooksLikeCoding)
        );
        assert_eq!(
            check_topic(1, "Show me some code."),
            Some(TopicWarning::ConceptualRoundLooksLikeCoding)
        );
    }

    #[test]
    fn test_matching_topics_are_silent() {
        assert_eq!(check_topic(1, "What is polymorphism?"), None);
        assert_eq!(check_topic(2, "Implement a function to find duplicates."), None);
        assert_eq!(check_topic(3, "code"), None);
    }

    #[test]
    fn test_build_request_appends_user_message() {
        let all = scenarios();
        let skills = vec!["Java".to_string()];
        let request = build_request("sde1", &skills, &all[1]);
        assert_eq!(request.request_type, "chat");
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0], InterviewMessage::user("I am ready."));
        assert_eq!(request.messages[2].role, "user");
        assert_eq!(request.messages[2].text, all[1].message);
    }

    #[test]
    fn test_fixed_scenarios() {
        let rounds: Vec<u32> = scenarios().iter().map(|s| s.round).collect();
        assert_eq!(rounds, vec![1, 1, 2]);
    }

    #[tokio::test]
    async fn test_run_prints_warnings() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"round": 1})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "text": "Please write code for a stack.",
                "candidateNote": "eager"
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"round": 2})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "text": "Tell me about yourself."
            })))
            .mount(&server)
            .await;

        let client = InterviewClient::new(server.uri(), 5).unwrap();
        let mut out = Vec::new();
        let outcomes = run(&client, "sde1", &[], &scenarios(), &mut out).await.unwrap();
        let printed = String::from_utf8(out).unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].warning, Some(TopicWarning::ConceptualRoundLooksLikeCoding));
        assert_eq!(outcomes[2].warning, Some(TopicWarning::CodingRoundOffTopic));
        assert!(printed.contains("Note: eager"));
        assert!(printed.contains("AI: Tell me about yourself.\nNote: No note\n"));
        assert_eq!(printed.matches("⚠️ WARNING").count(), 3);
    }

    #[tokio::test]
    async fn test_run_without_warning() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "text": "Explain the JVM memory model."
            })))
            .mount(&server)
            .await;

        let client = InterviewClient::new(server.uri(), 5).unwrap();
        let mut out = Vec::new();
        let outcomes = run(&client, "sde1", &[], &scenarios()[..1], &mut out).await.unwrap();
        let printed = String::from_utf8(out).unwrap();

        assert!(outcomes[0].warning.is_none());
        assert!(!printed.contains("WARNING"));
    }

    #[tokio::test]
    async fn test_run_reports_errors_and_continues() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Job not found"})))
            .mount(&server)
            .await;

        let client = InterviewClient::new(server.uri(), 5).unwrap();
        let mut out = Vec::new();
        let outcomes = run(&client, "nope", &[], &scenarios(), &mut out).await.unwrap();
        let printed = String::from_utf8(out).unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(printed.matches("❌ Error 404: ").count(), 3);
    }

    #[tokio::test]
    async fn test_run_treats_accepted_chat_as_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({"text": "queued"})))
            .mount(&server)
            .await;

        let client = InterviewClient::new(server.uri(), 5).unwrap();
        let mut out = Vec::new();
        let outcomes = run(&client, "sde1", &[], &scenarios(), &mut out).await.unwrap();
        let printed = String::from_utf8(out).unwrap();

        let rounds: Vec<u32> = outcomes.iter().map(|o| o.round).collect();
        assert_eq!(rounds, vec![1, 1, 2]);
        assert!(outcomes.iter().all(|o| o.result.is_err()));
        assert_eq!(printed.matches("❌ Error 202: ").count(), 3);
        assert!(!printed.contains("AI: queued"));
    }

    #[tokio::test]
    async fn test_run_transport_failure() {
        let client = InterviewClient::new("http://127.0.0.1:1/api/interview", 2).unwrap();
        let mut out = Vec::new();
        let outcomes = run(&client, "sde1", &[], &scenarios(), &mut out).await.unwrap();
        let printed = String::from_utf8(out).unwrap();

        assert!(outcomes.iter().all(|o| o.result.is_err() && o.warning.is_none()));
        assert_eq!(printed.matches("❌ Exception: ").count(), 3);
    }
}
