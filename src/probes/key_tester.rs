//! Key tester: tries each configured credential against generateContent
//!
//! Every credential gets its own section in the results log, whatever the
//! outcome. Failures are recorded, never raised.

use crate::core::auth::{AuthMode, Credential};
use crate::core::client::{Expect, ProbeError, ProbeResponse};
use crate::core::constants::prompt;
use crate::core::services::GeminiClient;
use crate::models::gemini::GenerateContentRequest;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

/// Result of testing a single credential
#[derive(Debug)]
pub struct KeyOutcome {
    pub label: String,
    pub auth: AuthMode,
    pub result: Result<ProbeResponse, ProbeError>,
}

impl KeyOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

fn write_section<W: Write>(log: &mut W, outcome: &KeyOutcome) -> io::Result<()> {
    match &outcome.result {
        Ok(response) => {
            writeln!(log, "Status: {}", response.status)?;
            writeln!(log, "✓ SUCCESS")?;
            writeln!(log, "Response: {}", response.body)?;
        }
        Err(ProbeError::Status { status, body }) => {
            writeln!(log, "Status: {}", status)?;
            writeln!(log, "✗ FAILED: {}", body)?;
            if let Some(hint) = GeminiClient::classify_error(body) {
                writeln!(log, "Hint: {}", hint)?;
            }
        }
        Err(e) => writeln!(log, "Error: {}", e)?,
    }
    Ok(())
}

/// Test every credential in order, writing one section per credential to `log`
pub async fn run<W: Write>(
    client: &GeminiClient,
    model: &str,
    credentials: &[Credential],
    log: &mut W,
) -> io::Result<Vec<KeyOutcome>> {
    let request = GenerateContentRequest::prompt(prompt::KEY_CHECK);
    let mut outcomes = Vec::with_capacity(credentials.len());

    for credential in credentials {
        write!(log, "\n--- Testing {} ---\n", credential.label)?;

        let result = client
            .generate_content(credential, model, &request, Expect::Ok)
            .await;
        match &result {
            Ok(_) => info!("{}: accepted", credential.label),
            Err(e) => warn!("{}: {}", credential.label, e),
        }

        let outcome = KeyOutcome {
            label: credential.label.clone(),
            auth: credential.auth,
            result,
        };
        write_section(log, &outcome)?;
        outcomes.push(outcome);
    }

    log.flush()?;
    Ok(outcomes)
}

/// Run the key tester against a log file, truncating any previous results
pub async fn run_to_file<P: AsRef<Path>>(
    client: &GeminiClient,
    model: &str,
    credentials: &[Credential],
    path: P,
) -> io::Result<Vec<KeyOutcome>> {
    let mut log = BufWriter::new(File::create(path)?);
    run(client, model, credentials, &mut log).await
}

/// Run the key tester against `path`, then point the user at it on `out`
pub async fn run_and_report<P: AsRef<Path>, W: Write>(
    client: &GeminiClient,
    model: &str,
    credentials: &[Credential],
    path: P,
    out: &mut W,
) -> io::Result<Vec<KeyOutcome>> {
    let outcomes = run_to_file(client, model, credentials, path.as_ref()).await?;
    writeln!(out, "Done. Check {}", path.as_ref().display())?;
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/models/gemini-1.5-flash:generateContent";

    fn credentials() -> Vec<Credential> {
        vec![
            Credential::new("USER_TOKEN", AuthMode::Bearer, "PROBE_USER_TOKEN", Some("tok-1".to_string())),
            Credential::new("STORED_KEY", AuthMode::QueryKey, "PROBE_STORED_KEY", Some("key-bad".to_string())),
            Credential::new("SYSTEM_KEY", AuthMode::QueryKey, "PROBE_SYSTEM_KEY", Some("key-good".to_string())),
            Credential::new("MISSING", AuthMode::QueryKey, "PROBE_MISSING", None),
        ]
    }

    async fn mock_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(401).set_body_string("UNAUTHENTICATED"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(query_param("key", "key-bad"))
            .respond_with(ResponseTemplate::new(400).set_body_string("API_KEY_INVALID"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(query_param("key", "key-good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "OK"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_one_section_per_credential_in_order() {
        let server = mock_server().await;
        let client = GeminiClient::new(server.uri(), Some(5)).unwrap();

        let mut log = Vec::new();
        let outcomes = run(&client, "gemini-1.5-flash", &credentials(), &mut log).await.unwrap();
        let log = String::from_utf8(log).unwrap();

        let labels: Vec<&str> = log
            .lines()
            .filter_map(|l| l.strip_prefix("--- Testing "))
            .filter_map(|l| l.strip_suffix(" ---"))
            .collect();
        assert_eq!(labels, vec!["USER_TOKEN", "STORED_KEY", "SYSTEM_KEY", "MISSING"]);

        assert_eq!(outcomes.len(), 4);
        assert!(!outcomes[0].succeeded());
        assert!(!outcomes[1].succeeded());
        assert!(outcomes[2].succeeded());
        assert!(matches!(
            outcomes[3].result,
            Err(ProbeError::MissingCredential { .. })
        ));

        assert!(log.contains("Status: 401\n✗ FAILED: UNAUTHENTICATED\n"));
        assert!(log.contains("Status: 400\n✗ FAILED: API_KEY_INVALID\nHint: Invalid API key"));
        assert!(log.contains("Status: 200\n✓ SUCCESS\nResponse: "));
        assert!(log.contains("Error: Credential MISSING not provided"));
    }

    #[tokio::test]
    async fn test_transport_failures_are_logged() {
        let client = GeminiClient::new("http://127.0.0.1:1", Some(2)).unwrap();
        let creds = &credentials()[..2];

        let mut log = Vec::new();
        let outcomes = run(&client, "gemini-1.5-flash", creds, &mut log).await.unwrap();
        let log = String::from_utf8(log).unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| matches!(o.result, Err(ProbeError::Transport(_)))));
        assert_eq!(log.matches("--- Testing ").count(), 2);
        assert_eq!(log.matches("\nError: ").count(), 2);
    }

    #[tokio::test]
    async fn test_only_200_counts_as_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(202).set_body_string("queued"))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(server.uri(), Some(5)).unwrap();
        let mut log = Vec::new();
        let outcomes = run(&client, "gemini-1.5-flash", &credentials()[2..3], &mut log)
            .await
            .unwrap();
        let log = String::from_utf8(log).unwrap();

        assert!(!outcomes[0].succeeded());
        assert!(log.contains("Status: 202\n✗ FAILED: queued\n"));
        assert!(!log.contains("✓ SUCCESS"));
    }

    #[tokio::test]
    async fn test_run_and_report_prints_done_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.log");

        let client = GeminiClient::new("http://127.0.0.1:1", Some(2)).unwrap();
        let mut out = Vec::new();
        let outcomes = run_and_report(&client, "gemini-1.5-flash", &credentials()[..2], &path, &mut out)
            .await
            .unwrap();

        assert!(outcomes.iter().all(|o| !o.succeeded()));
        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed, format!("Done. Check {}\n", path.display()));
        assert_eq!(std::fs::read_to_string(&path).unwrap().matches("--- Testing ").count(), 2);
    }

    #[tokio::test]
    async fn test_run_to_file_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_results.log");
        std::fs::write(&path, "stale contents from an earlier run\n").unwrap();

        let client = GeminiClient::new("http://127.0.0.1:1", Some(2)).unwrap();
        let creds = &credentials()[3..];
        run_to_file(&client, "gemini-1.5-flash", creds, &path).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("stale"));
        assert!(written.starts_with("\n--- Testing MISSING ---\n"));
    }
}
