//! Application configuration management
//!
//! Configuration is read from a TOML file. Secrets never live in the file:
//! each credential names the environment variable that holds it, and the
//! variable is resolved when the configuration is loaded.

use crate::core::auth::{AuthMode, Credential};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default configuration file name
const DEFAULT_CONFIG_PATH: &str = "probe.toml";

/// Default Gemini API base URL
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default environment variable holding the Gemini API key
const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default interview endpoint
const DEFAULT_INTERVIEW_URL: &str = "http://localhost:3000/api/interview";

/// Default interview request timeout in seconds
const DEFAULT_INTERVIEW_TIMEOUT: u64 = 30;

/// Default pause between execute-check cases in milliseconds
const DEFAULT_PACE_MS: u64 = 1000;

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_results_log")]
    pub results_log: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            results_log: default_results_log(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RequestSection {
    /// Timeout for Gemini requests; omitted keeps the HTTP library default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSection {
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_auth")]
    pub auth: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_health_model")]
    pub health_model: String,
}

impl Default for GeminiSection {
    fn default() -> Self {
        Self {
            base_url: default_gemini_base_url(),
            api_key_env: default_api_key_env(),
            auth: default_auth(),
            model: default_model(),
            health_model: default_health_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterviewSection {
    #[serde(default = "default_interview_url")]
    pub url: String,
    #[serde(default = "default_job_id")]
    pub job_id: String,
    #[serde(default = "default_interview_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_custom_skills")]
    pub custom_skills: Vec<String>,
    #[serde(default = "default_validate_job_id")]
    pub validate_job_id: String,
    #[serde(default = "default_pace_ms")]
    pub pace_ms: u64,
}

impl Default for InterviewSection {
    fn default() -> Self {
        Self {
            url: default_interview_url(),
            job_id: default_job_id(),
            timeout_secs: default_interview_timeout(),
            custom_skills: default_custom_skills(),
            validate_job_id: default_validate_job_id(),
            pace_ms: default_pace_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialEntry {
    pub label: String,
    pub auth: String,
    pub env: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_results_log() -> String {
    "test_results.log".to_string()
}

fn default_gemini_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_auth() -> String {
    "query_key".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_health_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_interview_url() -> String {
    DEFAULT_INTERVIEW_URL.to_string()
}

fn default_job_id() -> String {
    "sde1".to_string()
}

fn default_interview_timeout() -> u64 {
    DEFAULT_INTERVIEW_TIMEOUT
}

fn default_custom_skills() -> Vec<String> {
    vec!["Java".to_string(), "System Design".to_string()]
}

fn default_validate_job_id() -> String {
    "java-backend-dev".to_string()
}

fn default_pace_ms() -> u64 {
    DEFAULT_PACE_MS
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub request: RequestSection,
    #[serde(default)]
    pub gemini: GeminiSection,
    #[serde(default)]
    pub interview: InterviewSection,
    #[serde(default)]
    pub credentials: Vec<CredentialEntry>,
}

/// Resolved probe configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Logging level
    pub log_level: String,

    /// Key tester log file, overwritten on every run
    pub results_log: String,

    /// Gemini request timeout in seconds (`None` = library default)
    pub request_timeout: Option<u64>,

    pub gemini_base_url: String,

    /// Key used by the model lister and health ping
    pub api_key: Credential,

    /// Model exercised by the key tester
    pub model: String,

    /// Model pinged by the health probe
    pub health_model: String,

    pub interview_url: String,
    pub interview_job_id: String,
    pub interview_timeout: u64,
    pub custom_skills: Vec<String>,
    pub validate_job_id: String,
    pub pace_ms: u64,

    /// Credentials tried by the key tester, in order
    pub credentials: Vec<Credential>,
}

impl Config {
    /// Parse TOML content, resolving credential variables through `lookup`
    ///
    /// # Errors
    ///
    /// Returns error if the TOML cannot be parsed, an auth mode is unknown,
    /// or a credential label is empty.
    pub fn from_toml_str<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config: TomlConfig =
            toml::from_str(content).context("Failed to parse TOML configuration")?;

        let resolve = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_auth = parse_auth(&config.gemini.auth)
            .context("Invalid [gemini] auth value")?;
        let api_key = Credential::new(
            config.gemini.api_key_env.clone(),
            api_auth,
            config.gemini.api_key_env.clone(),
            resolve(&config.gemini.api_key_env),
        );

        let mut credentials = Vec::with_capacity(config.credentials.len());
        for entry in &config.credentials {
            if entry.label.trim().is_empty() {
                bail!("Credential entry with empty label (env {})", entry.env);
            }
            let auth = parse_auth(&entry.auth)
                .with_context(|| format!("Invalid auth value for credential {}", entry.label))?;
            credentials.push(Credential::new(
                entry.label.clone(),
                auth,
                entry.env.clone(),
                resolve(&entry.env),
            ));
        }
        if credentials.is_empty() {
            credentials.push(api_key.clone());
        }

        Ok(Config {
            log_level: config.logging.level,
            results_log: config.logging.results_log,
            request_timeout: config.request.timeout_secs,
            gemini_base_url: config.gemini.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.gemini.model,
            health_model: config.gemini.health_model,
            interview_url: config.interview.url,
            interview_job_id: config.interview.job_id,
            interview_timeout: config.interview.timeout_secs,
            custom_skills: config.interview.custom_skills,
            validate_job_id: config.interview.validate_job_id,
            pace_ms: config.interview.pace_ms,
            credentials,
        })
    }

    /// Load configuration from a TOML file, resolving secrets from the process environment
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read configuration file")?;
        Self::from_toml_str(&content, |name| std::env::var(name).ok())
    }

    /// Load configuration for this run
    ///
    /// Uses `explicit_path` if given, else `CONFIG_PATH`, else `probe.toml`.
    /// An implicit path that does not exist falls back to built-in defaults.
    pub fn load(explicit_path: Option<&str>) -> Result<Self> {
        // Secrets may come from a .env file in the working directory
        dotenv::dotenv().ok();

        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        if Path::new(&path).exists() {
            Self::from_file(path)
        } else {
            Self::from_toml_str("", |name| std::env::var(name).ok())
        }
    }
}

fn parse_auth(value: &str) -> Result<AuthMode> {
    AuthMode::from_str(value)
        .with_context(|| format!("Unknown auth mode '{}'. Must be one of: query_key, bearer", value))
}
