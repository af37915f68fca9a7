//! Gemini (generativelanguage) API client

use crate::core::auth::Credential;
use crate::core::client::{Expect, HttpProbe, ProbeError, ProbeResponse};
use crate::core::constants::method;
use crate::models::gemini::{GenerateContentRequest, ModelList};
use tracing::{debug, info};

/// A models listing and the status it arrived with
#[derive(Debug, Clone)]
pub struct Listing {
    pub status: u16,
    pub models: ModelList,
}

/// Client for the generative-language API
pub struct GeminiClient {
    http: HttpProbe,
    base_url: String,
}

impl GeminiClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root, e.g. `https://generativelanguage.googleapis.com/v1beta`
    /// * `timeout` - Optional request timeout in seconds
    pub fn new(base_url: impl Into<String>, timeout: Option<u64>) -> Result<Self, ProbeError> {
        let base_url: String = base_url.into();
        Ok(Self {
            http: HttpProbe::new(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn secret<'a>(credential: &'a Credential) -> Result<&'a str, ProbeError> {
        credential
            .secret
            .as_deref()
            .ok_or_else(|| ProbeError::MissingCredential {
                label: credential.label.clone(),
                env: credential.env.clone(),
            })
    }

    /// GET `models`
    ///
    /// # Errors
    ///
    /// `Status` for non-200 replies, `MalformedBody` when a 200 body is not a
    /// models listing.
    pub async fn list_models(&self, credential: &Credential) -> Result<Listing, ProbeError> {
        let secret = Self::secret(credential)?;
        let url = format!("{}/models", self.base_url);
        info!("Listing models with {} ({})", credential.label, credential.auth.as_str());

        let request = credential.auth.apply(self.http.get(&url), secret);
        let response = self.http.send(request, Expect::Ok).await?;
        Ok(Listing {
            status: response.status,
            models: response.json()?,
        })
    }

    /// POST `models/{model}:generateContent`, returning the raw reply
    ///
    /// Replies `expect` does not accept come back as `ProbeError::Status`.
    pub async fn generate_content(
        &self,
        credential: &Credential,
        model: &str,
        request: &GenerateContentRequest,
        expect: Expect,
    ) -> Result<ProbeResponse, ProbeError> {
        let secret = Self::secret(credential)?;
        let url = format!("{}/models/{}:{}", self.base_url, model, method::GENERATE_CONTENT);
        debug!("POST {} as {} ({})", url, credential.label, credential.auth.as_str());

        let builder = credential
            .auth
            .apply(self.http.post(&url), secret)
            .json(request);
        self.http.send(builder, expect).await
    }

    /// Explain a Gemini error body, if it matches a known failure
    pub fn classify_error(error_detail: &str) -> Option<&'static str> {
        let error_lower = error_detail.to_lowercase();

        if error_lower.contains("api_key_invalid") || error_lower.contains("api key not valid") {
            return Some("Invalid API key. Check the environment variable configured for this credential.");
        }

        if error_lower.contains("access_token_type_unsupported")
            || error_lower.contains("invalid authentication credentials")
            || error_lower.contains("unauthenticated")
        {
            return Some("Token rejected. Bearer credentials must be OAuth access tokens; API keys need auth = \"query_key\".");
        }

        if error_lower.contains("resource_exhausted") || error_lower.contains("quota") {
            return Some("Quota exhausted or rate limited. Wait and retry, or check the project's quota.");
        }

        if error_lower.contains("permission_denied") {
            return Some("Permission denied. The key's project may not have the Generative Language API enabled.");
        }

        if error_lower.contains("not_found") || error_lower.contains("is not found") {
            return Some("Model not found. Check the configured model name.");
        }

        if error_lower.contains("user location is not supported") {
            return Some("The API is not available in this region.");
        }

        None
    }
}
