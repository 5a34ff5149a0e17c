//! Gemini HTTP client.
//!
//! Uses a long-lived reqwest::Client for connection pooling.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error, warn};

use fx_types::ParserError;

use crate::types::{GeminiError, GenerateContentRequest, GenerateContentResponse};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Reusable Gemini client (connection-pooled).
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Points the client at a different API root (trailing slash ignored).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    /// Calls `models/{model}:generateContent` and returns the text of the
    /// first candidate.
    pub async fn generate_text(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<String, ParserError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ParserError::MissingCredentials);
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        debug!(model, "Sending Gemini request");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request failed: {}", e);
                ParserError::Network(e.to_string())
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ParserError::Network(format!("Failed to read response: {}", e)))?;

        if !(200..300).contains(&status) {
            let err = match serde_json::from_str::<GeminiError>(&body) {
                Ok(api_err) => ParserError::from_api_response(
                    status,
                    api_err.error.message,
                    api_err.error.status,
                ),
                Err(_) => ParserError::from_api_response(status, body, None),
            };
            warn!(status, error = %err, "Gemini returned an error");
            return Err(err);
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            ParserError::Upstream {
                status,
                message: "Failed to parse response".to_string(),
                details: Some(e.to_string()),
            }
        })?;

        match parsed.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
            _ => {
                let finish_reason = parsed
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.as_deref());
                warn!(?finish_reason, "Gemini returned no text");
                Err(ParserError::EmptyResponse)
            }
        }
    }
}
