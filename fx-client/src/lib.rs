//! # FX Client SDK
//!
//! A typed Rust client for the currency conversion API.

use fx_types::{
    ConversionRequest, ConversionResponse, ConversionResult, CurrencyCode, DomainError,
    RateResponse,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;


/// Header the server uses to bucket requests for rate limiting.
pub const CLIENT_ID_HEADER: &str = "X-Client-Id";

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<String>,
    },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] DomainError),
}

/// Conversion API client.
pub struct FxClient {
    base_url: String,
    client_id: Option<String>,
    http: Client,
}

impl FxClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_id: None,
            http: Client::new(),
        }
    }

    /// Identifies this client to the server's rate limiter.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Runs a conversion. Pipeline failures come back as
    /// [`ConversionResult::Failure`]; `Err` means the call itself failed.
    pub async fn convert(&self, req: &ConversionRequest) -> Result<ConversionResult, ClientError> {
        let resp: ConversionResponse = self.post("/api/convert", req).await?;
        Ok(resp.into())
    }

    /// Convenience wrapper around [`FxClient::convert`].
    pub async fn convert_text(
        &self,
        text: &str,
        target_currency: Option<&str>,
    ) -> Result<ConversionResult, ClientError> {
        let mut req = ConversionRequest::new(text);
        if let Some(target) = target_currency {
            req = req.with_target(target);
        }
        self.convert(&req).await
    }

    /// Looks up the current rate from `base` to `target`. Both codes are
    /// validated before any request is sent.
    pub async fn rate(&self, base: &str, target: &str) -> Result<RateResponse, ClientError> {
        let base = CurrencyCode::parse(base)?;
        let target = CurrencyCode::parse(target)?;
        self.get(&format!("/api/rates/{}/{}", base, target)).await
    }

    fn identify(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.client_id {
            Some(id) => req.header(CLIENT_ID_HEADER, id),
            None => req,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let req = self.identify(self.http.get(format!("{}{}", self.base_url, path)));
        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let req = self.identify(
            self.http
                .post(format!("{}{}", self.base_url, path))
                .json(body),
        );
        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            return Ok(serde_json::from_str(&body)?);
        }

        let body = resp.text().await.unwrap_or_default();
        let json = serde_json::from_str::<serde_json::Value>(&body).ok();

        if status.as_u16() == 429 {
            let retry_after_seconds = json
                .as_ref()
                .and_then(|v| v.get("retry_after_seconds"))
                .and_then(|v| v.as_u64())
                .unwrap_or(60);
            return Err(ClientError::RateLimited {
                retry_after_seconds,
            });
        }

        let field = |name: &str| {
            json.as_ref()
                .and_then(|v| v.get(name))
                .and_then(|e| e.as_str())
                .map(String::from)
        };
        let details = field("details");
        let message = field("error").unwrap_or(body);

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
            details,
        })
    }
}
