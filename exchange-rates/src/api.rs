//! ExchangeRate-API client.
//!
//! Uses a long-lived reqwest::Client for connection pooling.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, warn};

use fx_types::{CurrencyCode, RateServiceError};

pub const DEFAULT_API_URL: &str = "https://v6.exchangerate-api.com/v6";

/// Upstream source of full rate tables.
#[async_trait]
pub trait RateSource: Send + Sync + 'static {
    /// Fetches every known rate for `base`, keyed by ISO code.
    async fn fetch_rates(
        &self,
        base: &CurrencyCode,
    ) -> Result<BTreeMap<String, f64>, RateServiceError>;
}

/// `GET {api}/{key}/latest/{BASE}` response body.
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(rename = "error-type", default)]
    error_type: Option<String>,
    #[serde(default)]
    conversion_rates: Option<BTreeMap<String, f64>>,
}

/// Reusable ExchangeRate-API client (connection-pooled).
pub struct ExchangeRateApiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ExchangeRateApiClient {
    pub fn new(api_key: Option<String>) -> Self {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Points the client at a different API root (trailing slash ignored).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn parse_body(status: u16, body: &str) -> Result<BTreeMap<String, f64>, RateServiceError> {
        let parsed: Result<LatestRatesResponse, _> = serde_json::from_str(body);

        let response = match parsed {
            Ok(r) => r,
            Err(e) if (200..300).contains(&status) => {
                error!("Failed to parse exchange rate response: {}", e);
                return Err(RateServiceError::new("Invalid response from exchange rate API")
                    .with_status(status)
                    .with_details(e.to_string()));
            }
            Err(_) => {
                return Err(
                    RateServiceError::new(format!("Exchange rate API returned HTTP {}", status))
                        .with_status(status)
                        .with_details(body.to_string()),
                );
            }
        };

        if response.result.as_deref() == Some("error") {
            let error_type = response
                .error_type
                .unwrap_or_else(|| "unknown-error".to_string());
            warn!(status, error_type = %error_type, "Exchange rate API reported an error");
            return Err(RateServiceError::new("Exchange rate API returned an error")
                .with_status(status)
                .with_details(error_type));
        }

        if !(200..300).contains(&status) {
            return Err(
                RateServiceError::new(format!("Exchange rate API returned HTTP {}", status))
                    .with_status(status)
                    .with_details(body.to_string()),
            );
        }

        response.conversion_rates.ok_or_else(|| {
            RateServiceError::new("Invalid response from exchange rate API: missing conversion_rates")
                .with_status(status)
        })
    }
}

#[async_trait]
impl RateSource for ExchangeRateApiClient {
    async fn fetch_rates(
        &self,
        base: &CurrencyCode,
    ) -> Result<BTreeMap<String, f64>, RateServiceError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(RateServiceError::new(
                "Exchange rate API key is not configured",
            ));
        };

        let url = format!("{}/{}/latest/{}", self.base_url, api_key, base);

        debug!(base = %base, "Fetching exchange rates");

        // The key is part of the path; strip URLs from errors before logging.
        let response = self.http.get(&url).send().await.map_err(|e| {
            let e = e.without_url();
            error!("Exchange rate request failed: {}", e);
            RateServiceError::new(format!("Exchange rate request failed: {}", e))
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            RateServiceError::new(format!(
                "Failed to read exchange rate response: {}",
                e.without_url()
            ))
                .with_status(status)
        })?;

        let rates = Self::parse_body(status, &body)?;
        debug!(base = %base, count = rates.len(), "Exchange rates received");
        Ok(rates)
    }
}
