//! Configuration loading from environment.

use std::env;
use std::time::Duration;

use anyhow::Context;

use exchange_rates::DEFAULT_API_URL;
use fx_hex::DEFAULT_TARGET_CURRENCY;
use fx_parser::DEFAULT_MODEL;
use fx_types::CurrencyCode;

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_url: Option<String>,
    pub exchange_rate_api_key: Option<String>,
    pub exchange_rate_api_url: String,
    pub cache_url: String,
    pub rate_cache_ttl: Duration,
    pub rate_limit_per_minute: u32,
    pub inbound_rate_limit_per_minute: u32,
    pub default_target_currency: CurrencyCode,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = parse_or(&var, "PORT", 3000)?;
        let ttl_secs: u64 = parse_or(&var, "RATE_CACHE_TTL_SECS", 6 * 60 * 60)?;

        let target = var("DEFAULT_TARGET_CURRENCY")
            .unwrap_or_else(|| DEFAULT_TARGET_CURRENCY.to_string());
        let default_target_currency = CurrencyCode::parse(&target)
            .with_context(|| format!("DEFAULT_TARGET_CURRENCY is invalid: {}", target))?;

        Ok(Self {
            port,
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_api_url: var("GEMINI_API_URL"),
            exchange_rate_api_key: var("EXCHANGE_RATE_API_KEY"),
            exchange_rate_api_url: var("EXCHANGE_RATE_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            cache_url: var("CACHE_URL").unwrap_or_else(|| "memory://".to_string()),
            rate_cache_ttl: Duration::from_secs(ttl_secs),
            rate_limit_per_minute: parse_or(&var, "RATE_LIMIT_PER_MINUTE", 30)?,
            inbound_rate_limit_per_minute: parse_or(&var, "INBOUND_RATE_LIMIT_PER_MINUTE", 60)?,
            default_target_currency,
        })
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got {:?}", key, raw)),
        None => Ok(default),
    }
}
