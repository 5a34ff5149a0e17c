//! Cached exchange-rate records and their key scheme.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::currency::CurrencyCode;

/// How long a cached rate stays valid.
pub const DEFAULT_RATE_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// Cache key for a single resolved pair, e.g. `rate_USD_PLN`.
pub fn rate_cache_key(base: &CurrencyCode, target: &CurrencyCode) -> String {
    format!("rate_{}_{}", base, target)
}

/// Cache key for the full table of a base currency, e.g. `rates_USD`.
pub fn rates_cache_key(base: &CurrencyCode) -> String {
    format!("rates_{}", base)
}

/// `0 <= now - fetched_at < ttl`. Entries stamped in the future are stale,
/// so a clock stepping backwards can't stretch their lifetime.
fn within_ttl(fetched_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    if fetched_at > now {
        return false;
    }
    match TimeDelta::from_std(ttl) {
        Ok(ttl) => now.signed_duration_since(fetched_at) < ttl,
        // TTL too large to represent: never expires.
        Err(_) => true,
    }
}

/// A single resolved rate for an ordered (base, target) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCacheEntry {
    pub rate: f64,
    pub fetched_at: DateTime<Utc>,
}

impl RateCacheEntry {
    pub fn new(rate: f64, fetched_at: DateTime<Utc>) -> Self {
        Self { rate, fetched_at }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        within_ttl(self.fetched_at, now, ttl)
    }
}

/// The full rate table for one base currency, as returned upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTableEntry {
    pub rates: BTreeMap<String, f64>,
    pub fetched_at: DateTime<Utc>,
}

impl RateTableEntry {
    pub fn new(rates: BTreeMap<String, f64>, fetched_at: DateTime<Utc>) -> Self {
        Self { rates, fetched_at }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        within_ttl(self.fetched_at, now, ttl)
    }

    /// Looks up the rate for `target`.
    pub fn rate_for(&self, target: &CurrencyCode) -> Option<f64> {
        self.rates.get(target.as_str()).copied()
    }
}
