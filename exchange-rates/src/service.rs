//! TTL-cached exchange rate service.
//!
//! Lookup order for `get_rate(base, target)`:
//! 1. `rate_{BASE}_{TARGET}` pair entry
//! 2. `rates_{BASE}` table entry
//! 3. upstream fetch (throttled), which rewrites both entries

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use fx_types::{
    Clock, CurrencyCode, DEFAULT_RATE_TTL, ExchangeError, ExchangeRateProvider, KeyValueStore,
    RateCacheEntry, RateServiceError, RateTableEntry, SystemClock, rate_cache_key,
    rates_cache_key,
};

use crate::api::RateSource;
use crate::throttle::{GovernorThrottle, RequestThrottle};

/// Rate provider that serves from a key-value cache and falls back to a
/// throttled upstream [`RateSource`].
///
/// Generic over the store and source so adapters are injected at compile
/// time; throttle and clock are shared handles.
pub struct CachedRateService<S: KeyValueStore, F: RateSource> {
    store: S,
    source: F,
    throttle: Arc<dyn RequestThrottle>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl<S: KeyValueStore, F: RateSource> CachedRateService<S, F> {
    /// Creates a service with the default 6 hour TTL, 30 requests/minute
    /// throttle and the system clock.
    pub fn new(store: S, source: F) -> Self {
        Self {
            store,
            source,
            throttle: Arc::new(GovernorThrottle::default()),
            clock: Arc::new(SystemClock),
            ttl: DEFAULT_RATE_TTL,
        }
    }

    pub fn with_throttle(mut self, throttle: Arc<dyn RequestThrottle>) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ExchangeError> {
        let Some(value) = self.store.get(key).await? else {
            return Ok(None);
        };

        match serde_json::from_value(value) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                // Unreadable entries are refetched and overwritten.
                warn!(key, error = %e, "Ignoring malformed cache entry");
                Ok(None)
            }
        }
    }

    /// Stores `entry` under `key`. Write failures are logged and dropped.
    async fn write<T: Serialize>(&self, key: &str, entry: &T) {
        let result = match serde_json::to_value(entry) {
            Ok(value) => self.store.set(key, value).await,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = result {
            warn!(key, error = %e, "Failed to write rate cache entry");
        }
    }
}

fn unsupported(target: &CurrencyCode) -> ExchangeError {
    ExchangeError::Service(
        RateServiceError::new(format!("Unsupported target currency: {}", target))
            .with_details("unsupported-code"),
    )
}

#[async_trait]
impl<S: KeyValueStore, F: RateSource> ExchangeRateProvider for CachedRateService<S, F> {
    #[tracing::instrument(skip(self, base, target), fields(base = %base, target = %target))]
    async fn get_rate(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<f64, ExchangeError> {
        if base == target {
            return Ok(1.0);
        }

        let now = self.clock.now();
        let pair_key = rate_cache_key(base, target);

        if let Some(entry) = self.read::<RateCacheEntry>(&pair_key).await? {
            if entry.is_fresh(now, self.ttl) {
                debug!("Rate cache hit");
                return Ok(entry.rate);
            }
            debug!("Rate cache entry is stale");
        }

        let table_key = rates_cache_key(base);

        if let Some(table) = self.read::<RateTableEntry>(&table_key).await? {
            if table.is_fresh(now, self.ttl) {
                debug!("Rate table cache hit");
                let rate = table.rate_for(target).ok_or_else(|| unsupported(target))?;
                // Keep the table's timestamp so the pair expires with it.
                self.write(&pair_key, &RateCacheEntry::new(rate, table.fetched_at))
                    .await;
                return Ok(rate);
            }
        }

        self.throttle.acquire().await;
        let rates = self.source.fetch_rates(base).await?;

        let fetched_at = self.clock.now();
        let table = RateTableEntry::new(rates, fetched_at);
        self.write(&table_key, &table).await;

        let rate = table.rate_for(target).ok_or_else(|| unsupported(target))?;
        self.write(&pair_key, &RateCacheEntry::new(rate, fetched_at)).await;

        info!(rate, "Fetched fresh exchange rate");
        Ok(rate)
    }
}
