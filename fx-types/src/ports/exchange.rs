//! Exchange rate provider port.
//!
//! This trait defines the interface for exchange rate services.
//! Implementations can be HTTP clients, caches in front of them, mock providers, etc.

use std::sync::Arc;

use crate::domain::CurrencyCode;
use crate::error::ExchangeError;

/// Port trait for exchange rate providers.
#[async_trait::async_trait]
pub trait ExchangeRateProvider: Send + Sync + 'static {
    /// Get the exchange rate from one currency to another.
    /// Returns how many units of `target` you get for 1 unit of `base`.
    async fn get_rate(&self, base: &CurrencyCode, target: &CurrencyCode)
    -> Result<f64, ExchangeError>;
}

#[async_trait::async_trait]
impl<T: ExchangeRateProvider + ?Sized> ExchangeRateProvider for Arc<T> {
    async fn get_rate(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<f64, ExchangeError> {
        (**self).get_rate(base, target).await
    }
}
