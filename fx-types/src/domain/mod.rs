//! Domain models for the conversion pipeline.

pub mod conversion;
pub mod currency;
pub mod notification;
pub mod parsed;
pub mod rate;

pub use conversion::{ConversionFailure, ConversionResult, ConversionSuccess};
pub use currency::CurrencyCode;
pub use notification::Notification;
pub use parsed::ParsedCurrency;
pub use rate::{DEFAULT_RATE_TTL, RateCacheEntry, RateTableEntry, rate_cache_key, rates_cache_key};
