//! Exchange Rates
//!
//! Resolves exchange rates for the conversion pipeline. Three pieces compose
//! into an [`fx_types::ExchangeRateProvider`]:
//!
//! - [`ExchangeRateApiClient`] - fetches the full rate table of a base
//!   currency from ExchangeRate-API (`GET {api}/{key}/latest/{BASE}`)
//! - [`GovernorThrottle`] - token bucket every outbound call must pass
//! - [`CachedRateService`] - TTL cache in front of the client, persisted
//!   through any [`fx_types::KeyValueStore`]
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use exchange_rates::{CachedRateService, ExchangeRateApiClient, GovernorThrottle};
//! use fx_store::MemoryStore;
//!
//! let client = ExchangeRateApiClient::new(Some(api_key));
//! let rates = CachedRateService::new(MemoryStore::new(), client)
//!     .with_throttle(Arc::new(GovernorThrottle::per_minute(30)));
//!
//! let rate = rates.get_rate(&usd, &pln).await?;
//! ```

pub mod api;
pub mod service;
pub mod throttle;


pub use api::{DEFAULT_API_URL, ExchangeRateApiClient, RateSource};
pub use service::CachedRateService;
pub use throttle::{GovernorThrottle, RequestThrottle, Unthrottled};
