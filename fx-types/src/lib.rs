//! # FX Types
//!
//! Domain types and port traits for the currency conversion pipeline.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (CurrencyCode, ParsedCurrency, ConversionResult)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain, adapter and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    ConversionFailure, ConversionResult, ConversionSuccess, CurrencyCode, DEFAULT_RATE_TTL,
    Notification, ParsedCurrency, RateCacheEntry, RateTableEntry, rate_cache_key,
    rates_cache_key,
};
pub use dto::*;
pub use error::{AppError, DomainError, ExchangeError, ParserError, RateServiceError, StoreError};
pub use ports::{Clock, CurrencyParser, ExchangeRateProvider, KeyValueStore, SystemClock};
