//! # FX Hex
//!
//! Application service layer and HTTP adapter for the conversion pipeline.
//!
//! ## Architecture
//!
//! - `service` - Application service (orchestrates the parser and rate ports)
//! - `inbound/` - HTTP adapter (Axum server)
//! - `openapi` - OpenAPI document served at `/api-docs/openapi.json`
//!
//! The service is generic over `P: CurrencyParser` and
//! `X: ExchangeRateProvider`, allowing different adapters to be injected.

pub mod inbound;
pub mod openapi;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use service::{ConversionService, DEFAULT_TARGET_CURRENCY};
