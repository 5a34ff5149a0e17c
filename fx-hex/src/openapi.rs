//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use fx_types::{ConversionRequest, ConversionResponse, CurrencyCode, RateResponse};
use utoipa::OpenApi;

use crate::inbound::handlers::ErrorResponse;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Convert a free-form amount of money
///
/// Always answers 200: parse failures, clarification requests and upstream
/// errors are reported in the body with `success: false`.
#[utoipa::path(
    post,
    path = "/api/convert",
    tag = "conversion",
    request_body = ConversionRequest,
    params(
        ("X-Client-Id" = Option<String>, Header, description = "Caller identity used for rate limiting")
    ),
    responses(
        (status = 200, description = "Conversion outcome", body = ConversionResponse,
            example = json!({
                "success": true,
                "originalAmount": 100.0,
                "originalCurrency": "USD",
                "convertedAmount": 405.0,
                "targetCurrency": "PLN",
                "rate": 4.05
            })),
        (status = 429, description = "Rate limit exceeded")
    )
)]
async fn convert() {}

/// Look up an exchange rate
#[utoipa::path(
    get,
    path = "/api/rates/{base}/{target}",
    tag = "rates",
    params(
        ("base" = String, Path, description = "Base ISO 4217 code", example = "USD"),
        ("target" = String, Path, description = "Target ISO 4217 code", example = "PLN")
    ),
    responses(
        (status = 200, description = "Current rate", body = RateResponse),
        (status = 400, description = "Invalid currency code", body = ErrorResponse),
        (status = 502, description = "Exchange rate service error", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded")
    )
)]
async fn get_rate() {}

/// OpenAPI documentation for the conversion API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "FX Conversion Service API",
        version = "1.0.0",
        description = "Turns free-form text such as \"100 USD\" or \"20 zł\" into a converted amount.\n\nAn AI model extracts the amount and currency, a cached exchange rate is applied, and every failure is returned as data.",
        license(name = "MIT"),
    ),
    paths(health, convert, get_rate),
    components(
        schemas(
            ConversionRequest,
            ConversionResponse,
            RateResponse,
            CurrencyCode,
            ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "conversion", description = "Free-form currency conversion"),
        (name = "rates", description = "Exchange rate lookup"),
    )
)]
pub struct ApiDoc;
