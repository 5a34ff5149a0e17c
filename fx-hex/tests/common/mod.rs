//! Shared fixtures for the HTTP integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use http_body_util::BodyExt;

use fx_hex::{ConversionService, inbound::HttpServer};
use fx_types::{
    CurrencyCode, CurrencyParser, ExchangeError, ExchangeRateProvider, ParsedCurrency,
    ParserError, RateServiceError,
};

/// Parser that understands "<amount> <CODE>" and treats "pesos" as ambiguous.
pub struct FakeParser;

#[async_trait]
impl CurrencyParser for FakeParser {
    async fn parse(&self, text: &str) -> Result<ParsedCurrency, ParserError> {
        if text.contains("pesos") && !text.contains("MXN") {
            return Ok(ParsedCurrency::clarification("Which pesos: MXN, ARS or CLP?"));
        }

        let mut words = text.split_whitespace();
        let amount = words.next().and_then(|w| w.parse::<f64>().ok());
        let code = words.last().and_then(|w| CurrencyCode::parse(w).ok());

        Ok(match (amount, code) {
            (Some(amount), Some(code)) => ParsedCurrency::success(amount, code),
            _ => ParsedCurrency::failure("No amount found"),
        })
    }
}

/// Fixed rates: USD→PLN 4.05, USD→EUR 0.92; XXX is unsupported.
pub struct FakeRates;

#[async_trait]
impl ExchangeRateProvider for FakeRates {
    async fn get_rate(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<f64, ExchangeError> {
        match (base.as_str(), target.as_str()) {
            (a, b) if a == b => Ok(1.0),
            ("USD", "PLN") => Ok(4.05),
            ("USD", "EUR") => Ok(0.92),
            ("MXN", "PLN") => Ok(0.21),
            (_, t) => Err(RateServiceError::new(format!("Unsupported target currency: {}", t))
                .with_details("unsupported-code")
                .into()),
        }
    }
}

pub fn test_server(requests_per_minute: u32) -> HttpServer<FakeParser, FakeRates> {
    let service = ConversionService::new(
        FakeParser,
        FakeRates,
        CurrencyCode::parse("PLN").unwrap(),
    );
    HttpServer::with_rate_limit(service, requests_per_minute)
}

pub fn convert_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/convert")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_as(uri: &str, client_id: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("X-Client-Id", client_id)
        .body(Body::empty())
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
