//! Data Transfer Objects (DTOs) for requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ConversionFailure, ConversionResult, ConversionSuccess, CurrencyCode};

// ─────────────────────────────────────────────────────────────────────────────
// Conversion DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to convert a free-form amount of money.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    /// Free-form text containing an amount, e.g. a selection from a web page
    #[schema(example = "100 USD")]
    pub text: String,
    /// Target ISO 4217 code; the service default is used when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "PLN")]
    pub target_currency: Option<String>,
}

impl ConversionRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_currency: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_currency = Some(target.into());
        self
    }

    /// Re-entry after a clarification: the user's answer is appended to the text.
    pub fn clarified(&self, answer: &str) -> Self {
        Self {
            text: format!("{} {}", self.text.trim(), answer.trim()),
            target_currency: self.target_currency.clone(),
        }
    }
}

/// Flat JSON rendering of a [`ConversionResult`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 100.0)]
    pub original_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_currency: Option<CurrencyCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 405.0)]
    pub converted_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_currency: Option<CurrencyCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 4.05)]
    pub rate: Option<f64>,
    /// Human-readable failure message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub needs_clarification: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarification_question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
}

impl From<ConversionResult> for ConversionResponse {
    fn from(result: ConversionResult) -> Self {
        match result {
            ConversionResult::Success(s) => ConversionResponse {
                success: true,
                original_amount: Some(s.original_amount),
                original_currency: Some(s.original_currency),
                converted_amount: Some(s.converted_amount),
                target_currency: Some(s.target_currency),
                rate: Some(s.rate),
                ..Default::default()
            },
            ConversionResult::Failure(f) => ConversionResponse {
                success: false,
                original_amount: f.original_amount,
                original_currency: f.original_currency,
                target_currency: f.target_currency,
                error: Some(f.message),
                needs_clarification: f.needs_clarification,
                clarification_question: f.clarification_question,
                original_text: f.original_text,
                ..Default::default()
            },
        }
    }
}

impl From<ConversionResponse> for ConversionResult {
    fn from(resp: ConversionResponse) -> Self {
        if resp.success {
            if let (Some(original_amount), Some(original_currency), Some(converted_amount)) =
                (resp.original_amount, resp.original_currency.clone(), resp.converted_amount)
            {
                if let (Some(target_currency), Some(rate)) = (resp.target_currency.clone(), resp.rate)
                {
                    return ConversionResult::Success(ConversionSuccess {
                        original_amount,
                        original_currency,
                        converted_amount,
                        target_currency,
                        rate,
                    });
                }
            }
            return ConversionResult::failure("Malformed success response");
        }

        ConversionResult::Failure(ConversionFailure {
            message: resp.error.unwrap_or_default(),
            needs_clarification: resp.needs_clarification,
            clarification_question: resp.clarification_question,
            original_text: resp.original_text,
            original_amount: resp.original_amount,
            original_currency: resp.original_currency,
            target_currency: resp.target_currency,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rate DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// A single resolved exchange rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateResponse {
    pub base: CurrencyCode,
    pub target: CurrencyCode,
    /// Units of `target` for one unit of `base`
    #[schema(example = 4.05)]
    pub rate: f64,
}
