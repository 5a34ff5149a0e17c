//! Strict decoding of the model's reply.
//!
//! The reply must be exactly one of three JSON objects (surrounding
//! whitespace allowed). Anything else becomes a `Failure` rather than an
//! error: the service answered, it just didn't answer usefully.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use fx_types::{CurrencyCode, ParsedCurrency};

const MAX_ECHO_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ModelReply {
    Amount(AmountReply),
    Error(ErrorReply),
    Clarification(ClarificationReply),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct AmountReply {
    amount: f64,
    currency_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ErrorReply {
    error: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct ClarificationReply {
    needs_clarification: String,
}

fn echo(raw: &str) -> String {
    if raw.chars().count() <= MAX_ECHO_CHARS {
        raw.to_string()
    } else {
        let head: String = raw.chars().take(MAX_ECHO_CHARS).collect();
        format!("{}...", head)
    }
}

/// Turns raw model output into a [`ParsedCurrency`].
pub fn decode_model_output(raw: &str) -> ParsedCurrency {
    let trimmed = raw.trim();

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "Model reply is not valid JSON");
            return ParsedCurrency::failure(format!(
                "Model returned invalid JSON ({}): {}",
                e,
                echo(trimmed)
            ));
        }
    };

    let reply: ModelReply = match serde_json::from_value(value) {
        Ok(r) => r,
        Err(_) => {
            warn!("Model reply has an unexpected shape");
            return ParsedCurrency::failure(format!(
                "Model response did not match any expected shape: {}",
                echo(trimmed)
            ));
        }
    };

    match reply {
        ModelReply::Amount(AmountReply {
            amount,
            currency_code,
        }) => {
            if !amount.is_finite() || amount < 0.0 {
                return ParsedCurrency::failure(format!(
                    "Model returned an invalid amount: {}",
                    amount
                ));
            }
            match CurrencyCode::parse(&currency_code) {
                Ok(code) => ParsedCurrency::success(amount, code),
                Err(_) => ParsedCurrency::failure(format!(
                    "Model returned an invalid currency code: {}",
                    currency_code
                )),
            }
        }
        ModelReply::Error(ErrorReply { error }) => ParsedCurrency::failure(error),
        ModelReply::Clarification(ClarificationReply {
            needs_clarification,
        }) => {
            let question = needs_clarification.trim();
            if question.is_empty() {
                ParsedCurrency::failure("Model asked for clarification without a question")
            } else {
                ParsedCurrency::clarification(question)
            }
        }
    }
}
