//! Outcome of interpreting free-form text as a monetary amount.

use super::currency::CurrencyCode;

/// What the parsing stage made of the user's text.
///
/// "Not a currency" is an ordinary [`ParsedCurrency::Failure`]; only
/// infrastructure problems surface as [`crate::ParserError`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedCurrency {
    Success {
        amount: f64,
        currency_code: CurrencyCode,
    },
    /// The text is ambiguous; `question` is what to ask the user.
    NeedsClarification { question: String },
    Failure { reason: String },
}

impl ParsedCurrency {
    pub fn success(amount: f64, currency_code: CurrencyCode) -> Self {
        Self::Success {
            amount,
            currency_code,
        }
    }

    pub fn clarification(question: impl Into<String>) -> Self {
        Self::NeedsClarification {
            question: question.into(),
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }
}
