//! Result of a conversion request.

use super::currency::CurrencyCode;

/// A completed conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSuccess {
    pub original_amount: f64,
    pub original_currency: CurrencyCode,
    pub converted_amount: f64,
    pub target_currency: CurrencyCode,
    pub rate: f64,
}

/// A conversion that stopped before producing an amount.
///
/// `original_amount`/`original_currency` are only populated once parsing
/// succeeded and the failure came from the rate service itself. Callers use
/// their absence to recognise the unexpected-error path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConversionFailure {
    pub message: String,
    pub needs_clarification: bool,
    pub clarification_question: Option<String>,
    pub original_text: Option<String>,
    pub original_amount: Option<f64>,
    pub original_currency: Option<CurrencyCode>,
    pub target_currency: Option<CurrencyCode>,
}

impl ConversionFailure {
    /// Creates a plain failure carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Creates a failure asking the caller to re-prompt the user.
    pub fn clarification(question: impl Into<String>, original_text: impl Into<String>) -> Self {
        Self {
            message: "Clarification needed.".to_string(),
            needs_clarification: true,
            clarification_question: Some(question.into()),
            original_text: Some(original_text.into()),
            ..Default::default()
        }
    }

    /// Echoes the parsed amount and currency back to the caller.
    pub fn with_original(mut self, amount: f64, currency: CurrencyCode) -> Self {
        self.original_amount = Some(amount);
        self.original_currency = Some(currency);
        self
    }

    pub fn with_target(mut self, target: CurrencyCode) -> Self {
        self.target_currency = Some(target);
        self
    }
}

/// Tagged outcome returned to every caller of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    Success(ConversionSuccess),
    Failure(ConversionFailure),
}

impl ConversionResult {
    /// Shorthand for a message-only failure.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(ConversionFailure::new(message))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn as_success(&self) -> Option<&ConversionSuccess> {
        match self {
            Self::Success(s) => Some(s),
            Self::Failure(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&ConversionFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(f) => Some(f),
        }
    }
}

impl From<ConversionSuccess> for ConversionResult {
    fn from(success: ConversionSuccess) -> Self {
        Self::Success(success)
    }
}

impl From<ConversionFailure> for ConversionResult {
    fn from(failure: ConversionFailure) -> Self {
        Self::Failure(failure)
    }
}
