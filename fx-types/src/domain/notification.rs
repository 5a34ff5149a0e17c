//! User-facing rendering of a conversion result.

use std::fmt;

use super::conversion::ConversionResult;

/// Title and body suitable for a desktop notification or terminal output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl From<&ConversionResult> for Notification {
    fn from(result: &ConversionResult) -> Self {
        match result {
            ConversionResult::Success(s) => Notification {
                title: "Currency conversion".to_string(),
                message: format!(
                    "{:.2} {} = {:.2} {}\nRate: 1 {} = {:.4} {}",
                    s.original_amount,
                    s.original_currency,
                    s.converted_amount,
                    s.target_currency,
                    s.original_currency,
                    s.rate,
                    s.target_currency,
                ),
            },
            ConversionResult::Failure(f) if f.needs_clarification => Notification {
                title: "Clarification needed".to_string(),
                message: f
                    .clarification_question
                    .clone()
                    .unwrap_or_else(|| f.message.clone()),
            },
            ConversionResult::Failure(f) => Notification {
                title: "Conversion failed".to_string(),
                message: f.message.clone(),
            },
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.title, self.message)
    }
}
