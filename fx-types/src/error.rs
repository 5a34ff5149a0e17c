//! Error types for the conversion service.

/// Domain-level errors (input validation).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),

    #[error("Input text is empty.")]
    EmptyInput,
}

/// Infrastructure failures of the AI parsing adapter.
///
/// "The text is not a currency" is NOT represented here; that is a
/// [`crate::ParsedCurrency::Failure`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParserError {
    #[error("AI API key is not configured")]
    MissingCredentials,

    #[error("AI service rejected the credentials ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("AI service returned HTTP {status}: {message}")]
    Upstream {
        status: u16,
        message: String,
        details: Option<String>,
    },

    #[error("AI service request failed: {0}")]
    Network(String),

    #[error("AI service returned an empty response")]
    EmptyResponse,
}

impl ParserError {
    /// Maps an upstream error response onto the taxonomy.
    pub fn from_api_response(status: u16, message: String, details: Option<String>) -> Self {
        let lowered = message.to_ascii_lowercase();
        if status == 401
            || status == 403
            || lowered.contains("api key not valid")
            || lowered.contains("api_key_invalid")
        {
            Self::Unauthorized { status, message }
        } else {
            Self::Upstream {
                status,
                message,
                details,
            }
        }
    }

    /// True when the failure is a credentials problem (missing or rejected key).
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::MissingCredentials | Self::Unauthorized { .. })
    }

    /// Extra upstream detail, when the service sent any.
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Upstream { details, .. } => details.as_deref(),
            _ => None,
        }
    }
}

/// Structured failure of the exchange-rate service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RateServiceError {
    pub message: String,
    pub status: Option<u16>,
    pub details: Option<String>,
}

impl RateServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            details: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Errors surfaced by an [`crate::ExchangeRateProvider`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExchangeError {
    #[error(transparent)]
    Service(#[from] RateServiceError),

    #[error("{0}")]
    Unexpected(String),
}

impl From<StoreError> for ExchangeError {
    fn from(err: StoreError) -> Self {
        ExchangeError::Unexpected(format!("Rate cache failure: {}", err))
    }
}

/// Key-value store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream error: {message}")]
    Upstream {
        message: String,
        details: Option<String>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<ExchangeError> for AppError {
    fn from(err: ExchangeError) -> Self {
        match err {
            ExchangeError::Service(e) => AppError::Upstream {
                message: e.message,
                details: e.details,
            },
            ExchangeError::Unexpected(msg) => AppError::Internal(msg),
        }
    }
}
