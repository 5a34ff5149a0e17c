//! Conversion Application Service
//!
//! Orchestrates the parsing and exchange-rate ports.
//! Contains NO infrastructure logic - pure request orchestration.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use fx_types::{
    AppError, ConversionFailure, ConversionRequest, ConversionResult, ConversionSuccess,
    CurrencyCode, CurrencyParser, DomainError, ExchangeError, ExchangeRateProvider,
    ParsedCurrency, ParserError, RateResponse, RateServiceError,
};

/// Currency used when neither the request nor the configuration names one.
pub const DEFAULT_TARGET_CURRENCY: &str = "PLN";

/// Application service for currency conversion.
///
/// Generic over `P: CurrencyParser` and `X: ExchangeRateProvider` - the
/// adapters are injected at compile time.
pub struct ConversionService<P: CurrencyParser, X: ExchangeRateProvider> {
    parser: P,
    rates: X,
    default_target: CurrencyCode,
}

impl<P: CurrencyParser, X: ExchangeRateProvider> ConversionService<P, X> {
    /// Creates a service converting into `default_target` unless a request
    /// names another currency.
    pub fn new(parser: P, rates: X, default_target: CurrencyCode) -> Self {
        Self {
            parser,
            rates,
            default_target,
        }
    }

    pub fn default_target(&self) -> &CurrencyCode {
        &self.default_target
    }

    /// Returns a reference to the parsing adapter.
    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Returns a reference to the rate provider.
    pub fn rates(&self) -> &X {
        &self.rates
    }

    /// Runs the whole pipeline for one request.
    ///
    /// Never fails: every error, and any panic raised by an adapter, comes
    /// back as [`ConversionResult::Failure`].
    #[tracing::instrument(skip(self, request), fields(text_len = request.text.len()))]
    pub async fn handle_conversion_request(&self, request: ConversionRequest) -> ConversionResult {
        let text = request.text.trim();
        if text.is_empty() {
            debug!("Rejecting empty input");
            return ConversionResult::failure(DomainError::EmptyInput.to_string());
        }

        let target = match request
            .target_currency
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            None => self.default_target.clone(),
            Some(raw) => match CurrencyCode::parse(raw) {
                Ok(code) => code,
                Err(_) => {
                    return ConversionResult::failure(format!("Invalid target currency: {}", raw));
                }
            },
        };

        let parsed = match AssertUnwindSafe(self.parser.parse(text)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                error!("Parser panicked");
                return unexpected(panic_message(panic.as_ref()));
            }
        };

        let (amount, currency) = match parsed {
            Ok(ParsedCurrency::Success {
                amount,
                currency_code,
            }) => (amount, currency_code),
            Ok(ParsedCurrency::NeedsClarification { question }) => {
                info!("Clarification needed");
                return ConversionFailure::clarification(question, request.text.clone()).into();
            }
            Ok(ParsedCurrency::Failure { reason }) => {
                info!(reason = %reason, "Text could not be parsed");
                return ConversionResult::failure(format!("AI parsing error: {}", reason));
            }
            Err(e) => {
                warn!(error = %e, "AI parsing adapter failed");
                return ConversionResult::failure(parser_error_message(&e));
            }
        };

        let rate = match AssertUnwindSafe(self.rates.get_rate(&currency, &target))
            .catch_unwind()
            .await
        {
            Ok(Ok(rate)) => rate,
            Ok(Err(ExchangeError::Service(e))) => {
                warn!(error = %e, "Exchange rate service failed");
                return ConversionFailure::new(format!(
                    "Exchange rate service error: {}",
                    service_error_text(&e)
                ))
                .with_original(amount, currency)
                .with_target(target)
                .into();
            }
            Ok(Err(ExchangeError::Unexpected(msg))) => {
                error!(error = %msg, "Unexpected exchange rate failure");
                return unexpected(msg);
            }
            Err(panic) => {
                error!("Exchange rate provider panicked");
                return unexpected(panic_message(panic.as_ref()));
            }
        };

        if !rate.is_finite() || rate <= 0.0 {
            warn!(rate, "Discarding invalid exchange rate");
            return ConversionFailure::new(format!(
                "Received invalid exchange rate {} for {} to {}.",
                rate, currency, target
            ))
            .with_original(amount, currency)
            .with_target(target)
            .into();
        }

        info!(amount, from = %currency, to = %target, rate, "Conversion complete");

        ConversionSuccess {
            original_amount: amount,
            original_currency: currency,
            converted_amount: amount * rate,
            target_currency: target,
            rate,
        }
        .into()
    }

    /// Looks up a single rate (validated codes, errors as [`AppError`]).
    #[tracing::instrument(skip(self))]
    pub async fn rate(&self, base: &str, target: &str) -> Result<RateResponse, AppError> {
        let base = CurrencyCode::parse(base)?;
        let target = CurrencyCode::parse(target)?;

        let rate = self.rates.get_rate(&base, &target).await?;

        if !rate.is_finite() || rate <= 0.0 {
            warn!(rate, "Discarding invalid exchange rate");
            return Err(AppError::Upstream {
                message: format!(
                    "Received invalid exchange rate {} for {} to {}.",
                    rate, base, target
                ),
                details: None,
            });
        }

        Ok(RateResponse { base, target, rate })
    }
}

fn unexpected(detail: impl std::fmt::Display) -> ConversionResult {
    ConversionResult::failure(format!("Unexpected error during conversion: {}", detail))
}

fn parser_error_message(err: &ParserError) -> String {
    if err.is_auth() {
        return format!("AI service is misconfigured: {}", err);
    }
    match err.details() {
        Some(details) => format!("AI service error: {} ({})", err, details),
        None => format!("AI service error: {}", err),
    }
}

fn service_error_text(err: &RateServiceError) -> String {
    match err.details.as_deref() {
        Some(details) => format!("{} ({})", err.message, details),
        None => err.message.clone(),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic in adapter".to_string()
    }
}
