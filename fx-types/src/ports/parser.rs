//! AI parsing port.

use std::sync::Arc;

use crate::domain::ParsedCurrency;
use crate::error::ParserError;

/// Interprets free-form text as an amount and currency.
///
/// Implementations must return `Ok(ParsedCurrency::Failure { .. })` when the
/// text simply isn't money, and reserve `Err` for infrastructure problems.
#[async_trait::async_trait]
pub trait CurrencyParser: Send + Sync + 'static {
    async fn parse(&self, text: &str) -> Result<ParsedCurrency, ParserError>;
}

#[async_trait::async_trait]
impl<T: CurrencyParser + ?Sized> CurrencyParser for Arc<T> {
    async fn parse(&self, text: &str) -> Result<ParsedCurrency, ParserError> {
        (**self).parse(text).await
    }
}
