//! ConversionService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use fx_types::{
        ConversionRequest, ConversionResult, CurrencyCode, CurrencyParser, ExchangeError,
        ExchangeRateProvider, ParsedCurrency, ParserError, RateServiceError,
    };

    use crate::ConversionService;

    /// What a mock adapter should do when called.
    pub enum Behaviour<T, E> {
        Return(Result<T, E>),
        Panic,
    }

    /// Parser returning a canned outcome and recording what it was asked.
    pub struct MockParser {
        behaviour: Behaviour<ParsedCurrency, ParserError>,
        calls: AtomicUsize,
        last_text: Mutex<Option<String>>,
    }

    impl MockParser {
        pub fn returning(result: Result<ParsedCurrency, ParserError>) -> Self {
            Self::with(Behaviour::Return(result))
        }

        pub fn with(behaviour: Behaviour<ParsedCurrency, ParserError>) -> Self {
            Self {
                behaviour,
                calls: AtomicUsize::new(0),
                last_text: Mutex::new(None),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CurrencyParser for MockParser {
        async fn parse(&self, text: &str) -> Result<ParsedCurrency, ParserError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_text.lock().unwrap() = Some(text.to_string());
            match &self.behaviour {
                Behaviour::Return(r) => r.clone(),
                Behaviour::Panic => panic!("parser exploded"),
            }
        }
    }

    /// Rate provider returning a canned outcome and counting calls.
    pub struct MockRates {
        behaviour: Behaviour<f64, ExchangeError>,
        calls: AtomicUsize,
        last_pair: Mutex<Option<(String, String)>>,
    }

    impl MockRates {
        pub fn returning(result: Result<f64, ExchangeError>) -> Self {
            Self::with(Behaviour::Return(result))
        }

        pub fn with(behaviour: Behaviour<f64, ExchangeError>) -> Self {
            Self {
                behaviour,
                calls: AtomicUsize::new(0),
                last_pair: Mutex::new(None),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExchangeRateProvider for MockRates {
        async fn get_rate(
            &self,
            base: &CurrencyCode,
            target: &CurrencyCode,
        ) -> Result<f64, ExchangeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_pair.lock().unwrap() = Some((base.to_string(), target.to_string()));
            match &self.behaviour {
                Behaviour::Return(r) => r.clone(),
                Behaviour::Panic => panic!("rate provider exploded"),
            }
        }
    }

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::parse(s).unwrap()
    }

    fn service(
        parser: MockParser,
        rates: MockRates,
    ) -> ConversionService<MockParser, MockRates> {
        ConversionService::new(parser, rates, code("PLN"))
    }

    fn parsed(amount: f64, currency: &str) -> Result<ParsedCurrency, ParserError> {
        Ok(ParsedCurrency::success(amount, code(currency)))
    }

    fn failure_message(result: &ConversionResult) -> &str {
        &result.as_failure().expect("expected failure").message
    }

    #[tokio::test]
    async fn test_converts_with_default_target() {
        let svc = service(
            MockParser::returning(parsed(100.0, "USD")),
            MockRates::returning(Ok(4.05)),
        );

        let result = svc
            .handle_conversion_request(ConversionRequest::new("100 USD"))
            .await;

        let success = result.as_success().expect("expected success");
        assert_eq!(success.original_amount, 100.0);
        assert_eq!(success.original_currency, code("USD"));
        assert!((success.converted_amount - 405.0).abs() < 1e-9);
        assert_eq!(success.target_currency, code("PLN"));
        assert_eq!(success.rate, 4.05);
    }

    #[tokio::test]
    async fn test_explicit_target_is_used() {
        let rates = MockRates::returning(Ok(0.92));
        let svc = service(MockParser::returning(parsed(10.0, "USD")), rates);

        let result = svc
            .handle_conversion_request(ConversionRequest::new("$10").with_target("eur"))
            .await;

        assert_eq!(result.as_success().unwrap().target_currency, code("EUR"));
        assert_eq!(
            svc.rates().last_pair.lock().unwrap().clone(),
            Some(("USD".to_string(), "EUR".to_string()))
        );
    }

    #[tokio::test]
    async fn test_empty_text_makes_no_calls() {
        let svc = service(
            MockParser::returning(parsed(1.0, "USD")),
            MockRates::returning(Ok(1.0)),
        );

        let result = svc
            .handle_conversion_request(ConversionRequest::new("   "))
            .await;

        assert_eq!(failure_message(&result), "Input text is empty.");
        assert_eq!(svc.parser().calls(), 0);
        assert_eq!(svc.rates().calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_target_makes_no_calls() {
        let svc = service(
            MockParser::returning(parsed(1.0, "USD")),
            MockRates::returning(Ok(1.0)),
        );

        let result = svc
            .handle_conversion_request(ConversionRequest::new("1 USD").with_target("zloty"))
            .await;

        assert!(failure_message(&result).starts_with("Invalid target currency"));
        assert_eq!(svc.parser().calls(), 0);
    }

    #[tokio::test]
    async fn test_clarification_echoes_text_without_rate_call() {
        let svc = service(
            MockParser::returning(Ok(ParsedCurrency::clarification(
                "Which pesos: MXN, ARS or CLP?",
            ))),
            MockRates::returning(Ok(1.0)),
        );

        let result = svc
            .handle_conversion_request(ConversionRequest::new("100 pesos"))
            .await;

        let failure = result.as_failure().unwrap();
        assert!(failure.needs_clarification);
        assert_eq!(
            failure.clarification_question.as_deref(),
            Some("Which pesos: MXN, ARS or CLP?")
        );
        assert_eq!(failure.original_text.as_deref(), Some("100 pesos"));
        assert_eq!(svc.rates().calls(), 0);
    }

    #[tokio::test]
    async fn test_clarified_request_reenters_pipeline() {
        let svc = service(
            MockParser::returning(parsed(100.0, "MXN")),
            MockRates::returning(Ok(0.21)),
        );

        let retry = ConversionRequest::new("100 pesos").clarified("MXN");
        let result = svc.handle_conversion_request(retry).await;

        assert!(result.is_success());
        assert_eq!(
            svc.parser().last_text.lock().unwrap().as_deref(),
            Some("100 pesos MXN")
        );
    }

    #[tokio::test]
    async fn test_parse_failure_is_prefixed() {
        let svc = service(
            MockParser::returning(Ok(ParsedCurrency::failure("No amount found"))),
            MockRates::returning(Ok(1.0)),
        );

        let result = svc
            .handle_conversion_request(ConversionRequest::new("hello world"))
            .await;

        assert_eq!(failure_message(&result), "AI parsing error: No amount found");
        assert_eq!(svc.rates().calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_ai_credentials_is_misconfigured() {
        let svc = service(
            MockParser::returning(Err(ParserError::MissingCredentials)),
            MockRates::returning(Ok(1.0)),
        );

        let result = svc
            .handle_conversion_request(ConversionRequest::new("5 EUR"))
            .await;

        assert!(failure_message(&result).starts_with("AI service is misconfigured"));
    }

    #[tokio::test]
    async fn test_rejected_ai_key_is_misconfigured() {
        let svc = service(
            MockParser::returning(Err(ParserError::from_api_response(
                400,
                "API key not valid. Please pass a valid API key.".into(),
                Some("INVALID_ARGUMENT".into()),
            ))),
            MockRates::returning(Ok(1.0)),
        );

        let result = svc
            .handle_conversion_request(ConversionRequest::new("5 EUR"))
            .await;

        assert!(failure_message(&result).starts_with("AI service is misconfigured"));
    }

    #[tokio::test]
    async fn test_ai_upstream_error_includes_details() {
        let svc = service(
            MockParser::returning(Err(ParserError::Upstream {
                status: 503,
                message: "The model is overloaded.".into(),
                details: Some("UNAVAILABLE".into()),
            })),
            MockRates::returning(Ok(1.0)),
        );

        let result = svc
            .handle_conversion_request(ConversionRequest::new("5 EUR"))
            .await;

        let message = failure_message(&result);
        assert!(message.starts_with("AI service error: "));
        assert!(message.contains("The model is overloaded."));
        assert!(message.ends_with("(UNAVAILABLE)"));
    }

    #[tokio::test]
    async fn test_rate_service_error_echoes_parsed_values() {
        let svc = service(
            MockParser::returning(parsed(100.0, "USD")),
            MockRates::returning(Err(ExchangeError::Service(
                RateServiceError::new("Exchange rate API returned an error")
                    .with_details("invalid-key"),
            ))),
        );

        let result = svc
            .handle_conversion_request(ConversionRequest::new("100 USD"))
            .await;

        let failure = result.as_failure().unwrap();
        assert_eq!(
            failure.message,
            "Exchange rate service error: Exchange rate API returned an error (invalid-key)"
        );
        assert_eq!(failure.original_amount, Some(100.0));
        assert_eq!(failure.original_currency, Some(code("USD")));
        assert_eq!(failure.target_currency, Some(code("PLN")));
    }

    #[tokio::test]
    async fn test_unexpected_error_omits_parsed_values() {
        let svc = service(
            MockParser::returning(parsed(100.0, "USD")),
            MockRates::returning(Err(ExchangeError::Unexpected("cache offline".into()))),
        );

        let result = svc
            .handle_conversion_request(ConversionRequest::new("100 USD"))
            .await;

        let failure = result.as_failure().unwrap();
        assert_eq!(
            failure.message,
            "Unexpected error during conversion: cache offline"
        );
        assert!(failure.original_amount.is_none());
        assert!(failure.original_currency.is_none());
    }

    #[tokio::test]
    async fn test_rate_provider_panic_is_caught() {
        let svc = service(
            MockParser::returning(parsed(100.0, "USD")),
            MockRates::with(Behaviour::Panic),
        );

        let result = svc
            .handle_conversion_request(ConversionRequest::new("100 USD"))
            .await;

        let failure = result.as_failure().unwrap();
        assert!(failure.message.starts_with("Unexpected error during conversion"));
        assert!(failure.message.contains("rate provider exploded"));
        assert!(failure.original_amount.is_none());
    }

    #[tokio::test]
    async fn test_parser_panic_is_caught() {
        let svc = service(
            MockParser::with(Behaviour::Panic),
            MockRates::returning(Ok(1.0)),
        );

        let result = svc
            .handle_conversion_request(ConversionRequest::new("100 USD"))
            .await;

        assert!(failure_message(&result).contains("parser exploded"));
        assert_eq!(svc.rates().calls(), 0);
    }

    #[tokio::test]
    async fn test_non_positive_rate_is_rejected() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let svc = service(
                MockParser::returning(parsed(100.0, "USD")),
                MockRates::returning(Ok(bad)),
            );

            let result = svc
                .handle_conversion_request(ConversionRequest::new("100 USD"))
                .await;

            assert!(
                failure_message(&result).starts_with("Received invalid exchange rate"),
                "rate {bad} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_rate_lookup_validates_codes() {
        let svc = service(
            MockParser::returning(parsed(1.0, "USD")),
            MockRates::returning(Ok(4.05)),
        );

        let ok = svc.rate("usd", "pln").await.unwrap();
        assert_eq!(ok.base, code("USD"));
        assert_eq!(ok.rate, 4.05);

        let err = svc.rate("US", "PLN").await.unwrap_err();
        assert!(matches!(err, fx_types::AppError::BadRequest(_)));
        assert_eq!(svc.rates().calls(), 1);
    }

    #[tokio::test]
    async fn test_rate_lookup_rejects_invalid_rate() {
        for bad in [0.0, -1.5, f64::NAN] {
            let svc = service(
                MockParser::returning(parsed(1.0, "USD")),
                MockRates::returning(Ok(bad)),
            );

            let err = svc.rate("USD", "PLN").await.unwrap_err();
            match err {
                fx_types::AppError::Upstream { message, details } => {
                    assert!(message.starts_with("Received invalid exchange rate"));
                    assert!(message.ends_with("for USD to PLN."));
                    assert!(details.is_none());
                }
                other => panic!("expected Upstream, got {:?}", other),
            }
        }
    }
}
