//! # FX Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the rate cache store
//! - Create the Gemini parser and the cached exchange rate service
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exchange_rates::{CachedRateService, ExchangeRateApiClient, GovernorThrottle};
use fx_hex::{ConversionService, inbound::HttpServer};
use fx_parser::{GeminiClient, GeminiCurrencyParser};
use fx_store::build_store;

#[cfg(feature = "otel")]
fn init_tracer() -> anyhow::Result<(
    opentelemetry_sdk::trace::Tracer,
    opentelemetry_sdk::trace::SdkTracerProvider,
)> {
    use opentelemetry::global;
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};

    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    Ok((provider.tracer("fx-service"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber
    let registry = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fx_app=debug,fx_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer());

    #[cfg(feature = "otel")]
    let otel_provider = {
        let (otel_tracer, otel_provider) = init_tracer()?;
        registry
            .with(tracing_opentelemetry::layer().with_tracer(otel_tracer))
            .init();
        otel_provider
    };
    #[cfg(not(feature = "otel"))]
    registry.init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting fx server on port {}", config.port);
    tracing::info!("Using rate cache: {}", config.cache_url);

    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; conversions will report a misconfigured AI service");
    }
    if config.exchange_rate_api_key.is_none() {
        tracing::warn!("EXCHANGE_RATE_API_KEY is not set; rate lookups will fail");
    }

    // Build the rate cache store (handles connection and migration)
    let store = build_store(&config.cache_url).await?;

    let source = ExchangeRateApiClient::new(config.exchange_rate_api_key.clone())
        .with_base_url(config.exchange_rate_api_url.clone());
    let rates = CachedRateService::new(store, source)
        .with_throttle(Arc::new(GovernorThrottle::per_minute(
            config.rate_limit_per_minute,
        )))
        .with_ttl(config.rate_cache_ttl);

    let mut gemini = GeminiClient::new(config.gemini_api_key.clone());
    if let Some(url) = &config.gemini_api_url {
        gemini = gemini.with_base_url(url.clone());
    }
    let parser = GeminiCurrencyParser::with_client(gemini).with_model(config.gemini_model.clone());

    // Create the conversion service
    let service = ConversionService::new(parser, rates, config.default_target_currency.clone());

    // Create and run the HTTP server
    let server = HttpServer::with_rate_limit(service, config.inbound_rate_limit_per_minute);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    #[cfg(feature = "otel")]
    let _ = otel_provider.shutdown();

    Ok(())
}
