//! HTTP Server configuration and startup.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use fx_types::{CurrencyParser, ExchangeRateProvider};

use super::handlers::{self, AppState};
use super::rate_limit::{RateLimiterState, rate_limit_middleware};
use crate::ConversionService;

/// HTTP Server for the conversion API.
pub struct HttpServer<P: CurrencyParser, X: ExchangeRateProvider> {
    state: Arc<AppState<P, X>>,
    rate_limiter: Arc<RateLimiterState>,
}

impl<P: CurrencyParser, X: ExchangeRateProvider> HttpServer<P, X> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: ConversionService<P, X>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            rate_limiter: Arc::new(RateLimiterState::default()), // 60 req/min default
        }
    }

    /// Creates a new HTTP server with custom per-client rate limiting.
    pub fn with_rate_limit(service: ConversionService<P, X>, requests_per_minute: u32) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            rate_limiter: Arc::new(RateLimiterState::new(
                requests_per_minute,
                Duration::from_secs(60),
            )),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/convert", post(handlers::convert::<P, X>))
            .route(
                "/api/rates/{base}/{target}",
                get(handlers::get_rate::<P, X>),
            )
            .route("/api-docs/openapi.json", get(handlers::openapi_json))
            .layer(middleware::from_fn_with_state(
                self.rate_limiter.clone(),
                rate_limit_middleware,
            ))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        let sweeper = tokio::spawn(sweep_idle_clients(self.rate_limiter.clone()));

        let served = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await;

        sweeper.abort();
        served?;

        Ok(())
    }
}

/// Periodically drops rate-limit buckets of clients that went quiet.
async fn sweep_idle_clients(limiter: Arc<RateLimiterState>) {
    let mut ticker = tokio::time::interval(limiter.sweep_interval().max(Duration::from_secs(1)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let before = limiter.tracked_clients();
        limiter.retain_recent();
        tracing::debug!(before, after = limiter.tracked_clients(), "Swept idle rate-limit clients");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
