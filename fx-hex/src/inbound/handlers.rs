//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use fx_types::{
    AppError, ConversionRequest, ConversionResponse, ConversionResult, CurrencyParser,
    ExchangeRateProvider,
};
use tracing::warn;

use crate::ConversionService;
use crate::openapi::ApiDoc;

/// Application state shared across handlers.
pub struct AppState<P: CurrencyParser, X: ExchangeRateProvider> {
    pub service: ConversionService<P, X>,
}

/// JSON body of every non-2xx response produced by a handler.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Invalid currency code: US")]
    pub error: String,
    #[schema(example = 400)]
    pub code: u16,
    /// Upstream detail, e.g. the exchange-rate API `error-type`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Upstream { message, details } => (StatusCode::BAD_GATEWAY, message, details),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
        };

        let body = ErrorResponse {
            error,
            code: status.as_u16(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Run the conversion pipeline. Failures, including unreadable bodies, are
/// part of the response body.
#[tracing::instrument(skip(state, payload))]
pub async fn convert<P: CurrencyParser, X: ExchangeRateProvider>(
    State(state): State<Arc<AppState<P, X>>>,
    payload: Result<Json<ConversionRequest>, JsonRejection>,
) -> Json<ConversionResponse> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!(status = %rejection.status(), "Rejected conversion request body");
            let result =
                ConversionResult::failure(format!("Invalid request: {}", rejection.body_text()));
            return Json(result.into());
        }
    };

    let result = state.service.handle_conversion_request(req).await;
    Json(result.into())
}

/// Look up a single exchange rate.
#[tracing::instrument(skip(state))]
pub async fn get_rate<P: CurrencyParser, X: ExchangeRateProvider>(
    State(state): State<Arc<AppState<P, X>>>,
    Path((base, target)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let rate = state.service.rate(&base, &target).await?;
    Ok(Json(rate))
}

/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
