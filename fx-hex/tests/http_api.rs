//! Integration tests for the conversion HTTP API.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{convert_request, get, json_body, test_server};

#[tokio::test]
async fn test_health() {
    let app = test_server(100).router();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_convert_success_uses_flat_camel_case() {
    let app = test_server(100).router();

    let response = app
        .oneshot(convert_request(json!({ "text": "100 USD" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["originalAmount"], 100.0);
    assert_eq!(body["originalCurrency"], "USD");
    assert_eq!(body["targetCurrency"], "PLN");
    assert_eq!(body["rate"], 4.05);
    assert!((body["convertedAmount"].as_f64().unwrap() - 405.0).abs() < 1e-9);
    assert!(body.get("error").is_none());
    assert!(body.get("needsClarification").is_none());
}

#[tokio::test]
async fn test_convert_honours_target_currency() {
    let app = test_server(100).router();

    let response = app
        .oneshot(convert_request(
            json!({ "text": "10 USD", "targetCurrency": "eur" }),
        ))
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["targetCurrency"], "EUR");
    assert_eq!(body["rate"], 0.92);
}

#[tokio::test]
async fn test_convert_failure_is_still_200() {
    let app = test_server(100).router();

    let response = app
        .oneshot(convert_request(json!({ "text": "" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Input text is empty.");
}

#[tokio::test]
async fn test_convert_malformed_body_is_200_failure() {
    let app = test_server(100).router();

    let response = app
        .oneshot(convert_request(json!({ "targetCurrency": "PLN" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Invalid request: "), "{}", error);
    assert!(error.contains("text"), "{}", error);
}

#[tokio::test]
async fn test_convert_clarification_round_trip() {
    let app = test_server(100).router();

    let response = app
        .clone()
        .oneshot(convert_request(json!({ "text": "100 pesos" })))
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["needsClarification"], true);
    assert_eq!(body["clarificationQuestion"], "Which pesos: MXN, ARS or CLP?");
    assert_eq!(body["originalText"], "100 pesos");

    let retry = format!("{} MXN", body["originalText"].as_str().unwrap());
    let response = app
        .oneshot(convert_request(json!({ "text": retry })))
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["originalCurrency"], "MXN");
}

#[tokio::test]
async fn test_convert_rate_service_error_echoes_amount() {
    let app = test_server(100).router();

    let response = app
        .oneshot(convert_request(
            json!({ "text": "5 USD", "targetCurrency": "JPY" }),
        ))
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Exchange rate service error: Unsupported target currency: JPY")
    );
    assert_eq!(body["originalAmount"], 5.0);
    assert_eq!(body["originalCurrency"], "USD");
}

#[tokio::test]
async fn test_rate_lookup() {
    let app = test_server(100).router();

    let response = app.oneshot(get("/api/rates/usd/pln")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "base": "USD", "target": "PLN", "rate": 4.05 })
    );
}

#[tokio::test]
async fn test_rate_lookup_invalid_code_is_400() {
    let app = test_server(100).router();

    let response = app.oneshot(get("/api/rates/US/PLN")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], 400);
    assert!(body["error"].as_str().unwrap().contains("Invalid currency code"));
}

#[tokio::test]
async fn test_rate_lookup_service_error_is_502() {
    let app = test_server(100).router();

    let response = app.oneshot(get("/api/rates/USD/JPY")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert_eq!(body["code"], 502);
    assert_eq!(body["details"], "unsupported-code");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = test_server(100).router();

    let response = app.oneshot(get("/api-docs/openapi.json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["paths"]["/api/convert"]["post"].is_object());
}
