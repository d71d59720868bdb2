//! Integration tests for the API Server
//!
//! Tests HTTP endpoints, health checks, metrics, and signal evaluation.


use serde_json::{json, Value};

use test_utils::{flat_rows, rising_columns, TestApiServer};

const EVALUATE: &str = "/api/signals/evaluate";

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "adaptrix-signal-engine");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    let _ = app.server.get("/health").await;

    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    for name in [
        "http_requests_total",
        "http_request_duration_seconds",
        "http_requests_in_flight",
        "signal_evaluation_errors_total",
    ] {
        assert!(body.contains(name), "Expected {name} metric");
    }
}

#[tokio::test]
async fn evaluate_rising_window() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post(EVALUATE)
        .json(&json!({
            "symbol": "BTCUSDT",
            "timeframe": "15m",
            "candles": rising_columns(60),
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["symbol"], "BTCUSDT");
    assert_eq!(body["timeframe"], "15m");
    assert_eq!(body["signal"]["current_price"], 129.5);
    assert_ne!(body["signal"]["direction"], "short");
    assert!(body["signal"]["indicators"]["votes"].is_object());
    assert!(body["position"]["size"].as_f64().is_some());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn evaluate_counts_signals_by_direction() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post(EVALUATE)
        .json(&json!({ "symbol": "ETHUSDT", "candles": flat_rows(10) }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body = app.server.get("/metrics").await.text();
    assert!(body.contains("signals_evaluated_total{direction=\"neutral\"} 1"));
}

#[tokio::test]
async fn evaluate_rejects_missing_column() {
    let app = TestApiServer::new().await;
    let mut candles = rising_columns(10);
    candles.as_object_mut().unwrap().remove("volume");

    let response = app
        .server
        .post(EVALUATE)
        .json(&json!({ "symbol": "BTCUSDT", "candles": candles }))
        .await;
    assert_eq!(response.status_code(), 422);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("volume"));

    let metrics = app.server.get("/metrics").await.text();
    assert!(metrics.contains("signal_evaluation_errors_total 1"));
}

#[tokio::test]
async fn evaluate_rejects_malformed_candle() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post(EVALUATE)
        .json(&json!({
            "symbol": "BTCUSDT",
            "candles": [{ "open": 100.0, "high": 95.0, "low": 99.0, "close": 100.0, "volume": 1.0 }],
        }))
        .await;
    assert_eq!(response.status_code(), 422);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("malformed candle"));
}

#[tokio::test]
async fn evaluate_rejects_invalid_prediction() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post(EVALUATE)
        .json(&json!({
            "symbol": "BTCUSDT",
            "candles": flat_rows(10),
            "prediction": { "direction": "long", "confidence": 1.5 },
        }))
        .await;
    assert_eq!(response.status_code(), 422);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("invalid prediction"));
}

#[tokio::test]
async fn evaluate_fuses_external_prediction() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post(EVALUATE)
        .json(&json!({
            "symbol": "BTCUSDT",
            "candles": flat_rows(20),
            "prediction": {
                "direction": "long",
                "confidence": 0.95,
                "stop_loss": 95.0,
                "take_profit": 110.0,
            },
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["signal"]["direction"], "long");
    assert_eq!(body["signal"]["confidence"], 0.9);
    assert_eq!(body["signal"]["stop_loss"], 95.0);
    assert_eq!(body["signal"]["take_profit"], 110.0);
    assert_eq!(body["signal"]["ml_contribution"], 0.64);
    assert_eq!(body["position"]["risk_reward_ratio"], 2.0);
}

#[tokio::test]
async fn evaluate_sizes_against_account_override() {
    let app = TestApiServer::new().await;
    let request = |account: Option<Value>| {
        let mut body = json!({
            "symbol": "BTCUSDT",
            "candles": flat_rows(20),
            "prediction": {
                "direction": "long",
                "confidence": 0.95,
                "stop_loss": 95.0,
                "take_profit": 110.0,
            },
        });
        if let Some(account) = account {
            body["account"] = account;
        }
        body
    };

    let default_size = app
        .server
        .post(EVALUATE)
        .json(&request(None))
        .await
        .json::<Value>()["position"]["size"]
        .as_f64()
        .unwrap();
    let larger_size = app
        .server
        .post(EVALUATE)
        .json(&request(Some(json!({ "balance": 2000.0, "max_risk_per_trade": 0.02 }))))
        .await
        .json::<Value>()["position"]["size"]
        .as_f64()
        .unwrap();

    assert!((default_size - 3.6).abs() < 1e-9);
    assert!((larger_size - 7.2).abs() < 1e-9);
}

#[tokio::test]
async fn evaluate_reports_malformed_prediction_as_json_error() {
    let app = TestApiServer::new().await;
    for prediction in [
        json!({ "confidence": 0.8 }),
        json!({ "direction": "long", "confidence": "high" }),
    ] {
        let response = app
            .server
            .post(EVALUATE)
            .json(&json!({
                "symbol": "BTCUSDT",
                "candles": flat_rows(10),
                "prediction": prediction,
            }))
            .await;
        assert_eq!(response.status_code(), 422);

        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("invalid prediction"));
    }

    let metrics = app.server.get("/metrics").await.text();
    assert!(metrics.contains("signal_evaluation_errors_total 2"));
}

#[tokio::test]
async fn evaluate_ignores_extra_columns() {
    let app = TestApiServer::new().await;
    let mut candles = rising_columns(10);
    candles["symbol"] = json!(vec!["BTCUSDT"; 10]);

    let response = app
        .server
        .post(EVALUATE)
        .json(&json!({ "symbol": "BTCUSDT", "candles": candles }))
        .await;
    assert_eq!(response.status_code(), 200);
}
