//! HTTP endpoint server using Axum

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use crate::config::EngineConfig;
use crate::indicators::error::IndicatorError;
use crate::indicators::parser::{parse_prediction_json, parse_price_window_json};
use crate::metrics::Metrics;
use crate::models::signal::{FusedSignal, PositionPlan};
use crate::risk::position::PositionSizer;
use crate::signals::engine::SignalEngine;

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub engine: Arc<SignalEngine>,
}

impl AppState {
    pub fn new(engine: SignalEngine) -> Result<Self, prometheus::Error> {
        Ok(Self {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics: Arc::new(Metrics::new()?),
            start_time: Arc::new(Instant::now()),
            engine: Arc::new(engine),
        })
    }
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "adaptrix-signal-engine"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Rejected input, rendered as `422 {"error": "..."}`
#[derive(Debug)]
pub struct ApiError(IndicatorError);

impl From<IndicatorError> for ApiError {
    fn from(err: IndicatorError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct AccountRequest {
    pub balance: f64,
    pub max_risk_per_trade: f64,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub symbol: String,
    #[serde(default)]
    pub timeframe: Option<String>,
    pub candles: Value,
    /// Raw prediction, validated by the handler
    #[serde(default)]
    pub prediction: Option<Value>,
    #[serde(default)]
    pub account: Option<AccountRequest>,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub symbol: String,
    pub timeframe: Option<String>,
    pub signal: FusedSignal,
    pub position: PositionPlan,
    pub timestamp: DateTime<Utc>,
}

/// Evaluate a price window, optionally fused with an external prediction
async fn evaluate_signal(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, ApiError> {
    let parsed = parse_price_window_json(&request.candles).and_then(|window| {
        let prediction = request.prediction.as_ref().map(parse_prediction_json).transpose()?;
        Ok((window, prediction))
    });
    let (window, prediction) = parsed.inspect_err(|e| {
        state.metrics.signal_evaluation_errors_total.inc();
        warn!(symbol = %request.symbol, error = %e, "Rejected signal evaluation request");
    })?;

    let evaluation = match &request.account {
        Some(account) => {
            let sizer = PositionSizer::new(account.balance, account.max_risk_per_trade);
            state
                .engine
                .evaluate_with_sizer(&window, prediction.as_ref(), &sizer)
        }
        None => state.engine.evaluate(&window, prediction.as_ref()),
    };

    state
        .metrics
        .signals_evaluated_total
        .with_label_values(&[evaluation.signal.direction.as_str()])
        .inc();
    info!(
        symbol = %request.symbol,
        direction = %evaluation.signal.direction,
        confidence = evaluation.signal.confidence,
        bars = window.len(),
        "Signal evaluated"
    );

    Ok(Json(EvaluateResponse {
        symbol: request.symbol,
        timeframe: request.timeframe,
        signal: evaluation.signal,
        position: evaluation.position,
        timestamp: Utc::now(),
    }))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/signals/evaluate", post(evaluate_signal))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(port: u16, config: EngineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(SignalEngine::from_config(&config))?;
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
