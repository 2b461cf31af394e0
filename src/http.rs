//! HTTP surface: the chat endpoint plus health, readiness, and metrics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use axum_prometheus::PrometheusMetricLayer;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::agent::{responses, Catalog, GeneralIntent, InteractionLogger, PurchaseIntent};
use crate::agent::intents;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::telemetry;
use crate::triage::{self, Lexicon, Rationale};

#[derive(Clone)]
pub struct AppState {
    pub readiness: Arc<AtomicBool>,
    pub metrics: Arc<PrometheusHandle>,
    pub catalog: Arc<Catalog>,
    pub logger: InteractionLogger,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub agent_response: String,
    pub should_escalate: bool,
    pub summary: String,
    pub intent: GeneralIntent,
    pub purchase_intent: PurchaseIntent,
    pub triage: Rationale,
}

/// Host/port overrides applied on top of environment configuration.
#[derive(Debug, Default)]
pub struct ServeOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

pub async fn run(overrides: ServeOverrides) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = overrides.host {
        config.server.host = host;
    }
    if let Some(port) = overrides.port {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    // A broken lexicon or catalog is a deployment fault; refuse to start.
    Lexicon::load()?;
    let catalog = Arc::new(Catalog::from_path(&config.data.catalog_path)?);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        catalog,
        logger: InteractionLogger::new(config.data.interaction_log.clone()),
    };

    let app = router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "sales assistant ready");

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/api/v1/chat", axum::routing::post(chat_endpoint))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .layer(Extension(state))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Triage the message, assemble the reply, and log the exchange. The
/// handler is infallible: collaborator failures degrade to a clarifying
/// reply rather than an error response.
pub(crate) async fn chat_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let decision = triage::evaluate(&payload.message);
    let reply = responses::build_reply(&payload.message, &decision, &state.catalog);
    let summary = responses::build_summary(&payload.message, &reply.text);

    state.logger.record(
        payload.session_id.unwrap_or_else(|| "default".to_string()),
        payload.channel.unwrap_or_else(|| "unknown".to_string()),
        payload.message.clone(),
        reply.text.clone(),
        reply.escalate,
    );

    Json(ChatResponse {
        agent_response: reply.text,
        should_escalate: reply.escalate,
        summary,
        intent: intents::detect_intent(&payload.message),
        purchase_intent: intents::detect_purchase_intent(&payload.message),
        triage: decision.rationale,
    })
}
