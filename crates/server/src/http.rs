//! HTTP endpoints
//!
//! REST API for the shopping assistant: the chat endpoint, session
//! management, dictionary administration and health probes.

use std::time::Duration;

use axum::{
    extract::{Json, Path, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use shop_agent_agent::{AgentError, TurnDebug};
use shop_agent_config::CanonFile;
use shop_agent_core::{CatalogItem, ResponseType};

use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.settings.server.cors_origins);
    let timeout = Duration::from_secs(state.settings.server.request_timeout_seconds);

    Router::new()
        // Chat
        .route("/api/chat", post(chat))
        // Session management
        .route("/api/sessions", get(list_sessions))
        .route("/api/sessions/:id", delete(delete_session))
        // Dictionary administration
        .route("/api/admin/canon", get(get_canon))
        .route("/api/admin/canon", put(put_canon))
        // Health probes
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .with_state(state)
}

/// CORS from configured origins; empty config allows any origin
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            let value = origin.parse::<HeaderValue>().ok();
            if value.is_none() {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
            }
            value
        })
        .collect();

    if parsed.is_empty() {
        tracing::info!("No CORS origins configured, allowing any origin");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any);
    }

    tracing::info!(count = parsed.len(), "CORS origins configured");
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Chat request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest {
    /// Client-chosen session id; derived from the connection when absent
    #[serde(default)]
    session_id: Option<String>,
    message: String,
    /// Client-declared language hint ("pt" | "es"). Understanding is
    /// bilingual either way; replies currently render in Portuguese.
    #[serde(default)]
    lang: Option<String>,
    /// Explicit availability filter; never inferred from the message
    #[serde(default)]
    in_stock_only: Option<bool>,
}

/// Chat response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatResponse {
    ok: bool,
    session_id: String,
    text: String,
    items: Vec<CatalogItem>,
    response_type: ResponseType,
    debug: TurnDebug,
}

/// Chat endpoint
async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ServerError> {
    let session_id = request
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| pseudo_session_id(&headers));

    if let Some(lang) = &request.lang {
        tracing::debug!(lang = %lang, "Client language hint");
    }

    let reply = state
        .agent
        .handle(&session_id, &request.message, request.in_stock_only)
        .await
        .map_err(|e| match e {
            AgentError::EmptyMessage => ServerError::InvalidRequest("message is empty".into()),
        })?;

    Ok(Json(ChatResponse {
        ok: true,
        session_id,
        text: reply.text,
        items: reply.items,
        response_type: reply.response_type,
        debug: reply.debug,
    }))
}

/// Stable anonymous session id from the connection fingerprint
///
/// Clients that do not manage their own ids still keep context across
/// turns as long as their address and user agent stay the same.
fn pseudo_session_id(headers: &HeaderMap) -> String {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    let ua = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    format!("anon-{:016x}", fnv1a64(format!("{ip}|{ua}").as_bytes()))
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for b in bytes {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// List sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.agent.sessions().list();
    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

/// Delete session
async fn delete_session(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.agent.sessions().remove(&id);
    StatusCode::NO_CONTENT
}

/// Current dictionary snapshot
async fn get_canon(State(state): State<AppState>) -> Json<CanonFile> {
    let dictionary = state.agent.canon().current();
    Json(CanonFile::from_dictionary(&dictionary))
}

/// Replace the dictionary
///
/// Validates first; the live dictionary only swaps on success. When a
/// canon file is configured the new dictionary is persisted as well.
async fn put_canon(
    State(state): State<AppState>,
    Json(file): Json<CanonFile>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let dictionary = file
        .to_dictionary()
        .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;

    if let Some(store) = &state.canon_store {
        store
            .save(&dictionary)
            .map_err(|e| ServerError::Internal(e.to_string()))?;
    }

    let (products, categories) = dictionary.len();
    state.agent.canon().replace(dictionary);

    Ok(Json(serde_json::json!({
        "ok": true,
        "products": products,
        "categories": categories,
    })))
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ready",
        "sessions": state.agent.sessions().count(),
    }))
}
