//! HTTP handlers for the memory API.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use confab_memory::{MemoryStore, Role, Turn, build_context_prompt};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query parameters for the load route.
#[derive(Debug, Default, Deserialize)]
pub struct LoadParams {
    /// Narrow the response to the most recent `limit` turns.
    pub limit: Option<usize>,
}

/// Response body for the load route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadResponse {
    pub turns: Vec<Turn>,
    pub total_turns: u64,
    pub context_prompt: String,
}

/// Request body for the append route.
///
/// Fields are optional so missing input is rejected with the service's own
/// error body instead of a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct AppendRequest {
    pub role: Option<String>,
    pub text: Option<String>,
}

/// Response body for the append route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendResponse {
    pub ok: bool,
    pub total_turns: u64,
}

/// Error body for rejected input.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// GET /api/memory
//
// Always answers 200: a total storage miss degrades to the empty aggregate
// inside the store, and an empty context prompt signals "no prior context".
pub async fn load_memory(
    State(store): State<Arc<MemoryStore>>,
    Query(params): Query<LoadParams>,
) -> Json<LoadResponse> {
    let memory = store.load(params.limit).await;
    let context_prompt = build_context_prompt(&memory);
    info!(
        "loaded memory (turns={}, lifetime={}, prompt_chars={})",
        memory.turns.len(),
        memory.total_turns,
        context_prompt.len()
    );
    Json(LoadResponse {
        turns: memory.turns,
        total_turns: memory.total_turns,
        context_prompt,
    })
}

// POST /api/memory
//
// Invalid input is the only caller-visible error; once the turn is
// accepted, persistence failure never surfaces here.
pub async fn append_turn(
    State(store): State<Arc<MemoryStore>>,
    Json(request): Json<AppendRequest>,
) -> Result<Json<AppendResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Some(raw_role) = request.role.as_deref() else {
        return Err(bad_request("Missing role or text"));
    };
    let Some(role) = Role::parse(raw_role) else {
        return Err(bad_request("Role must be user or agent"));
    };
    let text = match request.text {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(bad_request("Missing role or text")),
    };

    let memory = store.append_turn(role, text).await;
    Ok(Json(AppendResponse {
        ok: true,
        total_turns: memory.total_turns,
    }))
}

// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn bad_request(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    warn!("rejected append (reason={message})");
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}
