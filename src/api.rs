use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Extension, Path};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::registry::catalog;
use crate::state::AppState;

// ── Request types ────────────────────────────────────────────────

/// Body of `POST /command`: `{"type": name, "params": {...}}`.
#[derive(Debug, Deserialize)]
struct CommandRequest {
    #[serde(alias = "command")]
    r#type: Option<String>,
    #[serde(default)]
    params: Value,
}

// ── Handlers ─────────────────────────────────────────────────────

async fn post_command(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<CommandRequest>,
) -> impl IntoResponse {
    let Some(name) = body.r#type else {
        return Json(json!({ "error": "missing_parameter: type" }));
    };
    Json(run(&state, name, body.params).await)
}

/// The body is the params object; an empty body means no params.
async fn post_named_command(
    Extension(state): Extension<Arc<AppState>>,
    Path(name): Path<String>,
    body: Bytes,
) -> impl IntoResponse {
    let params = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        match serde_json::from_slice(&body) {
            Ok(v) => v,
            Err(e) => return Json(json!({ "error": format!("invalid_parameter: {e}") })),
        }
    };
    Json(run(&state, name, params).await)
}

async fn get_commands() -> impl IntoResponse {
    Json(catalog::to_json_schema())
}

async fn get_health(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    let blueprints = state.with_workspace(|ws| ws.blueprints().count());
    Json(json!({ "status": "ok", "blueprints": blueprints }))
}

/// Commands take the workspace lock and may write the project file, so they
/// run on the blocking pool.
async fn run(state: &Arc<AppState>, name: String, params: Value) -> Value {
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || state.run_command(&name, &params))
        .await
        .unwrap_or_else(|e| json!({ "error": format!("io_error: {e}") }))
}

// ── Server startup ───────────────────────────────────────────────

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/command", post(post_command))
        .route("/command/{name}", post(post_named_command))
        .route("/commands", get(get_commands))
        .route("/health", get(get_health))
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
}

/// Bind `settings.bind` and serve until the process exits.
pub async fn serve(state: Arc<AppState>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(&state.settings.bind).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "command API listening");
    let app = router(state);
    axum::serve(listener, app).await.inspect_err(|e| {
        error!(error = %e, "command API stopped");
    })
}
