// Web server — Axum-based change-event receiver.
//
// For deployments where the store's change feed arrives as HTTP pushes
// instead of a piped stream: POST /events takes one ChangeEvent per
// request. The response is always 200 for a well-formed event — delivery
// failures are logged and swallowed exactly like the stdin path, so the
// pushing infrastructure never retries a whole event because one send
// failed.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::notify::Dispatcher;
use crate::pipeline::{handle_event, Outcome};
use crate::store::ChangeEvent;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<dyn Dispatcher>,
    pub topic: String,
}

/// Start the Axum event receiver and block until it exits.
pub async fn run_server(
    dispatcher: Arc<dyn Dispatcher>,
    topic: String,
    port: u16,
    bind: &str,
) -> Result<()> {
    let state = AppState { dispatcher, topic };
    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("tiffin event receiver listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/events", post(receive_event))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST /events — handle one change event.
///
/// Always 200 with a small JSON outcome. "dropped" means a notification
/// was due but delivery failed; the caller must not retry (detection and
/// dispatch aren't transactional).
async fn receive_event(
    State(state): State<AppState>,
    Json(event): Json<ChangeEvent>,
) -> impl IntoResponse {
    let outcome = handle_event(&event, &state.topic, state.dispatcher.as_ref()).await;

    let (outcome_str, message_id) = match &outcome {
        Outcome::Sent(receipt) => ("sent", Some(receipt.message_id.clone())),
        Outcome::Skipped => ("skipped", None),
        Outcome::Failed => ("dropped", None),
    };

    Json(serde_json::json!({
        "outcome": outcome_str,
        "messageId": message_id,
    }))
}

async fn health() -> &'static str {
    "ok"
}
