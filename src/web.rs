//! Webhook HTTP surface
//!
//! Receives one POST per chat-platform notification and maps the handler
//! outcome onto a status code the invoking platform can act on:
//! 400 for malformed events (logged, no reply), 500 for collaborator
//! failures, 200 on success.

use crate::event::parse_event;
use crate::handler::MessageHandler;
use anyhow::Context;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Shared, read-only per-process state for the webhook routes.
pub struct AppState {
    /// The request-handling pipeline.
    pub handler: MessageHandler,
}

/// Build the webhook router.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/events", post(handle_event))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Bind the listener and serve webhook events until the process exits.
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails.
pub async fn serve(handler: MessageHandler, port: u16) -> anyhow::Result<()> {
    let state = Arc::new(AppState { handler });
    let app = router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind webhook listener on {addr}"))?;
    info!(%addr, "Webhook server listening");

    axum::serve(listener, app)
        .await
        .context("webhook server exited with error")
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn handle_event(State(state): State<Arc<AppState>>, body: Bytes) -> StatusCode {
    let event = match parse_event(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "Rejected malformed webhook event");
            return StatusCode::BAD_REQUEST;
        }
    };

    match state.handler.handle(&event).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            error!(message_id = %event.data.id, error = %e, "Event handling failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
