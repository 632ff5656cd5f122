//! Internal notification endpoint.

use axum::{extract::State, http::StatusCode, Json};
use tracing::{debug, info};
use tradeflow_store::WorkflowEvent;

use crate::state::AppState;

/// Receive an event forwarded by a CLI process and broadcast it.
pub async fn notify(
    State(state): State<AppState>,
    Json(event): Json<WorkflowEvent>,
) -> StatusCode {
    info!(event = event.name(), "Received forwarded event, broadcasting to WebSocket clients");
    let receiver_count = state.tx.receiver_count();
    debug!(receiver_count, "Active WebSocket receivers");
    state.broadcast(event);
    StatusCode::OK
}
