//! Live workflow event stream.
//!
//! Each client first receives `storeRefresh`, then every workflow event as
//! JSON. Clients are expected to re-fetch their dashboard on each message.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use tradeflow_store::{BroadcastReceiver, WorkflowEvent};

use crate::state::AppState;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| serve_client(socket, state))
}

async fn serve_client(socket: WebSocket, state: AppState) {
    let (sink, mut incoming) = socket.split();
    let events = state.tx.subscribe();
    info!(listeners = state.tx.receiver_count(), "Dashboard client connected");

    let mut forward = tokio::spawn(forward_events(sink, events));

    // Clients only listen; watch for the close frame
    let mut watch = tokio::spawn(async move {
        while let Some(frame) = incoming.next().await {
            match frame {
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(_) => {}
            }
        }
    });

    tokio::select! {
        _ = &mut forward => watch.abort(),
        _ = &mut watch => forward.abort(),
    }

    info!("Dashboard client disconnected");
}

async fn forward_events(mut sink: SplitSink<WebSocket, Message>, mut events: BroadcastReceiver) {
    let mut next = Some(WorkflowEvent::StoreRefresh);

    loop {
        let event = match next.take() {
            Some(event) => event,
            None => match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Client fell behind, asking it to reload");
                    WorkflowEvent::StoreRefresh
                }
                Err(RecvError::Closed) => break,
            },
        };

        let json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to encode workflow event");
                continue;
            }
        };
        debug!(event = event.name(), "Pushing event to client");
        if sink.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }
}
