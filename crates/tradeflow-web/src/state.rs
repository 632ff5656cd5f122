//! Application state.

use tradeflow_core::Engine;
use tradeflow_store::{BroadcastSender, StorePool, WorkflowEvent};

/// Application state shared across handlers.
///
/// `tx` is the engine's own channel, so events from HTTP actions and events
/// forwarded by CLI processes reach WebSocket clients the same way.
#[derive(Clone)]
pub struct AppState {
    pub engine: Engine,
    pub tx: BroadcastSender,
}

impl AppState {
    pub fn new(engine: Engine) -> Self {
        let tx = engine.events().clone();
        Self { engine, tx }
    }

    pub fn pool(&self) -> &StorePool {
        self.engine.pool()
    }

    /// Broadcast an event to all WebSocket clients.
    pub fn broadcast(&self, event: WorkflowEvent) {
        let _ = self.tx.send(event);
    }
}
