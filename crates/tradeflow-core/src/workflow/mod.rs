//! Workflow engine.
//!
//! Every mutation goes through [`Engine::dispatch`]: the current state is
//! loaded, the action is reduced, the touched collections are written back
//! and the resulting events are broadcast. Dispatches are serialized so two
//! callers never interleave a read-modify-write.

pub mod action;
pub mod reducer;
pub mod state;

pub use action::{Action, Decision};
pub use reducer::{reduce, Outcome};
pub use state::{Collection, WorkflowState};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::TradeflowResult;
use tradeflow_store::{create_broadcast_channel, BroadcastReceiver, BroadcastSender, StorePool, WorkflowEvent};

/// Applies actions against a store and announces the results.
#[derive(Clone)]
pub struct Engine {
    pool: StorePool,
    events: BroadcastSender,
    latency: Duration,
    gate: Arc<Mutex<()>>,
}

impl Engine {
    /// Create an engine with its own event channel.
    pub fn new(pool: StorePool) -> Self {
        Self::with_events(pool, create_broadcast_channel())
    }

    /// Create an engine that publishes on an existing channel.
    pub fn with_events(pool: StorePool, events: BroadcastSender) -> Self {
        Self {
            pool,
            events,
            latency: Duration::ZERO,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Simulated round-trip delay applied before each dispatch.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn pool(&self) -> &StorePool {
        &self.pool
    }

    pub fn events(&self) -> &BroadcastSender {
        &self.events
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn subscribe(&self) -> BroadcastReceiver {
        self.events.subscribe()
    }

    /// Current state, read fresh from the store.
    pub async fn state(&self) -> TradeflowResult<WorkflowState> {
        WorkflowState::load(&self.pool).await
    }

    /// Apply an action and return the resulting state.
    pub async fn dispatch(&self, action: Action) -> TradeflowResult<WorkflowState> {
        let _guard = self.gate.lock().await;
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let current = WorkflowState::load(&self.pool).await?;
        let outcome = match reducer::reduce(current, &action) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(action = action.label(), role = %action.actor().role, error = %e, "Action rejected");
                return Err(e);
            }
        };

        outcome.state.persist(&self.pool, &outcome.touched).await?;
        info!(
            action = action.label(),
            role = %action.actor().role,
            collections = outcome.touched.len(),
            events = outcome.events.len(),
            "Action applied"
        );

        for event in outcome.events {
            debug!(event = event.name(), "Broadcasting workflow event");
            // No subscribers is fine
            let _ = self.events.send(event);
        }
        Ok(outcome.state)
    }

    /// Tell every listener to reload from the store.
    pub fn announce_refresh(&self) {
        let _ = self.events.send(WorkflowEvent::StoreRefresh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::{ContractStatus, NewContract};
    use crate::role::{Actor, Role};
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use tradeflow_store::contracts;

    fn contract_action(id: &str, code: &str) -> Action {
        Action::CreateContract {
            id: id.to_string(),
            input: NewContract {
                title: "Steel coils".to_string(),
                code: Some(code.to_string()),
                contract_type: "Supply".to_string(),
                value: dec!(750000),
                payment_terms: "Net 45".to_string(),
                start_date: "2026-04-01".to_string(),
                end_date: "2026-10-01".to_string(),
                seller_id: None,
                seller_name: None,
                buyer_id: Some("b7".to_string()),
                buyer_name: None,
            },
            actor: Actor::named(Role::Seller, "Forge Works"),
            at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_persists_and_broadcasts() {
        let engine = Engine::new(StorePool::in_memory());
        let mut rx = engine.subscribe();

        let state = engine.dispatch(contract_action("c1", "CTR-1")).await.unwrap();
        assert_eq!(state.contracts.len(), 1);

        let rows = contracts::list_contracts(engine.pool()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].contract_status, ContractStatus::Pending.as_str());

        let event = rx.recv().await.unwrap();
        assert_eq!(event.name(), "contractSubmitted");

        let reloaded = engine.state().await.unwrap();
        assert_eq!(reloaded, state);
    }

    #[tokio::test]
    async fn test_rejected_action_leaves_store_untouched() {
        let engine = Engine::new(StorePool::in_memory());
        engine.dispatch(contract_action("c1", "CTR-1")).await.unwrap();
        let before = engine.state().await.unwrap();

        let err = engine.dispatch(contract_action("c2", "CTR-1")).await;
        assert!(err.is_err());
        assert_eq!(engine.state().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_concurrent_dispatches_are_serialized() {
        let engine = Engine::new(StorePool::in_memory());
        let mut handles = Vec::new();
        for i in 0..8 {
            let engine = engine.clone();
            handles.push(tokio::spawn(async move {
                engine
                    .dispatch(contract_action(&format!("c{}", i), &format!("CTR-{}", i)))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let state = engine.state().await.unwrap();
        assert_eq!(state.contracts.len(), 8);
        assert_eq!(state.notifications.len(), 8);
        assert_eq!(state.buyer_queues["b7"].len(), 8);
    }
}
