//! Broadcast channel for cross-component workflow events.
//!
//! Events carry the full updated entity, but listeners are expected to
//! re-read the store rather than apply the payload.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::queries::contracts::ContractRow;
use crate::queries::funded::FundedInvoiceRow;
use crate::queries::invoices::InvoiceRow;
use crate::queries::projects::ProjectRow;

/// Workflow event types.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum WorkflowEvent {
    /// A seller created or revised a contract.
    ContractSubmitted(ContractRow),
    /// A buyer or admin decided a contract.
    ContractDecision(ContractRow),
    ProjectSubmitted(ProjectRow),
    /// A project was approved, rejected, activated or financed.
    ProjectApproval(ProjectRow),
    InvoiceSubmitted(InvoiceRow),
    /// A buyer decided an invoice, or it was settled.
    InvoiceDecision(InvoiceRow),
    InvoiceFunded(FundedInvoiceRow),
    /// Notifications changed; re-read them.
    NotificationsChanged,
    /// Something outside the workflow rewrote the store.
    StoreRefresh,
}

impl WorkflowEvent {
    /// Event name as broadcast to listeners.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ContractSubmitted(_) => "contractSubmitted",
            Self::ContractDecision(_) => "contractDecision",
            Self::ProjectSubmitted(_) => "projectSubmitted",
            Self::ProjectApproval(_) => "projectApproval",
            Self::InvoiceSubmitted(_) => "invoiceSubmitted",
            Self::InvoiceDecision(_) => "invoiceDecision",
            Self::InvoiceFunded(_) => "invoiceFunded",
            Self::NotificationsChanged => "notificationsChanged",
            Self::StoreRefresh => "storeRefresh",
        }
    }
}

/// Type alias for the broadcast sender.
pub type BroadcastSender = broadcast::Sender<WorkflowEvent>;

/// Type alias for the broadcast receiver.
pub type BroadcastReceiver = broadcast::Receiver<WorkflowEvent>;

/// Create a new broadcast channel with default capacity.
pub fn create_broadcast_channel() -> BroadcastSender {
    let (tx, _rx) = broadcast::channel(100);
    tx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_format() {
        let json = serde_json::to_value(WorkflowEvent::StoreRefresh).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "storeRefresh" }));

        let parsed: WorkflowEvent =
            serde_json::from_value(serde_json::json!({ "type": "notificationsChanged" })).unwrap();
        assert_eq!(parsed.name(), "notificationsChanged");
    }
}
