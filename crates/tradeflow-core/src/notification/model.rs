//! Notification domain models.

use serde::{Deserialize, Serialize};
use tradeflow_store::notifications::NotificationRow;

use crate::role::Role;

/// A role-targeted notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    pub for_roles: Vec<Role>,
    pub priority: Priority,
    pub entity_id: Option<String>,
    pub created_at: String,
    pub read: bool,
}

impl Notification {
    /// Create a Notification from a stored row.
    pub fn from_row(row: NotificationRow) -> Self {
        Self {
            id: row.id,
            kind: NotificationKind::from_str(&row.kind),
            message: row.message,
            for_roles: Role::parse_list(&row.for_roles),
            priority: Priority::from_str(&row.priority),
            entity_id: row.entity_id,
            created_at: row.created_at,
            read: row.read,
        }
    }

    pub fn to_row(&self) -> NotificationRow {
        NotificationRow {
            id: self.id.clone(),
            kind: self.kind.as_str().to_string(),
            message: self.message.clone(),
            for_roles: Role::to_strings(&self.for_roles),
            priority: self.priority.as_str().to_string(),
            entity_id: self.entity_id.clone(),
            created_at: self.created_at.clone(),
            read: self.read,
        }
    }

    pub fn is_for(&self, role: Role) -> bool {
        self.for_roles.contains(&role)
    }
}

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ContractSubmitted,
    ContractDecision,
    ProjectSubmitted,
    ProjectApproval,
    InvoiceSubmitted,
    InvoiceDecision,
    InvoiceFunded,
    InvoiceSettled,
    General,
}

impl NotificationKind {
    /// Parse from string.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "contract_submitted" => Self::ContractSubmitted,
            "contract_decision" => Self::ContractDecision,
            "project_submitted" => Self::ProjectSubmitted,
            "project_approval" => Self::ProjectApproval,
            "invoice_submitted" => Self::InvoiceSubmitted,
            "invoice_decision" => Self::InvoiceDecision,
            "invoice_funded" => Self::InvoiceFunded,
            "invoice_settled" => Self::InvoiceSettled,
            _ => Self::General,
        }
    }

    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContractSubmitted => "contract_submitted",
            Self::ContractDecision => "contract_decision",
            Self::ProjectSubmitted => "project_submitted",
            Self::ProjectApproval => "project_approval",
            Self::InvoiceSubmitted => "invoice_submitted",
            Self::InvoiceDecision => "invoice_decision",
            Self::InvoiceFunded => "invoice_funded",
            Self::InvoiceSettled => "invoice_settled",
            Self::General => "general",
        }
    }
}

/// Priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Parse from string.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }

    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}
