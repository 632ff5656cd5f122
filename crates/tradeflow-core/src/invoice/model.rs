//! Invoice domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use tradeflow_store::invoices::InvoiceRow;

use crate::contract::model::parse_date;
use crate::error::{TradeflowError, TradeflowResult};
use crate::role::Role;

/// A billing document submitted by a seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_number: String,
    pub status: InvoiceStatus,
    pub total_amount: Decimal,
    pub buyer_name: String,
    pub seller_name: String,
    pub due_date: String,
    pub issue_date: Option<String>,
    pub contract_id: Option<String>,
    pub project_id: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Invoice {
    /// Create an Invoice from a stored row.
    pub fn from_row(row: InvoiceRow) -> Self {
        Self {
            invoice_number: row.invoice_number,
            status: InvoiceStatus::from_str(&row.status),
            total_amount: row.total_amount,
            buyer_name: row.buyer_name,
            seller_name: row.seller_name,
            due_date: row.due_date,
            issue_date: row.issue_date,
            contract_id: row.contract_id,
            project_id: row.project_id,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    pub fn to_row(&self) -> InvoiceRow {
        InvoiceRow {
            invoice_number: self.invoice_number.clone(),
            status: self.status.as_str().to_string(),
            total_amount: self.total_amount,
            buyer_name: self.buyer_name.clone(),
            seller_name: self.seller_name.clone(),
            due_date: self.due_date.clone(),
            issue_date: self.issue_date.clone(),
            contract_id: self.contract_id.clone(),
            project_id: self.project_id.clone(),
            description: self.description.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    pub fn matches(&self, number: &str) -> bool {
        self.invoice_number.eq_ignore_ascii_case(number)
    }

    pub fn is_visible_to(&self, role: Role) -> bool {
        self.status.visible_roles().contains(&role)
    }
}

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Pending,
    #[serde(rename = "Pending Buyer Approval")]
    PendingBuyerApproval,
    Approved,
    Rejected,
    Funded,
    Settled,
}

impl InvoiceStatus {
    /// Parse from string.
    pub fn from_str(s: &str) -> Self {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "pendingbuyerapproval" => Self::PendingBuyerApproval,
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            "funded" => Self::Funded,
            "settled" => Self::Settled,
            "pending" => Self::Pending,
            _ => {
                warn!(status = s, "Unknown invoice status, reading as Pending");
                Self::Pending
            }
        }
    }

    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::PendingBuyerApproval => "Pending Buyer Approval",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Funded => "Funded",
            Self::Settled => "Settled",
        }
    }

    /// Check if transition to another status is valid.
    pub fn can_transition_to(&self, to: &Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::PendingBuyerApproval)
                | (Self::PendingBuyerApproval, Self::Approved)
                | (Self::PendingBuyerApproval, Self::Rejected)
                | (Self::Approved, Self::Funded)
                | (Self::Funded, Self::Settled)
        )
    }

    /// Roles that may see an invoice in this status.
    pub fn visible_roles(&self) -> &'static [Role] {
        match self {
            Self::Pending => &[Role::Seller, Role::Admin],
            Self::PendingBuyerApproval | Self::Rejected => &[Role::Seller, Role::Admin, Role::Buyer],
            Self::Approved | Self::Funded | Self::Settled => &Role::ALL,
        }
    }
}

/// Input for a new invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoice {
    #[serde(default)]
    pub invoice_number: Option<String>,
    pub total_amount: Decimal,
    pub buyer_name: String,
    pub seller_name: String,
    pub due_date: String,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub contract_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Send straight to the buyer instead of keeping a draft.
    #[serde(default)]
    pub submit: bool,
}

impl NewInvoice {
    pub fn validate(&self) -> TradeflowResult<()> {
        if self.total_amount <= Decimal::ZERO {
            return Err(TradeflowError::validation("Invoice amount must be positive"));
        }
        if self.buyer_name.trim().is_empty() || self.seller_name.trim().is_empty() {
            return Err(TradeflowError::validation("Invoice needs both a buyer and a seller"));
        }
        let due = parse_date(&self.due_date, "due date")?;
        if let Some(issue) = &self.issue_date {
            let issued = parse_date(issue, "issue date")?;
            if due < issued {
                return Err(TradeflowError::validation(format!(
                    "Invoice due date {} is before issue date {}",
                    self.due_date, issue
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        use InvoiceStatus::*;
        assert!(Pending.can_transition_to(&PendingBuyerApproval));
        assert!(PendingBuyerApproval.can_transition_to(&Approved));
        assert!(PendingBuyerApproval.can_transition_to(&Rejected));
        assert!(Approved.can_transition_to(&Funded));
        assert!(Funded.can_transition_to(&Settled));

        assert!(!Pending.can_transition_to(&Approved));
        assert!(!Rejected.can_transition_to(&Funded));
        assert!(!Approved.can_transition_to(&Settled));
        assert!(!Settled.can_transition_to(&Funded));
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(InvoiceStatus::PendingBuyerApproval.as_str(), "Pending Buyer Approval");
        assert_eq!(
            InvoiceStatus::from_str("Pending Buyer Approval"),
            InvoiceStatus::PendingBuyerApproval
        );
        assert_eq!(
            serde_json::to_string(&InvoiceStatus::PendingBuyerApproval).unwrap(),
            "\"Pending Buyer Approval\""
        );
    }

    #[test]
    fn test_unknown_status_reads_as_pending() {
        assert_eq!(InvoiceStatus::from_str("pending"), InvoiceStatus::Pending);
        assert_eq!(InvoiceStatus::from_str("Archived"), InvoiceStatus::Pending);
        assert_eq!(InvoiceStatus::from_str(""), InvoiceStatus::Pending);
    }

    #[test]
    fn test_drafts_hidden_from_buyer_and_financier() {
        let roles = InvoiceStatus::Pending.visible_roles();
        assert!(!roles.contains(&Role::Buyer));
        assert!(!roles.contains(&Role::Financier));
        assert!(InvoiceStatus::Approved.visible_roles().contains(&Role::Financier));
    }
}
