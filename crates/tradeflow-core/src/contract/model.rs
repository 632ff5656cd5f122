//! Contract domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use tradeflow_store::contracts::{ApprovalRow, ContractRow};

use crate::error::{TradeflowError, TradeflowResult};
use crate::role::Role;

/// An agreement between a seller and a buyer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: String,
    pub title: String,
    pub code: String,
    pub contract_type: String,
    pub value: Decimal,
    pub payment_terms: String,
    pub start_date: String,
    pub end_date: String,
    pub status: ContractStatus,
    pub seller_id: Option<String>,
    pub seller_name: Option<String>,
    pub buyer_id: Option<String>,
    pub buyer_name: Option<String>,
    pub approval_history: Vec<ApprovalEntry>,
    pub visible_to: Vec<Role>,
    pub created_at: String,
    pub updated_at: String,
}

impl Contract {
    /// Create a Contract from a stored row.
    ///
    /// `visible_to` is rebuilt from the status; the stored list is ignored.
    pub fn from_row(row: ContractRow) -> Self {
        let status = ContractStatus::from_str(&row.contract_status);
        Self {
            id: row.id,
            title: row.contract_title,
            code: row.contract_code,
            contract_type: row.contract_type,
            value: row.contract_value,
            payment_terms: row.payment_terms,
            start_date: row.start_date,
            end_date: row.end_date,
            status,
            seller_id: row.seller_id,
            seller_name: row.seller_name,
            buyer_id: row.buyer_id,
            buyer_name: row.buyer_name,
            approval_history: row
                .approval_history
                .into_iter()
                .map(ApprovalEntry::from_row)
                .collect(),
            visible_to: status.visible_roles().to_vec(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    pub fn to_row(&self) -> ContractRow {
        ContractRow {
            id: self.id.clone(),
            contract_title: self.title.clone(),
            contract_code: self.code.clone(),
            contract_type: self.contract_type.clone(),
            contract_value: self.value,
            payment_terms: self.payment_terms.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            contract_status: self.status.as_str().to_string(),
            seller_id: self.seller_id.clone(),
            seller_name: self.seller_name.clone(),
            buyer_id: self.buyer_id.clone(),
            buyer_name: self.buyer_name.clone(),
            approval_history: self.approval_history.iter().map(ApprovalEntry::to_row).collect(),
            visible_to: Role::to_strings(&self.visible_to),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    /// Matches either the id or the human-facing contract code.
    pub fn matches(&self, key: &str) -> bool {
        self.id == key || self.code.eq_ignore_ascii_case(key)
    }

    pub fn is_visible_to(&self, role: Role) -> bool {
        self.status.visible_roles().contains(&role)
    }

    /// Whether `visible_to` agrees with the current status.
    pub fn visibility_consistent(&self) -> bool {
        let expected = self.status.visible_roles();
        self.visible_to.len() == expected.len()
            && expected.iter().all(|r| self.visible_to.contains(r))
    }
}

/// Contract status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractStatus {
    Pending,
    Approved,
    Rejected,
    #[serde(rename = "Modification Requested")]
    ModificationRequested,
}

impl ContractStatus {
    /// Parse from string.
    pub fn from_str(s: &str) -> Self {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            "modificationrequested" => Self::ModificationRequested,
            "pending" => Self::Pending,
            _ => {
                warn!(status = s, "Unknown contract status, reading as Pending");
                Self::Pending
            }
        }
    }

    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::ModificationRequested => "Modification Requested",
        }
    }

    /// Check if transition to another status is valid.
    pub fn can_transition_to(&self, to: &Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Approved)
                | (Self::Pending, Self::Rejected)
                | (Self::Pending, Self::ModificationRequested)
                // A revised contract goes back into the approval queue
                | (Self::ModificationRequested, Self::Pending)
        )
    }

    /// Roles that may see a contract in this status.
    pub fn visible_roles(&self) -> &'static [Role] {
        match self {
            Self::Pending | Self::ModificationRequested => &[Role::Seller, Role::Admin, Role::Buyer],
            Self::Approved => &[Role::Seller, Role::Admin, Role::Buyer, Role::Financier],
            Self::Rejected => &[Role::Seller, Role::Admin],
        }
    }
}

/// One step of the approval trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalEntry {
    pub action: String,
    pub status: ContractStatus,
    pub role: String,
    pub actor: Option<String>,
    pub comment: Option<String>,
    pub at: String,
}

impl ApprovalEntry {
    pub fn from_row(row: ApprovalRow) -> Self {
        Self {
            action: row.action,
            status: ContractStatus::from_str(&row.status),
            role: row.role,
            actor: row.actor,
            comment: row.comment,
            at: row.at,
        }
    }

    pub fn to_row(&self) -> ApprovalRow {
        ApprovalRow {
            action: self.action.clone(),
            status: self.status.as_str().to_string(),
            role: self.role.clone(),
            actor: self.actor.clone(),
            comment: self.comment.clone(),
            at: self.at.clone(),
        }
    }
}

/// Input for a new contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContract {
    pub title: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub contract_type: String,
    pub value: Decimal,
    #[serde(default)]
    pub payment_terms: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub seller_id: Option<String>,
    #[serde(default)]
    pub seller_name: Option<String>,
    #[serde(default)]
    pub buyer_id: Option<String>,
    #[serde(default)]
    pub buyer_name: Option<String>,
}

impl NewContract {
    pub fn validate(&self) -> TradeflowResult<()> {
        if self.title.trim().is_empty() {
            return Err(TradeflowError::validation("Contract title is required"));
        }
        validate_terms(self.value, &self.start_date, &self.end_date)
    }
}

/// Changes a seller may make after a modification request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRevision {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub value: Option<Decimal>,
    #[serde(default)]
    pub payment_terms: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl ContractRevision {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.value.is_none()
            && self.payment_terms.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Apply onto a contract, validating the result.
    pub fn apply(&self, contract: &mut Contract) -> TradeflowResult<()> {
        let title = self.title.clone().unwrap_or_else(|| contract.title.clone());
        let value = self.value.unwrap_or(contract.value);
        let start = self.start_date.clone().unwrap_or_else(|| contract.start_date.clone());
        let end = self.end_date.clone().unwrap_or_else(|| contract.end_date.clone());

        if title.trim().is_empty() {
            return Err(TradeflowError::validation("Contract title is required"));
        }
        validate_terms(value, &start, &end)?;

        contract.title = title;
        contract.value = value;
        contract.start_date = start;
        contract.end_date = end;
        if let Some(terms) = &self.payment_terms {
            contract.payment_terms = terms.clone();
        }
        Ok(())
    }
}

fn validate_terms(value: Decimal, start_date: &str, end_date: &str) -> TradeflowResult<()> {
    if value <= Decimal::ZERO {
        return Err(TradeflowError::validation("Contract value must be positive"));
    }
    let start = parse_date(start_date, "start date")?;
    let end = parse_date(end_date, "end date")?;
    if end < start {
        return Err(TradeflowError::validation(format!(
            "Contract end date {} is before start date {}",
            end_date, start_date
        )));
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str, field: &str) -> TradeflowResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        TradeflowError::validation(format!("Invalid {} '{}': expected YYYY-MM-DD", field, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        use ContractStatus::*;
        assert!(Pending.can_transition_to(&Approved));
        assert!(Pending.can_transition_to(&Rejected));
        assert!(Pending.can_transition_to(&ModificationRequested));
        assert!(ModificationRequested.can_transition_to(&Pending));

        assert!(!Pending.can_transition_to(&Pending));
        assert!(!Approved.can_transition_to(&Rejected));
        assert!(!Rejected.can_transition_to(&Approved));
        assert!(!Approved.can_transition_to(&Pending));
        assert!(!ModificationRequested.can_transition_to(&Approved));
    }

    #[test]
    fn test_status_parse_is_lenient() {
        assert_eq!(
            ContractStatus::from_str("Modification Requested"),
            ContractStatus::ModificationRequested
        );
        assert_eq!(
            ContractStatus::from_str("modification_requested"),
            ContractStatus::ModificationRequested
        );
        assert_eq!(ContractStatus::from_str("APPROVED"), ContractStatus::Approved);
        assert_eq!(ContractStatus::from_str("???"), ContractStatus::Pending);
        assert_eq!(ContractStatus::from_str("Archived"), ContractStatus::Pending);
    }

    #[test]
    fn test_stored_visibility_is_ignored() {
        let row = ContractRow {
            id: "c1".to_string(),
            contract_title: "Steel supply".to_string(),
            contract_code: "CTR-1".to_string(),
            contract_type: String::new(),
            contract_value: Decimal::ONE_HUNDRED,
            payment_terms: String::new(),
            start_date: "2026-01-01".to_string(),
            end_date: "2026-12-31".to_string(),
            contract_status: "Pending".to_string(),
            seller_id: None,
            seller_name: None,
            buyer_id: None,
            buyer_name: None,
            approval_history: Vec::new(),
            visible_to: vec!["Financier".to_string()],
            created_at: String::new(),
            updated_at: String::new(),
        };

        let contract = Contract::from_row(row);
        assert!(contract.visibility_consistent());
        assert!(contract.is_visible_to(Role::Buyer));
        assert!(!contract.is_visible_to(Role::Financier));
    }

    #[test]
    fn test_only_approved_contracts_reach_financiers() {
        assert!(!ContractStatus::Pending.visible_roles().contains(&Role::Financier));
        assert!(ContractStatus::Approved.visible_roles().contains(&Role::Financier));
        assert!(!ContractStatus::Rejected.visible_roles().contains(&Role::Buyer));
    }

    #[test]
    fn test_validate_dates() {
        let mut input = NewContract {
            title: "Cotton yarn".to_string(),
            code: None,
            contract_type: "Supply".to_string(),
            value: Decimal::from(500_000),
            payment_terms: "Net 60".to_string(),
            start_date: "2026-03-01".to_string(),
            end_date: "2026-02-01".to_string(),
            seller_id: None,
            seller_name: None,
            buyer_id: None,
            buyer_name: None,
        };
        assert!(input.validate().is_err());

        input.end_date = "2026-09-01".to_string();
        assert!(input.validate().is_ok());

        input.value = Decimal::ZERO;
        assert!(input.validate().is_err());
    }
}
