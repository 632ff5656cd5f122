//! Project domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use tradeflow_store::projects::{MilestoneRow, ProjectRow};

use crate::error::{TradeflowError, TradeflowResult};
use crate::role::Role;

/// An invoice-discounting work item tied to a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub code: String,
    pub value: Decimal,
    pub milestones: Vec<Milestone>,
    pub status: ProjectStatus,
    pub buyer_id: Option<String>,
    pub contract_id: Option<String>,
    pub seller_id: Option<String>,
    pub financier_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Project {
    /// Create a Project from a stored row.
    pub fn from_row(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            title: row.project_title,
            code: row.project_code,
            value: row.project_value,
            milestones: row.milestones.into_iter().map(Milestone::from_row).collect(),
            status: ProjectStatus::from_str(&row.status),
            buyer_id: row.buyer_id,
            contract_id: row.contract_id,
            seller_id: row.seller_id,
            financier_id: row.financier_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    pub fn to_row(&self) -> ProjectRow {
        ProjectRow {
            id: self.id.clone(),
            project_title: self.title.clone(),
            project_code: self.code.clone(),
            project_value: self.value,
            milestones: self.milestones.iter().map(Milestone::to_row).collect(),
            status: self.status.as_str().to_string(),
            buyer_id: self.buyer_id.clone(),
            contract_id: self.contract_id.clone(),
            seller_id: self.seller_id.clone(),
            financier_id: self.financier_id.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    pub fn matches(&self, key: &str) -> bool {
        self.id == key || self.code.eq_ignore_ascii_case(key)
    }

    pub fn is_visible_to(&self, role: Role) -> bool {
        self.status.visible_roles().contains(&role)
    }
}

/// Project status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "Pending Approval")]
    PendingApproval,
    Approved,
    Rejected,
    Active,
    Financed,
}

impl ProjectStatus {
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
            "active" => Self::Active,
            "financed" => Self::Financed,
            "pendingapproval" | "pending" => Self::PendingApproval,
            _ => {
                warn!(status = s, "Unknown project status, reading as Pending Approval");
                Self::PendingApproval
            }
        }
    }

    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingApproval => "Pending Approval",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Active => "Active",
            Self::Financed => "Financed",
        }
    }

    /// Check if transition to another status is valid.
    pub fn can_transition_to(&self, to: &Self) -> bool {
        matches!(
            (self, to),
            (Self::PendingApproval, Self::Approved)
                | (Self::PendingApproval, Self::Rejected)
                | (Self::Approved, Self::Active)
                // Financing sub-flow
                | (Self::Approved, Self::Financed)
                | (Self::Active, Self::Financed)
        )
    }

    /// Roles that may see a project in this status.
    pub fn visible_roles(&self) -> &'static [Role] {
        match self {
            Self::PendingApproval => &[Role::Seller, Role::Admin, Role::Buyer],
            Self::Rejected => &[Role::Seller, Role::Admin],
            Self::Approved | Self::Active | Self::Financed => &Role::ALL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub title: String,
    pub amount: Decimal,
    pub due_date: Option<String>,
    pub completed: bool,
}

impl Milestone {
    pub fn from_row(row: MilestoneRow) -> Self {
        Self {
            title: row.title,
            amount: row.amount,
            due_date: row.due_date,
            completed: row.status.eq_ignore_ascii_case("completed"),
        }
    }

    pub fn to_row(&self) -> MilestoneRow {
        MilestoneRow {
            title: self.title.clone(),
            amount: self.amount,
            due_date: self.due_date.clone(),
            status: if self.completed { "Completed" } else { "Pending" }.to_string(),
        }
    }
}

/// Input for a new project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    #[serde(default)]
    pub code: Option<String>,
    pub value: Decimal,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub buyer_id: Option<String>,
    #[serde(default)]
    pub contract_id: Option<String>,
    #[serde(default)]
    pub seller_id: Option<String>,
}

impl NewProject {
    pub fn validate(&self) -> TradeflowResult<()> {
        if self.title.trim().is_empty() {
            return Err(TradeflowError::validation("Project title is required"));
        }
        if self.value <= Decimal::ZERO {
            return Err(TradeflowError::validation("Project value must be positive"));
        }
        if self.milestones.iter().any(|m| m.amount <= Decimal::ZERO) {
            return Err(TradeflowError::validation("Milestone amounts must be positive"));
        }
        let total: Decimal = self.milestones.iter().map(|m| m.amount).sum();
        if total > self.value {
            return Err(TradeflowError::validation(format!(
                "Milestones total {} exceeds project value {}",
                total, self.value
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_transitions() {
        use ProjectStatus::*;
        assert!(PendingApproval.can_transition_to(&Approved));
        assert!(PendingApproval.can_transition_to(&Rejected));
        assert!(Approved.can_transition_to(&Active));
        assert!(Approved.can_transition_to(&Financed));
        assert!(Active.can_transition_to(&Financed));

        assert!(!PendingApproval.can_transition_to(&Financed));
        assert!(!Rejected.can_transition_to(&Approved));
        assert!(!Financed.can_transition_to(&Active));
    }

    #[test]
    fn test_unknown_status_reads_as_pending_approval() {
        assert_eq!(ProjectStatus::from_str("Pending"), ProjectStatus::PendingApproval);
        assert_eq!(ProjectStatus::from_str("Archived"), ProjectStatus::PendingApproval);
    }

    #[test]
    fn test_milestones_cannot_exceed_value() {
        let project = NewProject {
            title: "Warehouse fit-out".to_string(),
            code: None,
            value: dec!(100000),
            milestones: vec![
                Milestone {
                    title: "Design".to_string(),
                    amount: dec!(40000),
                    due_date: None,
                    completed: false,
                },
                Milestone {
                    title: "Build".to_string(),
                    amount: dec!(70000),
                    due_date: None,
                    completed: false,
                },
            ],
            buyer_id: None,
            contract_id: None,
            seller_id: None,
        };
        assert!(matches!(project.validate(), Err(TradeflowError::ValidationError(_))));
    }
}
