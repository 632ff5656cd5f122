//! Workflow actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::contract::model::{ContractRevision, NewContract};
use crate::error::TradeflowError;
use crate::funding::model::FundingTerms;
use crate::invoice::model::NewInvoice;
use crate::project::model::NewProject;
use crate::role::Actor;

/// A reviewer's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
    RequestModification,
}

impl Decision {
    /// Label recorded in approval history.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approved",
            Self::Reject => "rejected",
            Self::RequestModification => "modification_requested",
        }
    }
}

impl FromStr for Decision {
    type Err = TradeflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "approve" | "approved" => Ok(Self::Approve),
            "reject" | "rejected" => Ok(Self::Reject),
            "request_modification" | "modification_requested" | "request_changes" | "modify" => {
                Ok(Self::RequestModification)
            }
            other => Err(TradeflowError::validation(format!(
                "Unknown decision '{}' (expected approve, reject or request_modification)",
                other
            ))),
        }
    }
}

/// Everything the reducer knows how to apply.
///
/// Ids and timestamps are assigned by the caller so the reducer stays pure.
#[derive(Debug, Clone)]
pub enum Action {
    CreateContract {
        id: String,
        input: NewContract,
        actor: Actor,
        at: DateTime<Utc>,
    },
    DecideContract {
        id: String,
        decision: Decision,
        comment: Option<String>,
        actor: Actor,
        at: DateTime<Utc>,
    },
    ReviseContract {
        id: String,
        revision: ContractRevision,
        comment: Option<String>,
        actor: Actor,
        at: DateTime<Utc>,
    },
    CreateProject {
        id: String,
        input: NewProject,
        actor: Actor,
        at: DateTime<Utc>,
    },
    DecideProject {
        id: String,
        decision: Decision,
        comment: Option<String>,
        actor: Actor,
        at: DateTime<Utc>,
    },
    ActivateProject {
        id: String,
        actor: Actor,
        at: DateTime<Utc>,
    },
    FinanceProject {
        id: String,
        actor: Actor,
        at: DateTime<Utc>,
    },
    CreateInvoice {
        number: String,
        input: NewInvoice,
        actor: Actor,
        at: DateTime<Utc>,
    },
    SubmitInvoice {
        number: String,
        actor: Actor,
        at: DateTime<Utc>,
    },
    DecideInvoice {
        number: String,
        decision: Decision,
        comment: Option<String>,
        actor: Actor,
        at: DateTime<Utc>,
    },
    FundInvoice {
        number: String,
        terms: FundingTerms,
        actor: Actor,
        at: DateTime<Utc>,
    },
    SettleInvoice {
        number: String,
        actor: Actor,
        at: DateTime<Utc>,
    },
    MarkNotificationRead {
        id: String,
        actor: Actor,
    },
    MarkAllNotificationsRead {
        actor: Actor,
    },
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Self::CreateContract { .. } => "create_contract",
            Self::DecideContract { .. } => "decide_contract",
            Self::ReviseContract { .. } => "revise_contract",
            Self::CreateProject { .. } => "create_project",
            Self::DecideProject { .. } => "decide_project",
            Self::ActivateProject { .. } => "activate_project",
            Self::FinanceProject { .. } => "finance_project",
            Self::CreateInvoice { .. } => "create_invoice",
            Self::SubmitInvoice { .. } => "submit_invoice",
            Self::DecideInvoice { .. } => "decide_invoice",
            Self::FundInvoice { .. } => "fund_invoice",
            Self::SettleInvoice { .. } => "settle_invoice",
            Self::MarkNotificationRead { .. } => "mark_notification_read",
            Self::MarkAllNotificationsRead { .. } => "mark_all_notifications_read",
        }
    }

    pub fn actor(&self) -> &Actor {
        match self {
            Self::CreateContract { actor, .. }
            | Self::DecideContract { actor, .. }
            | Self::ReviseContract { actor, .. }
            | Self::CreateProject { actor, .. }
            | Self::DecideProject { actor, .. }
            | Self::ActivateProject { actor, .. }
            | Self::FinanceProject { actor, .. }
            | Self::CreateInvoice { actor, .. }
            | Self::SubmitInvoice { actor, .. }
            | Self::DecideInvoice { actor, .. }
            | Self::FundInvoice { actor, .. }
            | Self::SettleInvoice { actor, .. }
            | Self::MarkNotificationRead { actor, .. }
            | Self::MarkAllNotificationsRead { actor } => actor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decision() {
        assert_eq!("approve".parse::<Decision>().unwrap(), Decision::Approve);
        assert_eq!("Rejected".parse::<Decision>().unwrap(), Decision::Reject);
        assert_eq!(
            "request-changes".parse::<Decision>().unwrap(),
            Decision::RequestModification
        );
        assert!("maybe".parse::<Decision>().is_err());
    }
}
