//! Dashboard read models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::contract::model::Contract;
use crate::funding::model::{FundedInvoice, Opportunity};
use crate::invoice::model::Invoice;
use crate::notification::model::Notification;
use crate::project::model::Project;
use crate::role::Role;

/// Everything one role sees on its home screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub role: Role,
    pub contracts: Vec<Contract>,
    pub projects: Vec<Project>,
    pub invoices: Vec<Invoice>,
    pub funded_invoices: Vec<FundedInvoice>,
    pub opportunities: Vec<Opportunity>,
    /// Newest first.
    pub notifications: Vec<Notification>,
    pub summary: DashboardSummary,
}

/// Headline numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Items waiting on this role.
    pub pending_actions: usize,
    /// Sum of visible invoice totals.
    pub total_value: Decimal,
    /// Sum of net amounts disbursed on visible funded invoices.
    pub funded_value: Decimal,
    pub unread_notifications: usize,
}
