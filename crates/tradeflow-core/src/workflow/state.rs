//! The full workflow state, loaded from and written back to the store.

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::contract::model::Contract;
use crate::error::TradeflowResult;
use crate::funding::model::{FundedInvoice, Opportunity};
use crate::invoice::model::Invoice;
use crate::notification::model::Notification;
use crate::project::model::Project;
use tradeflow_store::{
    buyers, contracts, funded, invoices, notifications, opportunities, projects, StorePool,
};

/// Every collection the reducer reads or writes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowState {
    pub contracts: Vec<Contract>,
    pub projects: Vec<Project>,
    pub invoices: Vec<Invoice>,
    pub funded: Vec<FundedInvoice>,
    pub notifications: Vec<Notification>,
    pub opportunities: Vec<Opportunity>,
    /// Buyer id to queued contract ids.
    pub buyer_queues: BTreeMap<String, Vec<String>>,
}

/// A store key the reducer changed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Collection {
    Contracts,
    Projects,
    Invoices,
    FundedInvoices,
    Notifications,
    Opportunities,
    BuyerQueue(String),
}

impl WorkflowState {
    /// Read every collection wholesale.
    pub async fn load(pool: &StorePool) -> TradeflowResult<Self> {
        let (contract_rows, project_rows, invoice_rows, funded_rows, notification_rows, opportunity_rows, queues) = tokio::try_join!(
            contracts::list_contracts(pool),
            projects::list_projects(pool),
            invoices::list_invoices(pool),
            funded::list_funded_invoices(pool),
            notifications::list_notifications(pool),
            opportunities::list_opportunities(pool),
            buyers::list_queues(pool),
        )?;

        Ok(Self {
            contracts: contract_rows.into_iter().map(Contract::from_row).collect(),
            projects: project_rows.into_iter().map(Project::from_row).collect(),
            invoices: invoice_rows.into_iter().map(Invoice::from_row).collect(),
            funded: funded_rows.into_iter().map(FundedInvoice::from_row).collect(),
            notifications: notification_rows.into_iter().map(Notification::from_row).collect(),
            opportunities: opportunity_rows.into_iter().map(Opportunity::from_row).collect(),
            buyer_queues: queues.into_iter().collect(),
        })
    }

    /// Overwrite the touched collections in full.
    pub async fn persist(&self, pool: &StorePool, touched: &BTreeSet<Collection>) -> TradeflowResult<()> {
        for collection in touched {
            debug!(?collection, "Persisting collection");
            match collection {
                Collection::Contracts => {
                    let rows: Vec<_> = self.contracts.iter().map(Contract::to_row).collect();
                    contracts::save_contracts(pool, &rows).await?;
                }
                Collection::Projects => {
                    let rows: Vec<_> = self.projects.iter().map(Project::to_row).collect();
                    projects::save_projects(pool, &rows).await?;
                }
                Collection::Invoices => {
                    let rows: Vec<_> = self.invoices.iter().map(Invoice::to_row).collect();
                    invoices::save_invoices(pool, &rows).await?;
                }
                Collection::FundedInvoices => {
                    let rows: Vec<_> = self.funded.iter().map(FundedInvoice::to_row).collect();
                    funded::save_funded_invoices(pool, &rows).await?;
                }
                Collection::Notifications => {
                    let rows: Vec<_> = self.notifications.iter().map(Notification::to_row).collect();
                    notifications::save_notifications(pool, &rows).await?;
                }
                Collection::Opportunities => {
                    let rows: Vec<_> = self.opportunities.iter().map(Opportunity::to_row).collect();
                    opportunities::save_opportunities(pool, &rows).await?;
                }
                Collection::BuyerQueue(buyer_id) => {
                    let ids = self.buyer_queues.get(buyer_id).cloned().unwrap_or_default();
                    buyers::save_pending_contract_ids(pool, buyer_id, &ids).await?;
                }
            }
        }
        Ok(())
    }

    pub fn find_contract(&self, key: &str) -> Option<&Contract> {
        self.contracts.iter().find(|c| c.matches(key))
    }

    pub fn find_project(&self, key: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.matches(key))
    }

    pub fn find_invoice(&self, number: &str) -> Option<&Invoice> {
        self.invoices.iter().find(|i| i.matches(number))
    }

    pub fn find_funded(&self, number: &str) -> Option<&FundedInvoice> {
        self.funded
            .iter()
            .find(|f| f.invoice_number.eq_ignore_ascii_case(number))
    }
}
