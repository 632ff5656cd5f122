//! Role dashboards.
//!
//! A dashboard is a pure projection of the workflow state. Nothing here is
//! stored; listeners rebuild it whenever an event arrives.

pub mod model;

pub use model::{Dashboard, DashboardSummary};

use rust_decimal::Decimal;

use crate::contract::model::ContractStatus;
use crate::error::TradeflowResult;
use crate::invoice::model::InvoiceStatus;
use crate::project::model::ProjectStatus;
use crate::role::Role;
use crate::workflow::WorkflowState;
use tradeflow_store::StorePool;

/// Load the store and build the dashboard for a role.
pub async fn load_dashboard(pool: &StorePool, role: Role) -> TradeflowResult<Dashboard> {
    let state = WorkflowState::load(pool).await?;
    Ok(build_dashboard(&state, role))
}

/// Project a state onto one role.
pub fn build_dashboard(state: &WorkflowState, role: Role) -> Dashboard {
    let contracts: Vec<_> = state
        .contracts
        .iter()
        .filter(|c| c.is_visible_to(role))
        .cloned()
        .collect();
    let projects: Vec<_> = state
        .projects
        .iter()
        .filter(|p| p.is_visible_to(role))
        .cloned()
        .collect();
    let invoices: Vec<_> = state
        .invoices
        .iter()
        .filter(|i| i.is_visible_to(role))
        .cloned()
        .collect();
    let funded_invoices = state.funded.clone();
    let opportunities: Vec<_> = if matches!(role, Role::Financier | Role::Admin) {
        state.opportunities.iter().filter(|o| o.open).cloned().collect()
    } else {
        Vec::new()
    };
    let mut notifications: Vec<_> = state
        .notifications
        .iter()
        .filter(|n| n.is_for(role))
        .cloned()
        .collect();
    notifications.reverse();

    let pending_actions = match role {
        Role::Seller => {
            count(&contracts, |c| c.status == ContractStatus::ModificationRequested)
                + count(&invoices, |i| i.status == InvoiceStatus::Pending)
        }
        Role::Buyer => {
            count(&contracts, |c| c.status == ContractStatus::Pending)
                + count(&invoices, |i| i.status == InvoiceStatus::PendingBuyerApproval)
        }
        Role::Admin => {
            count(&contracts, |c| c.status == ContractStatus::Pending)
                + count(&projects, |p| p.status == ProjectStatus::PendingApproval)
        }
        Role::Financier => {
            state.opportunities.iter().filter(|o| o.open).count()
                + count(&projects, |p| {
                    matches!(p.status, ProjectStatus::Approved | ProjectStatus::Active)
                })
        }
    };

    let summary = DashboardSummary {
        pending_actions,
        total_value: saturating_sum(invoices.iter().map(|i| i.total_amount)),
        funded_value: saturating_sum(funded_invoices.iter().map(|f| f.net_amount)),
        unread_notifications: notifications.iter().filter(|n| !n.read).count(),
    };

    Dashboard {
        role,
        contracts,
        projects,
        invoices,
        funded_invoices,
        opportunities,
        notifications,
        summary,
    }
}

fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

fn count<T>(items: &[T], pred: impl Fn(&T) -> bool) -> usize {
    items.iter().filter(|item| pred(item)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::NewContract;
    use crate::invoice::model::NewInvoice;
    use crate::role::Actor;
    use crate::workflow::{Action, Decision, Engine};
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use tradeflow_store::keys;

    async fn engine_with_activity() -> Engine {
        let engine = Engine::new(StorePool::in_memory());
        let seller = Actor::named(Role::Seller, "Asha Textiles");
        let buyer = Actor::named(Role::Buyer, "Meridian Retail");

        engine
            .dispatch(Action::CreateContract {
                id: "c1".to_string(),
                input: NewContract {
                    title: "Cotton yarn".to_string(),
                    code: Some("CTR-1".to_string()),
                    contract_type: "Supply".to_string(),
                    value: dec!(1500000),
                    payment_terms: "Net 30".to_string(),
                    start_date: "2026-01-01".to_string(),
                    end_date: "2026-12-31".to_string(),
                    seller_id: None,
                    seller_name: None,
                    buyer_id: Some("b1".to_string()),
                    buyer_name: Some("Meridian Retail".to_string()),
                },
                actor: seller.clone(),
                at: Utc::now(),
            })
            .await
            .unwrap();

        for (number, submit) in [("INV-1", true), ("INV-2", true), ("INV-3", false)] {
            engine
                .dispatch(Action::CreateInvoice {
                    number: number.to_string(),
                    input: NewInvoice {
                        invoice_number: Some(number.to_string()),
                        total_amount: dec!(200000),
                        buyer_name: "Meridian Retail".to_string(),
                        seller_name: "Asha Textiles".to_string(),
                        due_date: "2026-12-01".to_string(),
                        issue_date: None,
                        contract_id: Some("c1".to_string()),
                        project_id: None,
                        description: None,
                        submit,
                    },
                    actor: seller.clone(),
                    at: Utc::now(),
                })
                .await
                .unwrap();
        }

        engine
            .dispatch(Action::DecideInvoice {
                number: "INV-1".to_string(),
                decision: Decision::Approve,
                comment: None,
                actor: buyer,
                at: Utc::now(),
            })
            .await
            .unwrap();
        engine
    }

    #[tokio::test]
    async fn test_rebuild_is_idempotent() {
        let engine = engine_with_activity().await;
        for role in Role::ALL {
            let first = load_dashboard(engine.pool(), role).await.unwrap();
            let second = load_dashboard(engine.pool(), role).await.unwrap();
            assert_eq!(first, second);
        }
    }

    #[tokio::test]
    async fn test_pending_actions_per_role() {
        let engine = engine_with_activity().await;
        let state = engine.state().await.unwrap();

        // Draft INV-3
        assert_eq!(build_dashboard(&state, Role::Seller).summary.pending_actions, 1);
        // Contract CTR-1 and INV-2
        assert_eq!(build_dashboard(&state, Role::Buyer).summary.pending_actions, 2);
        // Contract CTR-1
        assert_eq!(build_dashboard(&state, Role::Admin).summary.pending_actions, 1);
        // Opportunity on INV-1
        assert_eq!(build_dashboard(&state, Role::Financier).summary.pending_actions, 1);
    }

    #[tokio::test]
    async fn test_financier_sees_only_released_items() {
        let engine = engine_with_activity().await;
        let dashboard = load_dashboard(engine.pool(), Role::Financier).await.unwrap();

        assert!(dashboard.contracts.is_empty());
        assert_eq!(dashboard.invoices.len(), 1);
        assert_eq!(dashboard.invoices[0].invoice_number, "INV-1");
        assert_eq!(dashboard.opportunities.len(), 1);
        assert_eq!(dashboard.summary.total_value, dec!(200000));
        assert_eq!(dashboard.summary.unread_notifications, 1);

        let buyer = load_dashboard(engine.pool(), Role::Buyer).await.unwrap();
        assert!(buyer.opportunities.is_empty());
        assert_eq!(buyer.invoices.len(), 2);
        // Newest first
        assert!(buyer.notifications[0].id > buyer.notifications[1].id);
    }

    #[tokio::test]
    async fn test_sparse_contract_blob_is_visible_by_status() {
        let pool = StorePool::in_memory();
        pool.set_raw(
            keys::CONTRACTS,
            r#"[{"id":"c1","contractTitle":"Steel supply","contractCode":"CTR-1",
                "contractValue":2500000,"startDate":"2026-01-01","endDate":"2026-12-31",
                "contractStatus":"Pending"}]"#,
        )
        .await
        .unwrap();

        let seller = load_dashboard(&pool, Role::Seller).await.unwrap();
        assert_eq!(seller.contracts.len(), 1);

        let buyer = load_dashboard(&pool, Role::Buyer).await.unwrap();
        assert_eq!(buyer.contracts.len(), 1);
        assert_eq!(buyer.summary.pending_actions, 1);

        let financier = load_dashboard(&pool, Role::Financier).await.unwrap();
        assert!(financier.contracts.is_empty());
    }

    #[test]
    fn test_summary_totals_saturate() {
        let total = saturating_sum([Decimal::MAX, Decimal::MAX, dec!(1)].into_iter());
        assert_eq!(total, Decimal::MAX);
        assert_eq!(saturating_sum([dec!(1.5), dec!(2.25)].into_iter()), dec!(3.75));
    }
}
