//! Demo data.
//!
//! Everything is created through real workflow actions so notifications,
//! queues and opportunities line up with what users would produce.

use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::account::{self, model::NewClient};
use crate::contract::{self, model::NewContract};
use crate::error::{TradeflowError, TradeflowResult};
use crate::funding::model::FundingTerms;
use crate::invoice::{self, model::NewInvoice};
use crate::project::{self, model::{Milestone, NewProject}};
use crate::role::{Actor, Role};
use crate::workflow::{Decision, Engine};

const SELLER: &str = "Asha Textiles";
const BUYER: &str = "Meridian Retail";
const FINANCIER: &str = "Northwind Capital";
const BUYER_ID: &str = "buyer-meridian";
const SELLER_ID: &str = "seller-asha";

/// What `seed_demo` created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedReport {
    pub clients: usize,
    pub contracts: usize,
    pub projects: usize,
    pub invoices: usize,
    pub funded: usize,
}

fn date(base: NaiveDate, days: u64) -> String {
    base.checked_add_days(Days::new(days))
        .unwrap_or(base)
        .format("%Y-%m-%d")
        .to_string()
}

fn rupees(amount: i64) -> Decimal {
    Decimal::from(amount)
}

/// Populate an empty store with a small marketplace.
pub async fn seed_demo(engine: &Engine) -> TradeflowResult<SeedReport> {
    let pool = engine.pool();
    let existing = engine.state().await?;
    if !existing.contracts.is_empty() || !existing.invoices.is_empty() {
        return Err(TradeflowError::validation(
            "Store already has data; run 'tradeflow reset' first",
        ));
    }

    let admin = Actor::named(Role::Admin, "Platform Ops");
    let seller = Actor::named(Role::Seller, SELLER);
    let buyer = Actor::named(Role::Buyer, BUYER);
    let financier = Actor::named(Role::Financier, FINANCIER);
    let today = Utc::now().date_naive();
    let mut report = SeedReport::default();

    for (name, role, email) in [
        (SELLER, Role::Seller, "accounts@asha.example"),
        (BUYER, Role::Buyer, "payables@meridian.example"),
        (FINANCIER, Role::Financier, "desk@northwind.example"),
    ] {
        account::add_client(
            pool,
            &admin,
            NewClient {
                name: name.to_string(),
                email: Some(email.to_string()),
                role,
                company: Some(name.to_string()),
            },
        )
        .await?;
        report.clients += 1;
    }

    let contract_input = |code: &str, title: &str, value: i64| NewContract {
        title: title.to_string(),
        code: Some(code.to_string()),
        contract_type: "Supply".to_string(),
        value: rupees(value),
        payment_terms: "Net 60".to_string(),
        start_date: date(today, 0),
        end_date: date(today, 365),
        seller_id: Some(SELLER_ID.to_string()),
        seller_name: Some(SELLER.to_string()),
        buyer_id: Some(BUYER_ID.to_string()),
        buyer_name: Some(BUYER.to_string()),
    };

    let approved = contract::create_contract(
        engine,
        &seller,
        contract_input("CTR-2026-001", "Cotton fabric annual supply", 45_000_000),
    )
    .await?;
    contract::decide_contract(engine, &buyer, &approved.id, Decision::Approve, Some("Terms agreed")).await?;

    contract::create_contract(
        engine,
        &seller,
        contract_input("CTR-2026-002", "Denim rolls Q3", 8_500_000),
    )
    .await?;

    let sent_back = contract::create_contract(
        engine,
        &seller,
        contract_input("CTR-2026-003", "Packaging material", 650_000),
    )
    .await?;
    contract::decide_contract(
        engine,
        &buyer,
        &sent_back.id,
        Decision::RequestModification,
        Some("Please move to Net 45"),
    )
    .await?;
    report.contracts = 3;

    let project = project::create_project(
        engine,
        &seller,
        NewProject {
            title: "Dyeing unit expansion".to_string(),
            code: Some("PRJ-2026-001".to_string()),
            value: rupees(12_000_000),
            milestones: vec![
                Milestone {
                    title: "Civil works".to_string(),
                    amount: rupees(4_000_000),
                    due_date: Some(date(today, 60)),
                    completed: false,
                },
                Milestone {
                    title: "Machinery install".to_string(),
                    amount: rupees(8_000_000),
                    due_date: Some(date(today, 150)),
                    completed: false,
                },
            ],
            buyer_id: Some(BUYER_ID.to_string()),
            contract_id: Some(approved.id.clone()),
            seller_id: Some(SELLER_ID.to_string()),
        },
    )
    .await?;
    project::decide_project(engine, &admin, &project.id, Decision::Approve, None).await?;
    report.projects = 1;

    let invoice_input = |number: &str, amount: i64, due_in: u64, submit: bool| NewInvoice {
        invoice_number: Some(number.to_string()),
        total_amount: rupees(amount),
        buyer_name: BUYER.to_string(),
        seller_name: SELLER.to_string(),
        due_date: date(today, due_in),
        issue_date: Some(date(today, 0)),
        contract_id: Some(approved.id.clone()),
        project_id: None,
        description: Some("Fabric dispatch".to_string()),
        submit,
    };

    for number in ["INV-DEMO-001", "INV-DEMO-002"] {
        invoice::create_invoice(engine, &seller, invoice_input(number, 2_500_000, 90, true)).await?;
        invoice::decide_invoice(engine, &buyer, number, Decision::Approve, None).await?;
    }
    invoice::fund_invoice(
        engine,
        &financier,
        "INV-DEMO-001",
        FundingTerms::new(rupees(12), 90)?,
    )
    .await?;
    report.funded = 1;

    invoice::create_invoice(engine, &seller, invoice_input("INV-DEMO-003", 780_000, 45, true)).await?;
    invoice::create_invoice(engine, &seller, invoice_input("INV-DEMO-004", 120_000, 30, false)).await?;
    report.invoices = 4;

    info!(?report, "Demo data seeded");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::ContractStatus;
    use crate::dashboard::build_dashboard;
    use crate::invoice::model::InvoiceStatus;
    use tradeflow_store::StorePool;

    #[tokio::test]
    async fn test_seed_builds_consistent_marketplace() {
        let engine = Engine::new(StorePool::in_memory());
        let report = seed_demo(&engine).await.unwrap();
        assert_eq!(report.contracts, 3);
        assert_eq!(report.invoices, 4);

        let state = engine.state().await.unwrap();
        assert!(state.contracts.iter().all(|c| c.visibility_consistent()));
        assert_eq!(
            state.find_contract("CTR-2026-003").unwrap().status,
            ContractStatus::ModificationRequested
        );
        assert_eq!(
            state.find_invoice("INV-DEMO-001").unwrap().status,
            InvoiceStatus::Funded
        );
        assert_eq!(state.buyer_queues[BUYER_ID].len(), 1);

        let financier = build_dashboard(&state, Role::Financier);
        assert_eq!(financier.opportunities.len(), 1);
        assert_eq!(financier.opportunities[0].invoice_number, "INV-DEMO-002");
    }

    #[tokio::test]
    async fn test_seed_refuses_non_empty_store() {
        let engine = Engine::new(StorePool::in_memory());
        seed_demo(&engine).await.unwrap();
        assert!(seed_demo(&engine).await.is_err());
    }
}
