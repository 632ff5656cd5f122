//! Invoice lifecycle: submission, buyer decision, funding, settlement.

pub mod model;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::contract::model::parse_date;
use crate::error::{TradeflowError, TradeflowResult};
use crate::funding::{self, model::FundingQuote, model::FundingTerms};
use crate::role::{Actor, Role};
use crate::workflow::{Action, Decision, Engine};
use model::{Invoice, InvoiceStatus, NewInvoice};
use tradeflow_store::invoices as queries;
use tradeflow_store::{StoreError, StorePool};

/// Create an invoice, as a draft or straight into the buyer's queue.
pub async fn create_invoice(
    engine: &Engine,
    actor: &Actor,
    input: NewInvoice,
) -> TradeflowResult<Invoice> {
    let number = match input.invoice_number.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => generate_invoice_number(),
    };
    let state = engine
        .dispatch(Action::CreateInvoice {
            number: number.clone(),
            input,
            actor: actor.clone(),
            at: Utc::now(),
        })
        .await?;
    state
        .find_invoice(&number)
        .cloned()
        .ok_or(TradeflowError::InvoiceNotFound(number))
}

fn generate_invoice_number() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "INV-{}-{}",
        Utc::now().format("%Y%m%d"),
        suffix[..6].to_uppercase()
    )
}

/// Send a draft invoice to the buyer.
pub async fn submit_invoice(engine: &Engine, actor: &Actor, number: &str) -> TradeflowResult<Invoice> {
    dispatch_and_get(
        engine,
        number,
        Action::SubmitInvoice {
            number: number.to_string(),
            actor: actor.clone(),
            at: Utc::now(),
        },
    )
    .await
}

/// Buyer approves or rejects an invoice.
pub async fn decide_invoice(
    engine: &Engine,
    actor: &Actor,
    number: &str,
    decision: Decision,
    comment: Option<&str>,
) -> TradeflowResult<Invoice> {
    dispatch_and_get(
        engine,
        number,
        Action::DecideInvoice {
            number: number.to_string(),
            decision,
            comment: comment.map(str::to_string),
            actor: actor.clone(),
            at: Utc::now(),
        },
    )
    .await
}

/// Financier funds an approved invoice.
pub async fn fund_invoice(
    engine: &Engine,
    actor: &Actor,
    number: &str,
    terms: FundingTerms,
) -> TradeflowResult<Invoice> {
    dispatch_and_get(
        engine,
        number,
        Action::FundInvoice {
            number: number.to_string(),
            terms,
            actor: actor.clone(),
            at: Utc::now(),
        },
    )
    .await
}

/// Buyer pays a funded invoice at maturity.
pub async fn settle_invoice(engine: &Engine, actor: &Actor, number: &str) -> TradeflowResult<Invoice> {
    dispatch_and_get(
        engine,
        number,
        Action::SettleInvoice {
            number: number.to_string(),
            actor: actor.clone(),
            at: Utc::now(),
        },
    )
    .await
}

async fn dispatch_and_get(engine: &Engine, number: &str, action: Action) -> TradeflowResult<Invoice> {
    let state = engine.dispatch(action).await?;
    state
        .find_invoice(number)
        .cloned()
        .ok_or_else(|| TradeflowError::InvoiceNotFound(number.to_string()))
}

/// Get an invoice by number.
pub async fn get_invoice(pool: &StorePool, number: &str) -> TradeflowResult<Invoice> {
    match queries::get_invoice(pool, number).await {
        Ok(row) => Ok(Invoice::from_row(row)),
        Err(StoreError::NotFound(_)) => Err(TradeflowError::InvoiceNotFound(number.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// List all invoices.
pub async fn list_invoices(pool: &StorePool) -> TradeflowResult<Vec<Invoice>> {
    let rows = queries::list_invoices(pool).await?;
    Ok(rows.into_iter().map(Invoice::from_row).collect())
}

/// List invoices a role may see.
pub async fn list_for_role(pool: &StorePool, role: Role) -> TradeflowResult<Vec<Invoice>> {
    Ok(list_invoices(pool)
        .await?
        .into_iter()
        .filter(|i| i.is_visible_to(role))
        .collect())
}

/// Price funding for an invoice without committing to it.
///
/// Without an explicit tenure the quote runs until the invoice due date.
pub async fn quote_funding(
    pool: &StorePool,
    number: &str,
    discount_rate: Decimal,
    tenure_days: Option<u32>,
    today: NaiveDate,
) -> TradeflowResult<FundingQuote> {
    let invoice = get_invoice(pool, number).await?;
    if invoice.status != InvoiceStatus::Approved {
        return Err(TradeflowError::validation(format!(
            "Invoice {} is {} and cannot be funded",
            invoice.invoice_number,
            invoice.status.as_str()
        )));
    }
    let terms = terms_for(&invoice, discount_rate, tenure_days, today)?;
    funding::quote(invoice.total_amount, &terms, today)
}

/// Build funding terms for an invoice, defaulting the tenure to its due date.
pub fn terms_for(
    invoice: &Invoice,
    discount_rate: Decimal,
    tenure_days: Option<u32>,
    today: NaiveDate,
) -> TradeflowResult<FundingTerms> {
    match tenure_days {
        Some(days) => FundingTerms::new(discount_rate, days),
        None => {
            let due = parse_date(&invoice.due_date, "due date")?;
            FundingTerms::until_due(discount_rate, today, due)
        }
    }
}
