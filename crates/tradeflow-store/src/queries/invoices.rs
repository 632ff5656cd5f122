//! Invoice collection queries. Invoices are keyed by invoice number.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::client::{StoreError, StorePool, StoreResult};
use crate::keys;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRow {
    pub invoice_number: String,
    pub status: String,
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
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

pub async fn list_invoices(pool: &StorePool) -> StoreResult<Vec<InvoiceRow>> {
    pool.read_array(keys::INVOICES).await
}

pub async fn save_invoices(pool: &StorePool, rows: &[InvoiceRow]) -> StoreResult<()> {
    pool.write_array(keys::INVOICES, rows).await
}

pub async fn get_invoice(pool: &StorePool, invoice_number: &str) -> StoreResult<InvoiceRow> {
    list_invoices(pool)
        .await?
        .into_iter()
        .find(|i| i.invoice_number == invoice_number)
        .ok_or_else(|| StoreError::NotFound(format!("Invoice not found: {}", invoice_number)))
}
