//! Funded invoice collection queries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::client::{StorePool, StoreResult};
use crate::keys;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundedInvoiceRow {
    pub invoice_number: String,
    pub total_amount: Decimal,
    pub discount_rate: Decimal,
    pub discount_amount: Decimal,
    pub net_amount: Decimal,
    pub expected_return: Decimal,
    /// Tenure in days.
    pub tenure: u32,
    pub funded_at: String,
    pub maturity_date: String,
    #[serde(default)]
    pub financier_name: Option<String>,
    pub buyer_name: String,
    pub seller_name: String,
    #[serde(default)]
    pub status: String,
}

pub async fn list_funded_invoices(pool: &StorePool) -> StoreResult<Vec<FundedInvoiceRow>> {
    pool.read_array(keys::FUNDED_INVOICES).await
}

pub async fn save_funded_invoices(pool: &StorePool, rows: &[FundedInvoiceRow]) -> StoreResult<()> {
    pool.write_array(keys::FUNDED_INVOICES, rows).await
}
