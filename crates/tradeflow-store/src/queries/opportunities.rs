//! Financier marketplace feed, stored under `financierNotifications`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::client::{StorePool, StoreResult};
use crate::keys;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityRow {
    pub id: String,
    pub invoice_number: String,
    pub amount: Decimal,
    pub buyer_name: String,
    pub seller_name: String,
    pub due_date: String,
    pub created_at: String,
    #[serde(default = "default_open")]
    pub open: bool,
}

fn default_open() -> bool {
    true
}

pub async fn list_opportunities(pool: &StorePool) -> StoreResult<Vec<OpportunityRow>> {
    pool.read_array(keys::FINANCIER_NOTIFICATIONS).await
}

pub async fn save_opportunities(pool: &StorePool, rows: &[OpportunityRow]) -> StoreResult<()> {
    pool.write_array(keys::FINANCIER_NOTIFICATIONS, rows).await
}
