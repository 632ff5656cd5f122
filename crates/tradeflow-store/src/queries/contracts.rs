//! Contract collection queries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::client::{StoreError, StorePool, StoreResult};
use crate::keys;

/// A contract as stored under the `contracts` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRow {
    pub id: String,
    pub contract_title: String,
    pub contract_code: String,
    #[serde(default)]
    pub contract_type: String,
    pub contract_value: Decimal,
    #[serde(default)]
    pub payment_terms: String,
    pub start_date: String,
    pub end_date: String,
    pub contract_status: String,
    #[serde(default)]
    pub seller_id: Option<String>,
    #[serde(default)]
    pub seller_name: Option<String>,
    #[serde(default)]
    pub buyer_id: Option<String>,
    #[serde(default)]
    pub buyer_name: Option<String>,
    #[serde(default)]
    pub approval_history: Vec<ApprovalRow>,
    #[serde(default)]
    pub visible_to: Vec<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// One entry of a contract's approval trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRow {
    pub action: String,
    pub status: String,
    pub role: String,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    pub at: String,
}

pub async fn list_contracts(pool: &StorePool) -> StoreResult<Vec<ContractRow>> {
    pool.read_array(keys::CONTRACTS).await
}

pub async fn save_contracts(pool: &StorePool, rows: &[ContractRow]) -> StoreResult<()> {
    pool.write_array(keys::CONTRACTS, rows).await
}

pub async fn get_contract(pool: &StorePool, id: &str) -> StoreResult<ContractRow> {
    list_contracts(pool)
        .await?
        .into_iter()
        .find(|c| c.id == id || c.contract_code == id)
        .ok_or_else(|| StoreError::NotFound(format!("Contract not found: {}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_reads_sparse_blob() {
        let pool = StorePool::in_memory();
        pool.set_raw(
            keys::CONTRACTS,
            r#"[{"id":"c1","contractTitle":"Steel supply","contractCode":"CTR-1",
                "contractValue":2500000.5,"startDate":"2026-01-01","endDate":"2026-12-31",
                "contractStatus":"Pending"}]"#,
        )
        .await
        .unwrap();

        let row = get_contract(&pool, "CTR-1").await.unwrap();
        assert_eq!(row.id, "c1");
        assert_eq!(row.contract_value, dec!(2500000.5));
        assert!(row.approval_history.is_empty());
        assert!(row.visible_to.is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_contract() {
        let pool = StorePool::in_memory();
        let err = get_contract(&pool, "nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
