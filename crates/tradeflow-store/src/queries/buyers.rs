//! Per-buyer pending contract queues (`buyer_pending_contracts_<id>`).

use crate::client::{StorePool, StoreResult};
use crate::keys;

pub async fn list_pending_contract_ids(pool: &StorePool, buyer_id: &str) -> StoreResult<Vec<String>> {
    pool.read_array(&keys::buyer_pending_contracts(buyer_id)).await
}

pub async fn save_pending_contract_ids(
    pool: &StorePool,
    buyer_id: &str,
    ids: &[String],
) -> StoreResult<()> {
    pool.write_array(&keys::buyer_pending_contracts(buyer_id), ids).await
}

/// Every buyer queue in the store, ordered by buyer id.
pub async fn list_queues(pool: &StorePool) -> StoreResult<Vec<(String, Vec<String>)>> {
    let mut queues = Vec::new();
    for key in pool.keys_with_prefix(keys::BUYER_PENDING_PREFIX).await? {
        if let Some(buyer_id) = keys::buyer_id_from_key(&key) {
            let ids: Vec<String> = pool.read_array(&key).await?;
            queues.push((buyer_id.to_string(), ids));
        }
    }
    Ok(queues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_queues() {
        let pool = StorePool::in_memory();
        save_pending_contract_ids(&pool, "b2", &["c3".to_string()]).await.unwrap();
        save_pending_contract_ids(&pool, "b1", &["c1".to_string(), "c2".to_string()])
            .await
            .unwrap();

        let queues = list_queues(&pool).await.unwrap();
        assert_eq!(queues.len(), 2);
        assert_eq!(queues[0].0, "b1");
        assert_eq!(queues[0].1, vec!["c1", "c2"]);
        assert_eq!(list_pending_contract_ids(&pool, "nobody").await.unwrap().len(), 0);
    }
}
