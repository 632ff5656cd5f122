//! Notification collection queries.

use serde::{Deserialize, Serialize};

use crate::client::{StorePool, StoreResult};
use crate::keys;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRow {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub for_roles: Vec<String>,
    pub priority: String,
    #[serde(default)]
    pub entity_id: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub read: bool,
}

pub async fn list_notifications(pool: &StorePool) -> StoreResult<Vec<NotificationRow>> {
    pool.read_array(keys::NOTIFICATIONS).await
}

pub async fn save_notifications(pool: &StorePool, rows: &[NotificationRow]) -> StoreResult<()> {
    pool.write_array(keys::NOTIFICATIONS, rows).await
}

/// Notifications addressed to a role, newest first.
pub async fn list_notifications_for_role(
    pool: &StorePool,
    role: &str,
) -> StoreResult<Vec<NotificationRow>> {
    let mut rows: Vec<NotificationRow> = list_notifications(pool)
        .await?
        .into_iter()
        .filter(|n| n.for_roles.iter().any(|r| r.eq_ignore_ascii_case(role)))
        .collect();
    rows.reverse();
    Ok(rows)
}
