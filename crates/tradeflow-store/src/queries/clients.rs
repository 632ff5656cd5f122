//! Admin-managed client registry (`activeClients`).

use serde::{Deserialize, Serialize};

use crate::client::{StorePool, StoreResult};
use crate::keys;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub joined_at: String,
}

fn default_active() -> bool {
    true
}

pub async fn list_clients(pool: &StorePool) -> StoreResult<Vec<ClientRow>> {
    pool.read_array(keys::ACTIVE_CLIENTS).await
}

pub async fn save_clients(pool: &StorePool, rows: &[ClientRow]) -> StoreResult<()> {
    pool.write_array(keys::ACTIVE_CLIENTS, rows).await
}
