//! Signed-in user details (`userDetails`).

use serde::{Deserialize, Serialize};

use crate::client::{StorePool, StoreResult};
use crate::keys;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailsRow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: String,
    #[serde(default)]
    pub company: Option<String>,
}

pub async fn get_user_details(pool: &StorePool) -> StoreResult<Option<UserDetailsRow>> {
    pool.read_value(keys::USER_DETAILS).await
}

pub async fn save_user_details(pool: &StorePool, row: &UserDetailsRow) -> StoreResult<()> {
    pool.write_value(keys::USER_DETAILS, row).await
}

pub async fn clear_user_details(pool: &StorePool) -> StoreResult<()> {
    pool.remove(keys::USER_DETAILS).await
}
