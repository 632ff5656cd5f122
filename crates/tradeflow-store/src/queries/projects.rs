//! Project collection queries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::client::{StoreError, StorePool, StoreResult};
use crate::keys;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRow {
    pub id: String,
    pub project_title: String,
    pub project_code: String,
    pub project_value: Decimal,
    #[serde(default)]
    pub milestones: Vec<MilestoneRow>,
    pub status: String,
    #[serde(default)]
    pub buyer_id: Option<String>,
    #[serde(default)]
    pub contract_id: Option<String>,
    #[serde(default)]
    pub seller_id: Option<String>,
    #[serde(default)]
    pub financier_id: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneRow {
    pub title: String,
    pub amount: Decimal,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub status: String,
}

pub async fn list_projects(pool: &StorePool) -> StoreResult<Vec<ProjectRow>> {
    pool.read_array(keys::PROJECTS).await
}

pub async fn save_projects(pool: &StorePool, rows: &[ProjectRow]) -> StoreResult<()> {
    pool.write_array(keys::PROJECTS, rows).await
}

pub async fn get_project(pool: &StorePool, id: &str) -> StoreResult<ProjectRow> {
    list_projects(pool)
        .await?
        .into_iter()
        .find(|p| p.id == id || p.project_code == id)
        .ok_or_else(|| StoreError::NotFound(format!("Project not found: {}", id)))
}
