//! Project lifecycle and financing.

pub mod model;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{TradeflowError, TradeflowResult};
use crate::role::{Actor, Role};
use crate::workflow::{Action, Decision, Engine};
use model::{NewProject, Project};
use tradeflow_store::projects as queries;
use tradeflow_store::{StoreError, StorePool};

/// Submit a project for approval.
pub async fn create_project(
    engine: &Engine,
    actor: &Actor,
    input: NewProject,
) -> TradeflowResult<Project> {
    let id = Uuid::new_v4().to_string();
    let state = engine
        .dispatch(Action::CreateProject {
            id: id.clone(),
            input,
            actor: actor.clone(),
            at: Utc::now(),
        })
        .await?;
    state
        .find_project(&id)
        .cloned()
        .ok_or(TradeflowError::ProjectNotFound(id))
}

/// Approve or reject a pending project.
pub async fn decide_project(
    engine: &Engine,
    actor: &Actor,
    id: &str,
    decision: Decision,
    comment: Option<&str>,
) -> TradeflowResult<Project> {
    dispatch_and_get(
        engine,
        id,
        Action::DecideProject {
            id: id.to_string(),
            decision,
            comment: comment.map(str::to_string),
            actor: actor.clone(),
            at: Utc::now(),
        },
    )
    .await
}

/// Mark an approved project as started.
pub async fn activate_project(engine: &Engine, actor: &Actor, id: &str) -> TradeflowResult<Project> {
    dispatch_and_get(
        engine,
        id,
        Action::ActivateProject {
            id: id.to_string(),
            actor: actor.clone(),
            at: Utc::now(),
        },
    )
    .await
}

/// Finance an approved or active project.
pub async fn finance_project(engine: &Engine, actor: &Actor, id: &str) -> TradeflowResult<Project> {
    dispatch_and_get(
        engine,
        id,
        Action::FinanceProject {
            id: id.to_string(),
            actor: actor.clone(),
            at: Utc::now(),
        },
    )
    .await
}

async fn dispatch_and_get(engine: &Engine, id: &str, action: Action) -> TradeflowResult<Project> {
    let state = engine.dispatch(action).await?;
    state
        .find_project(id)
        .cloned()
        .ok_or_else(|| TradeflowError::ProjectNotFound(id.to_string()))
}

/// Get a project by id or code.
pub async fn get_project(pool: &StorePool, id: &str) -> TradeflowResult<Project> {
    match queries::get_project(pool, id).await {
        Ok(row) => Ok(Project::from_row(row)),
        Err(StoreError::NotFound(_)) => Err(TradeflowError::ProjectNotFound(id.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// List all projects.
pub async fn list_projects(pool: &StorePool) -> TradeflowResult<Vec<Project>> {
    let rows = queries::list_projects(pool).await?;
    Ok(rows.into_iter().map(Project::from_row).collect())
}

/// List projects a role may see.
pub async fn list_for_role(pool: &StorePool, role: Role) -> TradeflowResult<Vec<Project>> {
    Ok(list_projects(pool)
        .await?
        .into_iter()
        .filter(|p| p.is_visible_to(role))
        .collect())
}
