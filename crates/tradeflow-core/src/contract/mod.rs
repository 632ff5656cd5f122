//! Contract lifecycle.

pub mod model;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{TradeflowError, TradeflowResult};
use crate::role::{Actor, Role};
use crate::workflow::{Action, Decision, Engine};
use model::{Contract, ContractRevision, NewContract};
use tradeflow_store::buyers;
use tradeflow_store::contracts as queries;
use tradeflow_store::{StoreError, StorePool};

/// Submit a new contract for approval.
pub async fn create_contract(
    engine: &Engine,
    actor: &Actor,
    input: NewContract,
) -> TradeflowResult<Contract> {
    let id = Uuid::new_v4().to_string();
    let state = engine
        .dispatch(Action::CreateContract {
            id: id.clone(),
            input,
            actor: actor.clone(),
            at: Utc::now(),
        })
        .await?;
    state
        .find_contract(&id)
        .cloned()
        .ok_or(TradeflowError::ContractNotFound(id))
}

/// Approve, reject or send back a pending contract.
pub async fn decide_contract(
    engine: &Engine,
    actor: &Actor,
    id: &str,
    decision: Decision,
    comment: Option<&str>,
) -> TradeflowResult<Contract> {
    let state = engine
        .dispatch(Action::DecideContract {
            id: id.to_string(),
            decision,
            comment: comment.map(str::to_string),
            actor: actor.clone(),
            at: Utc::now(),
        })
        .await?;
    state
        .find_contract(id)
        .cloned()
        .ok_or_else(|| TradeflowError::ContractNotFound(id.to_string()))
}

/// Resubmit a contract after a modification request.
pub async fn revise_contract(
    engine: &Engine,
    actor: &Actor,
    id: &str,
    revision: ContractRevision,
    comment: Option<&str>,
) -> TradeflowResult<Contract> {
    let state = engine
        .dispatch(Action::ReviseContract {
            id: id.to_string(),
            revision,
            comment: comment.map(str::to_string),
            actor: actor.clone(),
            at: Utc::now(),
        })
        .await?;
    state
        .find_contract(id)
        .cloned()
        .ok_or_else(|| TradeflowError::ContractNotFound(id.to_string()))
}

/// Get a contract by id or code.
pub async fn get_contract(pool: &StorePool, id: &str) -> TradeflowResult<Contract> {
    match queries::get_contract(pool, id).await {
        Ok(row) => Ok(Contract::from_row(row)),
        Err(StoreError::NotFound(_)) => Err(TradeflowError::ContractNotFound(id.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// List all contracts.
pub async fn list_contracts(pool: &StorePool) -> TradeflowResult<Vec<Contract>> {
    let rows = queries::list_contracts(pool).await?;
    Ok(rows.into_iter().map(Contract::from_row).collect())
}

/// List contracts a role may see.
pub async fn list_for_role(pool: &StorePool, role: Role) -> TradeflowResult<Vec<Contract>> {
    Ok(list_contracts(pool)
        .await?
        .into_iter()
        .filter(|c| c.is_visible_to(role))
        .collect())
}

/// Contracts waiting in a buyer's queue, in queue order.
pub async fn pending_for_buyer(pool: &StorePool, buyer_id: &str) -> TradeflowResult<Vec<Contract>> {
    let ids = buyers::list_pending_contract_ids(pool, buyer_id).await?;
    let contracts = list_contracts(pool).await?;
    Ok(ids
        .iter()
        .filter_map(|id| contracts.iter().find(|c| &c.id == id).cloned())
        .collect())
}
