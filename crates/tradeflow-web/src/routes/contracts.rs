//! Contract route handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use tradeflow_core::contract::{
    self,
    model::{Contract, ContractRevision, NewContract},
};

use super::{actor_from_headers, api_error, ApiError, DecisionRequest, RoleQuery};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionRequest {
    #[serde(flatten)]
    pub revision: ContractRevision,
    #[serde(default)]
    pub comment: Option<String>,
}

pub async fn list_contracts(
    State(state): State<AppState>,
    Query(query): Query<RoleQuery>,
) -> Result<Json<Vec<Contract>>, ApiError> {
    let contracts = match query.role()? {
        Some(role) => contract::list_for_role(state.pool(), role).await,
        None => contract::list_contracts(state.pool()).await,
    }
    .map_err(api_error)?;
    Ok(Json(contracts))
}

pub async fn get_contract(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Contract>, ApiError> {
    let contract = contract::get_contract(state.pool(), &id).await.map_err(api_error)?;
    Ok(Json(contract))
}

pub async fn create_contract(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewContract>,
) -> Result<(StatusCode, Json<Contract>), ApiError> {
    let actor = actor_from_headers(&headers)?;
    let contract = contract::create_contract(&state.engine, &actor, req)
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(contract)))
}

pub async fn decide_contract(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<DecisionRequest>,
) -> Result<Json<Contract>, ApiError> {
    let actor = actor_from_headers(&headers)?;
    let contract = contract::decide_contract(
        &state.engine,
        &actor,
        &id,
        req.decision,
        req.comment.as_deref(),
    )
    .await
    .map_err(api_error)?;
    Ok(Json(contract))
}

pub async fn revise_contract(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<RevisionRequest>,
) -> Result<Json<Contract>, ApiError> {
    let actor = actor_from_headers(&headers)?;
    let contract = contract::revise_contract(
        &state.engine,
        &actor,
        &id,
        req.revision,
        req.comment.as_deref(),
    )
    .await
    .map_err(api_error)?;
    Ok(Json(contract))
}

/// Contracts still waiting on a buyer, in queue order.
pub async fn pending_for_buyer(
    State(state): State<AppState>,
    Path(buyer_id): Path<String>,
) -> Result<Json<Vec<Contract>>, ApiError> {
    let contracts = contract::pending_for_buyer(state.pool(), &buyer_id)
        .await
        .map_err(api_error)?;
    Ok(Json(contracts))
}
