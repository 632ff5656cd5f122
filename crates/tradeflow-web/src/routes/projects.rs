//! Project route handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tradeflow_core::project::{
    self,
    model::{NewProject, Project},
};

use super::{actor_from_headers, api_error, ApiError, DecisionRequest, RoleQuery};
use crate::state::AppState;

pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<RoleQuery>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = match query.role()? {
        Some(role) => project::list_for_role(state.pool(), role).await,
        None => project::list_projects(state.pool()).await,
    }
    .map_err(api_error)?;
    Ok(Json(projects))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let project = project::get_project(state.pool(), &id).await.map_err(api_error)?;
    Ok(Json(project))
}

pub async fn create_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewProject>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let actor = actor_from_headers(&headers)?;
    let project = project::create_project(&state.engine, &actor, req)
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn decide_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<DecisionRequest>,
) -> Result<Json<Project>, ApiError> {
    let actor = actor_from_headers(&headers)?;
    let project = project::decide_project(
        &state.engine,
        &actor,
        &id,
        req.decision,
        req.comment.as_deref(),
    )
    .await
    .map_err(api_error)?;
    Ok(Json(project))
}

pub async fn activate_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let actor = actor_from_headers(&headers)?;
    let project = project::activate_project(&state.engine, &actor, &id)
        .await
        .map_err(api_error)?;
    Ok(Json(project))
}

pub async fn finance_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let actor = actor_from_headers(&headers)?;
    let project = project::finance_project(&state.engine, &actor, &id)
        .await
        .map_err(api_error)?;
    Ok(Json(project))
}
