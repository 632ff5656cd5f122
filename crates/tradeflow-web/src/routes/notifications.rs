//! Notification route handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use tradeflow_core::notification::{self, model::Notification};

use super::{actor_from_headers, api_error, parse_role, ApiError};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    pub role: Option<String>,
    #[serde(default)]
    pub unread: bool,
}

/// Notifications for `?role=`, or for the calling role when absent.
pub async fn list_notifications(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let role = match query.role.as_deref() {
        Some(role) => parse_role(role)?,
        None => actor_from_headers(&headers)?.role,
    };
    let notifications = notification::list_for_role(state.pool(), role, query.unread)
        .await
        .map_err(api_error)?;
    Ok(Json(notifications))
}

pub async fn mark_read(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let actor = actor_from_headers(&headers)?;
    notification::mark_read(&state.engine, &actor, &id)
        .await
        .map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let actor = actor_from_headers(&headers)?;
    notification::mark_all_read(&state.engine, &actor)
        .await
        .map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}
