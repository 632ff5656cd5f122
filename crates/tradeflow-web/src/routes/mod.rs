//! Route handlers.

pub mod contracts;
pub mod dashboard;
pub mod funding;
pub mod internal;
pub mod invoices;
pub mod notifications;
pub mod projects;

use axum::http::{HeaderMap, StatusCode};
use serde::Deserialize;
use tradeflow_core::{Actor, Role, TradeflowError};
use tradeflow_core::workflow::Decision;

/// Header carrying the acting role.
pub const ROLE_HEADER: &str = "x-tradeflow-role";
/// Optional header carrying the acting party's name.
pub const USER_HEADER: &str = "x-tradeflow-user";

pub type ApiError = (StatusCode, String);

/// Map a domain error onto an HTTP status.
pub fn api_error(e: TradeflowError) -> ApiError {
    let status = match &e {
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        TradeflowError::InvalidStateTransition { .. } => StatusCode::CONFLICT,
        TradeflowError::Unauthorized { .. } => StatusCode::FORBIDDEN,
        TradeflowError::NotSignedIn => StatusCode::UNAUTHORIZED,
        TradeflowError::ValidationError(_)
        | TradeflowError::InvalidRole(_)
        | TradeflowError::Json(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

/// Parse a role from a path or query segment.
pub fn parse_role(value: &str) -> Result<Role, ApiError> {
    value.parse().map_err(api_error)
}

/// Who is calling, from the role and user headers.
pub fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, ApiError> {
    let role = headers
        .get(ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| api_error(TradeflowError::NotSignedIn))?;
    let role = parse_role(role)?;
    let name = headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    Ok(match name {
        Some(name) => Actor::named(role, name),
        None => Actor::new(role),
    })
}

/// Optional `?role=` filter.
#[derive(Debug, Default, Deserialize)]
pub struct RoleQuery {
    pub role: Option<String>,
}

impl RoleQuery {
    pub fn role(&self) -> Result<Option<Role>, ApiError> {
        self.role.as_deref().map(parse_role).transpose()
    }
}

/// Body of approve/reject/request-changes calls.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub decision: Decision,
    #[serde(default)]
    pub comment: Option<String>,
}
