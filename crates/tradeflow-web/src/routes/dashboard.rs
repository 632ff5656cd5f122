//! Role dashboard handler.

use axum::{
    extract::{Path, State},
    Json,
};
use tradeflow_core::dashboard::{self, Dashboard};

use super::{api_error, parse_role, ApiError};
use crate::state::AppState;

pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> Result<Json<Dashboard>, ApiError> {
    let role = parse_role(&role)?;
    let dashboard = dashboard::load_dashboard(state.pool(), role)
        .await
        .map_err(api_error)?;
    Ok(Json(dashboard))
}
