//! Funded invoices and the financier marketplace.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tradeflow_core::funding::{
    self,
    model::{FundedInvoice, Opportunity},
    PortfolioSummary,
};

use super::{api_error, ApiError};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundedResponse {
    pub funded_invoices: Vec<FundedInvoice>,
    pub summary: PortfolioSummary,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpportunityQuery {
    /// Include opportunities that were already funded.
    #[serde(default)]
    pub all: bool,
}

pub async fn list_funded(State(state): State<AppState>) -> Result<Json<FundedResponse>, ApiError> {
    let funded_invoices = funding::list_funded(state.pool()).await.map_err(api_error)?;
    let summary = funding::summarize_portfolio(&funded_invoices);
    Ok(Json(FundedResponse {
        funded_invoices,
        summary,
    }))
}

pub async fn list_opportunities(
    State(state): State<AppState>,
    Query(query): Query<OpportunityQuery>,
) -> Result<Json<Vec<Opportunity>>, ApiError> {
    let opportunities = funding::list_opportunities(state.pool(), !query.all)
        .await
        .map_err(api_error)?;
    Ok(Json(opportunities))
}
