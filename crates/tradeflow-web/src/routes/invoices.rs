//! Invoice route handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tradeflow_core::funding::model::FundingQuote;
use tradeflow_core::invoice::{
    self,
    model::{Invoice, NewInvoice},
};

use super::{actor_from_headers, api_error, ApiError, DecisionRequest, RoleQuery};
use crate::state::AppState;

/// Funding terms as sent by a financier. Tenure defaults to the due date.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingRequest {
    pub discount_rate: Decimal,
    #[serde(default)]
    pub tenure_days: Option<u32>,
}

pub async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<RoleQuery>,
) -> Result<Json<Vec<Invoice>>, ApiError> {
    let invoices = match query.role()? {
        Some(role) => invoice::list_for_role(state.pool(), role).await,
        None => invoice::list_invoices(state.pool()).await,
    }
    .map_err(api_error)?;
    Ok(Json(invoices))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<Invoice>, ApiError> {
    let invoice = invoice::get_invoice(state.pool(), &number).await.map_err(api_error)?;
    Ok(Json(invoice))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewInvoice>,
) -> Result<(StatusCode, Json<Invoice>), ApiError> {
    let actor = actor_from_headers(&headers)?;
    let invoice = invoice::create_invoice(&state.engine, &actor, req)
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

pub async fn submit_invoice(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(number): Path<String>,
) -> Result<Json<Invoice>, ApiError> {
    let actor = actor_from_headers(&headers)?;
    let invoice = invoice::submit_invoice(&state.engine, &actor, &number)
        .await
        .map_err(api_error)?;
    Ok(Json(invoice))
}

pub async fn decide_invoice(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(number): Path<String>,
    Json(req): Json<DecisionRequest>,
) -> Result<Json<Invoice>, ApiError> {
    let actor = actor_from_headers(&headers)?;
    let invoice = invoice::decide_invoice(
        &state.engine,
        &actor,
        &number,
        req.decision,
        req.comment.as_deref(),
    )
    .await
    .map_err(api_error)?;
    Ok(Json(invoice))
}

/// Price funding without committing.
pub async fn quote_invoice(
    State(state): State<AppState>,
    Path(number): Path<String>,
    Json(req): Json<FundingRequest>,
) -> Result<Json<FundingQuote>, ApiError> {
    let quote = invoice::quote_funding(
        state.pool(),
        &number,
        req.discount_rate,
        req.tenure_days,
        Utc::now().date_naive(),
    )
    .await
    .map_err(api_error)?;
    Ok(Json(quote))
}

pub async fn fund_invoice(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(number): Path<String>,
    Json(req): Json<FundingRequest>,
) -> Result<Json<Invoice>, ApiError> {
    let actor = actor_from_headers(&headers)?;
    let current = invoice::get_invoice(state.pool(), &number).await.map_err(api_error)?;
    let terms = invoice::terms_for(
        &current,
        req.discount_rate,
        req.tenure_days,
        Utc::now().date_naive(),
    )
    .map_err(api_error)?;
    let invoice = invoice::fund_invoice(&state.engine, &actor, &number, terms)
        .await
        .map_err(api_error)?;
    Ok(Json(invoice))
}

pub async fn settle_invoice(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(number): Path<String>,
) -> Result<Json<Invoice>, ApiError> {
    let actor = actor_from_headers(&headers)?;
    let invoice = invoice::settle_invoice(&state.engine, &actor, &number)
        .await
        .map_err(api_error)?;
    Ok(Json(invoice))
}
