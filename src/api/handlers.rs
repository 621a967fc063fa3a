use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::api::{ApiError, AppState};
use crate::dashboard::SummaryStats;
use crate::export::write_purchases;
use crate::models::{PurchaseFilter, PurchaseRecord};
use crate::storage::DatasetStore;

pub const DEFAULT_LIMIT: usize = 100;
pub const MAX_LIMIT: usize = 1000;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct PageParams {
    pub limit: Option<usize>,
    pub offset: usize
}

impl PageParams {
    pub fn limit(&self) -> Result<usize, ApiError> {
        match self.limit {
            None => Ok(DEFAULT_LIMIT),
            Some(limit) if (1..=MAX_LIMIT).contains(&limit) => Ok(limit),
            Some(limit) => Err(ApiError::bad_request(format!("limit must be between 1 and {MAX_LIMIT}, got {limit}")))
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PurchasePage {
    pub purchases: Vec<PurchaseRecord>,
    /// Records on this page.
    pub count: usize,
    /// Records matching the filter across all pages.
    pub total: usize
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to Purchase Tracker API" }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub async fn list_purchases(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
    Query(filter): Query<PurchaseFilter>
) -> Result<Json<PurchasePage>, ApiError> {
    let limit = page.limit()?;
    let matching = state.store.lock().await.query_all(&filter)?;
    let total = matching.len();

    let purchases: Vec<PurchaseRecord> = matching.into_iter()
        .skip(page.offset)
        .take(limit)
        .collect();

    debug!("Listing {} of {total} purchases from offset {}", purchases.len(), page.offset);

    Ok(Json(PurchasePage { count: purchases.len(), purchases, total }))
}

pub async fn get_purchase(
    State(state): State<AppState>,
    Path(order_id): Path<String>
) -> Result<Json<PurchaseRecord>, ApiError> {
    state.store.lock().await
        .get(&order_id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(&order_id))
}

pub async fn summary_stats(
    State(state): State<AppState>,
    Query(filter): Query<PurchaseFilter>
) -> Result<Json<SummaryStats>, ApiError> {
    let records = state.store.lock().await.query_all(&filter)?;

    Ok(Json(SummaryStats::compute(&records, filter.currency)))
}

pub async fn export_purchases(
    State(state): State<AppState>,
    Query(filter): Query<PurchaseFilter>
) -> Result<impl IntoResponse, ApiError> {
    let records = state.store.lock().await.query_all(&filter)?;
    let mut body = Vec::new();

    write_purchases(&records, &mut body)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"purchases.csv\"")
        ],
        body
    ))
}
