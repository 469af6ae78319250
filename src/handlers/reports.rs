use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;

use super::common::success_response;
use crate::{errors::ApiError, handlers::AppState};

#[derive(Debug, Deserialize)]
pub struct RecentMovementsQuery {
    pub limit: Option<u64>,
}

/// Dashboard statistics
#[utoipa::path(
    get,
    path = "/api/v1/reports/dashboard",
    responses(
        (status = 200, description = "Product counters, stock value and movement volume",
         body = crate::services::reports::DashboardStats)
    ),
    tag = "reports"
)]
pub async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let stats = state.services.reports.dashboard().await?;
    Ok(success_response(stats))
}

/// Stock valuation grouped by category
#[utoipa::path(
    get,
    path = "/api/v1/reports/stock-by-category",
    responses(
        (status = 200, description = "Per-category product count, quantity and value",
         body = [crate::services::reports::CategoryStockSummary])
    ),
    tag = "reports"
)]
pub async fn stock_by_category(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let summaries = state.services.reports.stock_by_category().await?;
    Ok(success_response(summaries))
}

/// Most recent stock movements
pub async fn recent_movements(
    State(state): State<AppState>,
    Query(query): Query<RecentMovementsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let movements = state.services.reports.recent_movements(limit).await?;
    Ok(success_response(movements))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/stock-by-category", get(stock_by_category))
        .route("/recent-movements", get(recent_movements))
}
