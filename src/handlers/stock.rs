use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::{created_response, success_response, validate_input, PaginatedResponse,
    PaginationParams};
use crate::{
    costing::MovementDirection,
    errors::ApiError,
    handlers::AppState,
    services::stock::NewMovement,
};

// Request and response DTOs

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordMovementRequest {
    pub product_id: Uuid,

    /// "inbound", "outbound" or "adjustment"
    #[schema(value_type = String, example = "inbound")]
    pub direction: MovementDirection,

    /// Must be strictly positive; an inbound of zero has no cost basis
    pub quantity: Decimal,

    /// Acquisition cost per unit, used by inbound movements to reprice the
    /// product at the quantity-weighted average
    pub unit_cost: Option<Decimal>,

    pub supplier_id: Option<Uuid>,

    #[validate(length(max = 200, message = "Reason cannot exceed 200 characters"))]
    pub reason: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MovementListFilter {
    pub product_id: Option<Uuid>,
    pub direction: Option<MovementDirection>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

// Handler functions

/// Record a stock movement
#[utoipa::path(
    post,
    path = "/api/v1/stock/movements",
    request_body = RecordMovementRequest,
    responses(
        (status = 201, description = "Movement recorded and applied to the product"),
        (status = 400, description = "Invalid quantity or unit cost", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product or supplier not found", body = crate::errors::ErrorResponse)
    ),
    tag = "stock"
)]
pub async fn record_movement(
    State(state): State<AppState>,
    Json(payload): Json<RecordMovementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let movement = state
        .services
        .stock
        .record_movement(NewMovement {
            product_id: payload.product_id,
            direction: payload.direction,
            quantity: payload.quantity,
            unit_cost: payload.unit_cost,
            supplier_id: payload.supplier_id,
            reason: payload.reason,
            notes: payload.notes,
        })
        .await?;

    Ok(created_response(movement))
}

/// Get a movement by ID
pub async fn get_movement(
    State(state): State<AppState>,
    Path(movement_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let movement = state
        .services
        .stock
        .get_movement(&movement_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Movement with ID {} not found", movement_id))
        })?;

    Ok(success_response(movement))
}

/// Movement history, newest first
#[utoipa::path(
    get,
    path = "/api/v1/stock/movements",
    params(
        ("product_id" = Option<Uuid>, Query, description = "Filter by product"),
        ("direction" = Option<String>, Query, description = "Filter by direction"),
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Paginated movement history")
    ),
    tag = "stock"
)]
pub async fn list_movements(
    State(state): State<AppState>,
    Query(filter): Query<MovementListFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let pagination = PaginationParams::new(filter.page, filter.per_page);
    let page = pagination.page();
    let per_page = pagination.per_page();

    let (movements, total) = state
        .services
        .stock
        .list_movements(page, per_page, filter.product_id, filter.direction)
        .await?;

    Ok(success_response(PaginatedResponse::new(
        movements, page, per_page, total,
    )))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/movements", post(record_movement))
        .route("/movements", get(list_movements))
        .route("/movements/:id", get(get_movement))
}
