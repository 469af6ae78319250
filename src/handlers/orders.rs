use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::{
    created_response, success_response, validate_input, PaginatedResponse, PaginationParams,
};
use crate::{
    entities::sales_order::OrderStatus,
    errors::ApiError,
    handlers::AppState,
    services::orders::{NewOrder, NewOrderItem},
};

// Request and response DTOs

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateOrderItemRequest {
    pub product_id: Uuid,
    pub quantity: Decimal,
    /// Defaults to the product's list price
    pub unit_price: Option<Decimal>,
    #[serde(default)]
    pub discount: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub client_id: Uuid,

    #[validate(length(min = 1, message = "Order must contain at least one item"))]
    pub items: Vec<CreateOrderItemRequest>,

    #[serde(default)]
    pub discount: Decimal,

    pub notes: Option<String>,
    pub shipping_address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderListFilter {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    pub client_id: Option<Uuid>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

// Handler functions

/// Create a new sales order
async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let items = payload
        .items
        .into_iter()
        .map(|item| NewOrderItem {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            discount: item.discount,
            notes: item.notes,
        })
        .collect();

    let created = state
        .services
        .orders
        .create_order(NewOrder {
            client_id: payload.client_id,
            items,
            discount: payload.discount,
            notes: payload.notes,
            shipping_address: payload.shipping_address,
        })
        .await?;

    info!(
        "Order created: {} ({})",
        created.order.order_number, created.order.id
    );

    Ok(created_response(serde_json::json!({
        "id": created.order.id,
        "order_number": created.order.order_number,
        "total": created.order.total,
        "items": created.items.len(),
        "message": "Order created successfully"
    })))
}

/// Get an order with its items
async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let found = state
        .services
        .orders
        .get_order(&order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order with ID {} not found", order_id)))?;

    Ok(success_response(serde_json::json!({
        "order": found.order,
        "items": found.items,
    })))
}

/// List orders
async fn list_orders(
    State(state): State<AppState>,
    Query(filter): Query<OrderListFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let pagination = PaginationParams::new(filter.page, filter.per_page);
    let page = pagination.page();
    let per_page = pagination.per_page();

    let (orders, total) = state
        .services
        .orders
        .list_orders(page, per_page, filter.status, filter.client_id)
        .await?;

    Ok(success_response(PaginatedResponse::new(
        orders, page, per_page, total,
    )))
}

/// Complete an order, decrementing stock for every line
async fn complete_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state.services.orders.complete_order(order_id).await?;
    Ok(success_response(order))
}

/// Cancel an order that has not shipped
async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state.services.orders.cancel_order(order_id).await?;
    Ok(success_response(order))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order))
        .route("/", get(list_orders))
        .route("/:id", get(get_order))
        .route("/:id/complete", post(complete_order))
        .route("/:id/cancel", post(cancel_order))
}
