use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::{
    created_response, no_content_response, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    entities::product::StockUnit,
    errors::ApiError,
    handlers::AppState,
    services::products::{NewProduct, ProductPatch},
};

// Request and response DTOs

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    /// Omit to auto-generate the next PROD-XXXX code
    #[validate(length(max = 50, message = "SKU cannot exceed 50 characters"))]
    pub sku: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,

    pub description: Option<String>,
    pub category_id: Uuid,

    #[serde(default = "default_unit")]
    #[schema(value_type = String, example = "UN")]
    pub unit: StockUnit,

    pub price: Decimal,

    #[serde(default)]
    pub min_quantity: Decimal,

    #[validate(length(max = 10, message = "NCM cannot exceed 10 characters"))]
    pub ncm: Option<String>,

    #[validate(length(max = 13, message = "Barcode cannot exceed 13 characters"))]
    pub barcode: Option<String>,
}

fn default_unit() -> StockUnit {
    StockUnit::Un
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    #[schema(value_type = Option<String>, example = "UN")]
    pub unit: Option<StockUnit>,
    pub price: Option<Decimal>,
    pub min_quantity: Option<Decimal>,
    pub ncm: Option<String>,
    pub barcode: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ProductListFilter {
    pub category_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

// Handler functions

/// Create a new product
async fn create_product(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let product_id = state
        .services
        .products
        .create_product(NewProduct {
            sku: payload.sku,
            name: payload.name,
            description: payload.description,
            category_id: payload.category_id,
            unit: payload.unit,
            price: payload.price,
            min_quantity: payload.min_quantity,
            ncm: payload.ncm,
            barcode: payload.barcode,
        })
        .await?;

    info!("Product created: {}", product_id);

    Ok(created_response(serde_json::json!({
        "id": product_id,
        "message": "Product created successfully"
    })))
}

/// Get a product by ID
async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .services
        .products
        .get_product(&product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product with ID {} not found", product_id)))?;

    Ok(success_response(product))
}

/// List products with pagination and optional filters
async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductListFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let pagination = PaginationParams::new(filter.page, filter.per_page);
    let page = pagination.page();
    let per_page = pagination.per_page();

    let (products, total) = state
        .services
        .products
        .list_products(
            page,
            per_page,
            filter.category_id,
            filter.is_active,
            filter.search,
        )
        .await?;

    Ok(success_response(PaginatedResponse::new(
        products, page, per_page, total,
    )))
}

/// Products at or below their minimum stock level
async fn list_low_stock(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let products = state.services.products.list_low_stock().await?;
    Ok(success_response(products))
}

/// Update a product
async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let product = state
        .services
        .products
        .update_product(
            product_id,
            ProductPatch {
                name: payload.name,
                description: payload.description,
                category_id: payload.category_id,
                unit: payload.unit,
                price: payload.price,
                min_quantity: payload.min_quantity,
                ncm: payload.ncm,
                barcode: payload.barcode,
                is_active: payload.is_active,
            },
        )
        .await?;

    Ok(success_response(product))
}

/// Delete a product
async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.products.delete_product(product_id).await?;
    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_product))
        .route("/", get(list_products))
        .route("/low-stock", get(list_low_stock))
        .route("/:id", get(get_product))
        .route("/:id", put(update_product))
        .route("/:id", delete(delete_product))
}
