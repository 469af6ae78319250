use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
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
    errors::ApiError,
    handlers::AppState,
    services::suppliers::{NewSupplier, SupplierPatch},
};

// Request and response DTOs

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,

    /// CPF or CNPJ, formatted or bare digits
    pub tax_id: String,

    #[validate(email(message = "Invalid e-mail address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    #[validate(length(max = 2, message = "State must be a two-letter code"))]
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub contact_person: Option<String>,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSupplierRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: Option<String>,
    pub tax_id: Option<String>,
    #[validate(email(message = "Invalid e-mail address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    #[validate(length(max = 2, message = "State must be a two-letter code"))]
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub contact_person: Option<String>,
    pub payment_terms: Option<String>,
    pub is_active: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SupplierListFilter {
    pub is_active: Option<bool>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

// Handler functions

/// Create a new supplier
async fn create_supplier(
    State(state): State<AppState>,
    Json(payload): Json<CreateSupplierRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let supplier_id = state
        .services
        .suppliers
        .create_supplier(NewSupplier {
            name: payload.name,
            tax_id: payload.tax_id,
            email: payload.email,
            phone: payload.phone,
            address: payload.address,
            city: payload.city,
            state: payload.state,
            zip_code: payload.zip_code,
            contact_person: payload.contact_person,
            payment_terms: payload.payment_terms,
            notes: payload.notes,
        })
        .await?;

    info!("Supplier created: {}", supplier_id);

    Ok(created_response(serde_json::json!({
        "id": supplier_id,
        "message": "Supplier created successfully"
    })))
}

/// Get a supplier by ID
async fn get_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = state
        .services
        .suppliers
        .get_supplier(&supplier_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Supplier with ID {} not found", supplier_id))
        })?;

    Ok(success_response(supplier))
}

/// List suppliers
async fn list_suppliers(
    State(state): State<AppState>,
    Query(filter): Query<SupplierListFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let pagination = PaginationParams::new(filter.page, filter.per_page);
    let page = pagination.page();
    let per_page = pagination.per_page();

    let (suppliers, total) = state
        .services
        .suppliers
        .list_suppliers(page, per_page, filter.is_active)
        .await?;

    Ok(success_response(PaginatedResponse::new(
        suppliers, page, per_page, total,
    )))
}

/// Update a supplier
async fn update_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
    Json(payload): Json<UpdateSupplierRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let supplier = state
        .services
        .suppliers
        .update_supplier(
            supplier_id,
            SupplierPatch {
                name: payload.name,
                tax_id: payload.tax_id,
                email: payload.email,
                phone: payload.phone,
                address: payload.address,
                city: payload.city,
                state: payload.state,
                zip_code: payload.zip_code,
                contact_person: payload.contact_person,
                payment_terms: payload.payment_terms,
                is_active: payload.is_active,
                notes: payload.notes,
            },
        )
        .await?;

    Ok(success_response(supplier))
}

/// Delete a supplier
async fn delete_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .suppliers
        .delete_supplier(supplier_id)
        .await?;

    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_supplier))
        .route("/", get(list_suppliers))
        .route("/:id", get(get_supplier))
        .route("/:id", put(update_supplier))
        .route("/:id", delete(delete_supplier))
}
