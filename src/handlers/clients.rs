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
    services::clients::{ClientPatch, NewClient},
};

// Request and response DTOs

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClientRequest {
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
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateClientRequest {
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
    pub is_active: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClientListFilter {
    pub is_active: Option<bool>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

// Handler functions

/// Create a new client
async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<CreateClientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let client_id = state
        .services
        .clients
        .create_client(NewClient {
            name: payload.name,
            tax_id: payload.tax_id,
            email: payload.email,
            phone: payload.phone,
            address: payload.address,
            city: payload.city,
            state: payload.state,
            zip_code: payload.zip_code,
            notes: payload.notes,
        })
        .await?;

    info!("Client created: {}", client_id);

    Ok(created_response(serde_json::json!({
        "id": client_id,
        "message": "Client created successfully"
    })))
}

/// Get a client by ID
async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let client = state
        .services
        .clients
        .get_client(&client_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Client with ID {} not found", client_id)))?;

    Ok(success_response(client))
}

/// List clients
async fn list_clients(
    State(state): State<AppState>,
    Query(filter): Query<ClientListFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let pagination = PaginationParams::new(filter.page, filter.per_page);
    let page = pagination.page();
    let per_page = pagination.per_page();

    let (clients, total) = state
        .services
        .clients
        .list_clients(page, per_page, filter.is_active, filter.search)
        .await?;

    Ok(success_response(PaginatedResponse::new(
        clients, page, per_page, total,
    )))
}

/// Update a client
async fn update_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    Json(payload): Json<UpdateClientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let client = state
        .services
        .clients
        .update_client(
            client_id,
            ClientPatch {
                name: payload.name,
                tax_id: payload.tax_id,
                email: payload.email,
                phone: payload.phone,
                address: payload.address,
                city: payload.city,
                state: payload.state,
                zip_code: payload.zip_code,
                is_active: payload.is_active,
                notes: payload.notes,
            },
        )
        .await?;

    Ok(success_response(client))
}

/// Delete a client
async fn delete_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.clients.delete_client(client_id).await?;
    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_client))
        .route("/", get(list_clients))
        .route("/:id", get(get_client))
        .route("/:id", put(update_client))
        .route("/:id", delete(delete_client))
}
