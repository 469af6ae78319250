use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::client::{self, Column as ClientColumn, Entity as Client},
    errors::ServiceError,
    events::{Event, EventSender},
    services::suppliers::party_kind,
    tax_id,
};

/// Fields accepted when creating a client
#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub tax_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub notes: Option<String>,
}

/// Optional fields for a client update
#[derive(Debug, Clone, Default)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub is_active: Option<bool>,
    pub notes: Option<String>,
}

/// Service for managing clients
pub struct ClientService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ClientService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Create a new client. Same tax-ID treatment as suppliers: check-digit
    /// validation up front, canonical digits stored, kind derived from the ID.
    #[instrument(skip(self, new))]
    pub async fn create_client(&self, new: NewClient) -> Result<Uuid, ServiceError> {
        let db = &*self.db_pool;

        let kind = tax_id::validate(&new.tax_id)?;
        let canonical = tax_id::canonicalize(&new.tax_id);

        let existing = Client::find()
            .filter(ClientColumn::TaxId.eq(&canonical))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Client with tax ID '{}' already exists",
                canonical
            )));
        }

        let client_id = Uuid::new_v4();
        let model = client::ActiveModel {
            id: Set(client_id),
            name: Set(new.name.clone()),
            kind: Set(party_kind(kind).to_string()),
            tax_id: Set(canonical),
            email: Set(new.email),
            phone: Set(new.phone),
            address: Set(new.address),
            city: Set(new.city),
            state: Set(new.state),
            zip_code: Set(new.zip_code),
            is_active: Set(true),
            notes: Set(new.notes),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        model.insert(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::ClientCreated(client_id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(client_id = %client_id, name = %new.name, "Client created");

        Ok(client_id)
    }

    /// Get a client by ID
    #[instrument(skip(self))]
    pub async fn get_client(&self, id: &Uuid) -> Result<Option<client::Model>, ServiceError> {
        let db = &*self.db_pool;

        Client::find_by_id(*id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// List clients with pagination, ordered by name
    #[instrument(skip(self))]
    pub async fn list_clients(
        &self,
        page: u64,
        limit: u64,
        is_active: Option<bool>,
        search_term: Option<String>,
    ) -> Result<(Vec<client::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = Client::find();
        if let Some(is_active) = is_active {
            query = query.filter(ClientColumn::IsActive.eq(is_active));
        }
        if let Some(search_term) = search_term {
            query = query.filter(
                ClientColumn::Name
                    .contains(&search_term)
                    .or(ClientColumn::TaxId.contains(&search_term)),
            );
        }

        let paginator = query.order_by_asc(ClientColumn::Name).paginate(db, limit);

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let clients = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((clients, total))
    }

    /// Update a client
    #[instrument(skip(self, patch))]
    pub async fn update_client(
        &self,
        id: Uuid,
        patch: ClientPatch,
    ) -> Result<client::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = Client::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Client with ID {} not found", id)))?;

        let mut model: client::ActiveModel = existing.into();

        if let Some(raw_tax_id) = patch.tax_id {
            let kind = tax_id::validate(&raw_tax_id)?;
            let canonical = tax_id::canonicalize(&raw_tax_id);

            let duplicate = Client::find()
                .filter(ClientColumn::TaxId.eq(&canonical))
                .filter(ClientColumn::Id.ne(id))
                .one(db)
                .await
                .map_err(ServiceError::db_error)?;

            if duplicate.is_some() {
                return Err(ServiceError::Conflict(format!(
                    "Client with tax ID '{}' already exists",
                    canonical
                )));
            }

            model.kind = Set(party_kind(kind).to_string());
            model.tax_id = Set(canonical);
        }

        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(email) = patch.email {
            model.email = Set(Some(email));
        }
        if let Some(phone) = patch.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(address) = patch.address {
            model.address = Set(Some(address));
        }
        if let Some(city) = patch.city {
            model.city = Set(Some(city));
        }
        if let Some(state) = patch.state {
            model.state = Set(Some(state));
        }
        if let Some(zip_code) = patch.zip_code {
            model.zip_code = Set(Some(zip_code));
        }
        if let Some(is_active) = patch.is_active {
            model.is_active = Set(is_active);
        }
        if let Some(notes) = patch.notes {
            model.notes = Set(Some(notes));
        }

        model.updated_at = Set(Some(Utc::now()));

        let updated = model.update(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::ClientUpdated(id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(client_id = %id, "Client updated");

        Ok(updated)
    }

    /// Delete a client
    #[instrument(skip(self))]
    pub async fn delete_client(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = Client::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Client with ID {} not found", id)))?;

        existing
            .delete(db)
            .await
            .map_err(ServiceError::db_error)?;

        info!(client_id = %id, "Client deleted");

        Ok(())
    }
}
