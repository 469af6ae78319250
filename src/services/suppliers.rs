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
    entities::supplier::{self, Column as SupplierColumn, Entity as Supplier},
    entities::PartyKind,
    errors::ServiceError,
    events::{Event, EventSender},
    tax_id::{self, TaxIdKind},
};

/// Fields accepted when creating a supplier
#[derive(Debug, Clone)]
pub struct NewSupplier {
    pub name: String,
    pub tax_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub contact_person: Option<String>,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
}

/// Optional fields for a supplier update
#[derive(Debug, Clone, Default)]
pub struct SupplierPatch {
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub contact_person: Option<String>,
    pub payment_terms: Option<String>,
    pub is_active: Option<bool>,
    pub notes: Option<String>,
}

/// The contact kind implied by a validated tax ID.
pub(crate) fn party_kind(kind: TaxIdKind) -> PartyKind {
    match kind {
        TaxIdKind::Individual => PartyKind::Individual,
        TaxIdKind::Company => PartyKind::Company,
    }
}

/// Service for managing suppliers
pub struct SupplierService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl SupplierService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Create a new supplier.
    ///
    /// The tax ID is check-digit validated; the failure reason surfaces as a
    /// field-level rejection. The supplier kind (individual/company) follows
    /// from the validated ID, and the canonical digits-only form is what gets
    /// stored and de-duplicated.
    #[instrument(skip(self, new))]
    pub async fn create_supplier(&self, new: NewSupplier) -> Result<Uuid, ServiceError> {
        let db = &*self.db_pool;

        let kind = tax_id::validate(&new.tax_id)?;
        let canonical = tax_id::canonicalize(&new.tax_id);

        let existing = Supplier::find()
            .filter(SupplierColumn::TaxId.eq(&canonical))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Supplier with tax ID '{}' already exists",
                canonical
            )));
        }

        let supplier_id = Uuid::new_v4();
        let model = supplier::ActiveModel {
            id: Set(supplier_id),
            name: Set(new.name.clone()),
            kind: Set(party_kind(kind).to_string()),
            tax_id: Set(canonical),
            email: Set(new.email),
            phone: Set(new.phone),
            address: Set(new.address),
            city: Set(new.city),
            state: Set(new.state),
            zip_code: Set(new.zip_code),
            contact_person: Set(new.contact_person),
            payment_terms: Set(new.payment_terms),
            is_active: Set(true),
            notes: Set(new.notes),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        model.insert(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::SupplierCreated(supplier_id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(supplier_id = %supplier_id, name = %new.name, "Supplier created");

        Ok(supplier_id)
    }

    /// Get a supplier by ID
    #[instrument(skip(self))]
    pub async fn get_supplier(&self, id: &Uuid) -> Result<Option<supplier::Model>, ServiceError> {
        let db = &*self.db_pool;

        Supplier::find_by_id(*id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// List suppliers with pagination, ordered by name
    #[instrument(skip(self))]
    pub async fn list_suppliers(
        &self,
        page: u64,
        limit: u64,
        is_active: Option<bool>,
    ) -> Result<(Vec<supplier::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = Supplier::find();
        if let Some(is_active) = is_active {
            query = query.filter(SupplierColumn::IsActive.eq(is_active));
        }

        let paginator = query.order_by_asc(SupplierColumn::Name).paginate(db, limit);

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let suppliers = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((suppliers, total))
    }

    /// Update a supplier
    #[instrument(skip(self, patch))]
    pub async fn update_supplier(
        &self,
        id: Uuid,
        patch: SupplierPatch,
    ) -> Result<supplier::Model, ServiceError> {
        let db = &*self.db_pool;

        let supplier = Supplier::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier with ID {} not found", id)))?;

        let mut model: supplier::ActiveModel = supplier.into();

        if let Some(raw_tax_id) = patch.tax_id {
            let kind = tax_id::validate(&raw_tax_id)?;
            let canonical = tax_id::canonicalize(&raw_tax_id);

            let duplicate = Supplier::find()
                .filter(SupplierColumn::TaxId.eq(&canonical))
                .filter(SupplierColumn::Id.ne(id))
                .one(db)
                .await
                .map_err(ServiceError::db_error)?;

            if duplicate.is_some() {
                return Err(ServiceError::Conflict(format!(
                    "Supplier with tax ID '{}' already exists",
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
        if let Some(contact_person) = patch.contact_person {
            model.contact_person = Set(Some(contact_person));
        }
        if let Some(payment_terms) = patch.payment_terms {
            model.payment_terms = Set(Some(payment_terms));
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
            .send(Event::SupplierUpdated(id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(supplier_id = %id, "Supplier updated");

        Ok(updated)
    }

    /// Delete a supplier
    #[instrument(skip(self))]
    pub async fn delete_supplier(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let supplier = Supplier::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier with ID {} not found", id)))?;

        supplier
            .delete(db)
            .await
            .map_err(ServiceError::db_error)?;

        info!(supplier_id = %id, "Supplier deleted");

        Ok(())
    }
}
