use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::category::{self, Column as CategoryColumn, Entity as Category},
    entities::product::{self, Entity as Product},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Service for managing product categories
pub struct CategoryService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl CategoryService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Create a new category
    #[instrument(skip(self))]
    pub async fn create_category(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<Uuid, ServiceError> {
        let db = &*self.db_pool;

        let existing = Category::find()
            .filter(CategoryColumn::Name.eq(&name))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Category '{}' already exists",
                name
            )));
        }

        let category_id = Uuid::new_v4();
        let category = category::ActiveModel {
            id: Set(category_id),
            name: Set(name.clone()),
            description: Set(description),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        category.insert(db).await.map_err(|e| {
            let msg = format!("Failed to create category: {}", e);
            error!(%msg);
            ServiceError::db_error(msg)
        })?;

        self.event_sender
            .send(Event::CategoryCreated(category_id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(category_id = %category_id, name = %name, "Category created");

        Ok(category_id)
    }

    /// Get a category by ID
    #[instrument(skip(self))]
    pub async fn get_category(&self, id: &Uuid) -> Result<Option<category::Model>, ServiceError> {
        let db = &*self.db_pool;

        Category::find_by_id(*id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// List categories with pagination, ordered by name
    #[instrument(skip(self))]
    pub async fn list_categories(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<category::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let paginator = Category::find()
            .order_by_asc(CategoryColumn::Name)
            .paginate(db, limit);

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let categories = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((categories, total))
    }

    /// Update a category's name or description
    #[instrument(skip(self))]
    pub async fn update_category(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<category::Model, ServiceError> {
        let db = &*self.db_pool;

        let category = Category::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Category with ID {} not found", id)))?;

        let mut category: category::ActiveModel = category.into();

        if let Some(name) = name {
            category.name = Set(name);
        }
        if let Some(description) = description {
            category.description = Set(Some(description));
        }
        category.updated_at = Set(Some(Utc::now()));

        let updated = category.update(db).await.map_err(ServiceError::db_error)?;

        info!(category_id = %id, "Category updated");

        Ok(updated)
    }

    /// Delete a category. Refused while products still reference it.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let category = Category::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Category with ID {} not found", id)))?;

        let product_count = Product::find()
            .filter(product::Column::CategoryId.eq(id))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;

        if product_count > 0 {
            return Err(ServiceError::InvalidOperation(format!(
                "Category '{}' still has {} product(s)",
                category.name, product_count
            )));
        }

        category
            .delete(db)
            .await
            .map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::CategoryDeleted(id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(category_id = %id, "Category deleted");

        Ok(())
    }
}
