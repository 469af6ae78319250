use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionError, TransactionTrait,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::category::Entity as Category,
    entities::product::{self, Column as ProductColumn, Entity as Product, StockUnit},
    entities::sales_order_item::{self, Entity as SalesOrderItem},
    entities::stock_movement::{self, Entity as StockMovement},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Prefix used by generated SKUs (`PROD-0001`, `PROD-0002`, ...)
const SKU_PREFIX: &str = "PROD-";

/// Fields accepted when creating a product
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Leave `None` to generate the next `PROD-XXXX` code
    pub sku: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Uuid,
    pub unit: StockUnit,
    pub price: Decimal,
    pub min_quantity: Decimal,
    pub ncm: Option<String>,
    pub barcode: Option<String>,
}

/// Optional fields for a product update
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub unit: Option<StockUnit>,
    pub price: Option<Decimal>,
    pub min_quantity: Option<Decimal>,
    pub ncm: Option<String>,
    pub barcode: Option<String>,
    pub is_active: Option<bool>,
}

/// Service for managing products
pub struct ProductService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ProductService {
    /// Creates a new product service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Create a new product
    #[instrument(skip(self, new))]
    pub async fn create_product(&self, new: NewProduct) -> Result<Uuid, ServiceError> {
        let db = &*self.db_pool;

        if new.price < Decimal::ZERO || new.min_quantity < Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "Price and minimum quantity cannot be negative".to_string(),
            ));
        }

        Category::find_by_id(new.category_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Category with ID {} not found", new.category_id))
            })?;

        let sku = match new.sku.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(sku) => {
                let existing = Product::find()
                    .filter(ProductColumn::Sku.eq(sku))
                    .one(db)
                    .await
                    .map_err(ServiceError::db_error)?;
                if existing.is_some() {
                    return Err(ServiceError::Conflict(format!(
                        "Product with SKU '{}' already exists",
                        sku
                    )));
                }
                sku.to_string()
            }
            None => self.generate_sku().await?,
        };

        let product_id = Uuid::new_v4();
        let model = product::ActiveModel {
            id: Set(product_id),
            sku: Set(sku.clone()),
            name: Set(new.name.clone()),
            description: Set(new.description),
            category_id: Set(new.category_id),
            unit: Set(new.unit.as_str().to_string()),
            price: Set(new.price),
            quantity_on_hand: Set(Decimal::ZERO),
            min_quantity: Set(new.min_quantity),
            unit_cost: Set(Decimal::ZERO),
            ncm: Set(new.ncm),
            barcode: Set(new.barcode),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        model.insert(db).await.map_err(|e| {
            let msg = format!("Failed to create product: {}", e);
            error!(%msg);
            ServiceError::db_error(msg)
        })?;

        self.event_sender
            .send(Event::ProductCreated(product_id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(product_id = %product_id, sku = %sku, name = %new.name, "Product created");

        Ok(product_id)
    }

    /// Next free SKU in the `PROD-XXXX` sequence.
    ///
    /// Scans existing generated codes for the highest number; codes that do
    /// not parse are skipped, matching how hand-entered SKUs share the
    /// namespace.
    async fn generate_sku(&self) -> Result<String, ServiceError> {
        let db = &*self.db_pool;

        let generated = Product::find()
            .filter(ProductColumn::Sku.starts_with(SKU_PREFIX))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let max_number = generated
            .iter()
            .filter_map(|p| p.sku.strip_prefix(SKU_PREFIX))
            .filter_map(|suffix| suffix.parse::<u32>().ok())
            .max()
            .unwrap_or(0);

        Ok(format!("{}{:04}", SKU_PREFIX, max_number + 1))
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &Uuid) -> Result<Option<product::Model>, ServiceError> {
        let db = &*self.db_pool;

        Product::find_by_id(*id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Get a product by SKU
    #[instrument(skip(self))]
    pub async fn get_product_by_sku(
        &self,
        sku: &str,
    ) -> Result<Option<product::Model>, ServiceError> {
        let db = &*self.db_pool;

        Product::find()
            .filter(ProductColumn::Sku.eq(sku))
            .one(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// List products with pagination and optional filters
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        page: u64,
        limit: u64,
        category_id: Option<Uuid>,
        is_active: Option<bool>,
        search_term: Option<String>,
    ) -> Result<(Vec<product::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = Product::find();

        if let Some(category_id) = category_id {
            query = query.filter(ProductColumn::CategoryId.eq(category_id));
        }

        if let Some(is_active) = is_active {
            query = query.filter(ProductColumn::IsActive.eq(is_active));
        }

        if let Some(search_term) = search_term {
            query = query.filter(
                ProductColumn::Name
                    .contains(&search_term)
                    .or(ProductColumn::Sku.contains(&search_term))
                    .or(ProductColumn::Barcode.contains(&search_term)),
            );
        }

        let paginator = query.order_by_asc(ProductColumn::Name).paginate(db, limit);

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let products = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((products, total))
    }

    /// Products at or below their configured minimum quantity
    #[instrument(skip(self))]
    pub async fn list_low_stock(&self) -> Result<Vec<product::Model>, ServiceError> {
        let db = &*self.db_pool;

        let products = Product::find()
            .filter(ProductColumn::IsActive.eq(true))
            .filter(ProductColumn::MinQuantity.gt(Decimal::ZERO))
            .order_by_asc(ProductColumn::Name)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(products.into_iter().filter(|p| p.is_low_stock()).collect())
    }

    /// Update a product's catalog fields. Stock quantity and unit cost are
    /// never touched here; those change only through movement application.
    #[instrument(skip(self, patch))]
    pub async fn update_product(
        &self,
        id: Uuid,
        patch: ProductPatch,
    ) -> Result<product::Model, ServiceError> {
        let db = &*self.db_pool;

        let product = Product::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Product with ID {} not found", id)))?;

        if let Some(category_id) = patch.category_id {
            Category::find_by_id(category_id)
                .one(db)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Category with ID {} not found", category_id))
                })?;
        }

        let mut product: product::ActiveModel = product.into();

        if let Some(name) = patch.name {
            product.name = Set(name);
        }
        if let Some(description) = patch.description {
            product.description = Set(Some(description));
        }
        if let Some(category_id) = patch.category_id {
            product.category_id = Set(category_id);
        }
        if let Some(unit) = patch.unit {
            product.unit = Set(unit.as_str().to_string());
        }
        if let Some(price) = patch.price {
            if price < Decimal::ZERO {
                return Err(ServiceError::InvalidInput(
                    "Price cannot be negative".to_string(),
                ));
            }
            product.price = Set(price);
        }
        if let Some(min_quantity) = patch.min_quantity {
            if min_quantity < Decimal::ZERO {
                return Err(ServiceError::InvalidInput(
                    "Minimum quantity cannot be negative".to_string(),
                ));
            }
            product.min_quantity = Set(min_quantity);
        }
        if let Some(ncm) = patch.ncm {
            product.ncm = Set(Some(ncm));
        }
        if let Some(barcode) = patch.barcode {
            product.barcode = Set(Some(barcode));
        }
        if let Some(is_active) = patch.is_active {
            product.is_active = Set(is_active);
        }

        product.updated_at = Set(Some(Utc::now()));

        let updated = product.update(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::ProductUpdated(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(product_id = %updated.id, "Product updated");

        Ok(updated)
    }

    /// Delete a product and its movement history.
    ///
    /// Refused while sales order items reference the product; movement rows
    /// go with the product they describe.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let product = Product::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Product with ID {} not found", id)))?;

        let referencing_items = SalesOrderItem::find()
            .filter(sales_order_item::Column::ProductId.eq(id))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;

        if referencing_items > 0 {
            return Err(ServiceError::InvalidOperation(format!(
                "Product '{}' is referenced by {} sales order item(s)",
                product.sku, referencing_items
            )));
        }

        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                StockMovement::delete_many()
                    .filter(stock_movement::Column::ProductId.eq(id))
                    .exec(txn)
                    .await
                    .map_err(ServiceError::db_error)?;

                product
                    .delete(txn)
                    .await
                    .map_err(ServiceError::db_error)?;

                Ok(())
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
            TransactionError::Transaction(service_err) => service_err,
        })?;

        self.event_sender
            .send(Event::ProductDeleted(id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(product_id = %id, "Product deleted");

        Ok(())
    }
}
