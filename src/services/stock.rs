use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionError, TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    costing::{self, Movement, MovementDirection, StockLevel},
    db::DbPool,
    entities::product::{self, Entity as Product},
    entities::stock_movement::{self, Column as MovementColumn, Entity as StockMovement},
    entities::supplier::Entity as Supplier,
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Fields accepted when recording a movement
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub product_id: Uuid,
    pub direction: MovementDirection,
    pub quantity: Decimal,
    /// Acquisition cost per unit; only meaningful for inbound movements
    pub unit_cost: Option<Decimal>,
    pub supplier_id: Option<Uuid>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

/// Service for recording stock movements and reading movement history.
///
/// Movement application is the only writer of `products.quantity_on_hand` and
/// `products.unit_cost`. Each movement runs in its own database transaction:
/// the product row is read, the new level computed, and both the product
/// update and the movement insert commit together. Concurrent movements
/// against the same product serialize on the row instead of losing updates;
/// there is no in-process locking.
pub struct StockService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl StockService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Record one stock movement and apply it to the product's position.
    #[instrument(skip(self, new), fields(product_id = %new.product_id, direction = %new.direction))]
    pub async fn record_movement(
        &self,
        new: NewMovement,
    ) -> Result<stock_movement::Model, ServiceError> {
        let db = &*self.db_pool;

        let (movement, updated_product) = db
            .transaction::<_, (stock_movement::Model, product::Model), ServiceError>(move |txn| {
                Box::pin(async move {
                    let product = Product::find_by_id(new.product_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Product with ID {} not found",
                                new.product_id
                            ))
                        })?;

                    if let Some(supplier_id) = new.supplier_id {
                        Supplier::find_by_id(supplier_id)
                            .one(txn)
                            .await
                            .map_err(ServiceError::db_error)?
                            .ok_or_else(|| {
                                ServiceError::NotFound(format!(
                                    "Supplier with ID {} not found",
                                    supplier_id
                                ))
                            })?;
                    }

                    let unit_cost = new.unit_cost.unwrap_or(Decimal::ZERO);
                    let before = StockLevel::new(product.quantity_on_hand, product.unit_cost);
                    let after = costing::apply_movement(
                        before,
                        &Movement {
                            direction: new.direction,
                            quantity: new.quantity,
                            unit_cost,
                        },
                    )?;

                    let mut active: product::ActiveModel = product.into();
                    active.quantity_on_hand = Set(after.quantity_on_hand);
                    active.unit_cost = Set(after.unit_cost);
                    active.updated_at = Set(Some(Utc::now()));

                    let updated_product =
                        active.update(txn).await.map_err(ServiceError::db_error)?;

                    let movement = stock_movement::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        product_id: Set(new.product_id),
                        direction: Set(new.direction.to_string()),
                        quantity: Set(new.quantity),
                        unit_cost: Set(unit_cost),
                        supplier_id: Set(new.supplier_id),
                        reason: Set(new.reason),
                        notes: Set(new.notes),
                        quantity_before: Set(before.quantity_on_hand),
                        quantity_after: Set(after.quantity_on_hand),
                        created_at: Set(Utc::now()),
                    };

                    let movement = movement
                        .insert(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    Ok((movement, updated_product))
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        self.event_sender
            .send(Event::MovementRecorded {
                movement_id: movement.id,
                product_id: movement.product_id,
                direction: movement
                    .direction
                    .parse()
                    .unwrap_or(MovementDirection::Adjustment),
                quantity: movement.quantity,
                quantity_before: movement.quantity_before,
                quantity_after: movement.quantity_after,
                unit_cost_after: updated_product.unit_cost,
                occurred_at: movement.created_at,
            })
            .await
            .map_err(ServiceError::EventError)?;

        if updated_product.is_low_stock() {
            self.event_sender
                .send(Event::LowStockDetected {
                    product_id: updated_product.id,
                    quantity_on_hand: updated_product.quantity_on_hand,
                    min_quantity: updated_product.min_quantity,
                })
                .await
                .map_err(ServiceError::EventError)?;
        }

        info!(
            movement_id = %movement.id,
            quantity_after = %movement.quantity_after,
            unit_cost_after = %updated_product.unit_cost,
            "Stock movement recorded"
        );

        Ok(movement)
    }

    /// Get a movement by ID
    #[instrument(skip(self))]
    pub async fn get_movement(
        &self,
        id: &Uuid,
    ) -> Result<Option<stock_movement::Model>, ServiceError> {
        let db = &*self.db_pool;

        StockMovement::find_by_id(*id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Movement history, newest first, optionally filtered by product and
    /// direction.
    #[instrument(skip(self))]
    pub async fn list_movements(
        &self,
        page: u64,
        limit: u64,
        product_id: Option<Uuid>,
        direction: Option<MovementDirection>,
    ) -> Result<(Vec<stock_movement::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = StockMovement::find();

        if let Some(product_id) = product_id {
            query = query.filter(MovementColumn::ProductId.eq(product_id));
        }
        if let Some(direction) = direction {
            query = query.filter(MovementColumn::Direction.eq(direction.to_string()));
        }

        let paginator = query
            .order_by_desc(MovementColumn::CreatedAt)
            .paginate(db, limit);

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let movements = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((movements, total))
    }
}
