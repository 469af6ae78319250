use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionError, TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    costing::{self, Movement, MovementDirection, StockLevel},
    db::DbPool,
    entities::client::Entity as Client,
    entities::product::{self, Entity as Product},
    entities::sales_order::{self, Column as OrderColumn, Entity as SalesOrder, OrderStatus,
        PaymentStatus},
    entities::sales_order_item::{self, Column as OrderItemColumn, Entity as SalesOrderItem},
    entities::stock_movement,
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Prefix used by generated order numbers (`ORD-000001`, ...)
const ORDER_NUMBER_PREFIX: &str = "ORD-";

/// Flat tax rate applied over the order subtotal.
const ORDER_TAX_RATE: Decimal = dec!(0.10);

/// One requested order line
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: Uuid,
    pub quantity: Decimal,
    /// Defaults to the product's list price when absent
    pub unit_price: Option<Decimal>,
    pub discount: Decimal,
    pub notes: Option<String>,
}

/// Fields accepted when creating an order
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub client_id: Uuid,
    pub items: Vec<NewOrderItem>,
    pub discount: Decimal,
    pub notes: Option<String>,
    pub shipping_address: Option<String>,
}

/// An order header together with its lines
#[derive(Debug, Clone)]
pub struct OrderWithItems {
    pub order: sales_order::Model,
    pub items: Vec<sales_order_item::Model>,
}

/// Service for managing sales orders
pub struct OrderService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl OrderService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Create an order with its items in a single transaction.
    ///
    /// Item totals are `unit_price * quantity - discount`; the order carries
    /// `subtotal - discount + tax` with a flat 10% tax over the subtotal.
    /// Stock is not touched at creation; it moves when the order completes.
    #[instrument(skip(self, new), fields(client_id = %new.client_id))]
    pub async fn create_order(&self, new: NewOrder) -> Result<OrderWithItems, ServiceError> {
        let db = &*self.db_pool;

        if new.items.is_empty() {
            return Err(ServiceError::InvalidInput(
                "Order must contain at least one item".to_string(),
            ));
        }
        if new.discount < Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "Order discount cannot be negative".to_string(),
            ));
        }

        let created = db
            .transaction::<_, OrderWithItems, ServiceError>(move |txn| {
                Box::pin(async move {
                    Client::find_by_id(new.client_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Client with ID {} not found",
                                new.client_id
                            ))
                        })?;

                    let order_id = Uuid::new_v4();
                    let mut subtotal = Decimal::ZERO;
                    let mut item_models = Vec::with_capacity(new.items.len());

                    for item in &new.items {
                        if item.quantity <= Decimal::ZERO {
                            return Err(ServiceError::InvalidInput(
                                "Item quantity must be greater than zero".to_string(),
                            ));
                        }
                        if item.discount < Decimal::ZERO {
                            return Err(ServiceError::InvalidInput(
                                "Item discount cannot be negative".to_string(),
                            ));
                        }

                        let product = Product::find_by_id(item.product_id)
                            .one(txn)
                            .await
                            .map_err(ServiceError::db_error)?
                            .ok_or_else(|| {
                                ServiceError::NotFound(format!(
                                    "Product with ID {} not found",
                                    item.product_id
                                ))
                            })?;

                        if !product.is_active {
                            return Err(ServiceError::InvalidOperation(format!(
                                "Product '{}' is inactive",
                                product.sku
                            )));
                        }

                        let unit_price = item.unit_price.unwrap_or(product.price);
                        if unit_price < Decimal::ZERO {
                            return Err(ServiceError::InvalidInput(
                                "Item unit price cannot be negative".to_string(),
                            ));
                        }

                        let total = unit_price * item.quantity - item.discount;
                        subtotal += total;

                        item_models.push(sales_order_item::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            order_id: Set(order_id),
                            product_id: Set(item.product_id),
                            quantity: Set(item.quantity),
                            unit_price: Set(unit_price),
                            discount: Set(item.discount),
                            total: Set(total),
                            notes: Set(item.notes.clone()),
                            created_at: Set(Utc::now()),
                        });
                    }

                    let tax = subtotal * ORDER_TAX_RATE;
                    let total = subtotal - new.discount + tax;

                    let order_number = next_order_number(txn).await?;

                    let order = sales_order::ActiveModel {
                        id: Set(order_id),
                        order_number: Set(order_number),
                        client_id: Set(new.client_id),
                        status: Set(OrderStatus::Pending.to_string()),
                        payment_status: Set(PaymentStatus::Pending.to_string()),
                        subtotal: Set(subtotal),
                        discount: Set(new.discount),
                        tax: Set(tax),
                        total: Set(total),
                        notes: Set(new.notes.clone()),
                        shipping_address: Set(new.shipping_address.clone()),
                        created_at: Set(Utc::now()),
                        updated_at: Set(None),
                        completed_at: Set(None),
                    };

                    let order = order.insert(txn).await.map_err(ServiceError::db_error)?;

                    let mut items = Vec::with_capacity(item_models.len());
                    for item in item_models {
                        items.push(item.insert(txn).await.map_err(ServiceError::db_error)?);
                    }

                    Ok(OrderWithItems { order, items })
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        self.event_sender
            .send(Event::OrderCreated(created.order.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(
            order_id = %created.order.id,
            order_number = %created.order.order_number,
            total = %created.order.total,
            "Order created"
        );

        Ok(created)
    }

    /// Get an order and its items by ID
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: &Uuid) -> Result<Option<OrderWithItems>, ServiceError> {
        let db = &*self.db_pool;

        let Some(order) = SalesOrder::find_by_id(*id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
        else {
            return Ok(None);
        };

        let items = SalesOrderItem::find()
            .filter(OrderItemColumn::OrderId.eq(*id))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(Some(OrderWithItems { order, items }))
    }

    /// List orders, newest first, optionally filtered by status and client
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        page: u64,
        limit: u64,
        status: Option<OrderStatus>,
        client_id: Option<Uuid>,
    ) -> Result<(Vec<sales_order::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = SalesOrder::find();

        if let Some(status) = status {
            query = query.filter(OrderColumn::Status.eq(status.to_string()));
        }
        if let Some(client_id) = client_id {
            query = query.filter(OrderColumn::ClientId.eq(client_id));
        }

        let paginator = query
            .order_by_desc(OrderColumn::CreatedAt)
            .paginate(db, limit);

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let orders = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((orders, total))
    }

    /// Complete an order: decrement stock for every line and stamp the order.
    ///
    /// Each line produces an outbound movement through the same costing path
    /// as manual movements, so on-hand quantities floor at zero and movement
    /// history stays complete. Everything commits in one transaction.
    #[instrument(skip(self))]
    pub async fn complete_order(&self, id: Uuid) -> Result<sales_order::Model, ServiceError> {
        let db = &*self.db_pool;

        let (order, touched_products) = db
            .transaction::<_, (sales_order::Model, Vec<product::Model>), ServiceError>(
                move |txn| {
                    Box::pin(async move {
                        let order = SalesOrder::find_by_id(id)
                            .one(txn)
                            .await
                            .map_err(ServiceError::db_error)?
                            .ok_or_else(|| {
                                ServiceError::NotFound(format!("Order with ID {} not found", id))
                            })?;

                        match order.status() {
                            Some(OrderStatus::Pending) | Some(OrderStatus::Processing) => {}
                            _ => {
                                return Err(ServiceError::InvalidOperation(format!(
                                    "Order {} cannot be completed from status '{}'",
                                    order.order_number, order.status
                                )));
                            }
                        }

                        let items = SalesOrderItem::find()
                            .filter(OrderItemColumn::OrderId.eq(id))
                            .all(txn)
                            .await
                            .map_err(ServiceError::db_error)?;

                        let mut touched = Vec::with_capacity(items.len());

                        for item in &items {
                            let product = Product::find_by_id(item.product_id)
                                .one(txn)
                                .await
                                .map_err(ServiceError::db_error)?
                                .ok_or_else(|| {
                                    ServiceError::NotFound(format!(
                                        "Product with ID {} not found",
                                        item.product_id
                                    ))
                                })?;

                            let before =
                                StockLevel::new(product.quantity_on_hand, product.unit_cost);
                            let after = costing::apply_movement(
                                before,
                                &Movement {
                                    direction: MovementDirection::Outbound,
                                    quantity: item.quantity,
                                    unit_cost: Decimal::ZERO,
                                },
                            )?;

                            let mut active: product::ActiveModel = product.into();
                            active.quantity_on_hand = Set(after.quantity_on_hand);
                            active.updated_at = Set(Some(Utc::now()));
                            let updated =
                                active.update(txn).await.map_err(ServiceError::db_error)?;

                            let movement = stock_movement::ActiveModel {
                                id: Set(Uuid::new_v4()),
                                product_id: Set(item.product_id),
                                direction: Set(MovementDirection::Outbound.to_string()),
                                quantity: Set(item.quantity),
                                unit_cost: Set(Decimal::ZERO),
                                supplier_id: Set(None),
                                reason: Set(Some(format!("Sale {}", order.order_number))),
                                notes: Set(None),
                                quantity_before: Set(before.quantity_on_hand),
                                quantity_after: Set(after.quantity_on_hand),
                                created_at: Set(Utc::now()),
                            };
                            movement
                                .insert(txn)
                                .await
                                .map_err(ServiceError::db_error)?;

                            touched.push(updated);
                        }

                        let now = Utc::now();
                        let mut active: sales_order::ActiveModel = order.into();
                        active.status = Set(OrderStatus::Completed.to_string());
                        active.completed_at = Set(Some(now));
                        active.updated_at = Set(Some(now));

                        let order = active.update(txn).await.map_err(ServiceError::db_error)?;

                        Ok((order, touched))
                    })
                },
            )
            .await
            .map_err(unwrap_transaction_error)?;

        self.event_sender
            .send(Event::OrderCompleted {
                order_id: order.id,
                completed_at: order.completed_at.unwrap_or_else(Utc::now),
            })
            .await
            .map_err(ServiceError::EventError)?;

        for product in touched_products.iter().filter(|p| p.is_low_stock()) {
            self.event_sender
                .send(Event::LowStockDetected {
                    product_id: product.id,
                    quantity_on_hand: product.quantity_on_hand,
                    min_quantity: product.min_quantity,
                })
                .await
                .map_err(ServiceError::EventError)?;
        }

        info!(order_id = %order.id, order_number = %order.order_number, "Order completed");

        Ok(order)
    }

    /// Cancel an order that has not shipped
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: Uuid) -> Result<sales_order::Model, ServiceError> {
        let db = &*self.db_pool;

        let order = SalesOrder::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order with ID {} not found", id)))?;

        match order.status() {
            Some(OrderStatus::Completed) | Some(OrderStatus::Delivered) => {
                return Err(ServiceError::InvalidOperation(format!(
                    "Order {} has already shipped and cannot be cancelled",
                    order.order_number
                )));
            }
            Some(OrderStatus::Cancelled) => {
                return Err(ServiceError::InvalidOperation(format!(
                    "Order {} is already cancelled",
                    order.order_number
                )));
            }
            _ => {}
        }

        let mut active: sales_order::ActiveModel = order.into();
        active.status = Set(OrderStatus::Cancelled.to_string());
        active.payment_status = Set(PaymentStatus::Cancelled.to_string());
        active.updated_at = Set(Some(Utc::now()));

        let order = active.update(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::OrderCancelled(order.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(order_id = %order.id, order_number = %order.order_number, "Order cancelled");

        Ok(order)
    }
}

fn unwrap_transaction_error(e: TransactionError<ServiceError>) -> ServiceError {
    match e {
        TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
        TransactionError::Transaction(service_err) => service_err,
    }
}

/// Next number in the `ORD-XXXXXX` sequence, derived from the highest
/// existing generated number.
async fn next_order_number<C: sea_orm::ConnectionTrait>(db: &C) -> Result<String, ServiceError> {
    let orders = SalesOrder::find()
        .filter(OrderColumn::OrderNumber.starts_with(ORDER_NUMBER_PREFIX))
        .all(db)
        .await
        .map_err(ServiceError::db_error)?;

    let max_number = orders
        .iter()
        .filter_map(|o| o.order_number.strip_prefix(ORDER_NUMBER_PREFIX))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    Ok(format!("{}{:06}", ORDER_NUMBER_PREFIX, max_number + 1))
}
