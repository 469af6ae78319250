use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::mpsc;
use uuid::Uuid;

use estoque_api::{
    costing::MovementDirection,
    db::{establish_connection, run_migrations, DbPool},
    entities::product::StockUnit,
    entities::sales_order::OrderStatus,
    errors::ServiceError,
    events::EventSender,
    services::{
        categories::CategoryService,
        clients::{ClientService, NewClient},
        orders::{NewOrder, NewOrderItem, OrderService},
        products::{NewProduct, ProductService},
        stock::{NewMovement, StockService},
    },
};

struct TestContext {
    products: ProductService,
    clients: ClientService,
    orders: OrderService,
    stock: StockService,
    categories: CategoryService,
    _event_rx: mpsc::Receiver<estoque_api::events::Event>,
}

async fn setup(db_name: &str) -> TestContext {
    let url = format!("sqlite:file:{}?mode=memory&cache=shared", db_name);
    let db: Arc<DbPool> = Arc::new(
        establish_connection(&url)
            .await
            .expect("Failed to create DB pool"),
    );
    run_migrations(db.as_ref())
        .await
        .expect("Failed to run migrations");

    let (tx, rx) = mpsc::channel(100);
    let event_sender = Arc::new(EventSender::new(tx));

    TestContext {
        products: ProductService::new(db.clone(), event_sender.clone()),
        clients: ClientService::new(db.clone(), event_sender.clone()),
        orders: OrderService::new(db.clone(), event_sender.clone()),
        stock: StockService::new(db.clone(), event_sender.clone()),
        categories: CategoryService::new(db, event_sender),
        _event_rx: rx,
    }
}

async fn seed_client(ctx: &TestContext) -> Uuid {
    ctx.clients
        .create_client(NewClient {
            name: "Maria Souza".to_string(),
            tax_id: "111.444.777-35".to_string(),
            email: Some("maria@example.com".to_string()),
            phone: None,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            notes: None,
        })
        .await
        .expect("Failed to create client")
}

/// Creates a product and stocks it via an inbound movement.
async fn seed_stocked_product(
    ctx: &TestContext,
    name: &str,
    price: Decimal,
    on_hand: Decimal,
) -> Uuid {
    let category_id = ctx
        .categories
        .create_category(format!("{} category", name), None)
        .await
        .expect("Failed to create category");

    let product_id = ctx
        .products
        .create_product(NewProduct {
            sku: None,
            name: name.to_string(),
            description: None,
            category_id,
            unit: StockUnit::Un,
            price,
            min_quantity: Decimal::ZERO,
            ncm: None,
            barcode: None,
        })
        .await
        .expect("Failed to create product");

    if on_hand > Decimal::ZERO {
        ctx.stock
            .record_movement(NewMovement {
                product_id,
                direction: MovementDirection::Inbound,
                quantity: on_hand,
                unit_cost: Some(price / dec!(2)),
                supplier_id: None,
                reason: Some("Initial stock".to_string()),
                notes: None,
            })
            .await
            .expect("Failed to stock product");
    }

    product_id
}

#[tokio::test]
async fn order_totals_carry_subtotal_discount_and_tax() {
    let ctx = setup("orders_totals").await;
    let client_id = seed_client(&ctx).await;
    let product_id = seed_stocked_product(&ctx, "Notebook", dec!(100), dec!(50)).await;

    let created = ctx
        .orders
        .create_order(NewOrder {
            client_id,
            items: vec![NewOrderItem {
                product_id,
                quantity: dec!(3),
                unit_price: None,
                discount: dec!(20),
                notes: None,
            }],
            discount: dec!(10),
            notes: None,
            shipping_address: None,
        })
        .await
        .expect("Failed to create order");

    // Item: 3 * 100 - 20 = 280. Order: 280 - 10 + 10% of 280 = 298.
    assert_eq!(created.items.len(), 1);
    assert_eq!(created.items[0].total, dec!(280));
    assert_eq!(created.order.subtotal, dec!(280));
    assert_eq!(created.order.tax, dec!(28));
    assert_eq!(created.order.total, dec!(298));
    assert_eq!(created.order.status().unwrap(), OrderStatus::Pending);
    assert!(created.order.order_number.starts_with("ORD-"));

    // Stock is untouched until the order completes.
    let product = ctx.products.get_product(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity_on_hand, dec!(50));
}

#[tokio::test]
async fn order_numbers_are_sequential() {
    let ctx = setup("orders_numbering").await;
    let client_id = seed_client(&ctx).await;
    let product_id = seed_stocked_product(&ctx, "Mouse", dec!(10), dec!(100)).await;

    let item = |qty: Decimal| NewOrderItem {
        product_id,
        quantity: qty,
        unit_price: None,
        discount: Decimal::ZERO,
        notes: None,
    };

    let first = ctx
        .orders
        .create_order(NewOrder {
            client_id,
            items: vec![item(dec!(1))],
            discount: Decimal::ZERO,
            notes: None,
            shipping_address: None,
        })
        .await
        .unwrap();
    let second = ctx
        .orders
        .create_order(NewOrder {
            client_id,
            items: vec![item(dec!(2))],
            discount: Decimal::ZERO,
            notes: None,
            shipping_address: None,
        })
        .await
        .unwrap();

    assert_eq!(first.order.order_number, "ORD-000001");
    assert_eq!(second.order.order_number, "ORD-000002");
}

#[tokio::test]
async fn completing_an_order_decrements_stock_through_movements() {
    let ctx = setup("orders_completion").await;
    let client_id = seed_client(&ctx).await;
    let product_id = seed_stocked_product(&ctx, "Monitor", dec!(200), dec!(10)).await;

    let created = ctx
        .orders
        .create_order(NewOrder {
            client_id,
            items: vec![NewOrderItem {
                product_id,
                quantity: dec!(4),
                unit_price: None,
                discount: Decimal::ZERO,
                notes: None,
            }],
            discount: Decimal::ZERO,
            notes: None,
            shipping_address: None,
        })
        .await
        .unwrap();

    let completed = ctx.orders.complete_order(created.order.id).await.unwrap();
    assert_eq!(completed.status().unwrap(), OrderStatus::Completed);
    assert!(completed.completed_at.is_some());

    let product = ctx.products.get_product(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity_on_hand, dec!(6));

    // The decrement went through the movement ledger.
    let (movements, _) = ctx
        .stock
        .list_movements(1, 10, Some(product_id), Some(MovementDirection::Outbound))
        .await
        .unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].quantity, dec!(4));
    assert_eq!(movements[0].quantity_after, dec!(6));
    assert_eq!(
        movements[0].reason.as_deref(),
        Some(format!("Sale {}", completed.order_number).as_str())
    );

    // Completing twice is rejected.
    let again = ctx.orders.complete_order(created.order.id).await;
    assert!(matches!(again, Err(ServiceError::InvalidOperation(_))));
}

#[tokio::test]
async fn completion_floors_stock_at_zero_when_over_ordered() {
    let ctx = setup("orders_overdraw").await;
    let client_id = seed_client(&ctx).await;
    // Only 2 on hand, but the order asks for 5.
    let product_id = seed_stocked_product(&ctx, "Webcam", dec!(80), dec!(2)).await;

    let created = ctx
        .orders
        .create_order(NewOrder {
            client_id,
            items: vec![NewOrderItem {
                product_id,
                quantity: dec!(5),
                unit_price: None,
                discount: Decimal::ZERO,
                notes: None,
            }],
            discount: Decimal::ZERO,
            notes: None,
            shipping_address: None,
        })
        .await
        .unwrap();

    ctx.orders.complete_order(created.order.id).await.unwrap();

    let product = ctx.products.get_product(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity_on_hand, dec!(0));
}

#[tokio::test]
async fn cancelled_orders_cannot_complete() {
    let ctx = setup("orders_cancel").await;
    let client_id = seed_client(&ctx).await;
    let product_id = seed_stocked_product(&ctx, "Headset", dec!(50), dec!(10)).await;

    let created = ctx
        .orders
        .create_order(NewOrder {
            client_id,
            items: vec![NewOrderItem {
                product_id,
                quantity: dec!(1),
                unit_price: None,
                discount: Decimal::ZERO,
                notes: None,
            }],
            discount: Decimal::ZERO,
            notes: None,
            shipping_address: None,
        })
        .await
        .unwrap();

    let cancelled = ctx.orders.cancel_order(created.order.id).await.unwrap();
    assert_eq!(cancelled.status().unwrap(), OrderStatus::Cancelled);

    let result = ctx.orders.complete_order(created.order.id).await;
    assert!(matches!(result, Err(ServiceError::InvalidOperation(_))));

    // Stock never moved.
    let product = ctx.products.get_product(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity_on_hand, dec!(10));
}

#[tokio::test]
async fn orders_require_existing_client_and_items() {
    let ctx = setup("orders_validation").await;
    let client_id = seed_client(&ctx).await;
    let product_id = seed_stocked_product(&ctx, "Hub", dec!(30), dec!(5)).await;

    let missing_client = ctx
        .orders
        .create_order(NewOrder {
            client_id: Uuid::new_v4(),
            items: vec![NewOrderItem {
                product_id,
                quantity: dec!(1),
                unit_price: None,
                discount: Decimal::ZERO,
                notes: None,
            }],
            discount: Decimal::ZERO,
            notes: None,
            shipping_address: None,
        })
        .await;
    assert!(matches!(missing_client, Err(ServiceError::NotFound(_))));

    let empty_items = ctx
        .orders
        .create_order(NewOrder {
            client_id,
            items: vec![],
            discount: Decimal::ZERO,
            notes: None,
            shipping_address: None,
        })
        .await;
    assert!(matches!(empty_items, Err(ServiceError::InvalidInput(_))));
}
