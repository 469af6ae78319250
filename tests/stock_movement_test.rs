use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::mpsc;
use uuid::Uuid;

use estoque_api::{
    costing::MovementDirection,
    db::{establish_connection, run_migrations, DbPool},
    entities::product::StockUnit,
    errors::ServiceError,
    events::EventSender,
    services::{
        categories::CategoryService,
        products::{NewProduct, ProductService},
        stock::{NewMovement, StockService},
        suppliers::{NewSupplier, SupplierService},
    },
};

struct TestContext {
    db: Arc<DbPool>,
    products: ProductService,
    stock: StockService,
    suppliers: SupplierService,
    // Keep the receiver alive so event sends do not fail mid-test.
    _event_rx: mpsc::Receiver<estoque_api::events::Event>,
}

async fn setup(db_name: &str) -> TestContext {
    let url = format!("sqlite:file:{}?mode=memory&cache=shared", db_name);
    let db = Arc::new(
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
        stock: StockService::new(db.clone(), event_sender.clone()),
        suppliers: SupplierService::new(db.clone(), event_sender),
        db,
        _event_rx: rx,
    }
}

async fn seed_product(ctx: &TestContext, name: &str) -> Uuid {
    let (tx, _rx) = mpsc::channel(10);
    let categories = CategoryService::new(ctx.db.clone(), Arc::new(EventSender::new(tx)));
    let category_id = categories
        .create_category(format!("{} category", name), None)
        .await
        .expect("Failed to create category");

    ctx.products
        .create_product(NewProduct {
            sku: None,
            name: name.to_string(),
            description: None,
            category_id,
            unit: StockUnit::Un,
            price: dec!(99.90),
            min_quantity: Decimal::ZERO,
            ncm: None,
            barcode: None,
        })
        .await
        .expect("Failed to create product")
}

fn movement(
    product_id: Uuid,
    direction: MovementDirection,
    quantity: Decimal,
    unit_cost: Option<Decimal>,
) -> NewMovement {
    NewMovement {
        product_id,
        direction,
        quantity,
        unit_cost,
        supplier_id: None,
        reason: Some("test".to_string()),
        notes: None,
    }
}

#[tokio::test]
async fn inbound_movements_apply_weighted_average_cost() {
    let ctx = setup("stock_weighted_average").await;
    let product_id = seed_product(&ctx, "Laptop").await;

    // First inbound: 100 units at 50. No prior basis, cost is taken as-is.
    let first = ctx
        .stock
        .record_movement(movement(
            product_id,
            MovementDirection::Inbound,
            dec!(100),
            Some(dec!(50)),
        ))
        .await
        .expect("first inbound failed");

    assert_eq!(first.quantity_before, dec!(0));
    assert_eq!(first.quantity_after, dec!(100));

    let product = ctx.products.get_product(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity_on_hand, dec!(100));
    assert_eq!(product.unit_cost, dec!(50));

    // Second inbound: 50 units at 60 -> (100*50 + 50*60) / 150 = 53.33...
    let second = ctx
        .stock
        .record_movement(movement(
            product_id,
            MovementDirection::Inbound,
            dec!(50),
            Some(dec!(60)),
        ))
        .await
        .expect("second inbound failed");

    assert_eq!(second.quantity_after, dec!(150));

    let product = ctx.products.get_product(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity_on_hand, dec!(150));
    assert!(product.unit_cost > dec!(50) && product.unit_cost < dec!(60));
    assert_eq!(product.unit_cost.round_dp(2), dec!(53.33));
}

#[tokio::test]
async fn zero_cost_inbound_keeps_prior_cost() {
    let ctx = setup("stock_zero_cost_inbound").await;
    let product_id = seed_product(&ctx, "Mouse").await;

    ctx.stock
        .record_movement(movement(
            product_id,
            MovementDirection::Inbound,
            dec!(10),
            Some(dec!(25)),
        ))
        .await
        .unwrap();

    // A zero-cost inbound (e.g. free replacement units) adds quantity but
    // must not erase the existing cost basis.
    ctx.stock
        .record_movement(movement(
            product_id,
            MovementDirection::Inbound,
            dec!(5),
            None,
        ))
        .await
        .unwrap();

    let product = ctx.products.get_product(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity_on_hand, dec!(15));
    assert_eq!(product.unit_cost, dec!(25));
}

#[tokio::test]
async fn outbound_subtracts_and_floors_at_zero() {
    let ctx = setup("stock_outbound_floor").await;
    let product_id = seed_product(&ctx, "Keyboard").await;

    ctx.stock
        .record_movement(movement(
            product_id,
            MovementDirection::Inbound,
            dec!(100),
            Some(dec!(40)),
        ))
        .await
        .unwrap();

    let out = ctx
        .stock
        .record_movement(movement(
            product_id,
            MovementDirection::Outbound,
            dec!(30),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(out.quantity_before, dec!(100));
    assert_eq!(out.quantity_after, dec!(70));

    let product = ctx.products.get_product(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity_on_hand, dec!(70));
    assert_eq!(product.unit_cost, dec!(40));

    // Requesting more than is on hand drains to zero, never negative.
    let overdraw = ctx
        .stock
        .record_movement(movement(
            product_id,
            MovementDirection::Outbound,
            dec!(500),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(overdraw.quantity_after, dec!(0));

    let product = ctx.products.get_product(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity_on_hand, dec!(0));
    assert_eq!(product.unit_cost, dec!(40));
}

#[tokio::test]
async fn adjustment_sets_absolute_quantity() {
    let ctx = setup("stock_adjustment").await;
    let product_id = seed_product(&ctx, "Monitor").await;

    ctx.stock
        .record_movement(movement(
            product_id,
            MovementDirection::Inbound,
            dec!(7),
            Some(dec!(3.50)),
        ))
        .await
        .unwrap();

    ctx.stock
        .record_movement(movement(
            product_id,
            MovementDirection::Adjustment,
            dec!(180),
            None,
        ))
        .await
        .unwrap();

    let product = ctx.products.get_product(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity_on_hand, dec!(180));
    assert_eq!(product.unit_cost, dec!(3.50));
}

#[tokio::test]
async fn zero_quantity_movement_is_rejected() {
    let ctx = setup("stock_zero_quantity").await;
    let product_id = seed_product(&ctx, "Cable").await;

    let result = ctx
        .stock
        .record_movement(movement(
            product_id,
            MovementDirection::Inbound,
            dec!(0),
            Some(dec!(10)),
        ))
        .await;

    assert!(matches!(
        result,
        Err(ServiceError::InvalidMovementQuantity(_))
    ));

    // Nothing was recorded and the product is untouched.
    let (movements, total) = ctx
        .stock
        .list_movements(1, 10, Some(product_id), None)
        .await
        .unwrap();
    assert_eq!(total, 0);
    assert!(movements.is_empty());

    let product = ctx.products.get_product(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity_on_hand, dec!(0));
}

#[tokio::test]
async fn movement_for_unknown_product_is_not_found() {
    let ctx = setup("stock_unknown_product").await;

    let result = ctx
        .stock
        .record_movement(movement(
            Uuid::new_v4(),
            MovementDirection::Inbound,
            dec!(1),
            Some(dec!(1)),
        ))
        .await;

    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn inbound_with_supplier_links_the_movement() {
    let ctx = setup("stock_with_supplier").await;
    let product_id = seed_product(&ctx, "Desk").await;

    let supplier_id = ctx
        .suppliers
        .create_supplier(NewSupplier {
            name: "ACME Distribuidora".to_string(),
            tax_id: "11.222.333/0001-81".to_string(),
            email: None,
            phone: None,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            contact_person: None,
            payment_terms: None,
            notes: None,
        })
        .await
        .expect("Failed to create supplier");

    let recorded = ctx
        .stock
        .record_movement(NewMovement {
            product_id,
            direction: MovementDirection::Inbound,
            quantity: dec!(20),
            unit_cost: Some(dec!(120)),
            supplier_id: Some(supplier_id),
            reason: Some("Purchase".to_string()),
            notes: None,
        })
        .await
        .unwrap();

    assert_eq!(recorded.supplier_id, Some(supplier_id));

    // History filters by product and direction.
    let (movements, total) = ctx
        .stock
        .list_movements(1, 10, Some(product_id), Some(MovementDirection::Inbound))
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(movements[0].id, recorded.id);
}
