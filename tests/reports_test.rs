use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::mpsc;
use uuid::Uuid;

use estoque_api::{
    costing::MovementDirection,
    db::{establish_connection, run_migrations, DbPool},
    entities::product::StockUnit,
    events::EventSender,
    services::{
        categories::CategoryService,
        products::{NewProduct, ProductPatch, ProductService},
        reports::ReportService,
        stock::{NewMovement, StockService},
    },
};

struct TestContext {
    categories: CategoryService,
    products: ProductService,
    stock: StockService,
    reports: ReportService,
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
        categories: CategoryService::new(db.clone(), event_sender.clone()),
        products: ProductService::new(db.clone(), event_sender.clone()),
        stock: StockService::new(db.clone(), event_sender),
        reports: ReportService::new(db),
        _event_rx: rx,
    }
}

async fn seed_product(
    ctx: &TestContext,
    category_id: Uuid,
    name: &str,
    min_quantity: Decimal,
) -> Uuid {
    ctx.products
        .create_product(NewProduct {
            sku: None,
            name: name.to_string(),
            description: None,
            category_id,
            unit: StockUnit::Un,
            price: dec!(10),
            min_quantity,
            ncm: None,
            barcode: None,
        })
        .await
        .expect("Failed to create product")
}

async fn stock_in(ctx: &TestContext, product_id: Uuid, qty: Decimal, cost: Decimal) {
    ctx.stock
        .record_movement(NewMovement {
            product_id,
            direction: MovementDirection::Inbound,
            quantity: qty,
            unit_cost: Some(cost),
            supplier_id: None,
            reason: None,
            notes: None,
        })
        .await
        .expect("Failed to record inbound movement");
}

#[tokio::test]
async fn dashboard_counts_stock_states_and_value() {
    let ctx = setup("reports_dashboard").await;

    let electronics = ctx
        .categories
        .create_category("Electronics".to_string(), None)
        .await
        .unwrap();
    let office = ctx
        .categories
        .create_category("Office".to_string(), None)
        .await
        .unwrap();

    // Healthy stock: 10 on hand at cost 5 -> value 50.
    let healthy = seed_product(&ctx, electronics, "Healthy", dec!(2)).await;
    stock_in(&ctx, healthy, dec!(10), dec!(5)).await;

    // Low stock: 1 on hand with a minimum of 3.
    let low = seed_product(&ctx, electronics, "Low", dec!(3)).await;
    stock_in(&ctx, low, dec!(1), dec!(4)).await;

    // Out of stock: never received.
    let _out = seed_product(&ctx, office, "Out", dec!(0)).await;

    // Outbound traffic shows up in the 30-day window.
    ctx.stock
        .record_movement(NewMovement {
            product_id: healthy,
            direction: MovementDirection::Outbound,
            quantity: dec!(2),
            unit_cost: None,
            supplier_id: None,
            reason: None,
            notes: None,
        })
        .await
        .unwrap();

    let stats = ctx.reports.dashboard().await.unwrap();

    assert_eq!(stats.products.total, 3);
    assert_eq!(stats.products.active, 3);
    assert_eq!(stats.products.low_stock, 1);
    assert_eq!(stats.products.out_of_stock, 1);
    // Healthy: 8 * 5 = 40, Low: 1 * 4 = 4.
    assert_eq!(stats.stock_value, dec!(44));
    assert_eq!(stats.movements.inbound_last_30_days, dec!(11));
    assert_eq!(stats.movements.outbound_last_30_days, dec!(2));

    let electronics_count = stats
        .top_categories
        .iter()
        .find(|c| c.name == "Electronics")
        .map(|c| c.product_count);
    assert_eq!(electronics_count, Some(2));
}

#[tokio::test]
async fn stock_by_category_groups_quantity_and_value() {
    let ctx = setup("reports_by_category").await;

    let tools = ctx
        .categories
        .create_category("Tools".to_string(), None)
        .await
        .unwrap();
    let empty = ctx
        .categories
        .create_category("Empty".to_string(), None)
        .await
        .unwrap();

    let hammer = seed_product(&ctx, tools, "Hammer", dec!(0)).await;
    stock_in(&ctx, hammer, dec!(5), dec!(20)).await;
    let saw = seed_product(&ctx, tools, "Saw", dec!(0)).await;
    stock_in(&ctx, saw, dec!(2), dec!(30)).await;

    let summaries = ctx.reports.stock_by_category().await.unwrap();

    let tools_row = summaries
        .iter()
        .find(|s| s.category_id == tools)
        .expect("tools category missing");
    assert_eq!(tools_row.product_count, 2);
    assert_eq!(tools_row.total_quantity, dec!(7));
    // 5 * 20 + 2 * 30 = 160.
    assert_eq!(tools_row.total_value, dec!(160));

    let empty_row = summaries
        .iter()
        .find(|s| s.category_id == empty)
        .expect("empty category missing");
    assert_eq!(empty_row.product_count, 0);
    assert_eq!(empty_row.total_quantity, dec!(0));
}

#[tokio::test]
async fn inactive_products_do_not_count_as_active() {
    let ctx = setup("reports_inactive").await;

    let misc = ctx
        .categories
        .create_category("Misc".to_string(), None)
        .await
        .unwrap();
    let retired = seed_product(&ctx, misc, "Retired", dec!(0)).await;

    ctx.products
        .update_product(
            retired,
            ProductPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stats = ctx.reports.dashboard().await.unwrap();
    assert_eq!(stats.products.total, 1);
    assert_eq!(stats.products.active, 0);
}
