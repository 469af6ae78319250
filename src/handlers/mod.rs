//! HTTP layer: request DTOs, axum handlers and per-domain routers.

pub mod categories;
pub mod clients;
pub mod common;
pub mod health;
pub mod orders;
pub mod products;
pub mod reports;
pub mod stock;
pub mod suppliers;

use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub categories: Arc<crate::services::categories::CategoryService>,
    pub products: Arc<crate::services::products::ProductService>,
    pub suppliers: Arc<crate::services::suppliers::SupplierService>,
    pub clients: Arc<crate::services::clients::ClientService>,
    pub stock: Arc<crate::services::stock::StockService>,
    pub orders: Arc<crate::services::orders::OrderService>,
    pub reports: Arc<crate::services::reports::ReportService>,
}

impl AppServices {
    /// Build the full service container over one pool and event sender.
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            categories: Arc::new(crate::services::categories::CategoryService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            products: Arc::new(crate::services::products::ProductService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            suppliers: Arc::new(crate::services::suppliers::SupplierService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            clients: Arc::new(crate::services::clients::ClientService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            stock: Arc::new(crate::services::stock::StockService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            orders: Arc::new(crate::services::orders::OrderService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            reports: Arc::new(crate::services::reports::ReportService::new(db_pool)),
        }
    }
}
