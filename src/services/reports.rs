use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    costing::MovementDirection,
    db::DbPool,
    entities::category::{self, Entity as Category},
    entities::product::Entity as Product,
    entities::stock_movement::{self, Column as MovementColumn, Entity as StockMovement},
    errors::ServiceError,
};

/// Product counters for the dashboard
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductStats {
    pub total: u64,
    pub active: u64,
    pub low_stock: u64,
    pub out_of_stock: u64,
}

/// Movement quantity totals over the trailing 30 days
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MovementStats {
    pub inbound_last_30_days: Decimal,
    pub outbound_last_30_days: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryCount {
    pub id: Uuid,
    pub name: String,
    pub product_count: u64,
}

/// Aggregate dashboard numbers
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardStats {
    pub products: ProductStats,
    /// Total inventory value at weighted-average cost
    pub stock_value: Decimal,
    pub movements: MovementStats,
    pub top_categories: Vec<CategoryCount>,
}

/// Stock position of one category
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryStockSummary {
    pub category_id: Uuid,
    pub category_name: String,
    pub product_count: u64,
    pub total_quantity: Decimal,
    pub total_value: Decimal,
}

/// Read-only reporting over the catalog and the movement ledger.
pub struct ReportService {
    db_pool: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Dashboard statistics: product counters, total stock value at cost,
    /// trailing-30-day movement volume and the largest categories.
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardStats, ServiceError> {
        let db = &*self.db_pool;

        let products = Product::find()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let total = products.len() as u64;
        let active = products.iter().filter(|p| p.is_active).count() as u64;
        let low_stock = products.iter().filter(|p| p.is_low_stock()).count() as u64;
        let out_of_stock = products.iter().filter(|p| p.is_out_of_stock()).count() as u64;
        let stock_value: Decimal = products.iter().map(|p| p.stock_value()).sum();

        let window_start = Utc::now() - Duration::days(30);
        let recent = StockMovement::find()
            .filter(MovementColumn::CreatedAt.gte(window_start))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut inbound = Decimal::ZERO;
        let mut outbound = Decimal::ZERO;
        for movement in &recent {
            match movement.direction.parse::<MovementDirection>() {
                Ok(MovementDirection::Inbound) => inbound += movement.quantity,
                Ok(MovementDirection::Outbound) => outbound += movement.quantity,
                _ => {}
            }
        }

        let categories = Category::find()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for p in &products {
            *counts.entry(p.category_id).or_default() += 1;
        }

        let mut top_categories: Vec<CategoryCount> = categories
            .into_iter()
            .map(|c| CategoryCount {
                product_count: counts.get(&c.id).copied().unwrap_or(0),
                id: c.id,
                name: c.name,
            })
            .collect();
        top_categories.sort_by(|a, b| b.product_count.cmp(&a.product_count));
        top_categories.truncate(5);

        Ok(DashboardStats {
            products: ProductStats {
                total,
                active,
                low_stock,
                out_of_stock,
            },
            stock_value,
            movements: MovementStats {
                inbound_last_30_days: inbound,
                outbound_last_30_days: outbound,
            },
            top_categories,
        })
    }

    /// Stock valuation grouped by category.
    #[instrument(skip(self))]
    pub async fn stock_by_category(&self) -> Result<Vec<CategoryStockSummary>, ServiceError> {
        let db = &*self.db_pool;

        let categories = Category::find()
            .order_by_asc(category::Column::Name)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let products = Product::find()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut by_category: HashMap<Uuid, (u64, Decimal, Decimal)> = HashMap::new();
        for p in &products {
            let entry = by_category
                .entry(p.category_id)
                .or_insert((0, Decimal::ZERO, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += p.quantity_on_hand;
            entry.2 += p.stock_value();
        }

        Ok(categories
            .into_iter()
            .map(|c| {
                let (product_count, total_quantity, total_value) = by_category
                    .get(&c.id)
                    .copied()
                    .unwrap_or((0, Decimal::ZERO, Decimal::ZERO));
                CategoryStockSummary {
                    category_id: c.id,
                    category_name: c.name,
                    product_count,
                    total_quantity,
                    total_value,
                }
            })
            .collect())
    }

    /// Most recent movements, newest first.
    #[instrument(skip(self))]
    pub async fn recent_movements(
        &self,
        limit: u64,
    ) -> Result<Vec<stock_movement::Model>, ServiceError> {
        let db = &*self.db_pool;

        StockMovement::find()
            .order_by_desc(MovementColumn::CreatedAt)
            .limit(limit)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }
}
