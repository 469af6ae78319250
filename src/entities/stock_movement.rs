use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable record of one stock movement. The direction is stored as its
/// string form of [`crate::costing::MovementDirection`]; `quantity_before`
/// and `quantity_after` snapshot the product position around the mutation,
/// so history reads never need to replay costing.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub product_id: Uuid,

    /// "inbound", "outbound" or "adjustment"
    pub direction: String,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub quantity: Decimal,

    /// Acquisition cost per unit; meaningful only for inbound movements
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub unit_cost: Decimal,

    /// Source supplier for inbound movements
    pub supplier_id: Option<Uuid>,

    pub reason: Option<String>,
    pub notes: Option<String>,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub quantity_before: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub quantity_after: Decimal,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
