use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Stock unit of measure a product is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StockUnit {
    /// Single unit
    Un,
    /// Box
    Cx,
    /// Kilogram
    Kg,
    /// Liter
    Lt,
    /// Meter
    Mt,
    /// Piece
    Pc,
}

impl StockUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockUnit::Un => "UN",
            StockUnit::Cx => "CX",
            StockUnit::Kg => "KG",
            StockUnit::Lt => "LT",
            StockUnit::Mt => "MT",
            StockUnit::Pc => "PC",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "UN" => Some(StockUnit::Un),
            "CX" => Some(StockUnit::Cx),
            "KG" => Some(StockUnit::Kg),
            "LT" => Some(StockUnit::Lt),
            "MT" => Some(StockUnit::Mt),
            "PC" => Some(StockUnit::Pc),
            _ => None,
        }
    }
}

/// Product entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// SKU (Stock Keeping Unit), generated as PROD-XXXX when not supplied
    #[sea_orm(unique)]
    #[validate(length(
        min = 1,
        max = 50,
        message = "SKU must be between 1 and 50 characters"
    ))]
    pub sku: String,

    #[validate(length(
        min = 1,
        max = 200,
        message = "Product name must be between 1 and 200 characters"
    ))]
    pub name: String,

    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,

    pub category_id: Uuid,

    /// Unit of measure, stored as its short code (UN, CX, KG, LT, MT, PC)
    pub unit: String,

    /// Sale price per unit
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,

    /// Quantity currently on hand; only mutated through movement application
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub quantity_on_hand: Decimal,

    /// Threshold for the low-stock alert; zero disables the alert
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub min_quantity: Decimal,

    /// Weighted-average acquisition cost per unit
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub unit_cost: Decimal,

    /// Mercosur tariff classification code
    pub ncm: Option<String>,

    /// EAN-13 barcode
    pub barcode: Option<String>,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// Stock at or below the configured minimum (when a minimum is set).
    pub fn is_low_stock(&self) -> bool {
        self.min_quantity > Decimal::ZERO && self.quantity_on_hand <= self.min_quantity
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.quantity_on_hand <= Decimal::ZERO
    }

    /// Monetary value of this product's position (`on hand * unit cost`).
    pub fn stock_value(&self) -> Decimal {
        self.quantity_on_hand * self.unit_cost
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::stock_movement::Entity")]
    StockMovement,
    #[sea_orm(has_many = "super::sales_order_item::Entity")]
    SalesOrderItem,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::stock_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockMovement.def()
    }
}

impl Related<super::sales_order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SalesOrderItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn model(on_hand: Decimal, min: Decimal) -> Model {
        Model {
            id: Uuid::new_v4(),
            sku: "PROD-0001".into(),
            name: "Test".into(),
            description: None,
            category_id: Uuid::new_v4(),
            unit: "UN".into(),
            price: dec!(10),
            quantity_on_hand: on_hand,
            min_quantity: min,
            unit_cost: dec!(4),
            ncm: None,
            barcode: None,
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn low_stock_requires_configured_minimum() {
        assert!(model(dec!(3), dec!(5)).is_low_stock());
        assert!(!model(dec!(3), dec!(0)).is_low_stock());
        assert!(!model(dec!(8), dec!(5)).is_low_stock());
    }

    #[test]
    fn stock_value_is_quantity_times_cost() {
        assert_eq!(model(dec!(3), dec!(0)).stock_value(), dec!(12));
    }
}
