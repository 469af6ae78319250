use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Supplier entity. `tax_id` holds the canonical (digits-only) CPF or CNPJ
/// and is validated before a row is ever written.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "suppliers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[validate(length(
        min = 1,
        max = 200,
        message = "Supplier name must be between 1 and 200 characters"
    ))]
    pub name: String,

    /// "individual" (CPF holder) or "company" (CNPJ holder)
    pub kind: String,

    /// Canonical tax ID, unique across suppliers
    #[sea_orm(unique)]
    pub tax_id: String,

    #[validate(email(message = "Invalid e-mail address"))]
    pub email: Option<String>,
    pub phone: Option<String>,

    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,

    pub contact_person: Option<String>,
    pub payment_terms: Option<String>,

    pub is_active: bool,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stock_movement::Entity")]
    StockMovement,
}

impl Related<super::stock_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockMovement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
