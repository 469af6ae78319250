//! Persistence models (sea-orm entities) for the catalog, contacts, stock
//! ledger and sales documents.

pub mod category;
pub mod client;
pub mod product;
pub mod sales_order;
pub mod sales_order_item;
pub mod stock_movement;
pub mod supplier;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Whether a contact (client or supplier) is a natural person holding a CPF
/// or a company holding a CNPJ. Stored as its string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PartyKind {
    Individual,
    Company,
}
