//! Business logic services. Each service owns a slice of the domain and is
//! constructed over a shared connection pool plus the event sender.

pub mod categories;
pub mod clients;
pub mod orders;
pub mod products;
pub mod reports;
pub mod stock;
pub mod suppliers;
