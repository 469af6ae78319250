//! In-process domain events.
//!
//! Services emit an [`Event`] after each committed state change; a spawned
//! consumer task drains the channel and logs them. Integrations hang off the
//! consumer, keeping request handlers free of delivery concerns.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::costing::MovementDirection;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

// The various events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Catalog events
    CategoryCreated(Uuid),
    CategoryDeleted(Uuid),
    ProductCreated(Uuid),
    ProductUpdated(Uuid),
    ProductDeleted(Uuid),

    // Contact events
    SupplierCreated(Uuid),
    SupplierUpdated(Uuid),
    ClientCreated(Uuid),
    ClientUpdated(Uuid),

    // Stock events
    MovementRecorded {
        movement_id: Uuid,
        product_id: Uuid,
        direction: MovementDirection,
        quantity: Decimal,
        quantity_before: Decimal,
        quantity_after: Decimal,
        unit_cost_after: Decimal,
        occurred_at: DateTime<Utc>,
    },
    LowStockDetected {
        product_id: Uuid,
        quantity_on_hand: Decimal,
        min_quantity: Decimal,
    },

    // Sales order events
    OrderCreated(Uuid),
    OrderCompleted {
        order_id: Uuid,
        completed_at: DateTime<Utc>,
    },
    OrderCancelled(Uuid),
}

/// Consumes events from the channel until every sender is dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::MovementRecorded {
                movement_id,
                product_id,
                direction,
                quantity,
                quantity_after,
                ..
            } => {
                info!(
                    movement_id = %movement_id,
                    product_id = %product_id,
                    direction = %direction,
                    quantity = %quantity,
                    quantity_after = %quantity_after,
                    "stock movement recorded"
                );
            }
            Event::LowStockDetected {
                product_id,
                quantity_on_hand,
                min_quantity,
            } => {
                warn!(
                    product_id = %product_id,
                    quantity_on_hand = %quantity_on_hand,
                    min_quantity = %min_quantity,
                    "product stock at or below minimum"
                );
            }
            other => info!(event = ?other, "domain event"),
        }
    }

    info!("Event channel closed; consumer exiting");
}
