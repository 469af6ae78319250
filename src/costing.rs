//! Stock-level arithmetic for movement application.
//!
//! [`apply_movement`] is the single place where a movement changes a product's
//! on-hand quantity and weighted-average unit cost. The service layer wraps it
//! in a per-movement database transaction; the function itself is pure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// The three movement kinds. `Adjustment` sets an absolute quantity rather
/// than applying a delta.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MovementDirection {
    Inbound,
    Outbound,
    Adjustment,
}

/// A product's costed stock position: what is on hand and at what average
/// unit cost. Both values are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub quantity_on_hand: Decimal,
    pub unit_cost: Decimal,
}

impl StockLevel {
    pub fn new(quantity_on_hand: Decimal, unit_cost: Decimal) -> Self {
        Self {
            quantity_on_hand,
            unit_cost,
        }
    }

    /// Monetary value of the position (`quantity_on_hand * unit_cost`).
    pub fn total_value(&self) -> Decimal {
        self.quantity_on_hand * self.unit_cost
    }
}

/// The part of a stock movement the costing math needs. `unit_cost` is only
/// meaningful for inbound movements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movement {
    pub direction: MovementDirection,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CostingError {
    /// Movement quantity must be strictly positive. A zero-quantity inbound
    /// would otherwise divide by zero in the weighted average.
    #[error("movement quantity must be greater than zero")]
    InvalidQuantity,

    #[error("movement unit cost cannot be negative")]
    NegativeUnitCost,
}

/// Apply one movement to a stock level and return the new level.
///
/// - Outbound subtracts, flooring at zero: requesting more than is on hand
///   drains the position rather than going negative. Cost is untouched.
/// - Adjustment sets the on-hand quantity to exactly `movement.quantity`.
///   Cost is untouched.
/// - Inbound adds, and when the movement carries a positive unit cost the
///   level's cost becomes the quantity-weighted average of the existing
///   position and the incoming units. A zero-cost inbound (e.g. a free
///   sample) leaves prior costing intact.
pub fn apply_movement(level: StockLevel, movement: &Movement) -> Result<StockLevel, CostingError> {
    if movement.quantity <= Decimal::ZERO {
        return Err(CostingError::InvalidQuantity);
    }
    if movement.unit_cost < Decimal::ZERO {
        return Err(CostingError::NegativeUnitCost);
    }

    let updated = match movement.direction {
        MovementDirection::Outbound => {
            let remaining = (level.quantity_on_hand - movement.quantity).max(Decimal::ZERO);
            StockLevel::new(remaining, level.unit_cost)
        }
        MovementDirection::Adjustment => StockLevel::new(movement.quantity, level.unit_cost),
        MovementDirection::Inbound => {
            let previous_quantity = level.quantity_on_hand;
            let new_quantity = previous_quantity + movement.quantity;

            let new_cost = if movement.unit_cost > Decimal::ZERO {
                if previous_quantity > Decimal::ZERO {
                    (previous_quantity * level.unit_cost
                        + movement.quantity * movement.unit_cost)
                        / new_quantity
                } else {
                    // No prior basis to average against.
                    movement.unit_cost
                }
            } else {
                level.unit_cost
            };

            StockLevel::new(new_quantity, new_cost)
        }
    };

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn level(quantity: Decimal, cost: Decimal) -> StockLevel {
        StockLevel::new(quantity, cost)
    }

    fn movement(direction: MovementDirection, quantity: Decimal, cost: Decimal) -> Movement {
        Movement {
            direction,
            quantity,
            unit_cost: cost,
        }
    }

    #[test]
    fn first_inbound_sets_cost_directly() {
        let result = apply_movement(
            level(dec!(0), dec!(0)),
            &movement(MovementDirection::Inbound, dec!(100), dec!(50)),
        )
        .unwrap();

        assert_eq!(result.quantity_on_hand, dec!(100));
        assert_eq!(result.unit_cost, dec!(50));
    }

    #[test]
    fn second_inbound_blends_cost_by_quantity() {
        let result = apply_movement(
            level(dec!(100), dec!(50)),
            &movement(MovementDirection::Inbound, dec!(50), dec!(60)),
        )
        .unwrap();

        assert_eq!(result.quantity_on_hand, dec!(150));
        // (100 * 50 + 50 * 60) / 150 = 53.33..., strictly between 50 and 60.
        assert!(result.unit_cost > dec!(50) && result.unit_cost < dec!(60));
        assert_eq!(result.unit_cost.round_dp(2), dec!(53.33));
    }

    #[test]
    fn zero_cost_inbound_keeps_prior_cost() {
        let result = apply_movement(
            level(dec!(10), dec!(25)),
            &movement(MovementDirection::Inbound, dec!(5), dec!(0)),
        )
        .unwrap();

        assert_eq!(result.quantity_on_hand, dec!(15));
        assert_eq!(result.unit_cost, dec!(25));
    }

    #[test]
    fn outbound_subtracts_and_keeps_cost() {
        let result = apply_movement(
            level(dec!(100), dec!(42)),
            &movement(MovementDirection::Outbound, dec!(30), dec!(0)),
        )
        .unwrap();

        assert_eq!(result.quantity_on_hand, dec!(70));
        assert_eq!(result.unit_cost, dec!(42));
    }

    #[test]
    fn outbound_overdraw_floors_at_zero() {
        let result = apply_movement(
            level(dec!(20), dec!(42)),
            &movement(MovementDirection::Outbound, dec!(35), dec!(0)),
        )
        .unwrap();

        assert_eq!(result.quantity_on_hand, dec!(0));
        assert_eq!(result.unit_cost, dec!(42));
    }

    #[test]
    fn adjustment_sets_absolute_quantity() {
        let result = apply_movement(
            level(dec!(7), dec!(3.50)),
            &movement(MovementDirection::Adjustment, dec!(180), dec!(0)),
        )
        .unwrap();

        assert_eq!(result.quantity_on_hand, dec!(180));
        assert_eq!(result.unit_cost, dec!(3.50));
    }

    #[test]
    fn zero_quantity_movement_is_rejected() {
        for direction in [
            MovementDirection::Inbound,
            MovementDirection::Outbound,
            MovementDirection::Adjustment,
        ] {
            let result = apply_movement(
                level(dec!(10), dec!(5)),
                &movement(direction, dec!(0), dec!(1)),
            );
            assert_eq!(result, Err(CostingError::InvalidQuantity));
        }
    }

    #[test]
    fn negative_quantity_movement_is_rejected() {
        let result = apply_movement(
            level(dec!(10), dec!(5)),
            &movement(MovementDirection::Inbound, dec!(-1), dec!(1)),
        );
        assert_eq!(result, Err(CostingError::InvalidQuantity));
    }

    #[test]
    fn negative_unit_cost_is_rejected() {
        let result = apply_movement(
            level(dec!(10), dec!(5)),
            &movement(MovementDirection::Inbound, dec!(1), dec!(-2)),
        );
        assert_eq!(result, Err(CostingError::NegativeUnitCost));
    }
}
