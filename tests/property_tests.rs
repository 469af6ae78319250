//! Property-based tests for the tax-ID validator and the costing math.
//!
//! These use proptest to verify invariants across a wide range of inputs,
//! helping to catch edge cases that unit tests might miss.

use proptest::prelude::*;
use rust_decimal::Decimal;

use estoque_api::costing::{apply_movement, Movement, MovementDirection, StockLevel};
use estoque_api::tax_id::{validate, TaxIdError, TaxIdKind};

/// Independent check-digit oracle used to build valid payloads.
fn mod11_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let r = sum % 11;
    if r < 2 {
        0
    } else {
        11 - r
    }
}

fn valid_cpf() -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(0u32..10, 9)
        .prop_filter("all-identical payloads collapse to repeated digits", |p| {
            p.iter().any(|&d| d != p[0])
        })
        .prop_map(|mut payload| {
            let d1 = mod11_digit(&payload, &[10, 9, 8, 7, 6, 5, 4, 3, 2]);
            payload.push(d1);
            let d2 = mod11_digit(&payload, &[11, 10, 9, 8, 7, 6, 5, 4, 3, 2]);
            payload.push(d2);
            payload
        })
}

fn valid_cnpj() -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(0u32..10, 12)
        .prop_filter("all-identical payloads collapse to repeated digits", |p| {
            p.iter().any(|&d| d != p[0])
        })
        .prop_map(|mut payload| {
            let d1 = mod11_digit(&payload, &[5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);
            payload.push(d1);
            let d2 = mod11_digit(&payload, &[6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);
            payload.push(d2);
            payload
        })
}

fn digits_to_string(digits: &[u32]) -> String {
    digits.iter().map(|d| d.to_string()).collect()
}

fn decimal(int: i64, scale: u32) -> Decimal {
    Decimal::new(int, scale)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn generated_cpfs_validate_as_individual(payload in valid_cpf()) {
        let input = digits_to_string(&payload);
        prop_assert_eq!(validate(&input), Ok(TaxIdKind::Individual));
    }

    #[test]
    fn generated_cnpjs_validate_as_company(payload in valid_cnpj()) {
        let input = digits_to_string(&payload);
        prop_assert_eq!(validate(&input), Ok(TaxIdKind::Company));
    }

    #[test]
    fn corrupting_the_final_check_digit_always_fails(payload in valid_cpf(), delta in 1u32..10) {
        let mut corrupted = payload;
        let last = corrupted.len() - 1;
        corrupted[last] = (corrupted[last] + delta) % 10;

        let input = digits_to_string(&corrupted);
        // The second check digit is uniquely determined by the first 10
        // digits, so any change to it must be caught (unless the mutation
        // happens to produce a repeated-digit sequence, also invalid).
        prop_assert!(validate(&input).is_err());
    }

    #[test]
    fn formatting_never_changes_the_outcome(payload in valid_cpf()) {
        let bare = digits_to_string(&payload);
        let formatted = format!(
            "{}.{}.{}-{}",
            &bare[0..3], &bare[3..6], &bare[6..9], &bare[9..11]
        );
        prop_assert_eq!(validate(&bare), validate(&formatted));
    }

    #[test]
    fn lengths_other_than_11_and_14_are_rejected(len in 0usize..25) {
        prop_assume!(len != 11 && len != 14);
        let input = "1".repeat(len).chars().enumerate()
            .map(|(i, _)| char::from_digit((i % 10) as u32, 10).unwrap())
            .collect::<String>();
        prop_assert_eq!(validate(&input), Err(TaxIdError::WrongLength(len)));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn outbound_never_goes_negative(
        on_hand in 0i64..1_000_000,
        qty in 1i64..1_000_000,
    ) {
        let level = StockLevel::new(decimal(on_hand, 2), decimal(1234, 2));
        let result = apply_movement(level, &Movement {
            direction: MovementDirection::Outbound,
            quantity: decimal(qty, 2),
            unit_cost: Decimal::ZERO,
        }).unwrap();

        prop_assert!(result.quantity_on_hand >= Decimal::ZERO);
        prop_assert_eq!(result.unit_cost, level.unit_cost);
    }

    #[test]
    fn inbound_average_stays_between_both_costs(
        on_hand in 1i64..100_000,
        old_cost in 1i64..100_000,
        qty in 1i64..100_000,
        new_cost in 1i64..100_000,
    ) {
        let level = StockLevel::new(decimal(on_hand, 2), decimal(old_cost, 2));
        let result = apply_movement(level, &Movement {
            direction: MovementDirection::Inbound,
            quantity: decimal(qty, 2),
            unit_cost: decimal(new_cost, 2),
        }).unwrap();

        let low = level.unit_cost.min(decimal(new_cost, 2));
        let high = level.unit_cost.max(decimal(new_cost, 2));
        prop_assert!(result.unit_cost >= low);
        prop_assert!(result.unit_cost <= high);
        prop_assert_eq!(
            result.quantity_on_hand,
            level.quantity_on_hand + decimal(qty, 2)
        );
    }

    #[test]
    fn inbound_preserves_total_stock_value(
        on_hand in 0i64..100_000,
        old_cost in 0i64..100_000,
        qty in 1i64..100_000,
        new_cost in 1i64..100_000,
    ) {
        let level = StockLevel::new(decimal(on_hand, 2), decimal(old_cost, 2));
        let movement = Movement {
            direction: MovementDirection::Inbound,
            quantity: decimal(qty, 2),
            unit_cost: decimal(new_cost, 2),
        };
        let result = apply_movement(level, &movement).unwrap();

        // The weighted average conserves inventory value up to division
        // rounding: old value + received value == new value.
        let expected = level.total_value() + movement.quantity * movement.unit_cost;
        let diff = (result.total_value() - expected).abs();
        prop_assert!(diff < Decimal::new(1, 6));
    }

    #[test]
    fn adjustment_is_idempotent(
        on_hand in 0i64..100_000,
        cost in 0i64..100_000,
        target in 1i64..100_000,
    ) {
        let level = StockLevel::new(decimal(on_hand, 2), decimal(cost, 2));
        let movement = Movement {
            direction: MovementDirection::Adjustment,
            quantity: decimal(target, 2),
            unit_cost: Decimal::ZERO,
        };

        let once = apply_movement(level, &movement).unwrap();
        let twice = apply_movement(once, &movement).unwrap();
        prop_assert_eq!(once, twice);
        prop_assert_eq!(once.quantity_on_hand, decimal(target, 2));
    }
}
