//! Brazilian tax-ID (CPF/CNPJ) check-digit validation.
//!
//! Both identifier kinds carry two trailing check digits computed as weighted
//! modulo-11 sums over the preceding digits. The two schemes differ only in
//! length and weight tables, so a single routine handles both.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which kind of tax identifier a validated input turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxIdKind {
    /// CPF: 11-digit individual taxpayer ID.
    Individual,
    /// CNPJ: 14-digit company taxpayer ID.
    Company,
}

/// Why an input failed validation. All variants are recoverable input errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxIdError {
    #[error("tax ID must have 11 digits (CPF) or 14 digits (CNPJ), got {0}")]
    WrongLength(usize),

    #[error("tax ID with all digits identical is not valid")]
    RepeatedDigits,

    #[error("tax ID check digits do not match")]
    CheckDigitMismatch,
}

/// CPF weight tables: first digit over 9 payload digits, second over 10.
const CPF_WEIGHTS_1: &[u32] = &[10, 9, 8, 7, 6, 5, 4, 3, 2];
const CPF_WEIGHTS_2: &[u32] = &[11, 10, 9, 8, 7, 6, 5, 4, 3, 2];

/// CNPJ weight tables: first digit over 12 payload digits, second over 13.
const CNPJ_WEIGHTS_1: &[u32] = &[5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_WEIGHTS_2: &[u32] = &[6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Strip formatting and return only the decimal digits of `input`.
///
/// This is the canonical form used for storage and uniqueness checks, so
/// `111.444.777-35` and `11144477735` refer to the same person.
pub fn canonicalize(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Validate a CPF or CNPJ, accepting formatted or bare-digit input.
///
/// Returns the detected [`TaxIdKind`] on success. Deterministic and free of
/// shared state; callers may invoke it concurrently.
pub fn validate(input: &str) -> Result<TaxIdKind, TaxIdError> {
    let digits: Vec<u32> = input
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();

    match digits.len() {
        11 => {
            verify_check_digits(&digits, CPF_WEIGHTS_1, CPF_WEIGHTS_2)?;
            Ok(TaxIdKind::Individual)
        }
        14 => {
            verify_check_digits(&digits, CNPJ_WEIGHTS_1, CNPJ_WEIGHTS_2)?;
            Ok(TaxIdKind::Company)
        }
        n => Err(TaxIdError::WrongLength(n)),
    }
}

/// Shared modulo-11 verification for both schemes.
///
/// `weights_1` spans the payload digits, `weights_2` spans the payload plus
/// the first check digit; the last two digits of `digits` must equal the
/// computed pair.
fn verify_check_digits(
    digits: &[u32],
    weights_1: &[u32],
    weights_2: &[u32],
) -> Result<(), TaxIdError> {
    if digits.iter().all(|&d| d == digits[0]) {
        return Err(TaxIdError::RepeatedDigits);
    }

    let len = digits.len();
    let first = check_digit(&digits[..len - 2], weights_1);
    let second = check_digit(&digits[..len - 1], weights_2);

    if digits[len - 2] != first || digits[len - 1] != second {
        return Err(TaxIdError::CheckDigitMismatch);
    }
    Ok(())
}

/// One weighted modulo-11 check digit: remainder below 2 maps to 0,
/// otherwise the digit is `11 - remainder`.
fn check_digit(payload: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = payload
        .iter()
        .zip(weights)
        .map(|(digit, weight)| digit * weight)
        .sum();

    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_cpf_with_formatting() {
        assert_eq!(validate("111.444.777-35"), Ok(TaxIdKind::Individual));
    }

    #[test]
    fn valid_cpf_bare_digits() {
        assert_eq!(validate("52998224725"), Ok(TaxIdKind::Individual));
    }

    #[test]
    fn valid_cnpj_with_formatting() {
        assert_eq!(validate("11.222.333/0001-81"), Ok(TaxIdKind::Company));
        assert_eq!(validate("12.345.678/0001-95"), Ok(TaxIdKind::Company));
    }

    #[test]
    fn cnpj_with_wrong_check_digits_is_rejected() {
        assert_eq!(
            validate("12.345.678/0001-90"),
            Err(TaxIdError::CheckDigitMismatch)
        );
    }

    #[test]
    fn cpf_with_mutated_digit_is_rejected() {
        // One digit off from a valid CPF.
        assert_eq!(
            validate("111.444.777-36"),
            Err(TaxIdError::CheckDigitMismatch)
        );
        assert_eq!(
            validate("211.444.777-35"),
            Err(TaxIdError::CheckDigitMismatch)
        );
    }

    #[test]
    fn repeated_digit_sequences_are_rejected() {
        assert_eq!(validate("11111111111"), Err(TaxIdError::RepeatedDigits));
        assert_eq!(validate("00000000000000"), Err(TaxIdError::RepeatedDigits));
    }

    #[test]
    fn wrong_lengths_are_rejected() {
        assert_eq!(validate(""), Err(TaxIdError::WrongLength(0)));
        assert_eq!(validate("123456"), Err(TaxIdError::WrongLength(6)));
        assert_eq!(validate("123456789012"), Err(TaxIdError::WrongLength(12)));
        // Formatting characters do not count toward the length.
        assert_eq!(validate("111.444.777-3"), Err(TaxIdError::WrongLength(10)));
    }

    #[test]
    fn canonicalize_strips_punctuation() {
        assert_eq!(canonicalize("12.345.678/0001-95"), "12345678000195");
        assert_eq!(canonicalize("111.444.777-35"), "11144477735");
    }
}
