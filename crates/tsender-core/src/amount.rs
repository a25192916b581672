//! Exact conversion of user-entered amount strings into base units.
//!
//! No floating point is involved anywhere: fractional input is rewritten as
//! a digit string scaled by `10^decimals` and parsed as a big integer.

use num::BigUint;

use crate::error::AmountError;
use crate::types::BaseUnitAmount;

/// Parse `raw` into base units.
///
/// Input without a decimal point is taken as an already base-unit integer
/// literal and never needs `decimals`. Input with a decimal point is a token
/// amount scaled by `10^decimals`, which must then be known.
pub fn parse_amount(raw: &str, decimals: Option<u8>) -> Result<BaseUnitAmount, AmountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AmountError::EmptyAmount);
    }

    let Some((whole, fraction)) = trimmed.split_once('.') else {
        if !all_digits(trimmed) {
            return Err(invalid(trimmed));
        }
        return digits_to_amount(trimmed).ok_or_else(|| invalid(trimmed));
    };

    let decimals = usize::from(decimals.ok_or(AmountError::DecimalsUnknown)?);

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid(trimmed));
    }
    // A second '.' lands in `fraction` and fails the digit check.
    if !all_digits(whole) || !all_digits(fraction) {
        return Err(invalid(trimmed));
    }
    if fraction.len() > decimals {
        return Err(invalid(trimmed));
    }

    let mut digits = String::with_capacity(whole.len() + decimals);
    digits.push_str(if whole.is_empty() { "0" } else { whole });
    digits.push_str(fraction);
    digits.extend(std::iter::repeat('0').take(decimals - fraction.len()));

    digits_to_amount(&digits).ok_or_else(|| invalid(trimmed))
}

/// `10^decimals` as a big integer.
pub fn scale_factor(decimals: u8) -> BigUint {
    num::pow(BigUint::from(10_u32), usize::from(decimals))
}

fn all_digits(value: &str) -> bool {
    value.bytes().all(|byte| byte.is_ascii_digit())
}

fn digits_to_amount(digits: &str) -> Option<BaseUnitAmount> {
    BigUint::parse_bytes(digits.as_bytes(), 10).map(BaseUnitAmount::from)
}

fn invalid(value: &str) -> AmountError {
    AmountError::InvalidNumericFormat {
        value: value.to_string(),
    }
}
