//! Lossy display helpers. Nothing produced here is ever parsed back into an
//! amount.

use num::BigUint;

use crate::amount::scale_factor;
use crate::types::BaseUnitAmount;

const ADDRESS_HEAD: usize = 6;
const ADDRESS_TAIL: usize = 4;

/// Render a base-unit amount as `whole.ff` with exactly two fractional
/// digits, truncating the rest.
pub fn format_token_amount(amount: &BaseUnitAmount, decimals: u8) -> String {
    let factor = scale_factor(decimals);
    let value = amount.as_biguint();
    let whole = value / &factor;
    let remainder = value % &factor;
    let fractional: BigUint = (remainder * 100_u32) / &factor;
    format!("{whole}.{:0>2}", fractional.to_string())
}

/// Shorten an address to `0x1234...abcd` for display.
pub fn truncate_address(address: &str) -> String {
    if address.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = address.chars().collect();
    let head: String = chars.iter().take(ADDRESS_HEAD).collect();
    let tail: String = chars[chars.len().saturating_sub(ADDRESS_TAIL)..]
        .iter()
        .collect();
    format!("{head}...{tail}")
}
