use crate::amount::parse_amount;
use crate::error::{AmountError, ValidationError};
use crate::types::{BaseUnitAmount, Total};

/// Sum an amount list exactly.
///
/// An empty list totals zero. If any entry fails to parse the result is
/// [`Total::Unparsable`], never a partial sum.
pub fn compute_total<S: AsRef<str>>(amounts: &[S], decimals: Option<u8>) -> Total {
    match parse_amounts(amounts, decimals) {
        Ok(parsed) => Total::Amount(parsed.iter().sum()),
        Err(_) => Total::Unparsable,
    }
}

/// Parse every entry, reporting the first failure with its position.
pub fn parse_amounts<S: AsRef<str>>(
    amounts: &[S],
    decimals: Option<u8>,
) -> Result<Vec<BaseUnitAmount>, ValidationError> {
    amounts
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            parse_amount(raw.as_ref(), decimals)
                .map_err(|source| ValidationError::UnparsableAmount { index, source })
        })
        .collect()
}

/// First entry that fails to parse, if any.
pub fn first_amount_error<S: AsRef<str>>(
    amounts: &[S],
    decimals: Option<u8>,
) -> Option<(usize, AmountError)> {
    amounts.iter().enumerate().find_map(|(index, raw)| {
        parse_amount(raw.as_ref(), decimals)
            .err()
            .map(|err| (index, err))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_integer_amounts() {
        assert_eq!(
            compute_total(&["100", "200", "300"], Some(0)),
            Total::Amount(BaseUnitAmount::from(600_u64))
        );
    }

    #[test]
    fn empty_list_totals_zero() {
        let empty: [&str; 0] = [];
        assert_eq!(
            compute_total(&empty, None),
            Total::Amount(BaseUnitAmount::zero())
        );
    }

    #[test]
    fn any_bad_entry_yields_the_sentinel() {
        assert_eq!(compute_total(&["100", "abc"], Some(0)), Total::Unparsable);
        assert_eq!(compute_total(&["1.5", "1"], None), Total::Unparsable);
    }

    #[test]
    fn mixes_fractions_and_literals() {
        // "1.5" is scaled, "250" is already in base units.
        assert_eq!(
            compute_total(&["1.5", "250"], Some(3)),
            Total::Amount(BaseUnitAmount::from(1_750_u64))
        );
    }

    #[test]
    fn does_not_overflow_fixed_width() {
        let max = u128::MAX.to_string();
        let total = compute_total(&[max.as_str(), max.as_str()], Some(0));
        let expected = BaseUnitAmount::from(u128::MAX) + BaseUnitAmount::from(u128::MAX);
        assert_eq!(total, Total::Amount(expected));
    }

    #[test]
    fn parse_amounts_reports_first_failure_position() {
        let err = parse_amounts(&["1", "x", "y"], Some(0)).unwrap_err();
        assert!(matches!(err, ValidationError::UnparsableAmount { index: 1, .. }));
        assert_eq!(
            first_amount_error(&["1", "2", "1.5"], None),
            Some((2, AmountError::DecimalsUnknown))
        );
        assert_eq!(first_amount_error(&["1", "2"], None), None);
    }
}
