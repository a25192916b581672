use tsender_core::{format_token_amount, BaseUnitAmount};

use crate::report::{Completed, FormattedAmount, Report};

pub fn run(amount: &str, decimals: u8) -> tsender_core::Result<Completed> {
    let base_units: BaseUnitAmount = amount.trim().parse()?;
    let formatted = format_token_amount(&base_units, decimals);

    Ok(Completed {
        command: "format",
        headline: formatted.clone(),
        report: Report::Formatted(FormattedAmount {
            base_units: base_units.to_string(),
            decimals,
            formatted,
        }),
        warnings: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use tsender_core::TaxonomyCode;

    use super::run;

    #[test]
    fn formats_with_two_fraction_digits() {
        let done = run("1234567890000000000", 18).unwrap();
        assert_eq!(done.headline, "1.23");
        assert!(done.report.recipients().is_empty());
    }

    #[test]
    fn rejects_non_integer_base_units() {
        let err = run("1.5", 18).unwrap_err();
        assert_eq!(err.code(), TaxonomyCode::Validation1005);
    }
}
