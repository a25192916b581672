use tsender_core::{validate_submission, ContractMode};

use crate::commands::{load_form, FormArgs};
use crate::output::OutputHandler;
use crate::report::{Completed, Report, ValidatedTransfer};

pub fn run(args: &FormArgs, output: &mut dyn OutputHandler) -> tsender_core::Result<Completed> {
    output.progress("validating bulk transfer");
    let form = load_form(args, 0, ContractMode::Standard)?;
    let request = validate_submission(&form)?;

    Ok(Completed {
        command: "validate",
        headline: format!(
            "validation passed: {} recipients, total {} base units",
            request.recipients().len(),
            request.total()
        ),
        report: Report::Validated(ValidatedTransfer::new(&request, form.decimals)),
        warnings: Vec::new(),
    })
}
