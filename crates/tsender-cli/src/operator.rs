use std::time::Duration;

use colored::Colorize;
use comfy_table::{presets::ASCII_BORDERS_ONLY, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use tsender_core::{truncate_address, ContractMode};

use crate::output::{OutputHandler, TransferSummary};
use crate::report::{Completed, Failure, RecipientLine};

const SPINNER_TICKS: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_TICK_MS: u64 = 80;
const UNSAFE_BANNER: &str = "UNSAFE MODE: the no-check contract skips the total check. \
Double-check every amount before signing.";

/// Human-facing output: colored text, tables and a spinner.
pub struct OperatorOutput {
    quiet: bool,
    no_color: bool,
    spinner: Option<ProgressBar>,
}

impl OperatorOutput {
    pub fn new(quiet: bool, no_color: bool) -> Self {
        Self {
            quiet,
            no_color,
            spinner: None,
        }
    }

    fn success_text(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            text.green().to_string()
        }
    }

    fn warning_text(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            text.yellow().to_string()
        }
    }

    fn error_text(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            text.red().to_string()
        }
    }

    fn start_spinner(&mut self, operation: &str) {
        if self.quiet {
            return;
        }
        let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") else {
            return;
        };

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style.tick_strings(&SPINNER_TICKS));
        spinner.set_message(format!("{operation}..."));
        spinner.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        self.spinner = Some(spinner);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    pub fn render_recipient_table(rows: &[RecipientLine]) -> String {
        let mut table = Table::new();
        table
            .load_preset(ASCII_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["#", "Recipient", "Amount"]);

        for row in rows {
            table.add_row(vec![
                row.position.to_string(),
                truncate_address(&row.address),
                row.amount.clone(),
            ]);
        }

        table.to_string()
    }

    pub fn render_summary_table(summary: &TransferSummary) -> String {
        let details = &summary.summary;
        let mut table = Table::new();
        table
            .load_preset(ASCII_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Field", "Value"]);
        table.add_row(vec!["Chain".to_string(), summary.chain_id.to_string()]);
        table.add_row(vec!["Contract".to_string(), summary.destination.clone()]);
        table.add_row(vec!["Mode".to_string(), summary.mode.to_string()]);
        table.add_row(vec![
            "Token".to_string(),
            match &details.token_name {
                Some(name) => format!("{name} ({})", truncate_address(&summary.token_address)),
                None => summary.token_address.clone(),
            },
        ]);
        table.add_row(vec!["Recipients".to_string(), details.recipient_count.to_string()]);
        table.add_row(vec![
            "Total (base units)".to_string(),
            details
                .total
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string),
        ]);
        table.add_row(vec![
            "Total (tokens)".to_string(),
            details.total_formatted.clone().unwrap_or_else(|| "-".to_string()),
        ]);
        if let Some(balance) = &details.balance_formatted {
            table.add_row(vec!["Balance".to_string(), balance.clone()]);
        }
        table.to_string()
    }

    fn suggestion_for_error(error: &str) -> &'static str {
        let lowered = error.to_ascii_lowercase();
        if lowered.contains("token address") {
            "Suggestion: pass the ERC20 contract address as 0x followed by 40 hex digits."
        } else if lowered.contains("same count") {
            "Suggestion: make sure there is exactly one amount per recipient, in the same order."
        } else if lowered.contains("recipient") {
            "Suggestion: check the listed recipient for typos or a missing 0x prefix."
        } else if lowered.contains("decimals unknown") {
            "Suggestion: pass --decimals for the token when amounts contain a decimal point."
        } else if lowered.contains("amount") {
            "Suggestion: amounts are plain decimal numbers such as 10 or 0.25."
        } else if lowered.contains("wallet") {
            "Suggestion: pass the sending account with --account."
        } else {
            "Suggestion: review the input values and retry."
        }
    }

    pub fn format_validation_errors(errors: &[String]) -> Vec<String> {
        errors
            .iter()
            .map(|err| format!("{err}\n  {}", Self::suggestion_for_error(err)))
            .collect()
    }
}

impl OutputHandler for OperatorOutput {
    fn start_operation(&mut self, operation: &str) {
        self.start_spinner(operation);
    }

    fn progress(&mut self, message: &str) {
        if self.quiet {
            return;
        }

        if let Some(spinner) = &self.spinner {
            spinner.set_message(message.to_string());
        } else {
            println!("{message}");
        }
    }

    fn display_transfer_summary(&mut self, summary: &TransferSummary) {
        self.stop_spinner();

        if summary.mode == ContractMode::NoCheck {
            eprintln!("{}", self.warning_text(UNSAFE_BANNER));
        }
        if !summary.summary.has_enough_tokens {
            eprintln!(
                "{}",
                self.warning_text("warning: token balance is lower than the total to send")
            );
        }
        if self.quiet {
            return;
        }
        println!("{}", Self::render_summary_table(summary));
    }

    fn display_validation_errors(&mut self, errors: &[String]) {
        self.stop_spinner();
        for formatted in Self::format_validation_errors(errors) {
            eprintln!("{}", self.error_text(&formatted));
        }
    }

    fn succeeded(&mut self, done: &Completed) {
        self.stop_spinner();
        println!("{}", self.success_text(&done.headline));

        for warning in &done.warnings {
            eprintln!("{}", self.warning_text(warning));
        }
        if self.quiet {
            return;
        }
        let rows = done.report.recipients();
        if !rows.is_empty() {
            println!("{}", Self::render_recipient_table(rows));
        }
    }

    fn failed(&mut self, _command: &str, failure: &Failure) {
        self.stop_spinner();
        eprintln!("{}", self.error_text(&failure.message));
    }
}

#[cfg(test)]
mod tests {
    use tsender_core::{BaseUnitAmount, SubmissionSummary};

    use super::*;

    fn make_rows(count: usize) -> Vec<RecipientLine> {
        (0..count)
            .map(|i| RecipientLine {
                position: i + 1,
                address: format!("0x{i:040x}"),
                amount: "1.00".to_string(),
                base_units: "100".to_string(),
            })
            .collect()
    }

    fn summary(mode: ContractMode) -> TransferSummary {
        TransferSummary {
            chain_id: 31_337,
            mode,
            destination: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
            token_address: "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0".to_string(),
            summary: SubmissionSummary {
                recipient_count: 2,
                amount_count: 2,
                counts_match: true,
                total: Some(BaseUnitAmount::from(150_u64)),
                total_formatted: Some("1.50".to_string()),
                token_name: Some("Mock".to_string()),
                decimals: Some(2),
                balance: None,
                balance_formatted: None,
                has_enough_tokens: true,
            },
        }
    }

    #[test]
    fn table_renders_for_10_50_100_rows_without_panic() {
        for size in [10_usize, 50, 100] {
            let table = OperatorOutput::render_recipient_table(&make_rows(size));
            assert!(table.contains("Recipient"));
            assert!(table.contains("0x0000...0001"));
        }
    }

    #[test]
    fn summary_table_shows_destination_and_totals() {
        let table = OperatorOutput::render_summary_table(&summary(ContractMode::Standard));
        assert!(table.contains("0x5FbDB2315678afecb367f032d93F642f64180aa3"));
        assert!(table.contains("1.50"));
        assert!(table.contains("Mock (0x9fE4...a6e0)"));
        assert!(table.contains("tsender"));
    }

    #[test]
    fn summary_display_does_not_panic_in_unsafe_mode() {
        let mut output = OperatorOutput::new(false, true);
        output.display_transfer_summary(&summary(ContractMode::NoCheck));
    }

    #[test]
    fn error_display_adds_suggestions() {
        let errors = vec![
            "invalid recipient address at position 4: 0x123".to_string(),
            "wallet not connected".to_string(),
        ];
        let formatted = OperatorOutput::format_validation_errors(&errors);
        assert_eq!(formatted.len(), 2);
        assert!(formatted[0].contains("position 4"));
        assert!(formatted[0].contains("Suggestion: check the listed recipient"));
        assert!(formatted[1].contains("--account"));
    }

    #[test]
    fn quiet_success_with_rows_does_not_panic() {
        use crate::report::{Report, ValidatedTransfer};

        let mut output = OperatorOutput::new(true, true);
        output.succeeded(&Completed {
            command: "validate",
            headline: "done".to_string(),
            report: Report::Validated(ValidatedTransfer {
                token_address: "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0".to_string(),
                account: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string(),
                recipient_count: 3,
                recipients: make_rows(3),
                total: "300".to_string(),
                total_formatted: Some("3.00".to_string()),
                decimals: Some(2),
            }),
            warnings: vec!["warning: something".to_string()],
        });
    }
}
