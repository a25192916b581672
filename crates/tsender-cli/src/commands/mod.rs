pub mod format;
pub mod preview;
pub mod validate;

use std::path::{Path, PathBuf};

use clap::Args;
use tsender_core::csv_input::parse_csv;
use tsender_core::{ChainId, ContractMode, SubmissionForm, TaxonomyCode, TsenderError};

/// Draft form values, read from files so large lists are not pasted on the
/// command line.
#[derive(Debug, Clone, Args)]
pub struct FormArgs {
    /// ERC20 token contract address.
    #[arg(long)]
    pub token: String,

    /// File with recipient addresses, comma and/or newline separated.
    #[arg(long, conflicts_with = "csv")]
    pub recipients: Option<PathBuf>,

    /// File with amounts, paired with recipients by position.
    #[arg(long, conflicts_with = "csv")]
    pub amounts: Option<PathBuf>,

    /// CSV file with `address` and `amount` columns instead of two lists.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Token decimals; required when any amount has a fractional part.
    #[arg(long)]
    pub decimals: Option<u8>,

    /// Sending account.
    #[arg(long)]
    pub account: Option<String>,
}

pub(crate) fn load_form(
    args: &FormArgs,
    chain_id: ChainId,
    mode: ContractMode,
) -> Result<SubmissionForm, TsenderError> {
    let (recipients, amounts) = match (&args.csv, &args.recipients, &args.amounts) {
        (Some(csv), _, _) => parse_csv(&std::fs::read(csv)?)?.into_entries(),
        (None, Some(recipients), Some(amounts)) => {
            (read_text(recipients)?.into(), read_text(amounts)?.into())
        }
        _ => {
            return Err(TsenderError::taxonomy(
                TaxonomyCode::Cli2001,
                "either --csv or both --recipients and --amounts are required",
            ))
        }
    };

    Ok(SubmissionForm {
        token_address: args.token.trim().to_string(),
        recipients,
        amounts,
        decimals: args.decimals,
        account: args.account.clone(),
        chain_id,
        mode,
    })
}

fn read_text(path: &Path) -> Result<String, TsenderError> {
    let text = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "read list file");
    Ok(text)
}
