use std::path::PathBuf;

use clap::Args;
use tsender_core::token::TokenInfo;
use tsender_core::{
    summarize, validate_submission, BaseUnitAmount, ChainId, ContractMode, DestinationRegistry,
    SubmissionRequest, TaxonomyCode, TsenderError,
};

use crate::commands::{load_form, FormArgs};
use crate::output::{OutputHandler, TransferSummary};
use crate::report::{ApproveCall, Completed, Report, TransferPreview, ValidatedTransfer};

#[derive(Debug, Clone, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub form: FormArgs,

    #[arg(long, default_value_t = 1)]
    pub chain_id: ChainId,

    /// Target the no-check deployment (no on-chain total check).
    #[arg(long = "unsafe")]
    pub unsafe_mode: bool,

    /// JSON file mapping chain ids to deployed contract addresses.
    #[arg(long, env = "TSENDER_REGISTRY")]
    pub registry: PathBuf,

    /// Sender's token balance in base units, for the sufficiency check.
    #[arg(long)]
    pub balance: Option<String>,

    /// Token name to show next to the address.
    #[arg(long)]
    pub token_name: Option<String>,
}

/// A validated request with its resolved destination.
#[derive(Debug, Clone)]
pub struct PreparedPreview {
    pub request: SubmissionRequest,
    pub decimals: Option<u8>,
    pub summary: TransferSummary,
}

impl PreparedPreview {
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.summary.mode == ContractMode::NoCheck {
            warnings.push(
                "warning: unsafe mode selected; the contract will not verify the total".to_string(),
            );
        }
        if !self.summary.summary.has_enough_tokens {
            warnings.push("warning: token balance is lower than the total to send".to_string());
        }
        warnings
    }
}

pub fn prepare(args: &PreviewArgs) -> tsender_core::Result<PreparedPreview> {
    let mode = ContractMode::from_unsafe_flag(args.unsafe_mode);
    let form = load_form(&args.form, args.chain_id, mode)?;
    let request = validate_submission(&form)?;

    let registry = DestinationRegistry::load(&args.registry)?;
    let destination = registry.resolve(args.chain_id, mode)?.to_string();

    let balance = args
        .balance
        .as_deref()
        .map(|raw| {
            raw.trim().parse::<BaseUnitAmount>().map_err(|err| {
                TsenderError::taxonomy(
                    TaxonomyCode::Cli2002,
                    format!("invalid --balance '{raw}': {err}"),
                )
            })
        })
        .transpose()?;
    let token = TokenInfo {
        decimals: form.decimals,
        name: args.token_name.clone(),
        balance,
    };

    Ok(PreparedPreview {
        decimals: form.decimals,
        summary: TransferSummary {
            chain_id: args.chain_id,
            mode,
            destination,
            token_address: request.token_address().to_string(),
            summary: summarize(&form, &token),
        },
        request,
    })
}

pub fn run(prepared: &PreparedPreview, output: &mut dyn OutputHandler) -> Completed {
    output.progress("building preview");
    let summary = &prepared.summary;
    let request = &prepared.request;

    let preview = TransferPreview {
        transfer: ValidatedTransfer::new(request, prepared.decimals),
        chain_id: summary.chain_id,
        mode: summary.mode,
        destination: summary.destination.clone(),
        has_enough_tokens: summary.summary.has_enough_tokens,
        balance: summary.summary.balance.as_ref().map(ToString::to_string),
        approve_call: ApproveCall {
            contract: request.token_address().to_string(),
            spender: summary.destination.clone(),
            amount: request.total().to_string(),
        },
    };

    Completed {
        command: "preview",
        headline: format!(
            "nothing sent; a transfer to {} recipients would go through {} on chain {}",
            request.recipients().len(),
            summary.destination,
            summary.chain_id
        ),
        report: Report::Preview(preview),
        warnings: prepared.warnings(),
    }
}
