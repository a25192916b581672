mod agent;
mod commands;
mod logging;
mod mode;
mod operator;
mod output;
mod report;

use std::io::IsTerminal;

use clap::{error::ErrorKind, Parser, Subcommand, ValueEnum};
use tsender_core::{TaxonomyCode, TsenderError};

use commands::preview::PreviewArgs;
use commands::FormArgs;
use mode::Mode;
use output::OutputHandler;
use report::{Completed, Failure};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "tsender",
    version,
    about = "Validate and preview ERC20 bulk transfers for TSender"
)]
struct Cli {
    #[arg(long = "output", value_enum, global = true)]
    output_format: Option<OutputFormat>,

    /// Human-readable output even when stdout is not a terminal.
    #[arg(long, global = true)]
    interactive: bool,

    #[arg(long, global = true)]
    quiet: bool,

    #[arg(long = "no-color", global = true)]
    no_color: bool,

    /// Tracing filter directive, e.g. `debug` or `tsender_core=trace`.
    #[arg(long = "log-level", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Run the entry checks on a draft bulk transfer.
    Validate(FormArgs),
    /// Validate, resolve the destination contract and show what would be signed.
    /// Nothing is sent.
    Preview(PreviewArgs),
    /// Render a base-unit amount in token units.
    Format {
        amount: String,
        #[arg(long)]
        decimals: u8,
    },
}

const COMMAND_NAMES: [&str; 3] = ["validate", "preview", "format"];

impl Commands {
    const fn name(&self) -> &'static str {
        match self {
            Self::Validate(_) => "validate",
            Self::Preview(_) => "preview",
            Self::Format { .. } => "format",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitCode {
    Success = 0,
    ValidationError = 1,
    ConfigError = 2,
    IoError = 3,
    InternalError = 4,
    TransactionError = 5,
}

impl ExitCode {
    fn for_taxonomy(code: TaxonomyCode) -> Self {
        match code.code() {
            1000..=1999 => Self::ValidationError,
            2000..=2999 => Self::ConfigError,
            3000..=3999 => Self::IoError,
            4000..=4999 => Self::TransactionError,
            _ => Self::InternalError,
        }
    }
}

fn build_output_handler(mode: Mode, quiet: bool, no_color: bool) -> Box<dyn OutputHandler> {
    match mode {
        Mode::Operator => Box::new(operator::OperatorOutput::new(quiet, no_color)),
        Mode::Agent => Box::new(agent::AgentOutputHandler),
    }
}

/// Mode for reporting a parse failure, before clap has produced a `Cli`.
fn mode_from_raw_args(args: &[String]) -> Mode {
    let interactive = args.iter().any(|arg| arg == "--interactive");
    let output_json = args.iter().any(|arg| arg.eq_ignore_ascii_case("--output=json"))
        || args
            .windows(2)
            .any(|pair| pair[0] == "--output" && pair[1].eq_ignore_ascii_case("json"));
    mode::detect_mode(output_json, interactive)
}

fn command_from_raw_args(args: &[String]) -> &'static str {
    args.iter()
        .skip(1)
        .find_map(|arg| COMMAND_NAMES.into_iter().find(|name| *name == arg.as_str()))
        .unwrap_or("tsender")
}

fn clap_error_to_core(err: &clap::Error) -> TsenderError {
    let code = match err.kind() {
        ErrorKind::ArgumentConflict
        | ErrorKind::UnknownArgument
        | ErrorKind::InvalidValue
        | ErrorKind::ValueValidation
        | ErrorKind::TooManyValues => TaxonomyCode::Cli2002,
        _ => TaxonomyCode::Cli2001,
    };
    TsenderError::taxonomy(code, err.to_string().trim())
}

fn dispatch(command: &Commands, output: &mut dyn OutputHandler) -> tsender_core::Result<Completed> {
    match command {
        Commands::Validate(args) => commands::validate::run(args, output),
        Commands::Preview(args) => {
            let prepared = commands::preview::prepare(args)?;
            output.display_transfer_summary(&prepared.summary);
            Ok(commands::preview::run(&prepared, output))
        }
        Commands::Format { amount, decimals } => commands::format::run(amount, *decimals),
    }
}

/// The error text without the taxonomy prefix the core adds for logs.
fn plain_message(err: &TsenderError) -> String {
    match err {
        TsenderError::Taxonomy(taxonomy) => taxonomy.message.clone(),
        TsenderError::Amount(amount) => amount.to_string(),
        TsenderError::Validation(validation) => validation.to_string(),
        other => other.to_string(),
    }
}

fn failure_for(err: &TsenderError) -> Failure {
    let code = err.code();
    Failure {
        code: code.code(),
        name: code.name(),
        message: plain_message(err),
        raw: Some(err.to_string()),
    }
}

fn run(cli: Cli) -> ExitCode {
    let output_json = matches!(cli.output_format, Some(OutputFormat::Json));
    let mode = mode::detect_mode(output_json, cli.interactive);
    let mut output = build_output_handler(mode, cli.quiet, cli.no_color);
    let command = cli.command.name();

    tracing::debug!(%command, ?mode, "starting");
    output.start_operation(command);
    match dispatch(&cli.command, output.as_mut()) {
        Ok(done) => {
            output.succeeded(&done);
            ExitCode::Success
        }
        Err(err) => {
            if let TsenderError::Validation(validation) = &err {
                output.display_validation_errors(&[validation.to_string()]);
            }
            tracing::debug!(error = ?err, "command failed");
            output.failed(command, &failure_for(&err));
            ExitCode::for_taxonomy(err.code())
        }
    }
}

fn main() {
    let raw_args: Vec<String> = std::env::args().collect();
    let cli = match Cli::try_parse_from(&raw_args) {
        Ok(parsed) => parsed,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) {
                let _ = err.print();
                std::process::exit(ExitCode::Success as i32);
            }

            if mode_from_raw_args(&raw_args) == Mode::Agent {
                let core = clap_error_to_core(&err);
                agent::AgentOutputHandler.failed(command_from_raw_args(&raw_args), &failure_for(&core));
                std::process::exit(ExitCode::for_taxonomy(core.code()) as i32);
            }

            let _ = err.print();
            std::process::exit(ExitCode::ConfigError as i32);
        }
    };

    let ansi = !cli.no_color && std::io::stderr().is_terminal();
    logging::init(cli.log_level.as_deref(), ansi);
    let code = run(cli);
    std::process::exit(code as i32);
}
