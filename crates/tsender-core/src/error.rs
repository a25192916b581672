use std::fmt::{self, Display};

use thiserror::Error;

use crate::registry::RegistryError;
use crate::submit::SubmitError;

/// Stable numeric error codes shared by the library and the CLI.
///
/// Codes are grouped by range: 1xxx input validation, 2xxx CLI and
/// configuration, 3xxx I/O, 4xxx chain interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxonomyCode {
    Validation1001,
    Validation1002,
    Validation1003,
    Validation1004,
    Validation1005,
    Validation1006,
    Validation1007,
    Validation1008,
    Validation1009,
    Validation1010,
    Validation1011,
    Validation1012,
    Cli2001,
    Cli2002,
    Cli2003,
    Cli2004,
    Config2005,
    Config2006,
    Io3001,
    Chain4001,
    Chain4002,
    Chain4003,
    Internal9999,
}

impl TaxonomyCode {
    pub const fn code(self) -> u16 {
        match self {
            Self::Validation1001 => 1001,
            Self::Validation1002 => 1002,
            Self::Validation1003 => 1003,
            Self::Validation1004 => 1004,
            Self::Validation1005 => 1005,
            Self::Validation1006 => 1006,
            Self::Validation1007 => 1007,
            Self::Validation1008 => 1008,
            Self::Validation1009 => 1009,
            Self::Validation1010 => 1010,
            Self::Validation1011 => 1011,
            Self::Validation1012 => 1012,
            Self::Cli2001 => 2001,
            Self::Cli2002 => 2002,
            Self::Cli2003 => 2003,
            Self::Cli2004 => 2004,
            Self::Config2005 => 2005,
            Self::Config2006 => 2006,
            Self::Io3001 => 3001,
            Self::Chain4001 => 4001,
            Self::Chain4002 => 4002,
            Self::Chain4003 => 4003,
            Self::Internal9999 => 9999,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Validation1001 => "INVALID_TOKEN_ADDRESS",
            Self::Validation1002 => "COUNT_MISMATCH",
            Self::Validation1003 => "INVALID_RECIPIENT",
            Self::Validation1004 => "EMPTY_AMOUNT",
            Self::Validation1005 => "INVALID_AMOUNT",
            Self::Validation1006 => "NON_POSITIVE_TOTAL",
            Self::Validation1007 => "WALLET_NOT_CONNECTED",
            Self::Validation1008 => "DECIMALS_UNKNOWN",
            Self::Validation1009 => "CSV_PARSE_ERROR",
            Self::Validation1010 => "CSV_FORMULA_INJECTION",
            Self::Validation1011 => "INPUT_TOO_LARGE",
            Self::Validation1012 => "MISSING_REQUIRED_COLUMN",
            Self::Cli2001 => "MISSING_REQUIRED_ARGUMENT",
            Self::Cli2002 => "INVALID_ARGUMENT",
            Self::Cli2003 => "CONFIRMATION_REQUIRED",
            Self::Cli2004 => "STDIN_BLOCKED",
            Self::Config2005 => "UNSUPPORTED_CHAIN",
            Self::Config2006 => "INVALID_REGISTRY",
            Self::Io3001 => "IO_ERROR",
            Self::Chain4001 => "USER_CANCELLED",
            Self::Chain4002 => "TRANSACTION_FAILED",
            Self::Chain4003 => "SUBMISSION_IN_FLIGHT",
            Self::Internal9999 => "INTERNAL_ERROR",
        }
    }
}

impl Display for TaxonomyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.code(), self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct TaxonomyError {
    pub code: TaxonomyCode,
    pub message: String,
}

impl TaxonomyError {
    pub const fn code(&self) -> u16 {
        self.code.code()
    }
}

/// Failure to turn one amount string into base units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    EmptyAmount,
    #[error("token decimals unknown; cannot parse fractional token amount")]
    DecimalsUnknown,
    #[error("invalid numeric amount: {value}")]
    InvalidNumericFormat { value: String },
}

impl AmountError {
    pub const fn taxonomy(&self) -> TaxonomyCode {
        match self {
            Self::EmptyAmount => TaxonomyCode::Validation1004,
            Self::DecimalsUnknown => TaxonomyCode::Validation1008,
            Self::InvalidNumericFormat { .. } => TaxonomyCode::Validation1005,
        }
    }

    pub const fn code(&self) -> u16 {
        self.taxonomy().code()
    }
}

/// Entry checks run before any chain access, reported in check order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid token address '{address}' (must be 0x followed by 40 hex digits)")]
    InvalidTokenAddress { address: String },
    #[error("recipients and amounts must have the same count and not be empty (got {recipients} recipients, {amounts} amounts)")]
    CountMismatch { recipients: usize, amounts: usize },
    #[error("recipient {} has an invalid address '{address}'", .index + 1)]
    InvalidRecipient { index: usize, address: String },
    #[error("amount {} is empty", .index + 1)]
    EmptyAmountValue { index: usize },
    #[error("unable to parse amount {} (check format and token decimals): {source}", .index + 1)]
    UnparsableAmount {
        index: usize,
        #[source]
        source: AmountError,
    },
    #[error("total amount invalid or zero")]
    NonPositiveTotal,
    #[error("wallet not connected")]
    WalletNotConnected,
}

impl ValidationError {
    pub const fn taxonomy(&self) -> TaxonomyCode {
        match self {
            Self::InvalidTokenAddress { .. } => TaxonomyCode::Validation1001,
            Self::CountMismatch { .. } => TaxonomyCode::Validation1002,
            Self::InvalidRecipient { .. } => TaxonomyCode::Validation1003,
            Self::EmptyAmountValue { .. } => TaxonomyCode::Validation1004,
            Self::UnparsableAmount { source, .. } => match source {
                AmountError::DecimalsUnknown => TaxonomyCode::Validation1008,
                _ => TaxonomyCode::Validation1005,
            },
            Self::NonPositiveTotal => TaxonomyCode::Validation1006,
            Self::WalletNotConnected => TaxonomyCode::Validation1007,
        }
    }

    pub const fn code(&self) -> u16 {
        self.taxonomy().code()
    }
}

#[derive(Debug, Error)]
pub enum TsenderError {
    #[error(transparent)]
    Taxonomy(#[from] TaxonomyError),

    #[error("amount error [{code}]: {err}", code = .0.code(), err = .0)]
    Amount(#[from] AmountError),

    #[error("validation error [{code}]: {err}", code = .0.code(), err = .0)]
    Validation(#[from] ValidationError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("submission error: {0}")]
    Submit(#[from] SubmitError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TsenderError {
    pub fn taxonomy(code: TaxonomyCode, message: impl Into<String>) -> Self {
        Self::Taxonomy(TaxonomyError {
            code,
            message: message.into(),
        })
    }

    /// The taxonomy code this error is reported under.
    pub fn code(&self) -> TaxonomyCode {
        match self {
            Self::Taxonomy(taxonomy) => taxonomy.code,
            Self::Amount(amount) => amount.taxonomy(),
            Self::Validation(validation) => validation.taxonomy(),
            Self::Registry(registry) => registry.taxonomy(),
            Self::Submit(submit) => submit.taxonomy(),
            Self::Io(_) => TaxonomyCode::Io3001,
            Self::Csv(_) => TaxonomyCode::Validation1009,
            Self::Json(_) => TaxonomyCode::Config2006,
        }
    }
}

pub type Result<T> = std::result::Result<T, TsenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_display_includes_code_and_name() {
        let err = TsenderError::taxonomy(TaxonomyCode::Cli2001, "missing --token");
        assert_eq!(err.to_string(), "[2001:MISSING_REQUIRED_ARGUMENT] missing --token");
        assert_eq!(err.code(), TaxonomyCode::Cli2001);
    }

    #[test]
    fn validation_messages_use_one_based_positions() {
        let err = ValidationError::InvalidRecipient {
            index: 0,
            address: "0x12".to_string(),
        };
        assert_eq!(err.to_string(), "recipient 1 has an invalid address '0x12'");
        assert_eq!(err.code(), 1003);
    }

    #[test]
    fn unparsable_amount_code_follows_its_cause() {
        let unknown = ValidationError::UnparsableAmount {
            index: 2,
            source: AmountError::DecimalsUnknown,
        };
        let malformed = ValidationError::UnparsableAmount {
            index: 2,
            source: AmountError::InvalidNumericFormat {
                value: "abc".to_string(),
            },
        };
        assert_eq!(unknown.code(), 1008);
        assert_eq!(malformed.code(), 1005);
    }

    #[test]
    fn amount_errors_map_into_crate_error() {
        let err: TsenderError = AmountError::EmptyAmount.into();
        assert_eq!(err.code(), TaxonomyCode::Validation1004);
        assert!(err.to_string().contains("1004"));
    }

    #[test]
    fn wrapped_errors_prefix_their_code() {
        let amount: TsenderError = AmountError::DecimalsUnknown.into();
        assert!(amount.to_string().starts_with("amount error [1008]: "));

        let validation: TsenderError = ValidationError::WalletNotConnected.into();
        assert_eq!(
            validation.to_string(),
            format!("validation error [1007]: {}", ValidationError::WalletNotConnected)
        );
    }
}
