//! # TSender Core
//!
//! Submission pipeline for sending one ERC20 token to many recipients in a
//! single `airdropERC20` call, preceded by an `approve` when the existing
//! allowance does not cover the total.
//!
//! ## Layers
//!
//! - Pure helpers for live input feedback, no I/O:
//!   [`parse_amount`], [`parse_list`], [`compute_total`],
//!   [`format_token_amount`], [`validate_submission`], [`summarize`].
//! - Chain seams implemented by the embedding application:
//!   [`ContractReader`] and [`ContractWriter`].
//! - [`Submitter`], the approve-then-airdrop state machine with progress
//!   events and failure classification.
//!
//! ## Invariants
//!
//! - All amounts are exact big integers in base units; no floating point.
//! - The airdrop is never sent before a required approval is confirmed.
//! - At most one submission per account is in flight.
//! - No write is ever retried automatically.

pub mod aggregate;
pub mod allowance;
pub mod amount;
pub mod chain;
pub mod classify;
pub mod config;
pub mod csv_input;
pub mod error;
pub mod format;
pub mod list;
pub mod receipt;
pub mod registry;
pub mod submit;
pub mod summary;
pub mod token;
pub mod types;
pub mod validation;

pub use aggregate::compute_total;
pub use amount::parse_amount;
pub use chain::{ChainError, ContractCall, ContractReader, ContractWriter, ViewValue};
pub use classify::{FailureClassifier, FailureKind};
pub use config::SubmitterConfig;
pub use error::{AmountError, Result, TaxonomyCode, TsenderError, ValidationError};
pub use format::{format_token_amount, truncate_address};
pub use list::{parse_list, EntryList};
pub use receipt::SubmissionReceipt;
pub use registry::{DestinationRegistry, RegistryError};
pub use submit::{SubmissionEvent, SubmissionState, SubmitError, Submitter, TxStage};
pub use summary::{summarize, SubmissionSummary};
pub use types::{
    BaseUnitAmount, ChainId, ContractMode, SubmissionForm, SubmissionRequest, Total,
    TransactionOutcome, TxHash,
};
pub use validation::{is_eth_address, validate_submission};
