use tsender_core::{ChainId, ContractMode, SubmissionSummary};

use crate::report::{Completed, Failure};

/// What a preview resolves to, shown before the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSummary {
    pub chain_id: ChainId,
    pub mode: ContractMode,
    pub destination: String,
    pub token_address: String,
    pub summary: SubmissionSummary,
}

pub trait OutputHandler {
    fn start_operation(&mut self, operation: &str);
    fn progress(&mut self, message: &str);
    fn display_transfer_summary(&mut self, summary: &TransferSummary);
    fn display_validation_errors(&mut self, errors: &[String]);
    fn succeeded(&mut self, done: &Completed);
    fn failed(&mut self, command: &str, failure: &Failure);
}
