use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::types::{BaseUnitAmount, ChainId, ContractMode, SubmissionRequest, TxHash};

/// Record of a confirmed bulk transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    /// Same id as the progress events of the submission.
    pub receipt_id: Uuid,
    pub confirmed_at: DateTime<Utc>,
    pub chain_id: ChainId,
    pub mode: ContractMode,
    pub token_address: String,
    pub destination: String,
    pub account: String,
    pub recipient_count: usize,
    pub total: BaseUnitAmount,
    /// `None` when the existing allowance already covered the total.
    pub approval_tx: Option<TxHash>,
    pub transfer_tx: TxHash,
}

impl SubmissionReceipt {
    pub(crate) fn new(
        receipt_id: Uuid,
        request: &SubmissionRequest,
        destination: &str,
        approval_tx: Option<TxHash>,
        transfer_tx: TxHash,
    ) -> Self {
        Self {
            receipt_id,
            confirmed_at: Utc::now(),
            chain_id: request.chain_id(),
            mode: request.mode(),
            token_address: request.token_address().to_string(),
            destination: destination.to_string(),
            account: request.account().to_string(),
            recipient_count: request.recipients().len(),
            total: request.total().clone(),
            approval_tx,
            transfer_tx,
        }
    }

    pub fn approval_skipped(&self) -> bool {
        self.approval_tx.is_none()
    }
}

pub fn receipt_to_json(receipt: &SubmissionReceipt) -> serde_json::Result<String> {
    serde_json::to_string_pretty(receipt)
}
