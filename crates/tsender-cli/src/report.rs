//! Typed results of each command. Agent mode serializes them as-is; operator
//! mode renders the same values as text and tables.

use serde::Serialize;
use tsender_core::{format_token_amount, BaseUnitAmount, ChainId, ContractMode, SubmissionRequest};

/// Amount as the user will recognise it: token units when decimals are
/// known, base units otherwise.
pub(crate) fn display_amount(amount: &BaseUnitAmount, decimals: Option<u8>) -> String {
    match decimals {
        Some(decimals) => format_token_amount(amount, decimals),
        None => amount.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientLine {
    pub position: usize,
    pub address: String,
    /// Token units when decimals are known, base units otherwise.
    pub amount: String,
    pub base_units: String,
}

/// A request that passed every entry check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedTransfer {
    pub token_address: String,
    pub account: String,
    pub recipient_count: usize,
    pub recipients: Vec<RecipientLine>,
    pub total: String,
    pub total_formatted: Option<String>,
    pub decimals: Option<u8>,
}

impl ValidatedTransfer {
    pub fn new(request: &SubmissionRequest, decimals: Option<u8>) -> Self {
        let recipients = request
            .recipients()
            .iter()
            .zip(request.amounts())
            .enumerate()
            .map(|(index, (address, amount))| RecipientLine {
                position: index + 1,
                address: address.clone(),
                amount: display_amount(amount, decimals),
                base_units: amount.to_string(),
            })
            .collect();

        Self {
            token_address: request.token_address().to_string(),
            account: request.account().to_string(),
            recipient_count: request.recipients().len(),
            recipients,
            total: request.total().to_string(),
            total_formatted: decimals.map(|decimals| format_token_amount(request.total(), decimals)),
            decimals,
        }
    }
}

/// The `approve(spender, amount)` call the sender would sign first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApproveCall {
    pub contract: String,
    pub spender: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferPreview {
    #[serde(flatten)]
    pub transfer: ValidatedTransfer,
    pub chain_id: ChainId,
    pub mode: ContractMode,
    pub destination: String,
    pub has_enough_tokens: bool,
    pub balance: Option<String>,
    pub approve_call: ApproveCall,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedAmount {
    pub base_units: String,
    pub decimals: u8,
    pub formatted: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Validated(ValidatedTransfer),
    Preview(TransferPreview),
    Formatted(FormattedAmount),
}

impl Report {
    pub fn recipients(&self) -> &[RecipientLine] {
        match self {
            Self::Validated(transfer) => &transfer.recipients,
            Self::Preview(preview) => &preview.transfer.recipients,
            Self::Formatted(_) => &[],
        }
    }
}

/// A command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    pub command: &'static str,
    /// One-line result for operator output.
    pub headline: String,
    pub report: Report,
    pub warnings: Vec<String>,
}

/// A command that stopped on an error, keyed by its taxonomy entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub code: u16,
    pub name: &'static str,
    pub message: String,
    /// Full error text, including the taxonomy prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

#[cfg(test)]
mod tests {
    use tsender_core::{validate_submission, SubmissionForm};

    use super::*;

    const ALICE: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
    const BOB: &str = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";

    fn request(decimals: Option<u8>) -> SubmissionRequest {
        validate_submission(&SubmissionForm {
            token_address: "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0".to_string(),
            recipients: format!("{ALICE},{BOB}").into(),
            amounts: "150,50".into(),
            decimals,
            account: Some("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string()),
            chain_id: 1,
            mode: ContractMode::Standard,
        })
        .unwrap()
    }

    #[test]
    fn lines_are_numbered_from_one() {
        let transfer = ValidatedTransfer::new(&request(Some(2)), Some(2));
        assert_eq!(transfer.recipient_count, 2);
        assert_eq!(
            transfer.recipients[1],
            RecipientLine {
                position: 2,
                address: BOB.to_string(),
                amount: "0.50".to_string(),
                base_units: "50".to_string(),
            }
        );
        assert_eq!(transfer.total_formatted.as_deref(), Some("2.00"));
    }

    #[test]
    fn unknown_decimals_show_base_units() {
        let transfer = ValidatedTransfer::new(&request(None), None);
        assert_eq!(transfer.recipients[0].amount, "150");
        assert_eq!(transfer.total_formatted, None);
    }

    #[test]
    fn preview_flattens_the_transfer() {
        let transfer = ValidatedTransfer::new(&request(None), None);
        let preview = Report::Preview(TransferPreview {
            approve_call: ApproveCall {
                contract: transfer.token_address.clone(),
                spender: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
                amount: transfer.total.clone(),
            },
            transfer,
            chain_id: 31_337,
            mode: ContractMode::NoCheck,
            destination: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
            has_enough_tokens: true,
            balance: None,
        });

        let value = serde_json::to_value(&preview).unwrap();
        assert_eq!(value["recipientCount"], 2);
        assert_eq!(value["mode"], "no_check");
        assert_eq!(value["approveCall"]["amount"], "200");
        assert_eq!(preview.recipients().len(), 2);
    }
}
