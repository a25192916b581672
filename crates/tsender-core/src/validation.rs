//! Entry validation for a bulk transfer, run before any chain access.

use crate::aggregate::{compute_total, first_amount_error, parse_amounts};
use crate::error::ValidationError;
use crate::types::{BaseUnitAmount, SubmissionForm, SubmissionRequest, Total};

const ADDRESS_HEX_LEN: usize = 40;

/// `0x` followed by exactly 40 hex digits, either case.
pub fn is_eth_address(address: &str) -> bool {
    address
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == ADDRESS_HEX_LEN && hex.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// Run the entry checks in order and build the immutable request.
///
/// The first failing check is reported:
/// token address, list counts, recipient addresses, empty amounts,
/// unparsable amounts, non-positive total, connected account.
pub fn validate_submission(form: &SubmissionForm) -> Result<SubmissionRequest, ValidationError> {
    if !is_eth_address(&form.token_address) {
        return Err(ValidationError::InvalidTokenAddress {
            address: form.token_address.clone(),
        });
    }

    let recipients = form.recipients.entries();
    let amounts = form.amounts.entries();
    if recipients.is_empty() || recipients.len() != amounts.len() {
        return Err(ValidationError::CountMismatch {
            recipients: recipients.len(),
            amounts: amounts.len(),
        });
    }

    if let Some((index, address)) = recipients
        .iter()
        .enumerate()
        .find(|(_, address)| !is_eth_address(address))
    {
        return Err(ValidationError::InvalidRecipient {
            index,
            address: address.clone(),
        });
    }

    // Only row input can carry a blank cell; text input drops empty tokens.
    if let Some(index) = amounts.iter().position(|amount| amount.trim().is_empty()) {
        return Err(ValidationError::EmptyAmountValue { index });
    }

    let total = match compute_total(&amounts, form.decimals) {
        Total::Amount(total) => total,
        Total::Unparsable => return Err(unparsable(&amounts, form.decimals)),
    };
    if total.is_zero() {
        return Err(ValidationError::NonPositiveTotal);
    }

    let account = form
        .account
        .as_deref()
        .map(str::trim)
        .filter(|account| !account.is_empty())
        .ok_or(ValidationError::WalletNotConnected)?;

    let per_recipient = parse_amounts(&amounts, form.decimals)?;

    Ok(SubmissionRequest::new(
        form.token_address.clone(),
        account.to_string(),
        form.chain_id,
        form.mode,
        recipients,
        per_recipient,
        total,
    ))
}

/// True unless the balance is known and provably below a positive total.
pub fn has_enough_tokens(balance: Option<&BaseUnitAmount>, total: &Total) -> bool {
    match (balance, total.amount()) {
        (Some(balance), Some(total)) if !total.is_zero() => balance >= total,
        _ => true,
    }
}

fn unparsable(amounts: &[String], decimals: Option<u8>) -> ValidationError {
    match first_amount_error(amounts, decimals) {
        Some((index, source)) => ValidationError::UnparsableAmount { index, source },
        None => ValidationError::NonPositiveTotal,
    }
}
