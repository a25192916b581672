use serde::Serialize;

use crate::aggregate::compute_total;
use crate::format::format_token_amount;
use crate::token::TokenInfo;
use crate::types::{BaseUnitAmount, SubmissionForm, Total};
use crate::validation::has_enough_tokens;

/// Live read-back of a draft form: counts, totals and balance check.
///
/// Pure and cheap, so it can be recomputed on every edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionSummary {
    pub recipient_count: usize,
    pub amount_count: usize,
    pub counts_match: bool,
    /// `None` when any amount fails to parse.
    pub total: Option<BaseUnitAmount>,
    pub total_formatted: Option<String>,
    pub token_name: Option<String>,
    pub decimals: Option<u8>,
    pub balance: Option<BaseUnitAmount>,
    pub balance_formatted: Option<String>,
    pub has_enough_tokens: bool,
}

pub fn summarize(form: &SubmissionForm, token: &TokenInfo) -> SubmissionSummary {
    let recipients = form.recipients.entries();
    let amounts = form.amounts.entries();
    let decimals = form.decimals.or(token.decimals);
    let total = compute_total(&amounts, decimals);

    let total_formatted = match (&total, decimals) {
        (Total::Amount(amount), Some(decimals)) if total.is_positive() => {
            Some(format_token_amount(amount, decimals))
        }
        _ => None,
    };
    let balance_formatted = token
        .balance
        .as_ref()
        .zip(decimals)
        .map(|(balance, decimals)| format_token_amount(balance, decimals));

    SubmissionSummary {
        recipient_count: recipients.len(),
        amount_count: amounts.len(),
        counts_match: !recipients.is_empty() && recipients.len() == amounts.len(),
        has_enough_tokens: has_enough_tokens(token.balance.as_ref(), &total),
        total: total.amount().cloned(),
        total_formatted,
        token_name: token.name.clone(),
        decimals,
        balance: token.balance.clone(),
        balance_formatted,
    }
}
