//! Seams to the chain transport. The embedding application provides the
//! RPC and signing; this crate only describes which calls to make.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{BaseUnitAmount, TxHash};

/// A contract function invocation, addressed to some contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    /// ERC20 `allowance(owner, spender)`.
    Allowance { owner: String, spender: String },
    /// ERC20 `decimals()`.
    Decimals,
    /// ERC20 `name()`.
    Name,
    /// ERC20 `balanceOf(owner)`.
    BalanceOf { owner: String },
    /// ERC20 `approve(spender, amount)`.
    Approve {
        spender: String,
        amount: BaseUnitAmount,
    },
    /// TSender `airdropERC20(token, recipients, amounts, total)`.
    AirdropErc20 {
        token: String,
        recipients: Vec<String>,
        amounts: Vec<BaseUnitAmount>,
        total: BaseUnitAmount,
    },
}

impl ContractCall {
    /// Solidity function signature the selector is derived from.
    pub const fn signature(&self) -> &'static str {
        match self {
            Self::Allowance { .. } => "allowance(address,address)",
            Self::Decimals => "decimals()",
            Self::Name => "name()",
            Self::BalanceOf { .. } => "balanceOf(address)",
            Self::Approve { .. } => "approve(address,uint256)",
            Self::AirdropErc20 { .. } => "airdropERC20(address,address[],uint256[],uint256)",
        }
    }

    pub const fn is_view(&self) -> bool {
        matches!(
            self,
            Self::Allowance { .. } | Self::Decimals | Self::Name | Self::BalanceOf { .. }
        )
    }
}

/// Decoded return value of a view call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewValue {
    Uint(BaseUnitAmount),
    Text(String),
}

/// Failure reported by the wallet or RPC provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ChainError {
    /// Provider error code, e.g. an EIP-1193 or JSON-RPC code.
    pub code: Option<i64>,
    pub message: String,
}

impl ChainError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait ContractReader: Send + Sync {
    async fn read_view(&self, contract: &str, call: &ContractCall) -> Result<ViewValue, ChainError>;
}

#[async_trait]
pub trait ContractWriter: Send + Sync {
    /// Sign and broadcast a state-changing call from the connected account.
    async fn send(&self, contract: &str, call: &ContractCall) -> Result<TxHash, ChainError>;

    /// Resolve once `tx` has `confirmations` confirmations, or fail if it
    /// reverted or the provider gave up.
    async fn await_confirmation(&self, tx: &TxHash, confirmations: u64) -> Result<(), ChainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signatures_match_the_abi() {
        assert_eq!(
            ContractCall::Approve {
                spender: String::new(),
                amount: BaseUnitAmount::zero()
            }
            .signature(),
            "approve(address,uint256)"
        );
        assert!(ContractCall::Decimals.is_view());
        assert!(!ContractCall::AirdropErc20 {
            token: String::new(),
            recipients: vec![],
            amounts: vec![],
            total: BaseUnitAmount::zero(),
        }
        .is_view());
    }

    #[test]
    fn chain_error_displays_message() {
        let err = ChainError::with_code(4001, "User rejected the request.");
        assert_eq!(err.to_string(), "User rejected the request.");
        assert_eq!(err.code, Some(4001));
    }
}
