use num::ToPrimitive;
use serde::Serialize;

use crate::chain::{ContractCall, ContractReader, ViewValue};
use crate::types::BaseUnitAmount;

/// ERC20 metadata shown next to the form. Each field is read independently
/// and stays `None` when its read fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    pub decimals: Option<u8>,
    pub name: Option<String>,
    pub balance: Option<BaseUnitAmount>,
}

pub async fn read_token_info(
    reader: &dyn ContractReader,
    token: &str,
    owner: Option<&str>,
) -> TokenInfo {
    let decimals_call = ContractCall::Decimals;
    let name_call = ContractCall::Name;
    let balance_call = owner.map(|owner| ContractCall::BalanceOf {
        owner: owner.to_string(),
    });

    let (decimals, name, balance) = tokio::join!(
        reader.read_view(token, &decimals_call),
        reader.read_view(token, &name_call),
        async {
            match &balance_call {
                Some(call) => Some(reader.read_view(token, call).await),
                None => None,
            }
        },
    );

    let decimals = match decimals {
        Ok(ViewValue::Uint(value)) => value.as_biguint().to_u8(),
        Ok(ViewValue::Text(_)) => None,
        Err(err) => {
            tracing::debug!(%token, error = %err, "decimals read failed");
            None
        }
    };
    let name = match name {
        Ok(ViewValue::Text(value)) => Some(value),
        Ok(ViewValue::Uint(_)) => None,
        Err(err) => {
            tracing::debug!(%token, error = %err, "name read failed");
            None
        }
    };
    let balance = match balance {
        Some(Ok(ViewValue::Uint(value))) => Some(value),
        Some(Ok(ViewValue::Text(_))) | None => None,
        Some(Err(err)) => {
            tracing::debug!(%token, error = %err, "balance read failed");
            None
        }
    };

    TokenInfo {
        decimals,
        name,
        balance,
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::chain::ChainError;

    struct Erc20Stub {
        decimals: u64,
        fail_name: bool,
    }

    #[async_trait]
    impl ContractReader for Erc20Stub {
        async fn read_view(&self, _contract: &str, call: &ContractCall) -> Result<ViewValue, ChainError> {
            match call {
                ContractCall::Decimals => Ok(ViewValue::Uint(BaseUnitAmount::from(self.decimals))),
                ContractCall::Name if self.fail_name => Err(ChainError::new("rpc timeout")),
                ContractCall::Name => Ok(ViewValue::Text("Mock Token".to_string())),
                ContractCall::BalanceOf { .. } => Ok(ViewValue::Uint(BaseUnitAmount::from(1_000_u64))),
                other => Err(ChainError::new(format!("unexpected call {}", other.signature()))),
            }
        }
    }

    #[tokio::test]
    async fn reads_all_fields() {
        let reader = Erc20Stub {
            decimals: 18,
            fail_name: false,
        };
        let info = read_token_info(&reader, "0xtoken", Some("0xowner")).await;
        assert_eq!(info.decimals, Some(18));
        assert_eq!(info.name.as_deref(), Some("Mock Token"));
        assert_eq!(info.balance, Some(BaseUnitAmount::from(1_000_u64)));
    }

    #[tokio::test]
    async fn failed_fields_are_none() {
        let reader = Erc20Stub {
            decimals: 300,
            fail_name: true,
        };
        let info = read_token_info(&reader, "0xtoken", None).await;
        assert_eq!(info, TokenInfo::default());
    }
}
