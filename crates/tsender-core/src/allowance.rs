use crate::chain::{ContractCall, ContractReader, ViewValue};
use crate::types::BaseUnitAmount;

/// An approval is needed iff the current allowance is below the total.
pub fn approval_required(current: &BaseUnitAmount, total: &BaseUnitAmount) -> bool {
    current < total
}

/// Read the ERC20 allowance `owner` has granted `spender` on `token`.
///
/// A failed read counts as a zero allowance, so the caller asks for an
/// approval instead of skipping one.
pub async fn read_allowance(
    reader: &dyn ContractReader,
    token: &str,
    owner: &str,
    spender: &str,
) -> BaseUnitAmount {
    let call = ContractCall::Allowance {
        owner: owner.to_string(),
        spender: spender.to_string(),
    };
    match reader.read_view(token, &call).await {
        Ok(ViewValue::Uint(amount)) => amount,
        Ok(ViewValue::Text(value)) => {
            tracing::warn!(%token, %value, "allowance read returned a non-integer; assuming zero");
            BaseUnitAmount::zero()
        }
        Err(err) => {
            tracing::warn!(%token, %owner, %spender, error = %err, "allowance read failed; assuming zero");
            BaseUnitAmount::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::chain::ChainError;

    struct FixedReader(Result<ViewValue, ChainError>);

    #[async_trait]
    impl ContractReader for FixedReader {
        async fn read_view(&self, _contract: &str, call: &ContractCall) -> Result<ViewValue, ChainError> {
            assert_eq!(call.signature(), "allowance(address,address)");
            self.0.clone()
        }
    }

    #[test]
    fn approval_needed_only_when_allowance_is_short() {
        let five = BaseUnitAmount::from(5_u64);
        assert!(approval_required(&BaseUnitAmount::zero(), &five));
        assert!(approval_required(&BaseUnitAmount::from(4_u64), &five));
        assert!(!approval_required(&five, &five));
        assert!(!approval_required(&BaseUnitAmount::from(6_u64), &five));
    }

    #[tokio::test]
    async fn returns_the_read_value() {
        let reader = FixedReader(Ok(ViewValue::Uint(BaseUnitAmount::from(7_u64))));
        assert_eq!(
            read_allowance(&reader, "0xtoken", "0xowner", "0xspender").await,
            BaseUnitAmount::from(7_u64)
        );
    }

    #[tokio::test]
    async fn failed_read_defaults_to_zero() {
        let reader = FixedReader(Err(ChainError::new("execution reverted")));
        assert!(read_allowance(&reader, "0xtoken", "0xowner", "0xspender")
            .await
            .is_zero());

        let reader = FixedReader(Ok(ViewValue::Text("garbage".to_string())));
        assert!(read_allowance(&reader, "0xtoken", "0xowner", "0xspender")
            .await
            .is_zero());
    }
}
