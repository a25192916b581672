use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::TaxonomyCode;
use crate::types::{ChainId, ContractMode};
use crate::validation::is_eth_address;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("TSender ({mode}) is not deployed on chain {chain_id}")]
    UnsupportedChain { chain_id: ChainId, mode: ContractMode },
    #[error("registry entry for chain {chain_id} ({mode}) has invalid address '{address}'")]
    InvalidAddress {
        chain_id: ChainId,
        mode: ContractMode,
        address: String,
    },
    #[error("failed reading registry file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed parsing registry document: {0}")]
    Parse(#[from] serde_json::Error),
}

impl RegistryError {
    pub const fn taxonomy(&self) -> TaxonomyCode {
        match self {
            Self::UnsupportedChain { .. } => TaxonomyCode::Config2005,
            Self::InvalidAddress { .. } | Self::Parse(_) => TaxonomyCode::Config2006,
            Self::Io(_) => TaxonomyCode::Io3001,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDeployments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tsender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_check: Option<String>,
}

impl ChainDeployments {
    fn get(&self, mode: ContractMode) -> Option<&str> {
        match mode {
            ContractMode::Standard => self.tsender.as_deref(),
            ContractMode::NoCheck => self.no_check.as_deref(),
        }
    }

    fn set(&mut self, mode: ContractMode, address: String) {
        match mode {
            ContractMode::Standard => self.tsender = Some(address),
            ContractMode::NoCheck => self.no_check = Some(address),
        }
    }
}

/// Static `(chain id, mode) -> contract address` table.
///
/// Loaded once at start-up and read-only afterwards. The JSON form is
/// `{ "1": { "tsender": "0x..", "no_check": "0x.." } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DestinationRegistry {
    chains: BTreeMap<ChainId, ChainDeployments>,
}

impl DestinationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_destination(
        mut self,
        chain_id: ChainId,
        mode: ContractMode,
        address: impl Into<String>,
    ) -> Result<Self, RegistryError> {
        let address = address.into();
        check_address(chain_id, mode, &address)?;
        self.chains.entry(chain_id).or_default().set(mode, address);
        Ok(self)
    }

    pub fn from_json_slice(input: &[u8]) -> Result<Self, RegistryError> {
        let registry: Self = serde_json::from_slice(input)?;
        registry.check()?;
        Ok(registry)
    }

    pub fn from_json_str(input: &str) -> Result<Self, RegistryError> {
        Self::from_json_slice(input.as_bytes())
    }

    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let bytes = std::fs::read(path)?;
        let registry = Self::from_json_slice(&bytes)?;
        tracing::debug!(
            path = %path.display(),
            chains = registry.chains.len(),
            "loaded destination registry"
        );
        Ok(registry)
    }

    /// The deployed bulk-transfer contract for this chain and mode.
    pub fn resolve(&self, chain_id: ChainId, mode: ContractMode) -> Result<&str, RegistryError> {
        self.chains
            .get(&chain_id)
            .and_then(|deployments| deployments.get(mode))
            .ok_or(RegistryError::UnsupportedChain { chain_id, mode })
    }

    pub fn chain_ids(&self) -> impl Iterator<Item = ChainId> + '_ {
        self.chains.keys().copied()
    }

    fn check(&self) -> Result<(), RegistryError> {
        for (chain_id, deployments) in &self.chains {
            for mode in [ContractMode::Standard, ContractMode::NoCheck] {
                if let Some(address) = deployments.get(mode) {
                    check_address(*chain_id, mode, address)?;
                }
            }
        }
        Ok(())
    }
}

fn check_address(chain_id: ChainId, mode: ContractMode, address: &str) -> Result<(), RegistryError> {
    if is_eth_address(address) {
        Ok(())
    } else {
        Err(RegistryError::InvalidAddress {
            chain_id,
            mode,
            address: address.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STANDARD: &str = "0x5555555555555555555555555555555555555555";
    const NO_CHECK: &str = "0x6666666666666666666666666666666666666666";

    #[test]
    fn resolves_by_chain_and_mode() {
        let registry = DestinationRegistry::from_json_str(&format!(
            r#"{{ "1": {{ "tsender": "{STANDARD}", "no_check": "{NO_CHECK}" }}, "324": {{ "tsender": "{STANDARD}" }} }}"#
        ))
        .unwrap();

        assert_eq!(registry.resolve(1, ContractMode::Standard).unwrap(), STANDARD);
        assert_eq!(registry.resolve(1, ContractMode::NoCheck).unwrap(), NO_CHECK);
        assert_eq!(registry.resolve(324, ContractMode::Standard).unwrap(), STANDARD);
        assert_eq!(registry.chain_ids().collect::<Vec<_>>(), vec![1, 324]);
    }

    #[test]
    fn missing_chain_or_mode_is_unsupported() {
        let registry = DestinationRegistry::new()
            .with_destination(1, ContractMode::Standard, STANDARD)
            .unwrap();

        assert!(matches!(
            registry.resolve(1, ContractMode::NoCheck),
            Err(RegistryError::UnsupportedChain { chain_id: 1, mode: ContractMode::NoCheck })
        ));
        let err = registry.resolve(10, ContractMode::Standard).unwrap_err();
        assert_eq!(err.taxonomy(), TaxonomyCode::Config2005);
        assert_eq!(err.to_string(), "TSender (tsender) is not deployed on chain 10");
    }

    #[test]
    fn rejects_malformed_addresses_at_load() {
        let err = DestinationRegistry::from_json_str(r#"{ "1": { "tsender": "0x12" } }"#).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidAddress { chain_id: 1, .. }));

        let err = DestinationRegistry::new()
            .with_destination(1, ContractMode::NoCheck, "nope")
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidAddress { .. }));
    }

    #[test]
    fn rejects_non_numeric_chain_keys() {
        let err = DestinationRegistry::from_json_str(r#"{ "mainnet": {} }"#).unwrap_err();
        assert!(matches!(err, RegistryError::Parse(_)));
    }
}
