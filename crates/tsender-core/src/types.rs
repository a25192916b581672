use std::fmt::{self, Display};
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use num::{BigUint, Zero};
use serde::{Deserialize, Serialize};

use crate::error::AmountError;
use crate::list::EntryList;

pub type ChainId = u64;

/// An exact token quantity in the token's smallest unit.
///
/// Backed by an arbitrary precision integer, so sums of many large amounts
/// never wrap. Serialized as a decimal string.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BaseUnitAmount(BigUint);

impl BaseUnitAmount {
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn into_biguint(self) -> BigUint {
        self.0
    }
}

impl From<BigUint> for BaseUnitAmount {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl From<u64> for BaseUnitAmount {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<u128> for BaseUnitAmount {
    fn from(value: u128) -> Self {
        Self(BigUint::from(value))
    }
}

/// Parses a plain base-unit integer literal. Fractional input goes through
/// [`crate::amount::parse_amount`] instead.
impl FromStr for BaseUnitAmount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(AmountError::EmptyAmount);
        }
        if !s.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(AmountError::InvalidNumericFormat {
                value: s.to_string(),
            });
        }
        BigUint::parse_bytes(s.as_bytes(), 10)
            .map(Self)
            .ok_or_else(|| AmountError::InvalidNumericFormat {
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for BaseUnitAmount {
    type Error = AmountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BaseUnitAmount> for String {
    fn from(value: BaseUnitAmount) -> Self {
        value.0.to_string()
    }
}

impl Display for BaseUnitAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for BaseUnitAmount {
    type Output = BaseUnitAmount;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a BaseUnitAmount> for BaseUnitAmount {
    type Output = BaseUnitAmount;

    fn add(self, rhs: &'a BaseUnitAmount) -> Self::Output {
        Self(self.0 + &rhs.0)
    }
}

impl Sum for BaseUnitAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, value| acc + value)
    }
}

impl<'a> Sum<&'a BaseUnitAmount> for BaseUnitAmount {
    fn sum<I: Iterator<Item = &'a BaseUnitAmount>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, value| acc + value)
    }
}

/// Aggregate of an amount list. `Unparsable` is the failure sentinel and is
/// distinct from a legitimate zero total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Total {
    Amount(BaseUnitAmount),
    Unparsable,
}

impl Total {
    pub fn amount(&self) -> Option<&BaseUnitAmount> {
        match self {
            Self::Amount(amount) => Some(amount),
            Self::Unparsable => None,
        }
    }

    pub fn is_unparsable(&self) -> bool {
        matches!(self, Self::Unparsable)
    }

    /// True only for a parsed total strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.amount().is_some_and(|amount| !amount.is_zero())
    }
}

/// Which deployed bulk-transfer contract variant to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContractMode {
    /// Contract that checks the declared total against the per-recipient sum.
    #[default]
    #[serde(rename = "tsender")]
    Standard,
    /// Gas optimised variant that skips on-chain safety checks.
    #[serde(rename = "no_check")]
    NoCheck,
}

impl ContractMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "tsender",
            Self::NoCheck => "no_check",
        }
    }

    pub const fn from_unsafe_flag(unsafe_mode: bool) -> Self {
        if unsafe_mode {
            Self::NoCheck
        } else {
            Self::Standard
        }
    }
}

impl Display for ContractMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque transaction identifier returned by the write primitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Draft form values as the user typed them. Owned by the caller and passed
/// in on every call; nothing here is persisted by the library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionForm {
    pub token_address: String,
    /// Recipient addresses, as typed text or CSV rows.
    pub recipients: EntryList,
    /// Amounts paired with recipients by position.
    pub amounts: EntryList,
    pub decimals: Option<u8>,
    /// Connected wallet account, `None` when no wallet is connected.
    pub account: Option<String>,
    pub chain_id: ChainId,
    pub mode: ContractMode,
}

/// A validated, immutable bulk-transfer request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionRequest {
    token_address: String,
    account: String,
    chain_id: ChainId,
    mode: ContractMode,
    recipients: Vec<String>,
    amounts: Vec<BaseUnitAmount>,
    total: BaseUnitAmount,
}

impl SubmissionRequest {
    pub(crate) fn new(
        token_address: String,
        account: String,
        chain_id: ChainId,
        mode: ContractMode,
        recipients: Vec<String>,
        amounts: Vec<BaseUnitAmount>,
        total: BaseUnitAmount,
    ) -> Self {
        Self {
            token_address,
            account,
            chain_id,
            mode,
            recipients,
            amounts,
            total,
        }
    }

    pub fn token_address(&self) -> &str {
        &self.token_address
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub const fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub const fn mode(&self) -> ContractMode {
        self.mode
    }

    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    pub fn amounts(&self) -> &[BaseUnitAmount] {
        &self.amounts
    }

    pub fn total(&self) -> &BaseUnitAmount {
        &self.total
    }
}

/// Lifecycle of one on-chain transaction within a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum TransactionOutcome {
    /// Sent and waiting for confirmations.
    Pending(TxHash),
    Confirmed(TxHash),
    Failed(String),
    UserCancelled,
}
