//! Maps provider errors onto user cancellation vs transaction failure.
//!
//! Wallets disagree on how they report "the user declined to sign", so
//! detection is a list of matchers. Supporting a new provider means adding a
//! matcher, not touching the orchestrator.

use crate::chain::ChainError;

/// EIP-1193 `userRejectedRequest`.
pub const USER_REJECTED_CODE: i64 = 4001;

const REJECTION_MESSAGES: [&str; 5] = [
    "user rejected",
    "user denied",
    "rejected the request",
    "request rejected",
    "denied transaction signature",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    UserCancelled,
    TransactionFailed(String),
}

pub trait RejectionMatcher: Send + Sync {
    fn is_rejection(&self, err: &ChainError) -> bool;
}

/// Matches on the provider's numeric error code.
#[derive(Debug, Clone, Copy)]
pub struct ErrorCodeMatcher(pub i64);

impl RejectionMatcher for ErrorCodeMatcher {
    fn is_rejection(&self, err: &ChainError) -> bool {
        err.code == Some(self.0)
    }
}

/// Case-insensitive substring match on the error message.
#[derive(Debug, Clone)]
pub struct MessageMatcher {
    needles: Vec<String>,
}

impl MessageMatcher {
    pub fn new<I, S>(needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            needles: needles
                .into_iter()
                .map(|needle| needle.as_ref().to_lowercase())
                .collect(),
        }
    }
}

impl RejectionMatcher for MessageMatcher {
    fn is_rejection(&self, err: &ChainError) -> bool {
        let message = err.message.to_lowercase();
        self.needles.iter().any(|needle| message.contains(needle.as_str()))
    }
}

pub struct FailureClassifier {
    matchers: Vec<Box<dyn RejectionMatcher>>,
}

impl FailureClassifier {
    /// A classifier that never reports cancellation.
    pub fn empty() -> Self {
        Self {
            matchers: Vec::new(),
        }
    }

    pub fn with_matcher(mut self, matcher: impl RejectionMatcher + 'static) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    pub fn classify(&self, err: &ChainError) -> FailureKind {
        if self.matchers.iter().any(|matcher| matcher.is_rejection(err)) {
            FailureKind::UserCancelled
        } else {
            FailureKind::TransactionFailed(err.message.clone())
        }
    }
}

impl Default for FailureClassifier {
    fn default() -> Self {
        Self::empty()
            .with_matcher(ErrorCodeMatcher(USER_REJECTED_CODE))
            .with_matcher(MessageMatcher::new(REJECTION_MESSAGES))
    }
}

impl std::fmt::Debug for FailureClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailureClassifier")
            .field("matchers", &self.matchers.len())
            .finish()
    }
}
