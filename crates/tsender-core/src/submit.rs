//! Approve-then-airdrop submission as an explicit state machine.
//!
//! One `submit` call drives one submission start to finish as a single
//! sequential task. Progress is published on a broadcast channel so any
//! front end can follow along without the core knowing about it.

use std::collections::HashSet;
use std::fmt::{self, Display};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::allowance::{approval_required, read_allowance};
use crate::chain::{ChainError, ContractCall, ContractReader, ContractWriter};
use crate::classify::{FailureClassifier, FailureKind};
use crate::config::SubmitterConfig;
use crate::error::{TaxonomyCode, ValidationError};
use crate::receipt::SubmissionReceipt;
use crate::registry::{DestinationRegistry, RegistryError};
use crate::types::{SubmissionForm, SubmissionRequest, TransactionOutcome, TxHash};
use crate::validation::validate_submission;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Validating,
    ResolvingDestination,
    ResolvingAllowance,
    Approving,
    AwaitingApprovalConfirmation,
    Submitting,
    AwaitingConfirmation,
    Confirmed,
    Failed(String),
    Cancelled,
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed(_) | Self::Cancelled)
    }
}

/// The two transactions a submission may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStage {
    Approval,
    Transfer,
}

impl Display for TxStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approval => f.write_str("approval"),
            Self::Transfer => f.write_str("transfer"),
        }
    }
}

/// Progress of one submission. Every event carries the id of the `submit`
/// call that produced it, which is also the id of its receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SubmissionEvent {
    StateChanged {
        submission: Uuid,
        account: Option<String>,
        state: SubmissionState,
    },
    Transaction {
        submission: Uuid,
        stage: TxStage,
        outcome: TransactionOutcome,
    },
}

impl SubmissionEvent {
    pub fn submission(&self) -> Uuid {
        match self {
            Self::StateChanged { submission, .. } | Self::Transaction { submission, .. } => *submission,
        }
    }
}

/// Identity of one `submit` call, threaded through everything it publishes.
#[derive(Debug, Clone)]
struct Attempt {
    id: Uuid,
    account: Option<String>,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("user cancelled the {stage} transaction")]
    UserCancelled { stage: TxStage },
    #[error("{stage} transaction failed: {message}")]
    TransactionFailed { stage: TxStage, message: String },
    #[error("a submission for {account} is already in flight")]
    SubmissionInFlight { account: String },
}

impl SubmitError {
    pub fn taxonomy(&self) -> TaxonomyCode {
        match self {
            Self::Validation(validation) => validation.taxonomy(),
            Self::Registry(registry) => registry.taxonomy(),
            Self::UserCancelled { .. } => TaxonomyCode::Chain4001,
            Self::TransactionFailed { .. } => TaxonomyCode::Chain4002,
            Self::SubmissionInFlight { .. } => TaxonomyCode::Chain4003,
        }
    }

    /// Outcome of the transaction this error ended, if it ended one.
    pub fn outcome(&self) -> Option<(TxStage, TransactionOutcome)> {
        match self {
            Self::UserCancelled { stage } => Some((*stage, TransactionOutcome::UserCancelled)),
            Self::TransactionFailed { stage, message } => {
                Some((*stage, TransactionOutcome::Failed(message.clone())))
            }
            _ => None,
        }
    }

    fn terminal_state(&self) -> SubmissionState {
        match self {
            Self::UserCancelled { .. } => SubmissionState::Cancelled,
            other => SubmissionState::Failed(other.to_string()),
        }
    }
}

/// Drives bulk-transfer submissions against the chain collaborators.
///
/// At most one submission per account runs at a time; a second `submit` for
/// an account that is still in flight is rejected, since both would act on
/// the same freshly read allowance.
pub struct Submitter {
    reader: Arc<dyn ContractReader>,
    writer: Arc<dyn ContractWriter>,
    registry: Arc<DestinationRegistry>,
    classifier: FailureClassifier,
    config: SubmitterConfig,
    events: broadcast::Sender<SubmissionEvent>,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl Submitter {
    pub fn new(
        reader: Arc<dyn ContractReader>,
        writer: Arc<dyn ContractWriter>,
        registry: Arc<DestinationRegistry>,
        config: SubmitterConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            reader,
            writer,
            registry,
            classifier: FailureClassifier::default(),
            config,
            events,
            in_flight: Arc::default(),
        }
    }

    pub fn with_classifier(mut self, classifier: FailureClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SubmissionEvent> {
        self.events.subscribe()
    }

    /// Validate `form` and, if it passes, run the submission to a terminal
    /// state. `Ok` means the bulk transfer is confirmed.
    pub async fn submit(&self, form: &SubmissionForm) -> Result<SubmissionReceipt, SubmitError> {
        let attempt = Attempt {
            id: Uuid::new_v4(),
            account: form.account.clone(),
        };
        self.transition(&attempt, SubmissionState::Validating);

        let result = match validate_submission(form) {
            Ok(request) => self.run_exclusive(&attempt, &request).await,
            Err(err) => Err(err.into()),
        };

        match &result {
            Ok(receipt) => {
                tracing::info!(
                    submission = %attempt.id,
                    account = %receipt.account,
                    transfer_tx = %receipt.transfer_tx,
                    recipients = receipt.recipient_count,
                    total = %receipt.total,
                    "bulk transfer confirmed"
                );
                self.transition(&attempt, SubmissionState::Confirmed);
            }
            Err(err) => {
                tracing::warn!(submission = %attempt.id, error = %err, "submission did not complete");
                self.transition(&attempt, err.terminal_state());
            }
        }
        result
    }

    async fn run_exclusive(
        &self,
        attempt: &Attempt,
        request: &SubmissionRequest,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let _guard = InFlightGuard::acquire(&self.in_flight, request.account())?;
        self.run(attempt, request).await
    }

    async fn run(&self, attempt: &Attempt, request: &SubmissionRequest) -> Result<SubmissionReceipt, SubmitError> {

        self.transition(attempt, SubmissionState::ResolvingDestination);
        let destination = self.registry.resolve(request.chain_id(), request.mode())?.to_string();
        tracing::debug!(chain_id = request.chain_id(), mode = %request.mode(), %destination, "resolved destination");

        self.transition(attempt, SubmissionState::ResolvingAllowance);
        let current = read_allowance(
            self.reader.as_ref(),
            request.token_address(),
            request.account(),
            &destination,
        )
        .await;

        let approval_tx = if approval_required(&current, request.total()) {
            tracing::debug!(allowance = %current, total = %request.total(), "approval required");
            self.transition(attempt, SubmissionState::Approving);
            let call = ContractCall::Approve {
                spender: destination.clone(),
                amount: request.total().clone(),
            };
            let tx = self
                .send(attempt, TxStage::Approval, request.token_address(), &call)
                .await?;

            self.transition(attempt, SubmissionState::AwaitingApprovalConfirmation);
            self.confirm(attempt, TxStage::Approval, &tx).await?;
            Some(tx)
        } else {
            tracing::debug!(allowance = %current, total = %request.total(), "allowance sufficient, skipping approval");
            None
        };

        self.transition(attempt, SubmissionState::Submitting);
        let call = ContractCall::AirdropErc20 {
            token: request.token_address().to_string(),
            recipients: request.recipients().to_vec(),
            amounts: request.amounts().to_vec(),
            total: request.total().clone(),
        };
        let transfer_tx = self.send(attempt, TxStage::Transfer, &destination, &call).await?;

        self.transition(attempt, SubmissionState::AwaitingConfirmation);
        self.confirm(attempt, TxStage::Transfer, &transfer_tx).await?;

        Ok(SubmissionReceipt::new(
            attempt.id,
            request,
            &destination,
            approval_tx,
            transfer_tx,
        ))
    }

    async fn send(
        &self,
        attempt: &Attempt,
        stage: TxStage,
        contract: &str,
        call: &ContractCall,
    ) -> Result<TxHash, SubmitError> {
        match self.writer.send(contract, call).await {
            Ok(tx) => {
                tracing::info!(%stage, %contract, function = call.signature(), %tx, "transaction sent");
                self.publish(SubmissionEvent::Transaction {
                    submission: attempt.id,
                    stage,
                    outcome: TransactionOutcome::Pending(tx.clone()),
                });
                Ok(tx)
            }
            Err(err) => Err(self.fail(attempt, stage, &err)),
        }
    }

    async fn confirm(&self, attempt: &Attempt, stage: TxStage, tx: &TxHash) -> Result<(), SubmitError> {
        let timeout = self.config.confirmation_timeout();
        let wait = self.writer.await_confirmation(tx, self.config.confirmations);
        match tokio::time::timeout(timeout, wait).await {
            Ok(Ok(())) => {
                tracing::info!(%stage, %tx, confirmations = self.config.confirmations, "transaction confirmed");
                self.publish(SubmissionEvent::Transaction {
                    submission: attempt.id,
                    stage,
                    outcome: TransactionOutcome::Confirmed(tx.clone()),
                });
                Ok(())
            }
            Ok(Err(err)) => Err(self.fail(attempt, stage, &err)),
            Err(_) => {
                let message = format!(
                    "timed out after {}s waiting for confirmation of {tx}",
                    timeout.as_secs()
                );
                self.publish(SubmissionEvent::Transaction {
                    submission: attempt.id,
                    stage,
                    outcome: TransactionOutcome::Failed(message.clone()),
                });
                Err(SubmitError::TransactionFailed { stage, message })
            }
        }
    }

    fn fail(&self, attempt: &Attempt, stage: TxStage, err: &ChainError) -> SubmitError {
        let (outcome, error) = match self.classifier.classify(err) {
            FailureKind::UserCancelled => (
                TransactionOutcome::UserCancelled,
                SubmitError::UserCancelled { stage },
            ),
            FailureKind::TransactionFailed(message) => (
                TransactionOutcome::Failed(message.clone()),
                SubmitError::TransactionFailed { stage, message },
            ),
        };
        self.publish(SubmissionEvent::Transaction {
            submission: attempt.id,
            stage,
            outcome,
        });
        error
    }

    fn transition(&self, attempt: &Attempt, state: SubmissionState) {
        tracing::debug!(
            submission = %attempt.id,
            account = attempt.account.as_deref().unwrap_or("-"),
            ?state,
            "submission state"
        );
        self.publish(SubmissionEvent::StateChanged {
            submission: attempt.id,
            account: attempt.account.clone(),
            state,
        });
    }

    fn publish(&self, event: SubmissionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl fmt::Debug for Submitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submitter")
            .field("registry", &self.registry)
            .field("classifier", &self.classifier)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Marks an account as busy until dropped.
struct InFlightGuard {
    accounts: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl InFlightGuard {
    fn acquire(accounts: &Arc<Mutex<HashSet<String>>>, account: &str) -> Result<Self, SubmitError> {
        let key = account.to_ascii_lowercase();
        let mut busy = accounts.lock().unwrap_or_else(PoisonError::into_inner);
        if !busy.insert(key.clone()) {
            return Err(SubmitError::SubmissionInFlight {
                account: account.to_string(),
            });
        }
        Ok(Self {
            accounts: Arc::clone(accounts),
            key,
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
