use super::payload::SubmissionPayload;
use super::transport::{Transport, TransportError};
use crate::inspection::{Checklist, ValidationError};
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const SUCCESS_MESSAGE: &str = "Inspection envoyée avec succès";

/// Where a checklist stands in the submit flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingConfirmation,
    Submitting,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("aucune soumission en attente de confirmation")]
    NotAwaitingConfirmation,
    #[error("Échec de l'envoi: {0}")]
    Transport(#[from] TransportError),
}

/// Outcome shown to the operator after a successful send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub message: &'static str,
    pub file_name: String,
    pub delivery_id: Option<String>,
}

/// Drives validate, confirm and send for one checklist screen.
pub struct SubmissionOrchestrator {
    transport: Arc<dyn Transport>,
    timeout: Duration,
    phase: Phase,
}

impl SubmissionOrchestrator {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            timeout: DEFAULT_TIMEOUT,
            phase: Phase::Idle,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Validate and, when the checklist is complete, wait for confirmation.
    pub fn request_submit(&mut self, checklist: &Checklist) -> Result<(), SubmissionError> {
        if let Some(violation) = checklist.validate() {
            warn!(form = checklist.form().tag(), %violation, "submission blocked by validation");
            self.phase = Phase::Idle;
            return Err(violation.into());
        }
        self.phase = Phase::AwaitingConfirmation;
        Ok(())
    }

    /// Back out of the confirmation prompt. Also recovers the phase if a
    /// confirm future was dropped mid-flight.
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }

    pub async fn confirm(
        &mut self,
        checklist: &mut Checklist,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        self.confirm_at(checklist, Local::now().naive_local()).await
    }

    /// Send the checklist stamped with `submitted_at`. Success resets the
    /// checklist; any failure leaves it untouched for a retry.
    pub async fn confirm_at(
        &mut self,
        checklist: &mut Checklist,
        submitted_at: NaiveDateTime,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        if self.phase != Phase::AwaitingConfirmation {
            return Err(SubmissionError::NotAwaitingConfirmation);
        }
        if let Some(violation) = checklist.validate() {
            self.phase = Phase::Idle;
            return Err(violation.into());
        }

        self.phase = Phase::Submitting;
        let payload = SubmissionPayload::build(checklist, submitted_at);
        let form = payload.form_type.tag();
        info!(form, file_name = %payload.file_name, "submitting inspection");

        let outcome = match tokio::time::timeout(self.timeout, self.transport.send(&payload)).await
        {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.timeout)),
        };
        self.phase = Phase::Idle;

        match outcome {
            Ok(delivery) => {
                info!(form, id = ?delivery.id, "inspection delivered");
                checklist.reset();
                Ok(SubmissionReceipt {
                    message: SUCCESS_MESSAGE,
                    file_name: payload.file_name,
                    delivery_id: delivery.id,
                })
            }
            Err(err) => {
                error!(form, error = %err, "inspection delivery failed");
                Err(SubmissionError::Transport(err))
            }
        }
    }
}
