//! # Election State Machine
//!
//! ```text
//! Initialize ──→ Initialized ──Start──→ Started ──Finish──→ Finished (terminal)
//!                     └───────────────Finish──────────────────↗
//! ```
//!
//! `Start` is single-fire and permanently blocked once any committed value
//! of the election has been `Finished`, whatever the current value says.

use super::entities::ElectionStatus;
use shared_types::ContractError;

/// Why a transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRefusal {
    AlreadyStarted,
    AlreadyFinished,
}

impl TransitionRefusal {
    pub fn into_error(self, election_id: &str) -> ContractError {
        match self {
            Self::AlreadyStarted => ContractError::AlreadyStarted(election_id.to_string()),
            Self::AlreadyFinished => ContractError::AlreadyFinished(election_id.to_string()),
        }
    }
}

/// Next status for `StartElection`.
///
/// The current value is checked first, so a record showing `Started` reports
/// `AlreadyStarted` even if its history also holds a `Finished` entry.
pub fn start(
    current: ElectionStatus,
    history_shows_finished: bool,
) -> Result<ElectionStatus, TransitionRefusal> {
    match current {
        ElectionStatus::Started => Err(TransitionRefusal::AlreadyStarted),
        ElectionStatus::Finished => Err(TransitionRefusal::AlreadyFinished),
        ElectionStatus::Initialized if history_shows_finished => {
            Err(TransitionRefusal::AlreadyFinished)
        }
        ElectionStatus::Initialized => Ok(ElectionStatus::Started),
    }
}

/// Next status for `FinishElection`.
pub fn finish(current: ElectionStatus) -> Result<ElectionStatus, TransitionRefusal> {
    match current {
        ElectionStatus::Finished => Err(TransitionRefusal::AlreadyFinished),
        ElectionStatus::Initialized | ElectionStatus::Started => Ok(ElectionStatus::Finished),
    }
}
