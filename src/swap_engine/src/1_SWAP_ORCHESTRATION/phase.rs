//! Submission phase guard
//! At most one authorization or swap may be in flight per session
//!
//! ## Transitions
//! - `Idle` → `AwaitingApproval` | `AwaitingSwap` via `try_begin`
//! - `Awaiting*` → `Idle` via `try_finish` with the matching ticket
//! - `Awaiting*` → `Idle` via `abandon` when the inputs change; the
//!   broadcast transaction cannot be recalled, its outcome just arrives late

use crate::infrastructure::{Result, SwapError, SystemError};
use crate::types::{SubmissionKind, SubmissionTicket};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingApproval(SubmissionTicket),
    AwaitingSwap(SubmissionTicket),
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::AwaitingApproval(_) => "awaiting_approval",
            Phase::AwaitingSwap(_) => "awaiting_swap",
        }
    }

    pub fn in_flight(&self) -> Option<&SubmissionTicket> {
        match self {
            Phase::Idle => None,
            Phase::AwaitingApproval(ticket) | Phase::AwaitingSwap(ticket) => Some(ticket),
        }
    }

    /// Enter the awaiting phase for `ticket`
    ///
    /// Returns Err if anything is already in flight
    pub fn try_begin(&mut self, ticket: SubmissionTicket) -> Result<()> {
        if let Some(current) = self.in_flight() {
            return Err(SwapError::System(SystemError::SubmissionInProgress {
                kind: current.kind.as_str().to_string(),
                attempt: current.attempt.0,
            }));
        }

        log::info!(
            "🔒 {} {} started (attempt {})",
            ticket.kind.as_str(), ticket.id, ticket.attempt
        );

        *self = match ticket.kind {
            SubmissionKind::Approval => Phase::AwaitingApproval(ticket),
            SubmissionKind::Swap => Phase::AwaitingSwap(ticket),
        };
        Ok(())
    }

    /// Leave the awaiting phase if `ticket` is the one in flight
    ///
    /// Returns false, leaving the phase untouched, for any other ticket.
    pub fn try_finish(&mut self, ticket: &SubmissionTicket) -> bool {
        match self.in_flight() {
            Some(current) if current.id == ticket.id => {
                log::info!("🔓 {} {} finished", ticket.kind.as_str(), ticket.id);
                *self = Phase::Idle;
                true
            }
            _ => false,
        }
    }

    /// Drop the association with whatever is in flight
    pub fn abandon(&mut self) -> Option<SubmissionTicket> {
        match std::mem::take(self) {
            Phase::Idle => None,
            Phase::AwaitingApproval(ticket) | Phase::AwaitingSwap(ticket) => Some(ticket),
        }
    }
}
