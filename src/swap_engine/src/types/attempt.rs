//! Attempt and submission identifiers
//!
//! An attempt is one set of trade inputs (direction, amount, owner, network).
//! Every input change advances it, so results captured under an older
//! attempt can be recognized and dropped when they arrive late.

use std::fmt;
use candid::{CandidType, Deserialize, Nat};
use serde::Serialize;

/// Monotonic tag for the live set of trade inputs
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AttemptId(pub u64);

impl AttemptId {
    pub fn next(self) -> Self {
        AttemptId(self.0 + 1)
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic tag for each outbound write, unique within a session
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionId(pub u64);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx-{}", self.0)
    }
}

/// The two mutating sub-steps of an attempt
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionKind {
    Approval,
    Swap,
}

impl SubmissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Approval => "approval",
            SubmissionKind::Swap => "swap",
        }
    }
}

/// Everything needed to attribute an outcome to the write that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    pub id: SubmissionId,
    pub attempt: AttemptId,
    pub kind: SubmissionKind,
    pub symbol_in: String,
    pub symbol_out: String,
    /// Input amount in base units
    pub amount: Nat,
    pub decimals_in: u8,
}
