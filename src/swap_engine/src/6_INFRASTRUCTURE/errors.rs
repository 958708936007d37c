//! Error taxonomy for the swap engine
//!
//! One top-level `SwapError` wraps a family per concern. Amount validation
//! never reaches the transaction layer; channel failures are carried with
//! their classified kind and the original message, unmodified.

use std::fmt;
use candid::{CandidType, Deserialize};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SwapError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Quote error: {0}")]
    Quote(#[from] QuoteError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Trading error: {0}")]
    Trading(#[from] TradingError),

    #[error("System error: {0}")]
    System(#[from] SystemError),
}

impl SwapError {
    /// Whether re-submitting the same request could succeed
    ///
    /// Unsupported networks and malformed input never will; the caller should
    /// disable the surface or ask for new input instead.
    pub fn is_retryable(&self) -> bool {
        match self {
            SwapError::Validation(_) | SwapError::Config(_) => false,
            SwapError::System(SystemError::WalletDisconnected) => false,
            SwapError::Trading(TradingError::MinimumOutputRequired) => false,
            _ => true,
        }
    }

    /// Classified channel failure, when this error came from one
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            SwapError::Quote(QuoteError::QuoteFailed { kind, .. }) => Some(*kind),
            SwapError::Query(QueryError::ReadFailed { kind, .. }) => Some(*kind),
            SwapError::Trading(TradingError::AuthorizationFailed { kind, .. }) => Some(*kind),
            SwapError::Trading(TradingError::SwapFailed { kind, .. }) => Some(*kind),
            _ => None,
        }
    }
}

/// Why a channel call failed
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The wallet owner declined to sign
    UserRejected,
    /// The contract reverted during estimation or execution
    Reverted,
    /// Node, transport or timeout failure
    Network,
    Unknown,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FailureKind::UserRejected => "user rejected",
            FailureKind::Reverted => "execution reverted",
            FailureKind::Network => "network error",
            FailureKind::Unknown => "unknown failure",
        };
        f.write_str(text)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid amount '{amount}': {reason}")]
    InvalidAmount { amount: String, reason: String },

    #[error("Invalid {kind} '{value}': {reason}")]
    InvalidHex { value: String, kind: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unsupported network {chain_id}: {reason}")]
    UnsupportedNetwork { chain_id: u64, reason: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Failed to load configuration from {path}: {reason}")]
    LoadFailed { path: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("Quote failed ({kind}): {reason}")]
    QuoteFailed { kind: FailureKind, reason: String },

    /// A response arrived for inputs that are no longer live. Internal only:
    /// the session drops the response instead of surfacing this.
    #[error("Stale quote for attempt {requested_attempt} (live attempt {live_attempt})")]
    StaleQuote { requested_attempt: u64, live_attempt: u64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("{operation} read failed for {token} ({kind}): {reason}")]
    ReadFailed { operation: String, token: String, kind: FailureKind, reason: String },

    #[error("Unexpected reply to {operation}: {reply}")]
    UnexpectedReply { operation: String, reply: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TradingError {
    #[error("Authorization of {amount} {token} failed ({kind}): {reason}")]
    AuthorizationFailed { token: String, amount: String, kind: FailureKind, reason: String },

    #[error("Swap {amount} {token_in} → {token_out} failed ({kind}): {reason}")]
    SwapFailed { token_in: String, token_out: String, amount: String, kind: FailureKind, reason: String },

    #[error("Invalid swap parameters: {reason}")]
    InvalidSwapParams { reason: String },

    #[error("A minimum output amount is required before swapping")]
    MinimumOutputRequired,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SystemError {
    #[error("A {kind} submission is already in flight for attempt {attempt}")]
    SubmissionInProgress { kind: String, attempt: u64 },

    #[error("Action unavailable: {reason}")]
    ActionDisabled { reason: String },

    #[error("No wallet connected")]
    WalletDisconnected,
}
