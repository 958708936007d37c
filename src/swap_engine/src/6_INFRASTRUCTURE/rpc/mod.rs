//! # Chain Channels
//!
//! The engine never talks to a node directly. Callers plug in:
//! - **ContractReader**: read-only contract calls (quotes, allowances, balances)
//! - **TransactionSubmitter**: signed writes (authorizations, swaps)
//! - **ChainIdentity**: the network the wallet is currently on
//!
//! Timeouts belong to the channel implementation. A timeout reported by the
//! channel is a `FailureKind::Network` failure like any other.

use candid::Nat;
use futures::future::LocalBoxFuture;
use thiserror::Error;
use crate::infrastructure::errors::FailureKind;
use crate::types::{Address, CallReply, ContractCall, ContractWrite, TxHash};

#[cfg(test)]
pub mod mock;

pub type ChannelResult<T> = std::result::Result<T, ChannelError>;

/// Failure reported by a channel, classified but otherwise verbatim
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ChannelError {
    pub kind: FailureKind,
    pub message: String,
}

impl ChannelError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn user_rejected(message: impl Into<String>) -> Self {
        Self::new(FailureKind::UserRejected, message)
    }

    pub fn reverted(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Reverted, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Network, message)
    }
}

/// Read-only contract-call channel
pub trait ContractReader {
    /// Call `call.signature()` on `contract` without changing state
    fn call<'a>(&'a self, contract: Address, call: ContractCall) -> LocalBoxFuture<'a, ChannelResult<CallReply>>;

    /// Native-asset balance of `owner`
    fn native_balance<'a>(&'a self, owner: Address) -> LocalBoxFuture<'a, ChannelResult<Nat>>;
}

/// Transaction-submission channel
///
/// Resolves once the wallet has broadcast the transaction (or failed to).
pub trait TransactionSubmitter {
    fn submit<'a>(
        &'a self,
        contract: Address,
        write: ContractWrite,
        value: Nat,
    ) -> LocalBoxFuture<'a, ChannelResult<TxHash>>;
}

/// Supplies the active network identifier
pub trait ChainIdentity {
    fn chain_id(&self) -> u64;
}
