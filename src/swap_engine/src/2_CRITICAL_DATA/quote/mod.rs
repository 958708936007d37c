//! # Quote Provider
//!
//! Estimates swap output through the pool quoter without changing state.
//!
//! ## Lifecycle
//! 1. `issue`: record a pending read for (pair, amount) under the live attempt
//! 2. `fetch_quote`: perform the read (any number may be outstanding)
//! 3. `apply`: accept the answer only if its attempt and key are still live
//!
//! ## Rules
//! - At most one outstanding read per (pair, amount) key
//! - An answer for superseded inputs is discarded, never displayed
//! - A quote is fresh for the staleness window; expiry does not refetch, it
//!   only makes the next `issue` for the same inputs go through
//! - A failed read is not retried for the same key; the next amount or pair
//!   change retries it

use candid::{CandidType, Deserialize, Nat};
use serde::Serialize;
use crate::_3_PAIR_CONFIGURATION::PairConfig;
use crate::infrastructure::config::TradingPolicy;
use crate::infrastructure::rpc::ContractReader;
use crate::infrastructure::{QueryError, QuoteError, Result, SwapError};
use crate::types::{
    Address, AttemptId, CallReply, ContractCall, FeeTier, QuoteExactInputSingleParams,
    QuoteExactInputSingleReply,
};

/// Inputs a quote answers for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuoteKey {
    pub chain_id: u64,
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: Nat,
}

impl QuoteKey {
    pub fn new(pair: &PairConfig, amount_in: &Nat) -> Self {
        Self {
            chain_id: pair.chain_id,
            token_in: pair.token_in.contract_address(),
            token_out: pair.token_out.contract_address(),
            amount_in: amount_in.clone(),
        }
    }
}

/// An issued read, carried to the channel and back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub attempt: AttemptId,
    pub key: QuoteKey,
    pub quoter: Address,
    pub params: QuoteExactInputSingleParams,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub key: QuoteKey,
    pub amount_out: Nat,
    pub gas_estimate: Nat,
    pub fetched_at: u64,
    pub expires_at: u64,
}

impl Quote {
    pub fn is_stale(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteState {
    /// No amount entered
    Idle,
    Pending { key: QuoteKey, attempt: AttemptId },
    Ready(Quote),
    Failed { key: QuoteKey, error: SwapError },
}

/// Caller-facing quote state
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum QuoteStatus {
    Idle,
    Pending,
    Ready { amount_out: Nat, stale: bool },
    Failed { reason: String },
}

/// Quote state for one session
#[derive(Debug, Clone)]
pub struct QuoteTracker {
    fee_tier: FeeTier,
    sqrt_price_limit_x96: Nat,
    staleness_nanos: u64,
    state: QuoteState,
}

impl QuoteTracker {
    pub fn new(policy: &TradingPolicy) -> Self {
        Self {
            fee_tier: policy.fee_tier,
            sqrt_price_limit_x96: policy.sqrt_price_limit_x96.clone(),
            staleness_nanos: policy.quote_staleness_nanos,
            state: QuoteState::Idle,
        }
    }

    pub fn state(&self) -> &QuoteState {
        &self.state
    }

    /// Forget everything; used when the inputs a quote depends on change
    pub fn reset(&mut self) {
        self.state = QuoteState::Idle;
    }

    /// Start a read for `amount_in` on `pair`, unless one is not needed
    ///
    /// Returns `None` when a read for the same inputs and attempt is already
    /// outstanding, a fresh quote is on hand, or the last read for these
    /// inputs failed.
    pub fn issue(
        &mut self,
        pair: &PairConfig,
        amount_in: &Nat,
        attempt: AttemptId,
        now: u64,
    ) -> Option<QuoteRequest> {
        let key = QuoteKey::new(pair, amount_in);

        match &self.state {
            QuoteState::Pending { key: pending, attempt: pending_attempt }
                if *pending == key && *pending_attempt == attempt => return None,
            QuoteState::Ready(quote) if quote.key == key && !quote.is_stale(now) => return None,
            QuoteState::Failed { key: failed, .. } if *failed == key => return None,
            _ => {}
        }

        let params = QuoteExactInputSingleParams {
            token_in: key.token_in,
            token_out: key.token_out,
            amount_in: amount_in.clone(),
            fee: self.fee_tier.0,
            sqrt_price_limit_x96: self.sqrt_price_limit_x96.clone(),
        };

        log::debug!(
            "📊 Quote requested: {} {} → {} (attempt {})",
            amount_in, pair.symbol_in(), pair.symbol_out(), attempt
        );

        self.state = QuoteState::Pending { key: key.clone(), attempt };

        Some(QuoteRequest {
            attempt,
            key,
            quoter: pair.quoter,
            params,
        })
    }

    /// Record the answer to `request`
    ///
    /// ## Returns
    /// - `Ok(())` if the answer was stored (success or failure)
    /// - `Err(QuoteError::StaleQuote)` if the request was superseded; state
    ///   is left untouched
    pub fn apply(
        &mut self,
        request: &QuoteRequest,
        live_attempt: AttemptId,
        result: Result<QuoteExactInputSingleReply>,
        now: u64,
    ) -> Result<()> {
        let is_live = matches!(
            &self.state,
            QuoteState::Pending { key, attempt }
                if *key == request.key && *attempt == request.attempt
        ) && request.attempt == live_attempt;

        if !is_live {
            return Err(SwapError::Quote(QuoteError::StaleQuote {
                requested_attempt: request.attempt.0,
                live_attempt: live_attempt.0,
            }));
        }

        self.state = match result {
            Ok(reply) => QuoteState::Ready(Quote {
                key: request.key.clone(),
                amount_out: reply.amount_out,
                gas_estimate: reply.gas_estimate,
                fetched_at: now,
                expires_at: now.saturating_add(self.staleness_nanos),
            }),
            Err(error) => QuoteState::Failed {
                key: request.key.clone(),
                error,
            },
        };

        Ok(())
    }

    /// Last successful quote for the live inputs, fresh or not
    pub fn latest(&self) -> Option<&Quote> {
        match &self.state {
            QuoteState::Ready(quote) => Some(quote),
            _ => None,
        }
    }

    pub fn status(&self, now: u64) -> QuoteStatus {
        match &self.state {
            QuoteState::Idle => QuoteStatus::Idle,
            QuoteState::Pending { .. } => QuoteStatus::Pending,
            QuoteState::Ready(quote) => QuoteStatus::Ready {
                amount_out: quote.amount_out.clone(),
                stale: quote.is_stale(now),
            },
            QuoteState::Failed { error, .. } => QuoteStatus::Failed {
                reason: error.to_string(),
            },
        }
    }
}

/// Ask the quoter for the output of `request`
pub async fn fetch_quote(
    reader: &dyn ContractReader,
    request: &QuoteRequest,
) -> Result<QuoteExactInputSingleReply> {
    let call = ContractCall::QuoteExactInputSingle(request.params.clone());
    let operation = call.signature();

    let reply = reader.call(request.quoter, call).await.map_err(|e| {
        log::warn!("❌ Quote read failed (attempt {}): {}", request.attempt, e);
        SwapError::Quote(QuoteError::QuoteFailed {
            kind: e.kind,
            reason: e.message,
        })
    })?;

    match reply {
        CallReply::Quote(quote) => Ok(quote),
        other => Err(SwapError::Query(QueryError::UnexpectedReply {
            operation: operation.to_string(),
            reply: format!("{:?}", other),
        })),
    }
}
