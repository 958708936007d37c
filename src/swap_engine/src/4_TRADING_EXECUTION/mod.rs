//! # Trading Execution Module
//!
//! Builds and submits the two state-changing writes of a swap.
//!
//! ## Architecture
//! - **approvals/**: ERC-20 `approve` so the router can pull the input token
//! - **swaps/**: Router `exactInputSingle` through a single pool
//! - **slippage/**: Minimum-output policy for the swap
//!
//! ## Swap Flow
//! 1. **Validate**: amount, distinct tokens, minimum-output policy
//! 2. **Approve**: only for token input whose allowance is short
//! 3. **Execute**: one swap; native input rides along as transaction value
//!
//! The session decides which step is next and owns the in-flight guard; this
//! module only prepares calldata and classifies channel failures.

pub mod approvals;
pub mod slippage;
pub mod swaps;

use crate::infrastructure::rpc::{ChannelError, TransactionSubmitter};
use crate::infrastructure::{from_base_units, Result, SwapError};
use crate::types::{PreparedWrite, SubmissionKind, SubmissionTicket, TxHash};

/// Map a channel failure on `ticket` to the error the caller sees
///
/// The classified kind and the channel's message are kept verbatim.
pub fn classify_failure(ticket: &SubmissionTicket, error: ChannelError) -> SwapError {
    let amount = from_base_units(&ticket.amount, ticket.decimals_in);
    match ticket.kind {
        SubmissionKind::Approval => approvals::approval_failed(&ticket.symbol_in, amount, error),
        SubmissionKind::Swap => swaps::swap_failed(&ticket.symbol_in, &ticket.symbol_out, amount, error),
    }
}

/// Hand `prepared` to the submission channel
pub async fn submit_prepared(
    submitter: &dyn TransactionSubmitter,
    prepared: &PreparedWrite,
    ticket: &SubmissionTicket,
) -> Result<TxHash> {
    log::info!(
        "📤 Submitting {} {} ({}, attempt {})",
        ticket.kind.as_str(),
        prepared.write.signature(),
        ticket.id,
        ticket.attempt
    );

    let tx_hash = submitter
        .submit(prepared.contract, prepared.write.clone(), prepared.value.clone())
        .await
        .map_err(|e| {
            log::warn!("❌ {} {} failed: {}", ticket.kind.as_str(), ticket.id, e);
            classify_failure(ticket, e)
        })?;

    log::info!("✅ {} {} submitted: {}", ticket.kind.as_str(), ticket.id, tx_hash);
    Ok(tx_hash)
}
