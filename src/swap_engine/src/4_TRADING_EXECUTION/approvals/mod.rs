//! # ERC-20 Approval Module
//!
//! Authorizes the router to spend the owner's input token.
//!
//! ## Approval Flow
//! 1. Session finds the cached allowance short of the amount
//! 2. `approve(router, amount)` is sent to the input token contract
//! 3. On success the session invalidates its allowance cache and re-reads
//!
//! ## Safety
//! - Amount exactly matches the swap requirement, never unlimited
//! - Native input is never approved; it is paid as transaction value

use candid::Nat;
use num_traits::Zero;
use crate::_3_PAIR_CONFIGURATION::PairConfig;
use crate::infrastructure::rpc::ChannelError;
use crate::infrastructure::{Result, SwapError, TradingError};
use crate::types::{ApproveArgs, Asset, ContractWrite, PreparedWrite};

/// Prepare `approve(router, amount)` on the pair's input token
///
/// ## Returns
/// - `Ok(PreparedWrite)`: call on the token contract, no native value
/// - `Err(InvalidSwapParams)`: native input or zero amount
pub fn build_approval(pair: &PairConfig, amount: &Nat) -> Result<PreparedWrite> {
    let token = match &pair.token_in.asset {
        Asset::Erc20 { address } => *address,
        Asset::Native { .. } => {
            return Err(SwapError::Trading(TradingError::InvalidSwapParams {
                reason: format!("{} is native and needs no approval", pair.symbol_in()),
            }));
        }
    };

    if amount.0.is_zero() {
        return Err(SwapError::Trading(TradingError::InvalidSwapParams {
            reason: "approval amount must be positive".to_string(),
        }));
    }

    log::info!("📝 Approving {} {} for router {}", amount, pair.symbol_in(), pair.router);

    Ok(PreparedWrite {
        contract: token,
        write: ContractWrite::Approve(ApproveArgs {
            spender: pair.router,
            amount: amount.clone(),
        }),
        value: Nat::from(0u64),
    })
}

pub(crate) fn approval_failed(symbol: &str, amount: String, error: ChannelError) -> SwapError {
    SwapError::Trading(TradingError::AuthorizationFailed {
        token: symbol.to_string(),
        amount,
        kind: error.kind,
        reason: error.message,
    })
}
