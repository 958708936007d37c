//! # Router Swap Module
//!
//! Prepares `exactInputSingle` on the swap router for one pool hop.
//!
//! ## Key Constraints
//! - **Single pool**: input and output trade directly at the configured fee tier
//! - **Native input**: the amount is attached as transaction value and the
//!   router wraps it; the wrapped address is passed as `tokenIn`
//! - **Token input**: no value attached; the router pulls via allowance
//! - **Recipient**: always the owner who signs

use candid::Nat;
use num_traits::Zero;
use crate::_3_PAIR_CONFIGURATION::PairConfig;
use crate::infrastructure::config::TradingPolicy;
use crate::infrastructure::rpc::ChannelError;
use crate::infrastructure::{Result, SwapError, TradingError};
use crate::types::{Address, ContractWrite, ExactInputSingleParams, PreparedWrite};
use super::slippage::MinimumOutput;

/// Prepare the swap of `amount_in` on `pair`, paying out to `recipient`
///
/// ## Parameters
/// - `pair`: resolved input/output tokens and router
/// - `recipient`: the signing owner
/// - `amount_in`: exact input in base units
/// - `policy`: fee tier and price limit
/// - `minimum`: already-resolved minimum output
///
/// ## Returns
/// - `Ok(PreparedWrite)`: router call, with native value when input is native
/// - `Err(InvalidSwapParams)`: see `validate_swap_params`
pub fn build_swap(
    pair: &PairConfig,
    recipient: Address,
    amount_in: &Nat,
    policy: &TradingPolicy,
    minimum: &MinimumOutput,
) -> Result<PreparedWrite> {
    validate_swap_params(pair, recipient, amount_in)?;

    let value = if pair.input_is_native() {
        amount_in.clone()
    } else {
        Nat::from(0u64)
    };

    log::info!(
        "🔄 Preparing swap: {} {} → {} (fee {}, min out {})",
        amount_in,
        pair.symbol_in(),
        pair.symbol_out(),
        policy.fee_tier,
        minimum.amount()
    );

    Ok(PreparedWrite {
        contract: pair.router,
        write: ContractWrite::ExactInputSingle(ExactInputSingleParams {
            token_in: pair.token_in.contract_address(),
            token_out: pair.token_out.contract_address(),
            fee: policy.fee_tier.0,
            recipient,
            amount_in: amount_in.clone(),
            amount_out_minimum: minimum.amount(),
            sqrt_price_limit_x96: policy.sqrt_price_limit_x96.clone(),
        }),
        value,
    })
}

/// Validate swap parameters before building calldata
///
/// Checks:
/// - Amount is positive
/// - Input and output tokens differ
/// - Recipient is not the zero address
fn validate_swap_params(pair: &PairConfig, recipient: Address, amount_in: &Nat) -> Result<()> {
    if amount_in.0.is_zero() {
        return Err(invalid("swap amount must be positive"));
    }

    if pair.token_in.contract_address() == pair.token_out.contract_address() {
        return Err(invalid("cannot swap a token for itself"));
    }

    if recipient.is_zero() {
        return Err(invalid("recipient must not be the zero address"));
    }

    Ok(())
}

fn invalid(reason: &str) -> SwapError {
    SwapError::Trading(TradingError::InvalidSwapParams {
        reason: reason.to_string(),
    })
}

pub(crate) fn swap_failed(symbol_in: &str, symbol_out: &str, amount: String, error: ChannelError) -> SwapError {
    SwapError::Trading(TradingError::SwapFailed {
        token_in: symbol_in.to_string(),
        token_out: symbol_out.to_string(),
        amount,
        kind: error.kind,
        reason: error.message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::_3_PAIR_CONFIGURATION::resolve_pair;
    use crate::infrastructure::config::EngineConfig;
    use crate::infrastructure::*;
    use crate::types::TradeDirection;

    const OWNER: Address = Address::from_hex_literal("0x00000000000000000000000000000000000000c3");

    fn setup(direction: TradeDirection) -> (PairConfig, TradingPolicy) {
        let config = EngineConfig::default();
        let pair = resolve_pair(&config, SEPOLIA_CHAIN_ID, direction).unwrap();
        (pair, config.policy().unwrap())
    }

    fn params(prepared: &PreparedWrite) -> &ExactInputSingleParams {
        match &prepared.write {
            ContractWrite::ExactInputSingle(params) => params,
            other => panic!("expected a swap, got {:?}", other),
        }
    }

    #[test]
    fn test_native_input_attaches_value() {
        let (pair, policy) = setup(TradeDirection::NativeToStable);
        let amount = Nat::from(500_000_000_000_000_000u64);
        let prepared = build_swap(&pair, OWNER, &amount, &policy, &MinimumOutput::Unprotected).unwrap();

        assert_eq!(prepared.contract, REFERENCE_SWAP_ROUTER);
        assert_eq!(prepared.value, amount);

        let params = params(&prepared);
        assert_eq!(params.token_in, REFERENCE_WRAPPED_NATIVE);
        assert_eq!(params.token_out, SEPOLIA_USDC);
        assert_eq!(params.fee, 3_000);
        assert_eq!(params.recipient, OWNER);
        assert_eq!(params.amount_out_minimum, Nat::from(0u64));
        assert_eq!(params.sqrt_price_limit_x96, Nat::from(0u64));
    }

    #[test]
    fn test_token_input_attaches_no_value() {
        let (pair, policy) = setup(TradeDirection::StableToNative);
        let minimum = MinimumOutput::AtLeast(Nat::from(12_345u64));
        let prepared = build_swap(&pair, OWNER, &Nat::from(100_000_000u64), &policy, &minimum).unwrap();

        assert_eq!(prepared.value, Nat::from(0u64));
        assert_eq!(params(&prepared).token_in, SEPOLIA_USDC);
        assert_eq!(params(&prepared).amount_out_minimum, Nat::from(12_345u64));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let (pair, policy) = setup(TradeDirection::StableToNative);

        let zero = build_swap(&pair, OWNER, &Nat::from(0u64), &policy, &MinimumOutput::Unprotected);
        assert!(matches!(zero, Err(SwapError::Trading(TradingError::InvalidSwapParams { .. }))));

        let nobody = build_swap(&pair, Address::ZERO, &Nat::from(1u64), &policy, &MinimumOutput::Unprotected);
        assert!(nobody.is_err());
    }

    #[test]
    fn test_failure_classification() {
        let err = swap_failed("ETH", "USDC", "0.5".to_string(), ChannelError::reverted("Too little received"));
        assert_eq!(err.failure_kind(), Some(FailureKind::Reverted));
        assert!(err.to_string().contains("Too little received"));
    }
}
