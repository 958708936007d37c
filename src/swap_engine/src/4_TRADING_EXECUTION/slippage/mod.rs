//! # Slippage Protection Module
//!
//! Decides the `amountOutMinimum` a swap is submitted with.
//!
//! ## Policy
//! - Default: unprotected (minimum of zero), logged as a warning on every swap
//! - `require_minimum_output`: a swap without a caller-set minimum is refused
//! - A caller-set minimum is passed through unchanged
//!
//! `with_tolerance` derives a minimum from a quote for callers that want one.

use candid::Nat;
use num_bigint::BigUint;
use num_traits::Zero;
use crate::infrastructure::{Result, SwapError, TradingError};

/// Basis points in 100%
const BPS_DENOMINATOR: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinimumOutput {
    /// Accept any output
    Unprotected,
    AtLeast(Nat),
}

impl MinimumOutput {
    /// `expected` reduced by `tolerance_bps` basis points, rounded down
    ///
    /// ## Example
    /// - Expected: 1_000_000, tolerance: 50 bps (0.5%)
    /// - Result: `AtLeast(995_000)`
    pub fn with_tolerance(expected: &Nat, tolerance_bps: u32) -> Result<Self> {
        if tolerance_bps > BPS_DENOMINATOR {
            return Err(SwapError::Trading(TradingError::InvalidSwapParams {
                reason: format!("slippage tolerance {} bps exceeds 100%", tolerance_bps),
            }));
        }

        let kept = BigUint::from(BPS_DENOMINATOR - tolerance_bps);
        let minimum = &expected.0 * kept / BigUint::from(BPS_DENOMINATOR);
        Ok(MinimumOutput::from(Nat::from(minimum)))
    }

    /// Value for `amountOutMinimum`
    pub fn amount(&self) -> Nat {
        match self {
            MinimumOutput::Unprotected => Nat::from(0u64),
            MinimumOutput::AtLeast(minimum) => minimum.clone(),
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, MinimumOutput::AtLeast(_))
    }
}

impl From<Nat> for MinimumOutput {
    /// Zero is no protection at all
    fn from(minimum: Nat) -> Self {
        if minimum.0.is_zero() {
            MinimumOutput::Unprotected
        } else {
            MinimumOutput::AtLeast(minimum)
        }
    }
}

/// Minimum output to submit with, under the configured policy
///
/// ## Parameters
/// - `requested`: minimum set by the caller, if any
/// - `require`: refuse unprotected swaps
/// - `quoted`: latest quoted output, only used to flag a minimum that cannot
///   be met at the current price
pub fn resolve_minimum_output(
    requested: Option<&MinimumOutput>,
    require: bool,
    quoted: Option<&Nat>,
) -> Result<MinimumOutput> {
    let minimum = requested.cloned().unwrap_or(MinimumOutput::Unprotected);

    match (&minimum, require) {
        (MinimumOutput::Unprotected, true) => {
            return Err(SwapError::Trading(TradingError::MinimumOutputRequired));
        }
        (MinimumOutput::Unprotected, false) => {
            log::warn!("⚠️ Swapping without a minimum output; the trade is unprotected against price movement");
        }
        (MinimumOutput::AtLeast(floor), _) => {
            if let Some(quoted) = quoted {
                if floor > quoted {
                    log::warn!(
                        "⚠️ Minimum output {} exceeds the current quote {}; the swap will likely revert",
                        floor, quoted
                    );
                }
            }
        }
    }

    Ok(minimum)
}
