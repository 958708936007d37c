//! Exchange router, quoter and ERC-20 call types
//!
//! Each call carries the Solidity signature of the function it targets; the
//! read/submit channels use it as the function selector.

use std::fmt;
use candid::Nat;
use rust_decimal::Decimal;
use super::chain::Address;

/// Pool fee tier in hundredths of a basis point (3000 = 0.30%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeeTier(pub u32);

impl FeeTier {
    /// Fee as a percentage (3000 → 0.3)
    pub fn percent(&self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(10_000u32)
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent().normalize())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteExactInputSingleParams {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: Nat,
    pub fee: u32,
    pub sqrt_price_limit_x96: Nat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteExactInputSingleReply {
    pub amount_out: Nat,
    pub sqrt_price_x96_after: Nat,
    pub initialized_ticks_crossed: u32,
    pub gas_estimate: Nat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactInputSingleParams {
    pub token_in: Address,
    pub token_out: Address,
    pub fee: u32,
    pub recipient: Address,
    pub amount_in: Nat,
    pub amount_out_minimum: Nat,
    pub sqrt_price_limit_x96: Nat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproveArgs {
    pub spender: Address,
    pub amount: Nat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowanceArgs {
    pub owner: Address,
    pub spender: Address,
}

/// Read-only contract calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    QuoteExactInputSingle(QuoteExactInputSingleParams),
    Allowance(AllowanceArgs),
    BalanceOf { account: Address },
}

impl ContractCall {
    pub fn signature(&self) -> &'static str {
        match self {
            ContractCall::QuoteExactInputSingle(_) => {
                "quoteExactInputSingle((address,address,uint256,uint24,uint160))"
            }
            ContractCall::Allowance(_) => "allowance(address,address)",
            ContractCall::BalanceOf { .. } => "balanceOf(address)",
        }
    }
}

/// Decoded return values of a read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallReply {
    Quote(QuoteExactInputSingleReply),
    Uint(Nat),
}

/// State-changing contract calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractWrite {
    Approve(ApproveArgs),
    ExactInputSingle(ExactInputSingleParams),
}

impl ContractWrite {
    pub fn signature(&self) -> &'static str {
        match self {
            ContractWrite::Approve(_) => "approve(address,uint256)",
            ContractWrite::ExactInputSingle(_) => {
                "exactInputSingle((address,address,uint24,address,uint256,uint256,uint160))"
            }
        }
    }
}

/// A write ready to hand to the submission channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedWrite {
    pub contract: Address,
    pub write: ContractWrite,
    /// Native value attached to the transaction
    pub value: Nat,
}
