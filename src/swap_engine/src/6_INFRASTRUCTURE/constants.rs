//! Engine-wide constants and reference deployment addresses

use crate::types::Address;

// ===== TRADING POLICY DEFAULTS =====

/// Default pool fee tier (3000 = 0.30%)
pub const DEFAULT_FEE_TIER: u32 = 3_000;

/// Default sqrt price limit; zero leaves the execution price unconstrained
pub const DEFAULT_SQRT_PRICE_LIMIT_X96: &str = "0";

/// How long a quote stays fresh before the session asks for a new one
pub const QUOTE_STALENESS_SECONDS: u64 = 10;

pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Largest precision whose unit (10^decimals) still fits in a uint256
pub const MAX_TOKEN_DECIMALS: u8 = 77;

/// Width of every token amount the contracts accept
pub const UINT256_BITS: u64 = 256;

/// Width of the router's sqrtPriceLimitX96 argument
pub const SQRT_PRICE_LIMIT_BITS: u64 = 160;

// ===== SESSION LIMITS =====

/// Undrained notifications kept per session (oldest dropped first)
pub const MAX_PENDING_EVENTS: usize = 256;

/// Buy-side placeholder while a quote is in flight
pub const QUOTE_PENDING_LABEL: &str = "Calculating...";

// ===== REFERENCE DEPLOYMENTS =====

pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;
pub const ARBITRUM_SEPOLIA_CHAIN_ID: u64 = 421_614;

/// Uniswap V3 QuoterV2 (Sepolia)
pub const REFERENCE_QUOTER: Address = Address::from_hex_literal("0xEd1f6473345F45b75F8179591dd5bA1888cf2FB3");

/// Uniswap SwapRouter02 (Sepolia)
pub const REFERENCE_SWAP_ROUTER: Address = Address::from_hex_literal("0x3bFA4769FB09eefC5a80d6E87c3B9C650f7Ae48E");

/// Wrapped ether (Sepolia)
pub const REFERENCE_WRAPPED_NATIVE: Address = Address::from_hex_literal("0xfFf9976782d46CC05630D1f6eBAb18b2324d6B14");

pub const SEPOLIA_USDC: Address = Address::from_hex_literal("0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238");
pub const ARBITRUM_SEPOLIA_USDC: Address = Address::from_hex_literal("0x75faf114eafb1BDbe2F0316DF893fd58CE46AA4d");

pub const NATIVE_SYMBOL: &str = "ETH";
pub const NATIVE_DECIMALS: u8 = 18;
pub const STABLE_SYMBOL: &str = "USDC";
pub const STABLE_DECIMALS: u8 = 6;
