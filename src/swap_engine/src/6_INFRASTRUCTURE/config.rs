//! Engine configuration
//!
//! Per-network token and contract tables plus trading policy, injected at
//! session construction. Loadable from TOML; `EngineConfig::default()`
//! carries the reference testnet deployments.

use std::collections::HashSet;
use std::fs;
use candid::Nat;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use crate::infrastructure::constants::*;
use crate::infrastructure::errors::{ConfigError, Result, SwapError};
use crate::types::{Address, FeeTier};

/// A token as configured for one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpec {
    /// Token contract; for the native asset, its wrapped contract
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub name: String,
    pub quoter: Address,
    pub router: Address,
    pub native: TokenSpec,
    /// Absent when the stable token is not deployed on this network
    #[serde(default)]
    pub stable: Option<TokenSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pool fee tier in hundredths of a basis point
    pub fee_tier: u32,

    /// sqrtPriceLimitX96 passed to quotes and swaps, as a decimal string
    pub sqrt_price_limit_x96: String,

    pub quote_staleness_secs: u64,

    /// Refuse to swap until the caller sets a minimum output amount
    pub require_minimum_output: bool,

    pub networks: Vec<NetworkConfig>,
}

/// Validated, ready-to-use trading parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradingPolicy {
    pub fee_tier: FeeTier,
    pub sqrt_price_limit_x96: Nat,
    pub quote_staleness_nanos: u64,
    pub require_minimum_output: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fee_tier: DEFAULT_FEE_TIER,
            sqrt_price_limit_x96: DEFAULT_SQRT_PRICE_LIMIT_X96.to_string(),
            quote_staleness_secs: QUOTE_STALENESS_SECONDS,
            require_minimum_output: false,
            networks: vec![
                reference_network(SEPOLIA_CHAIN_ID, "sepolia", SEPOLIA_USDC),
                reference_network(ARBITRUM_SEPOLIA_CHAIN_ID, "arbitrum-sepolia", ARBITRUM_SEPOLIA_USDC),
            ],
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(text)
            .map_err(|e| SwapError::Config(ConfigError::InvalidConfig {
                reason: e.to_string(),
            }))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| SwapError::Config(ConfigError::LoadFailed {
                path: path.to_string(),
                reason: e.to_string(),
            }))?;

        log::info!("Loading swap engine configuration from {}", path);
        Self::from_toml_str(&content)
    }

    /// Check internal consistency
    ///
    /// Checks:
    /// - Chain ids are unique
    /// - Native and stable tokens differ on every network
    /// - Token decimals fit a uint256 unit
    /// - Staleness window is non-zero
    /// - Price limit parses and fits uint160
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for network in &self.networks {
            if !seen.insert(network.chain_id) {
                return Err(invalid(format!("duplicate chain id {}", network.chain_id)));
            }

            check_token(network, &network.native)?;

            if let Some(stable) = &network.stable {
                check_token(network, stable)?;

                if stable.address == network.native.address {
                    return Err(invalid(format!(
                        "{}: {} and {} share address {}",
                        network.name, network.native.symbol, stable.symbol, stable.address
                    )));
                }
            }
        }

        if self.quote_staleness_secs == 0 {
            return Err(invalid("quote_staleness_secs must be greater than zero".to_string()));
        }

        self.policy().map(|_| ())
    }

    /// Trading parameters derived from this configuration
    pub fn policy(&self) -> Result<TradingPolicy> {
        let limit = BigUint::parse_bytes(self.sqrt_price_limit_x96.trim().as_bytes(), 10)
            .ok_or_else(|| invalid(format!(
                "sqrt_price_limit_x96 '{}' is not a decimal integer",
                self.sqrt_price_limit_x96
            )))?;

        if limit.bits() > SQRT_PRICE_LIMIT_BITS {
            return Err(invalid(format!(
                "sqrt_price_limit_x96 exceeds {} bits",
                SQRT_PRICE_LIMIT_BITS
            )));
        }

        Ok(TradingPolicy {
            fee_tier: FeeTier(self.fee_tier),
            sqrt_price_limit_x96: Nat::from(limit),
            quote_staleness_nanos: self.quote_staleness_secs.saturating_mul(NANOS_PER_SECOND),
            require_minimum_output: self.require_minimum_output,
        })
    }

    pub fn network(&self, chain_id: u64) -> Option<&NetworkConfig> {
        self.networks.iter().find(|n| n.chain_id == chain_id)
    }
}

// ===== Helper Functions =====

fn reference_network(chain_id: u64, name: &str, stable: Address) -> NetworkConfig {
    NetworkConfig {
        chain_id,
        name: name.to_string(),
        quoter: REFERENCE_QUOTER,
        router: REFERENCE_SWAP_ROUTER,
        native: TokenSpec {
            address: REFERENCE_WRAPPED_NATIVE,
            decimals: NATIVE_DECIMALS,
            symbol: NATIVE_SYMBOL.to_string(),
        },
        stable: Some(TokenSpec {
            address: stable,
            decimals: STABLE_DECIMALS,
            symbol: STABLE_SYMBOL.to_string(),
        }),
    }
}

fn check_token(network: &NetworkConfig, token: &TokenSpec) -> Result<()> {
    if token.decimals > MAX_TOKEN_DECIMALS {
        return Err(invalid(format!(
            "{}: {} has {} decimals (max {})",
            network.name, token.symbol, token.decimals, MAX_TOKEN_DECIMALS
        )));
    }
    if token.symbol.trim().is_empty() {
        return Err(invalid(format!("{}: token {} has no symbol", network.name, token.address)));
    }
    Ok(())
}

fn invalid(reason: String) -> SwapError {
    SwapError::Config(ConfigError::InvalidConfig { reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG_TOML: &str = r#"
fee_tier = 500
quote_staleness_secs = 15

[[networks]]
chain_id = 11155111
name = "sepolia"
quoter = "0xEd1f6473345F45b75F8179591dd5bA1888cf2FB3"
router = "0x3bFA4769FB09eefC5a80d6E87c3B9C650f7Ae48E"
native = { address = "0xfFf9976782d46CC05630D1f6eBAb18b2324d6B14", decimals = 18, symbol = "ETH" }
stable = { address = "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238", decimals = 6, symbol = "USDC" }

[[networks]]
chain_id = 1337
name = "devnet"
quoter = "0xEd1f6473345F45b75F8179591dd5bA1888cf2FB3"
router = "0x3bFA4769FB09eefC5a80d6E87c3B9C650f7Ae48E"
native = { address = "0xfFf9976782d46CC05630D1f6eBAb18b2324d6B14", decimals = 18, symbol = "ETH" }
"#;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());

        let policy = config.policy().unwrap();
        assert_eq!(policy.fee_tier, FeeTier(3_000));
        assert_eq!(policy.sqrt_price_limit_x96, Nat::from(0u64));
        assert_eq!(policy.quote_staleness_nanos, 10 * NANOS_PER_SECOND);
        assert!(!policy.require_minimum_output);
    }

    #[test]
    fn test_parse_toml() {
        let config = EngineConfig::from_toml_str(CONFIG_TOML).unwrap();
        assert_eq!(config.fee_tier, 500);
        assert_eq!(config.quote_staleness_secs, 15);
        // Omitted fields fall back to defaults
        assert_eq!(config.sqrt_price_limit_x96, "0");
        assert_eq!(config.networks.len(), 2);
        assert!(config.network(1337).unwrap().stable.is_none());
        assert_eq!(config.network(SEPOLIA_CHAIN_ID).unwrap().stable.as_ref().unwrap().address, SEPOLIA_USDC);
    }

    #[test]
    fn test_rejects_duplicate_chain_ids() {
        let mut config = EngineConfig::default();
        let duplicate = config.networks[0].clone();
        config.networks.push(duplicate);
        assert!(matches!(config.validate(), Err(SwapError::Config(ConfigError::InvalidConfig { .. }))));
    }

    #[test]
    fn test_rejects_shared_token_address() {
        let mut config = EngineConfig::default();
        if let Some(stable) = config.networks[0].stable.as_mut() {
            stable.address = REFERENCE_WRAPPED_NATIVE;
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_price_limit() {
        let mut config = EngineConfig::default();
        config.sqrt_price_limit_x96 = "not-a-number".to_string();
        assert!(config.validate().is_err());

        // 2^160 needs 161 bits
        config.sqrt_price_limit_x96 = "1461501637330902918203684832716283019655932542976".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_staleness() {
        let mut config = EngineConfig::default();
        config.quote_staleness_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = EngineConfig::load("/nonexistent/swap-engine.toml").unwrap_err();
        assert!(matches!(err, SwapError::Config(ConfigError::LoadFailed { .. })));
    }
}
