//! # Pair Configuration
//!
//! Resolves the ordered (input, output) token pair for a network and trade
//! direction from the injected `EngineConfig`.
//!
//! ## Unsupported Networks
//! A network with no entry, or with no stable token deployed, resolves to
//! `ConfigError::UnsupportedNetwork`. Callers should disable the swap surface
//! on this error rather than retry it.

use crate::infrastructure::config::{EngineConfig, NetworkConfig, TokenSpec};
use crate::infrastructure::{ConfigError, Result, SwapError};
use crate::types::{Address, Asset, Token, TradeDirection};

/// Ordered token pair plus the contracts that serve it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairConfig {
    pub chain_id: u64,
    pub direction: TradeDirection,
    pub token_in: Token,
    pub token_out: Token,
    pub quoter: Address,
    pub router: Address,
}

impl PairConfig {
    pub fn symbol_in(&self) -> &str {
        &self.token_in.symbol
    }

    pub fn symbol_out(&self) -> &str {
        &self.token_out.symbol
    }

    pub fn decimals_in(&self) -> u8 {
        self.token_in.decimals
    }

    pub fn decimals_out(&self) -> u8 {
        self.token_out.decimals
    }

    /// Native input is paid as transaction value and never needs authorization
    pub fn input_is_native(&self) -> bool {
        self.token_in.is_native()
    }
}

/// Resolve the pair for `chain_id` traded in `direction`
///
/// Pure function of its inputs.
pub fn resolve_pair(config: &EngineConfig, chain_id: u64, direction: TradeDirection) -> Result<PairConfig> {
    let network = config.network(chain_id)
        .ok_or_else(|| unsupported(chain_id, "no network entry configured".to_string()))?;

    let stable_spec = network.stable.as_ref()
        .ok_or_else(|| unsupported(chain_id, format!("no stable token deployed on {}", network.name)))?;

    let native = Token {
        asset: Asset::Native { wrapped: network.native.address },
        decimals: network.native.decimals,
        symbol: network.native.symbol.clone(),
    };
    let stable = erc20(stable_spec);

    let (token_in, token_out) = match direction {
        TradeDirection::NativeToStable => (native, stable),
        TradeDirection::StableToNative => (stable, native),
    };

    // Config validation already rejects this; resolution must not rely on it
    if token_in.contract_address() == token_out.contract_address() {
        return Err(SwapError::Config(ConfigError::InvalidConfig {
            reason: format!("{} resolves to identical input and output tokens", network.name),
        }));
    }

    Ok(build_pair(network, direction, token_in, token_out))
}

/// Resolver that remembers its last answer
///
/// Sessions re-resolve on every direction or network change; the memo makes
/// repeated lookups for the same inputs free.
#[derive(Debug, Clone)]
pub struct PairResolver {
    config: EngineConfig,
    memo: Option<((u64, TradeDirection), Result<PairConfig>)>,
}

impl PairResolver {
    pub fn new(config: EngineConfig) -> Self {
        Self { config, memo: None }
    }

    pub fn resolve(&mut self, chain_id: u64, direction: TradeDirection) -> Result<PairConfig> {
        if let Some((key, cached)) = &self.memo {
            if *key == (chain_id, direction) {
                return cached.clone();
            }
        }

        let resolved = resolve_pair(&self.config, chain_id, direction);
        match &resolved {
            Ok(pair) => log::debug!(
                "Resolved pair on chain {}: {} → {}",
                chain_id, pair.symbol_in(), pair.symbol_out()
            ),
            Err(e) => log::warn!("⚠️ Pair resolution failed on chain {}: {}", chain_id, e),
        }

        self.memo = Some(((chain_id, direction), resolved.clone()));
        resolved
    }
}

// ===== Helper Functions =====

fn erc20(spec: &TokenSpec) -> Token {
    Token {
        asset: Asset::Erc20 { address: spec.address },
        decimals: spec.decimals,
        symbol: spec.symbol.clone(),
    }
}

fn build_pair(network: &NetworkConfig, direction: TradeDirection, token_in: Token, token_out: Token) -> PairConfig {
    PairConfig {
        chain_id: network.chain_id,
        direction,
        token_in,
        token_out,
        quoter: network.quoter,
        router: network.router,
    }
}

fn unsupported(chain_id: u64, reason: String) -> SwapError {
    SwapError::Config(ConfigError::UnsupportedNetwork { chain_id, reason })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::constants::*;

    #[test]
    fn test_native_to_stable_on_sepolia() {
        let pair = resolve_pair(&EngineConfig::default(), SEPOLIA_CHAIN_ID, TradeDirection::NativeToStable).unwrap();

        assert_eq!(pair.symbol_in(), "ETH");
        assert_eq!(pair.symbol_out(), "USDC");
        assert_eq!(pair.decimals_in(), 18);
        assert_eq!(pair.decimals_out(), 6);
        assert!(pair.input_is_native());
        assert_eq!(pair.token_in.contract_address(), REFERENCE_WRAPPED_NATIVE);
        assert_eq!(pair.token_out.contract_address(), SEPOLIA_USDC);
        assert_eq!(pair.router, REFERENCE_SWAP_ROUTER);
    }

    #[test]
    fn test_stable_to_native_swaps_roles() {
        let config = EngineConfig::default();
        let forward = resolve_pair(&config, ARBITRUM_SEPOLIA_CHAIN_ID, TradeDirection::NativeToStable).unwrap();
        let reverse = resolve_pair(&config, ARBITRUM_SEPOLIA_CHAIN_ID, TradeDirection::StableToNative).unwrap();

        assert_eq!(forward.token_in, reverse.token_out);
        assert_eq!(forward.token_out, reverse.token_in);
        assert!(!reverse.input_is_native());
        assert_eq!(reverse.decimals_in(), 6);
    }

    #[test]
    fn test_unknown_network_is_unsupported() {
        let result = resolve_pair(&EngineConfig::default(), 1, TradeDirection::NativeToStable);
        assert!(matches!(
            result,
            Err(SwapError::Config(ConfigError::UnsupportedNetwork { chain_id: 1, .. }))
        ));
    }

    #[test]
    fn test_network_without_stable_token_is_unsupported() {
        let mut config = EngineConfig::default();
        config.networks[0].stable = None;

        let result = resolve_pair(&config, SEPOLIA_CHAIN_ID, TradeDirection::StableToNative);
        assert!(matches!(result, Err(SwapError::Config(ConfigError::UnsupportedNetwork { .. }))));
    }

    #[test]
    fn test_resolver_memoizes_identical_inputs() {
        let mut resolver = PairResolver::new(EngineConfig::default());
        let first = resolver.resolve(SEPOLIA_CHAIN_ID, TradeDirection::NativeToStable).unwrap();
        let second = resolver.resolve(SEPOLIA_CHAIN_ID, TradeDirection::NativeToStable).unwrap();
        assert_eq!(first, second);

        let toggled = resolver.resolve(SEPOLIA_CHAIN_ID, TradeDirection::StableToNative).unwrap();
        assert_eq!(toggled.token_in, first.token_out);
    }
}
