//! # Allowance Gate
//!
//! Decides whether the router may already spend the input token for the owner.
//!
//! ## Rules
//! - Native input is paid as transaction value: always covered, never read
//! - An allowance is read once per (owner, router, token) and cached
//! - A confirmed authorization or a confirmed token-input swap invalidates
//!   the cache, and so does a new amount; the next read is fresh
//! - A read that began before an invalidation cannot repopulate the cache

use std::collections::HashMap;
use candid::Nat;
use crate::_3_PAIR_CONFIGURATION::PairConfig;
use crate::infrastructure::rpc::ContractReader;
use crate::infrastructure::{QueryError, Result, SwapError};
use crate::types::{Address, AllowanceArgs, Asset, CallReply, ContractCall};

/// Amount the router may pull from the owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allowance {
    /// No authorization needed (native input)
    Unlimited,
    Limited(Nat),
}

impl Allowance {
    pub fn covers(&self, amount: &Nat) -> bool {
        match self {
            Allowance::Unlimited => true,
            Allowance::Limited(allowed) => allowed >= amount,
        }
    }

    pub fn as_nat(&self) -> Option<&Nat> {
        match self {
            Allowance::Unlimited => None,
            Allowance::Limited(allowed) => Some(allowed),
        }
    }
}

/// (owner, spender, token) triple an allowance is read for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AllowanceKey {
    pub owner: Address,
    pub spender: Address,
    pub token: Asset,
}

impl AllowanceKey {
    pub fn for_pair(pair: &PairConfig, owner: Address) -> Self {
        Self {
            owner,
            spender: pair.router,
            token: pair.token_in.asset.clone(),
        }
    }
}

/// Cached allowances for one session
#[derive(Debug, Clone, Default)]
pub struct AllowanceGate {
    entries: HashMap<AllowanceKey, Allowance>,
    /// Bumped on every invalidation; reads carry the epoch they began in
    epoch: u64,
}

impl AllowanceGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn cached(&self, key: &AllowanceKey) -> Option<Allowance> {
        if key.token.is_native() {
            return Some(Allowance::Unlimited);
        }
        self.entries.get(key).cloned()
    }

    pub fn needs_refresh(&self, key: &AllowanceKey) -> bool {
        self.cached(key).is_none()
    }

    /// Whether `amount` must be authorized first; `None` while unknown
    pub fn requires_authorization(&self, key: &AllowanceKey, amount: &Nat) -> Option<bool> {
        self.cached(key).map(|allowance| !allowance.covers(amount))
    }

    /// Store a read result taken in `epoch`
    ///
    /// Returns `false` and drops the value if the cache was invalidated since
    /// the read began.
    pub fn record(&mut self, key: AllowanceKey, allowance: Allowance, epoch: u64) -> bool {
        if epoch != self.epoch {
            log::debug!("Dropping allowance read from epoch {} (now {})", epoch, self.epoch);
            return false;
        }
        self.entries.insert(key, allowance);
        true
    }

    pub fn invalidate(&mut self, key: &AllowanceKey) {
        self.entries.remove(key);
        self.epoch += 1;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.epoch += 1;
    }

    /// Cached allowance for `key`, reading it through `reader` on a miss
    pub async fn current_allowance(&mut self, reader: &dyn ContractReader, key: &AllowanceKey) -> Result<Allowance> {
        if let Some(allowance) = self.cached(key) {
            return Ok(allowance);
        }

        let epoch = self.epoch;
        let allowance = fetch_allowance(reader, key).await?;
        self.record(key.clone(), allowance.clone(), epoch);
        Ok(allowance)
    }
}

/// Read the router's allowance over the owner's input token
pub async fn fetch_allowance(reader: &dyn ContractReader, key: &AllowanceKey) -> Result<Allowance> {
    let token = match &key.token {
        Asset::Native { .. } => return Ok(Allowance::Unlimited),
        Asset::Erc20 { address } => *address,
    };

    let call = ContractCall::Allowance(AllowanceArgs {
        owner: key.owner,
        spender: key.spender,
    });
    let operation = call.signature();

    let reply = reader.call(token, call).await.map_err(|e| {
        log::warn!("❌ Allowance read failed for {}: {}", token, e);
        SwapError::Query(QueryError::ReadFailed {
            operation: operation.to_string(),
            token: token.to_string(),
            kind: e.kind,
            reason: e.message,
        })
    })?;

    match reply {
        CallReply::Uint(allowance) => {
            log::debug!("Allowance of {} for {} on {}: {}", key.owner, key.spender, token, allowance);
            Ok(Allowance::Limited(allowance))
        }
        other => Err(SwapError::Query(QueryError::UnexpectedReply {
            operation: operation.to_string(),
            reply: format!("{:?}", other),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use crate::_3_PAIR_CONFIGURATION::resolve_pair;
    use crate::infrastructure::config::EngineConfig;
    use crate::infrastructure::rpc::mock::MockChain;
    use crate::infrastructure::rpc::ChannelError;
    use crate::infrastructure::{FailureKind, SEPOLIA_CHAIN_ID};
    use crate::types::TradeDirection;

    const OWNER: Address = Address::from_hex_literal("0x00000000000000000000000000000000000000a1");

    fn key(direction: TradeDirection) -> AllowanceKey {
        let pair = resolve_pair(&EngineConfig::default(), SEPOLIA_CHAIN_ID, direction).unwrap();
        AllowanceKey::for_pair(&pair, OWNER)
    }

    #[test]
    fn test_native_input_never_read() {
        let chain = MockChain::new(SEPOLIA_CHAIN_ID);
        let mut gate = AllowanceGate::new();
        let key = key(TradeDirection::NativeToStable);

        let allowance = block_on(gate.current_allowance(&chain, &key)).unwrap();
        assert_eq!(allowance, Allowance::Unlimited);
        assert_eq!(chain.allowance_reads(), 0);
        assert_eq!(gate.requires_authorization(&key, &Nat::from(u64::MAX)), Some(false));
    }

    #[test]
    fn test_cached_after_first_read() {
        let chain = MockChain::new(SEPOLIA_CHAIN_ID).with_allowance(50_000_000);
        let mut gate = AllowanceGate::new();
        let key = key(TradeDirection::StableToNative);

        assert_eq!(gate.requires_authorization(&key, &Nat::from(1u64)), None);
        block_on(gate.current_allowance(&chain, &key)).unwrap();
        block_on(gate.current_allowance(&chain, &key)).unwrap();

        assert_eq!(chain.allowance_reads(), 1);
        assert_eq!(gate.requires_authorization(&key, &Nat::from(100_000_000u64)), Some(true));
        assert_eq!(gate.requires_authorization(&key, &Nat::from(50_000_000u64)), Some(false));
    }

    #[test]
    fn test_invalidation_forces_fresh_read() {
        let chain = MockChain::new(SEPOLIA_CHAIN_ID).with_allowance(0);
        let mut gate = AllowanceGate::new();
        let key = key(TradeDirection::StableToNative);

        block_on(gate.current_allowance(&chain, &key)).unwrap();
        chain.state.borrow_mut().allowance = Nat::from(7u64);
        gate.invalidate(&key);

        let allowance = block_on(gate.current_allowance(&chain, &key)).unwrap();
        assert_eq!(allowance, Allowance::Limited(Nat::from(7u64)));
        assert_eq!(chain.allowance_reads(), 2);
    }

    #[test]
    fn test_read_from_before_invalidation_is_dropped() {
        let mut gate = AllowanceGate::new();
        let key = key(TradeDirection::StableToNative);

        let epoch = gate.epoch();
        gate.invalidate(&key);
        assert!(!gate.record(key.clone(), Allowance::Limited(Nat::from(0u64)), epoch));
        assert!(gate.needs_refresh(&key));
    }

    #[test]
    fn test_read_failure_is_classified() {
        let chain = MockChain::new(SEPOLIA_CHAIN_ID);
        chain.state.borrow_mut().allowance_error = Some(ChannelError::network("timeout"));

        let result = block_on(fetch_allowance(&chain, &key(TradeDirection::StableToNative)));
        match result {
            Err(SwapError::Query(QueryError::ReadFailed { kind, reason, .. })) => {
                assert_eq!(kind, FailureKind::Network);
                assert_eq!(reason, "timeout");
            }
            other => panic!("expected ReadFailed, got {:?}", other),
        }
    }
}
