use candid::{CandidType, Deserialize};
use serde::Serialize;
use super::chain::Address;

/// How a token is held on a network
///
/// The native asset is paid as transaction value; the router still needs the
/// address of its wrapped form to route the pool, so it is carried here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Asset {
    Native { wrapped: Address },
    Erc20 { address: Address },
}

impl Asset {
    /// Address the router and quoter see for this asset
    pub fn contract_address(&self) -> Address {
        match self {
            Asset::Native { wrapped } => *wrapped,
            Asset::Erc20 { address } => *address,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native { .. })
    }
}

/// A token resolved for one network. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub asset: Asset,
    pub decimals: u8,
    pub symbol: String,
}

impl Token {
    pub fn contract_address(&self) -> Address {
        self.asset.contract_address()
    }

    pub fn is_native(&self) -> bool {
        self.asset.is_native()
    }
}

/// Which of the two configured tokens is being sold
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TradeDirection {
    /// Sell the native asset, buy the stable token
    #[default]
    NativeToStable,
    /// Sell the stable token, buy the native asset
    StableToNative,
}

impl TradeDirection {
    pub fn toggled(self) -> Self {
        match self {
            TradeDirection::NativeToStable => TradeDirection::StableToNative,
            TradeDirection::StableToNative => TradeDirection::NativeToStable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TradeDirection::NativeToStable => "native_to_stable",
            TradeDirection::StableToNative => "stable_to_native",
        }
    }
}
