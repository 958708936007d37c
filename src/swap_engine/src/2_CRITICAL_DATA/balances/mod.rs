//! Input-token balance reads
//! Informational only: an amount above the balance is flagged, not refused

use candid::Nat;
use crate::infrastructure::rpc::ContractReader;
use crate::infrastructure::{QueryError, Result, SwapError};
use crate::types::{Address, Asset, CallReply, ContractCall, Token};

/// Whose balance of which asset a read answered
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BalanceKey {
    pub owner: Address,
    pub token: Asset,
}

/// Balance of `token` held by `owner`
///
/// Native balances come from the account itself, token balances from
/// `balanceOf` on the token contract.
pub async fn fetch_balance(reader: &dyn ContractReader, owner: Address, token: &Token) -> Result<Nat> {
    let read_failed = |operation: &str, e: crate::infrastructure::rpc::ChannelError| {
        log::warn!("❌ Balance read failed for {} {}: {}", owner, token.symbol, e);
        SwapError::Query(QueryError::ReadFailed {
            operation: operation.to_string(),
            token: token.symbol.clone(),
            kind: e.kind,
            reason: e.message,
        })
    };

    match &token.asset {
        Asset::Native { .. } => reader.native_balance(owner).await
            .map_err(|e| read_failed("getBalance", e)),
        Asset::Erc20 { address } => {
            let call = ContractCall::BalanceOf { account: owner };
            let operation = call.signature();

            match reader.call(*address, call).await.map_err(|e| read_failed(operation, e))? {
                CallReply::Uint(balance) => Ok(balance),
                other => Err(SwapError::Query(QueryError::UnexpectedReply {
                    operation: operation.to_string(),
                    reply: format!("{:?}", other),
                })),
            }
        }
    }
}
