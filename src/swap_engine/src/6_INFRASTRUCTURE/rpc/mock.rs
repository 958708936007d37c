//! In-memory chain for tests
//!
//! Answers reads from configurable tables and records every write. A
//! successful `approve` sets the stored allowance and a token-input swap
//! spends it, the way the token contract would once the transaction lands.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use candid::Nat;
use futures::future::{FutureExt, LocalBoxFuture};
use num_bigint::BigUint;
use num_traits::Zero;
use super::{ChainIdentity, ChannelError, ChannelResult, ContractReader, TransactionSubmitter};
use crate::types::{
    Address, CallReply, ContractCall, ContractWrite, PreparedWrite, QuoteExactInputSingleReply, TxHash,
};

#[derive(Debug, Default)]
pub struct MockState {
    pub chain_id: u64,
    /// amount_in → amount_out; amounts not listed use `default_quote`
    pub quotes: HashMap<Nat, ChannelResult<Nat>>,
    pub default_quote: Option<ChannelResult<Nat>>,
    pub allowance: Nat,
    pub allowance_error: Option<ChannelError>,
    pub token_balance: Nat,
    pub native_balance: Nat,
    /// Outcomes for upcoming submissions; empty means success
    pub submit_outcomes: VecDeque<ChannelResult<()>>,
    pub reads: Vec<(Address, ContractCall)>,
    pub writes: Vec<PreparedWrite>,
}

#[derive(Debug, Default)]
pub struct MockChain {
    pub state: RefCell<MockState>,
}

impl MockChain {
    pub fn new(chain_id: u64) -> Self {
        let chain = MockChain::default();
        chain.state.borrow_mut().chain_id = chain_id;
        chain
    }

    /// Every quote answers `amount_out`
    pub fn with_quote(self, amount_out: u64) -> Self {
        self.state.borrow_mut().default_quote = Some(Ok(Nat::from(amount_out)));
        self
    }

    pub fn with_allowance(self, allowance: u64) -> Self {
        self.state.borrow_mut().allowance = Nat::from(allowance);
        self
    }

    pub fn with_balances(self, native: u64, token: u64) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.native_balance = Nat::from(native);
            state.token_balance = Nat::from(token);
        }
        self
    }

    pub fn fail_next_submit(&self, error: ChannelError) {
        self.state.borrow_mut().submit_outcomes.push_back(Err(error));
    }

    pub fn set_chain_id(&self, chain_id: u64) {
        self.state.borrow_mut().chain_id = chain_id;
    }

    pub fn writes(&self) -> Vec<PreparedWrite> {
        self.state.borrow().writes.clone()
    }

    pub fn quote_reads(&self) -> usize {
        self.state.borrow().reads.iter()
            .filter(|(_, call)| matches!(call, ContractCall::QuoteExactInputSingle(_)))
            .count()
    }

    pub fn allowance_reads(&self) -> usize {
        self.state.borrow().reads.iter()
            .filter(|(_, call)| matches!(call, ContractCall::Allowance(_)))
            .count()
    }

    fn answer(&self, contract: Address, call: ContractCall) -> ChannelResult<CallReply> {
        let mut state = self.state.borrow_mut();
        state.reads.push((contract, call.clone()));

        match call {
            ContractCall::QuoteExactInputSingle(params) => {
                let outcome = state.quotes.get(&params.amount_in).cloned()
                    .or_else(|| state.default_quote.clone())
                    .unwrap_or_else(|| Err(ChannelError::reverted("no liquidity")));

                outcome.map(|amount_out| CallReply::Quote(QuoteExactInputSingleReply {
                    amount_out,
                    sqrt_price_x96_after: Nat::from(0u64),
                    initialized_ticks_crossed: 1,
                    gas_estimate: Nat::from(120_000u64),
                }))
            }
            ContractCall::Allowance(_) => match &state.allowance_error {
                Some(error) => Err(error.clone()),
                None => Ok(CallReply::Uint(state.allowance.clone())),
            },
            ContractCall::BalanceOf { .. } => Ok(CallReply::Uint(state.token_balance.clone())),
        }
    }

    fn record_write(&self, contract: Address, write: ContractWrite, value: Nat) -> ChannelResult<TxHash> {
        let mut state = self.state.borrow_mut();
        let outcome = state.submit_outcomes.pop_front().unwrap_or(Ok(()));

        let pays_in_token = value.0.is_zero();
        state.writes.push(PreparedWrite { contract, write: write.clone(), value });
        outcome?;

        match write {
            ContractWrite::Approve(args) => state.allowance = args.amount,
            // transferFrom on the input token
            ContractWrite::ExactInputSingle(params) if pays_in_token => {
                let remaining = if state.allowance >= params.amount_in {
                    state.allowance.0.clone() - params.amount_in.0
                } else {
                    BigUint::zero()
                };
                state.allowance = Nat(remaining);
            }
            ContractWrite::ExactInputSingle(_) => {}
        }

        let mut hash = [0u8; 32];
        hash[31] = state.writes.len() as u8;
        Ok(TxHash::new(hash))
    }
}

impl ContractReader for MockChain {
    fn call<'a>(&'a self, contract: Address, call: ContractCall) -> LocalBoxFuture<'a, ChannelResult<CallReply>> {
        async move { self.answer(contract, call) }.boxed_local()
    }

    fn native_balance<'a>(&'a self, _owner: Address) -> LocalBoxFuture<'a, ChannelResult<Nat>> {
        async move { Ok(self.state.borrow().native_balance.clone()) }.boxed_local()
    }
}

impl TransactionSubmitter for MockChain {
    fn submit<'a>(&'a self, contract: Address, write: ContractWrite, value: Nat) -> LocalBoxFuture<'a, ChannelResult<TxHash>> {
        async move { self.record_write(contract, write, value) }.boxed_local()
    }
}

impl ChainIdentity for MockChain {
    fn chain_id(&self) -> u64 {
        self.state.borrow().chain_id
    }
}
