//! Swap Engine - Token swap orchestration with Numbered Zones
//!
//! Architecture:
//! 1_SWAP_ORCHESTRATION - Session state machine (approve → swap sequencing)
//! 2_CRITICAL_DATA - Quotes, allowances, balances (read-only chain data)
//! 3_PAIR_CONFIGURATION - Network → token pair resolution
//! 4_TRADING_EXECUTION - Authorization and swap writes
//! 5_INFORMATIONAL - Caller-facing snapshot for display
//! 6_INFRASTRUCTURE - Math, errors, constants, config, channels
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use swap_engine::{EngineConfig, SwapSession, PrimaryAction};
//! # async fn run(
//! #     reader: &dyn swap_engine::ContractReader,
//! #     submitter: &dyn swap_engine::TransactionSubmitter,
//! #     owner: swap_engine::Address,
//! # ) -> swap_engine::Result<()> {
//! let mut session = SwapSession::new(EngineConfig::default(), 11_155_111, Some(owner))?;
//!
//! session.set_amount("0.5")?;
//! session.refresh(reader).await?;
//!
//! if let PrimaryAction::Swap { .. } = session.primary_action() {
//!     let tx_hash = session.perform_primary_action(submitter, reader).await?;
//!     println!("Swap submitted: {}", tx_hash);
//! }
//! # Ok(())
//! # }
//! ```

// Import numbered modules with explicit paths
#[path = "1_SWAP_ORCHESTRATION/mod.rs"]
mod swap_orchestration_1;
use swap_orchestration_1 as _1_SWAP_ORCHESTRATION;

#[path = "2_CRITICAL_DATA/mod.rs"]
mod critical_data_2;
use critical_data_2 as _2_CRITICAL_DATA;

#[path = "3_PAIR_CONFIGURATION/mod.rs"]
mod pair_configuration_3;
use pair_configuration_3 as _3_PAIR_CONFIGURATION;

#[path = "4_TRADING_EXECUTION/mod.rs"]
mod trading_execution_4;
use trading_execution_4 as _4_TRADING_EXECUTION;

#[path = "5_INFORMATIONAL/mod.rs"]
mod informational_5;
use informational_5 as _5_INFORMATIONAL;

#[path = "6_INFRASTRUCTURE/mod.rs"]
mod infrastructure_6;
use infrastructure_6 as infrastructure;

pub mod types;

// ===== PUBLIC API =====

pub use _1_SWAP_ORCHESTRATION::{
    DisabledReason, Phase, PrimaryAction, QuoteApplication, SessionEvent, SubmissionDisposition,
    SubmissionRequest, SwapSession, TerminalResult,
};
pub use _2_CRITICAL_DATA::allowance::{Allowance, AllowanceGate, AllowanceKey};
pub use _2_CRITICAL_DATA::quote::{Quote, QuoteKey, QuoteRequest, QuoteState, QuoteStatus, QuoteTracker};
pub use _3_PAIR_CONFIGURATION::{resolve_pair, PairConfig, PairResolver};
pub use _4_TRADING_EXECUTION::slippage::MinimumOutput;
pub use _5_INFORMATIONAL::display::{ResultView, SwapView};
pub use infrastructure::clock::{Clock, SystemClock};
pub use infrastructure::config::{EngineConfig, NetworkConfig, TokenSpec, TradingPolicy};
pub use infrastructure::errors::{
    ConfigError, FailureKind, QueryError, QuoteError, Result, SwapError, SystemError,
    TradingError, ValidationError,
};
pub use infrastructure::math::{from_base_units, to_base_units};
pub use infrastructure::rpc::{
    ChainIdentity, ChannelError, ChannelResult, ContractReader, TransactionSubmitter,
};
pub use types::{
    Address, Asset, AttemptId, FeeTier, SubmissionId, SubmissionKind, SubmissionTicket, Token,
    TradeDirection, TxHash,
};
