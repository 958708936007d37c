//! Shared domain types: chain identifiers, tokens, router calls, attempts

pub mod attempt;
pub mod chain;
pub mod router;
pub mod tokens;

pub use attempt::{AttemptId, SubmissionId, SubmissionKind, SubmissionTicket};
pub use chain::{Address, TxHash};
pub use router::{
    AllowanceArgs, ApproveArgs, CallReply, ContractCall, ContractWrite, ExactInputSingleParams,
    FeeTier, PreparedWrite, QuoteExactInputSingleParams, QuoteExactInputSingleReply,
};
pub use tokens::{Asset, Token, TradeDirection};
