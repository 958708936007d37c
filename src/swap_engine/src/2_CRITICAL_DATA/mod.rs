//! Critical Data - Quotes, allowances and balances
//! Read-only chain data the orchestrator decides on
//!
//! ## Architecture
//! - **quote/**: Output estimates with staleness and supersession control
//! - **allowance/**: Router spending authorization, cached until invalidated
//! - **balances/**: Input-token balance for display
//!
//! Nothing here mutates chain state. Every read is tagged with the inputs it
//! was made for so the session can drop answers to questions nobody is
//! asking anymore.

pub mod allowance;
pub mod balances;
pub mod quote;
