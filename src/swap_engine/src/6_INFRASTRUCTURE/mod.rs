//! Infrastructure - Shared utilities and types
//! Foundation layer for all other modules

pub mod clock;
pub mod config;
pub mod constants;
pub mod errors;
pub mod math;
pub mod rpc;

// Re-export commonly used items
pub use constants::*;
pub use errors::{SwapError, Result, ValidationError, ConfigError, QuoteError, QueryError, TradingError, SystemError, FailureKind};
pub use math::{to_base_units, from_base_units};
