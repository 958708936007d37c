//! Swap orchestration - Session state machine
//! Sequences approve → swap for one caller and guards against late responses

pub mod phase;
pub mod session;


pub use phase::Phase;
pub use session::{
    DisabledReason, PrimaryAction, QuoteApplication, SessionEvent, SubmissionDisposition,
    SubmissionRequest, SwapSession, TerminalResult,
};
