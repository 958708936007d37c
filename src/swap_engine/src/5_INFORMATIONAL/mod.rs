//! Informational - Read-only snapshots for display
//! Nothing here changes session state

pub mod display;
