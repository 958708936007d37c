//! Pure mathematical functions - no I/O, no async

pub mod fixed_point;

pub use fixed_point::{to_base_units, from_base_units, exchange_rate};
