//! Adapters module
//!
//! Reference implementations of the outbound ports.

pub mod clock;
pub mod memory;

pub use clock::{ManualClock, SystemClock};
pub use memory::InMemoryLedger;
