//! # el-04-vote-tally
//!
//! Vote Tally Aggregator.
//!
//! ## Dependencies
//!
//! | Interface | Provided by | Used for |
//! |-----------|-------------|----------|
//! | `ElectionStatusQuery` | el-02-election-lifecycle | voting gate, result seal |
//! | `PermitRedeemer` | el-03-voter-permit | exactly-once redemption |
//!
//! Both are injected by the composition root and run inside the caller's
//! transaction.

pub mod contract;
pub mod domain;
pub mod ports;

pub use contract::TallyContract;
pub use domain::*;
pub use ports::*;
