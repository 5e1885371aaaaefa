//! # el-03-voter-permit
//!
//! Voter Permit Issuer.
//!
//! A voter receives at most one permit per election. The permit is a
//! client-held secret; the ledger stores only its SHA-256 hash, so the
//! `TallyRecord` a redemption feeds can never be traced back to a voter.
//!
//! ## Redemption
//!
//! ```text
//! IssuePermit ──→ Issued ──validate_and_spend_permit──→ Spent
//! ```
//!
//! Redemption is reachable only through [`PermitRedeemer`], called by the
//! Vote Tally Aggregator inside its own transaction.

pub mod contract;
pub mod domain;
pub mod ports;

pub use contract::PermitContract;
pub use domain::*;
pub use ports::*;
