//! # Shared Types Crate
//!
//! Types every election ledger component agrees on.
//!
//! ## Design Principles
//!
//! - **One error taxonomy**: `ContractError` is returned by every component,
//!   so a cross-component failure propagates to the caller verbatim.
//! - **Secrets stay off-ledger**: permit secrets are only ever seen by
//!   [`permit_hash`]; everything downstream handles the hex digest.
//! - **Reject early**: argument validation happens before any ledger read.

pub mod entities;
pub mod errors;
pub mod hashing;
pub mod validation;

pub use entities::*;
pub use errors::*;
pub use hashing::*;
pub use validation::*;
