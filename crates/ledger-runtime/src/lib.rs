//! # Ledger Runtime Library
//!
//! Composition root of the election ledger. The `election-ledger` binary is
//! a thin JSON-lines front end over this library.
//!
//! ## Modules
//!
//! - `container/` - configuration and typed component wiring
//! - `gateway` - submit / evaluate with bounded re-simulation
//! - `protocol` - request and response framing

pub mod container;
pub mod gateway;
pub mod protocol;

pub use container::{ConfigError, LedgerContainer, RuntimeConfig};
pub use gateway::{Gateway, GatewayError};
pub use protocol::{handle_line, serve, Request, Response};
