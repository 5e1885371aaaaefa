//! # Election Ledger Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── scenarios.rs    # End-to-end election flows through the gateway
//!     └── concurrency.rs  # Threads racing on shared keys
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p el-tests
//! cargo test -p el-tests integration::concurrency::
//! ```

pub mod fixtures;
pub mod integration;
