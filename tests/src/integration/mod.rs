//! Cross-component integration suites.

pub mod concurrency;
pub mod scenarios;
