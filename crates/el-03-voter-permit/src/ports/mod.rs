//! Ports module for the Voter Permit Issuer

pub mod inbound;

pub use inbound::{PermitIssuerApi, PermitRedeemer};
