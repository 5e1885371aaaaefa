//! Ports module for the Vote Tally Aggregator

pub mod inbound;

pub use inbound::VoteTallyApi;
