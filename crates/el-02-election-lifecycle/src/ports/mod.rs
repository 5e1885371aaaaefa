//! Ports module for the Election Lifecycle Manager

pub mod inbound;

pub use inbound::{ElectionLifecycleApi, ElectionStatusQuery};
