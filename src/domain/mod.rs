//! Domain aggregates exposed by the service layer.

pub mod client;
pub mod types;
