//! Data transfer objects returned by the service layer.

pub mod client;
