//! Diesel models and configuration structures.

pub mod client;
pub mod config;
