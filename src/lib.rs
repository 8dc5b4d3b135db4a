//! Client registry: a SQLite-backed store of client records with a typed
//! query layer and a service layer that translates to [`dto::client::ClientDto`].

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod dto;
#[cfg(feature = "data")]
pub mod error_conversions;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "data")]
pub mod services;
