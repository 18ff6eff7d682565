//! # sso_core
//!
//! Core domain logic for the SSO service: credential verification, token
//! issuance, the storage gateway contract and the auth service that ties
//! them together.

pub mod auth;
pub mod migrate;
pub mod models;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
