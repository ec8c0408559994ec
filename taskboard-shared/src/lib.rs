//! # Taskboard Shared Library
//!
//! This crate contains the domain types, persistence and business logic used
//! by the Taskboard API server and client.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `store`: Store traits with PostgreSQL and in-memory implementations
//! - `auth`: Password hashing, tokens, the auth gateway and role checks
//! - `services`: Task, comment and account operations
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
