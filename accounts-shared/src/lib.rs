//! # Accounts Shared Library
//!
//! Core of the account service: user rows and their typed views, the store
//! abstraction, the aggregate loader and transition engine, password hashing,
//! tokens and domain event publishing. The HTTP server in `accounts-api` is a
//! thin caller on top of this crate.
//!
//! ## Module Organization
//!
//! - `models`: Persisted user row, pending input and the active/inactive views
//! - `store`: `UserStore` trait with PostgreSQL and in-memory implementations
//! - `accounts`: Loader, transition engine, error taxonomy, service context
//! - `auth`: Argon2id password hashing and JWT tokens
//! - `events`: Domain events and best-effort publishers
//! - `db`: Connection pool and migrations

pub mod accounts;
pub mod auth;
pub mod db;
pub mod events;
pub mod models;
pub mod store;

/// Current version of the accounts shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
