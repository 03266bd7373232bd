//! # Accounts API Library
//!
//! HTTP calling layer over `accounts-shared`: registration, login and the
//! activate/deactivate transitions of the signed-in user.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Bearer token authentication
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
