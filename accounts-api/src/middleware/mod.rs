/// Middleware for the API server
///
/// - `auth`: bearer token validation for the `users/current` routes

pub mod auth;
