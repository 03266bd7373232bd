/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `users`: Activation and deactivation of the signed-in user

pub mod auth;
pub mod health;
pub mod users;
