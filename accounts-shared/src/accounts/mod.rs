/// Account lifecycle
///
/// A user moves from pending to active on creation and then toggles between
/// active and inactive. Every toggle is a conditional, version-incrementing
/// write, so two writers holding the same view never both succeed.
///
/// # Modules
///
/// - `loader`: reads a row into an `ActiveUser` or `InactiveUser` view
/// - `engine`: create, activate, deactivate
/// - `authenticate`: email and password check on top of the loader
/// - `error`: `AccountError` and `FieldViolation`
/// - `service`: `AccountService`, the store and hasher bundled for callers

pub mod authenticate;
pub mod engine;
pub mod error;
pub mod loader;
pub mod service;

pub use error::{AccountError, FieldViolation};
pub use service::AccountService;
