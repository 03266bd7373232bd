/// Data models for the account service
///
/// # Models
///
/// - `user`: the persisted user row, the pending sign-up input and the two
///   typed views (`ActiveUser`, `InactiveUser`) handed out by the loader
///
/// # Example
///
/// ```no_run
/// use accounts_shared::models::user::User;
/// use accounts_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// if let Some(user) = User::find_by_id(&pool, id).await? {
///     println!("{} is at version {}", user.email_address, user.version);
/// }
/// # Ok(())
/// # }
/// ```

pub mod user;
