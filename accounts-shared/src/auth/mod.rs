/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id hashing service behind the `PasswordHashing` trait
/// - [`jwt`]: HS256 tokens issued to signed-in users
///
/// # Example
///
/// ```no_run
/// use accounts_shared::auth::jwt::{create_token, Claims};
/// use accounts_shared::auth::password::{Argon2Hasher, PasswordHashing};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hasher = Argon2Hasher::default();
/// let hash = hasher.hash("user_password").await?;
/// hasher.verify(&hash, "user_password").await?;
///
/// let token = create_token(&Claims::new(Uuid::new_v4(), Duration::days(7)), "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod password;
