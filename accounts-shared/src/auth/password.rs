/// Password hashing service
///
/// One-way hashing and verification of user passwords with Argon2id. Hashes
/// are stored as PHC strings, so the cost parameters used at hashing time
/// travel with the hash and verification does not depend on the current
/// configuration.
///
/// # Parameters
///
/// - **Algorithm**: Argon2id, version 0x13
/// - **Memory**: 64 MiB (65536 KiB)
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Output**: 32-byte hash
///
/// Both operations are CPU and memory heavy. The async [`PasswordHashing`]
/// implementation moves them onto tokio's blocking pool.
///
/// # Example
///
/// ```
/// use accounts_shared::auth::password::{Argon2Hasher, HashingConfig, PasswordHashing};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hasher = Argon2Hasher::new(HashingConfig::default());
///
/// let hash = hasher.hash("secret1").await?;
/// assert!(hash.starts_with("$argon2id$"));
///
/// hasher.verify(&hash, "secret1").await?;
/// assert!(hasher.verify(&hash, "wrong").await.is_err());
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, ParamsBuilder, Version,
};
use async_trait::async_trait;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// The hashing primitive failed
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Stored hash could not be parsed
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),

    /// Password does not match the stored hash
    #[error("Password does not match")]
    Mismatch,
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,

    /// Number of passes
    pub iterations: u32,

    /// Number of lanes
    pub parallelism: u32,

    /// Hash output length in bytes
    pub output_len: usize,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 4,
            output_len: 32,
        }
    }
}

impl HashingConfig {
    /// Lowest cost Argon2 accepts. Only meant for tests.
    pub fn minimal() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
            output_len: 32,
        }
    }

    fn params(&self) -> Result<Params, PasswordError> {
        ParamsBuilder::new()
            .m_cost(self.memory_kib)
            .t_cost(self.iterations)
            .p_cost(self.parallelism)
            .output_len(self.output_len)
            .build()
            .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))
    }
}

/// One-way password hashing
#[async_trait]
pub trait PasswordHashing: Send + Sync {
    /// Hashes a plaintext password into a PHC string
    async fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Checks a plaintext password against a stored hash
    ///
    /// Returns [`PasswordError::Mismatch`] when the password is wrong.
    async fn verify(&self, hash: &str, password: &str) -> Result<(), PasswordError>;
}

/// Argon2id implementation of [`PasswordHashing`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher {
    config: HashingConfig,
}

impl Argon2Hasher {
    pub fn new(config: HashingConfig) -> Self {
        Self { config }
    }

    /// Hashes on the current thread
    pub fn hash_blocking(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.config.params()?);

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

        Ok(password_hash.to_string())
    }

    /// Verifies on the current thread; the parameters come from the hash
    pub fn verify_blocking(&self, hash: &str, password: &str) -> Result<(), PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(()),
            Err(argon2::password_hash::Error::Password) => Err(PasswordError::Mismatch),
            Err(e) => Err(PasswordError::HashError(format!("Verification failed: {}", e))),
        }
    }
}

#[async_trait]
impl PasswordHashing for Argon2Hasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let hasher = *self;
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.hash_blocking(&password))
            .await
            .map_err(|e| PasswordError::HashError(format!("Hashing task failed: {}", e)))?
    }

    async fn verify(&self, hash: &str, password: &str) -> Result<(), PasswordError> {
        let hasher = *self;
        let hash = hash.to_owned();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.verify_blocking(&hash, &password))
            .await
            .map_err(|e| PasswordError::HashError(format!("Verification task failed: {}", e)))?
    }
}
