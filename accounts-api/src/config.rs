/// Configuration management for the API server
///
/// Settings come from environment variables, with a `.env` file loaded first
/// when present.
///
/// | Variable | Default |
/// |----------|---------|
/// | `API_HOST` | `0.0.0.0` |
/// | `API_PORT` | `8080` |
/// | `CORS_ORIGINS` | `*` (comma-separated list) |
/// | `DATABASE_URL` | required |
/// | `DATABASE_MAX_CONNECTIONS` | `10` |
/// | `JWT_SECRET` | required, at least 32 characters |
/// | `JWT_TTL_HOURS` | `168`, at most one year |
/// | `REDIS_URL` | unset: events are only logged |

use serde::{Deserialize, Serialize};
use std::env;

use accounts_shared::auth::jwt::{DEFAULT_TTL_HOURS, MIN_SECRET_LEN};

/// Longest accepted token lifetime
pub const MAX_TTL_HOURS: i64 = 24 * 365;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,

    pub database: DatabaseConfig,

    pub jwt: JwtConfig,

    /// Redis URL for event publishing
    pub redis_url: Option<String>,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,

    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    pub max_connections: u32,
}

/// Token signing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    #[serde(skip_serializing)]
    pub secret: String,

    pub ttl_hours: i64,
}

impl JwtConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.ttl_hours)
            .unwrap_or_else(|| chrono::Duration::hours(DEFAULT_TTL_HOURS))
    }
}

impl Config {
    /// Loads configuration from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let api_port = lookup("API_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()?;

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()?;

        let jwt_secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {} characters long", MIN_SECRET_LEN);
        }

        let ttl_hours = match lookup("JWT_TTL_HOURS") {
            Some(value) => value.parse::<i64>()?,
            None => DEFAULT_TTL_HOURS,
        };

        if ttl_hours <= 0 || ttl_hours > MAX_TTL_HOURS {
            anyhow::bail!("JWT_TTL_HOURS must be between 1 and {}", MAX_TTL_HOURS);
        }

        let redis_url = lookup("REDIS_URL").filter(|url| !url.trim().is_empty());

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                ttl_hours,
            },
            redis_url,
        })
    }

    /// Gets the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
