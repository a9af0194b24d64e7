/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `APP_ENV`: Deployment environment, `production` tightens defaults
///   (default: development)
/// - `JWT_SECRET`: Secret key for JWT signing (required in production;
///   development falls back to an insecure built-in secret with a warning)
/// - `JWT_ALGORITHM`: HMAC signing algorithm, one of HS256/HS384/HS512
///   (default: HS256)
/// - `JWT_TTL_MINUTES`: Token lifetime in minutes (default: 30)
/// - `RUST_LOG`: Log level (default: info)
///
/// # Example
///
/// ```no_run
/// use taskdeck_api::config::Config;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}:{}", config.api.host, config.api.port);
/// # Ok(())
/// # }
/// ```

use jsonwebtoken::Algorithm;
use std::env;
use taskdeck_shared::auth::jwt::{TokenConfig, DEFAULT_TTL_MINUTES};
use tracing::warn;

/// Fallback signing secret for development environments
const DEV_JWT_SECRET: &str = "insecure-development-secret-do-not-use-in-production";

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration (used for both issuing and validating tokens)
    pub jwt: TokenConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins, `*` means permissive
    pub cors_origins: Vec<String>,

    /// Whether this deployment runs in production mode
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    ///
    /// # Example
    ///
    /// ```no_run
    /// use taskdeck_api::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = Config::from_env()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let cors_origins =
            parse_cors_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => {
                if secret.len() < 32 {
                    anyhow::bail!("JWT_SECRET must be at least 32 characters long");
                }
                secret
            }
            Err(_) if production => {
                anyhow::bail!("JWT_SECRET environment variable is required in production")
            }
            Err(_) => {
                warn!("JWT_SECRET is not set, falling back to an insecure development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let algorithm =
            parse_algorithm(&env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string()))?;

        let ttl_minutes = env::var("JWT_TTL_MINUTES")
            .unwrap_or_else(|_| DEFAULT_TTL_MINUTES.to_string())
            .parse::<i64>()?;
        if ttl_minutes <= 0 {
            anyhow::bail!("JWT_TTL_MINUTES must be positive");
        }

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: TokenConfig {
                secret: jwt_secret,
                algorithm,
                ttl_minutes,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// Parses a comma-separated origin list
fn parse_cors_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

/// Parses the signing algorithm name
///
/// Only the HMAC family is accepted. Asymmetric algorithms would need key
/// material this configuration does not carry.
fn parse_algorithm(name: &str) -> anyhow::Result<Algorithm> {
    match name {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => anyhow::bail!(
            "Unsupported JWT_ALGORITHM '{}', expected HS256, HS384, or HS512",
            other
        ),
    }
}
