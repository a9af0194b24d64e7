/// JWT session token generation and validation module
///
/// This module provides the stateless session tokens used for API
/// authentication. Tokens are signed with a symmetric HMAC algorithm and
/// carry the account identity; there is no server-side session store, so a
/// token is valid exactly while its signature checks out and it has not
/// expired.
///
/// # Security
///
/// - **Algorithm**: HMAC family only (HS256 default, HS384/HS512 supported)
/// - **Expiration**: Configurable, default 30 minutes, zero clock leeway
/// - **Secret Management**: Secrets should be at least 32 bytes (256 bits);
///   rotating the secret invalidates every outstanding token
///
/// Validation is deliberately opaque: a bad signature, a malformed token,
/// missing identity claims, and an expired token all collapse into the
/// single [`TokenError::Invalid`] outcome so callers cannot probe why a
/// credential was rejected.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::jwt::{create_token, validate_token, Claims, TokenConfig};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = TokenConfig {
///     secret: "your-secret-key-at-least-32-bytes".to_string(),
///     algorithm: jsonwebtoken::Algorithm::HS256,
///     ttl_minutes: 30,
/// };
///
/// let user_id = Uuid::new_v4();
/// let claims = Claims::new(user_id, "user@example.com".to_string(), config.ttl());
/// let token = create_token(&claims, &config)?;
///
/// let validated = validate_token(&token, &config)?;
/// assert_eq!(validated.user_id, user_id);
/// assert_eq!(validated.sub, "user@example.com");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default token lifetime in minutes
pub const DEFAULT_TTL_MINUTES: i64 = 30;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token failed validation. Covers bad signatures, malformed tokens,
    /// missing claims, and expiry without distinguishing between them.
    #[error("Could not validate credentials")]
    Invalid,
}

/// Signing configuration for the token service
///
/// Constructed once at startup from the environment and passed by reference
/// into every issue/verify call; nothing in this module reads ambient state.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Secret key for the HMAC signature
    pub secret: String,

    /// Signing algorithm (restricted to HS256/HS384/HS512 at config parse time)
    pub algorithm: Algorithm,

    /// Token lifetime in minutes
    pub ttl_minutes: i64,
}

impl TokenConfig {
    /// Gets the configured token lifetime as a duration
    pub fn ttl(&self) -> Duration {
        Duration::minutes(self.ttl_minutes)
    }
}

/// JWT claims structure
///
/// # Claims
///
/// - `sub`: Subject (account email)
/// - `user_id`: Account ID
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
///
/// Both identity claims are required: a token with a valid signature but
/// without `sub` or `user_id` does not deserialize and is rejected exactly
/// like a forged token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - account email
    pub sub: String,

    /// Account ID
    pub user_id: Uuid,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates new claims expiring `ttl` from now
    ///
    /// # Arguments
    ///
    /// * `user_id` - Account ID
    /// * `email` - Account email (becomes the `sub` claim)
    /// * `ttl` - Token lifetime
    ///
    /// # Example
    ///
    /// ```
    /// use taskdeck_shared::auth::jwt::Claims;
    /// use chrono::Duration;
    /// use uuid::Uuid;
    ///
    /// let claims = Claims::new(
    ///     Uuid::new_v4(),
    ///     "user@example.com".to_string(),
    ///     Duration::minutes(30),
    /// );
    /// assert!(!claims.is_expired());
    /// ```
    pub fn new(user_id: Uuid, email: String, ttl: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + ttl;

        Self {
            sub: email,
            user_id,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets time until expiration, `None` once expired
    pub fn time_until_expiration(&self) -> Option<Duration> {
        let now = Utc::now().timestamp();
        if self.exp > now {
            Some(Duration::seconds(self.exp - now))
        } else {
            None
        }
    }
}

/// Creates a signed session token from claims
///
/// # Arguments
///
/// * `claims` - Token claims
/// * `config` - Signing configuration (secret and algorithm)
///
/// # Returns
///
/// Serialized JWT string
///
/// # Errors
///
/// Returns `TokenError::CreateError` if encoding fails; the caller treats
/// this as fatal to the operation that needed the token.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::jwt::{create_token, Claims, TokenConfig};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = TokenConfig {
///     secret: "your-secret-key-at-least-32-bytes".to_string(),
///     algorithm: jsonwebtoken::Algorithm::HS256,
///     ttl_minutes: 30,
/// };
/// let claims = Claims::new(Uuid::new_v4(), "user@example.com".to_string(), config.ttl());
///
/// let token = create_token(&claims, &config)?;
/// assert!(!token.is_empty());
/// # Ok(())
/// # }
/// ```
pub fn create_token(claims: &Claims, config: &TokenConfig) -> Result<String, TokenError> {
    let header = Header::new(config.algorithm);
    let key = EncodingKey::from_secret(config.secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| TokenError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a session token and extracts its claims
///
/// Verifies the signature against the configured secret and algorithm and
/// checks expiration with zero leeway. Every failure mode maps to
/// [`TokenError::Invalid`]; the reason is logged at debug level for
/// operators but never reported to the caller.
///
/// # Arguments
///
/// * `token` - Serialized JWT string
/// * `config` - Signing configuration used at issuance
///
/// # Returns
///
/// The validated claims
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::jwt::{create_token, validate_token, Claims, TokenConfig, TokenError};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = TokenConfig {
///     secret: "your-secret-key-at-least-32-bytes".to_string(),
///     algorithm: jsonwebtoken::Algorithm::HS256,
///     ttl_minutes: 30,
/// };
/// let user_id = Uuid::new_v4();
///
/// let claims = Claims::new(user_id, "user@example.com".to_string(), config.ttl());
/// let token = create_token(&claims, &config)?;
///
/// let validated = validate_token(&token, &config)?;
/// assert_eq!(validated.user_id, user_id);
///
/// assert!(matches!(
///     validate_token("not-a-token", &config),
///     Err(TokenError::Invalid)
/// ));
/// # Ok(())
/// # }
/// ```
pub fn validate_token(token: &str, config: &TokenConfig) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(config.secret.as_bytes());

    let mut validation = Validation::new(config.algorithm);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "Token validation failed");
        TokenError::Invalid
    })?;

    Ok(token_data.claims)
}
