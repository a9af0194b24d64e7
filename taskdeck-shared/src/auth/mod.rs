/// Authentication utilities
///
/// This module provides the secure authentication primitives for TaskDeck:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: session token generation and validation
/// - [`middleware`]: bearer header parsing and the authenticated request context
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Session Tokens**: HMAC-signed JWTs with configurable expiration
/// - **Constant-time Comparison**: verification uses constant-time operations
/// - **Opaque Failures**: token and login failures never reveal their cause
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::password::{hash_password, verify_password};
/// use taskdeck_shared::auth::jwt::{create_token, validate_token, Claims, TokenConfig};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash));
///
/// // Session token issuance
/// let config = TokenConfig {
///     secret: "secret-key-at-least-32-bytes-long!".to_string(),
///     algorithm: jsonwebtoken::Algorithm::HS256,
///     ttl_minutes: 30,
/// };
/// let claims = Claims::new(Uuid::new_v4(), "user@example.com".to_string(), config.ttl());
/// let token = create_token(&claims, &config)?;
/// assert!(validate_token(&token, &config).is_ok());
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
