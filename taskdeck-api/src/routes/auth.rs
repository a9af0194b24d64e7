/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login
/// - Logout
/// - Current user lookup
/// - Token verification
///
/// # Endpoints
///
/// - `POST /auth/register` - Register new user
/// - `POST /auth/login` - Login and get a token
/// - `POST /auth/logout` - Acknowledge logout (token discard is client-side)
/// - `GET /auth/me` - Get the authenticated user's profile
/// - `POST /auth/verify` - Check a bearer token without touching the database

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    routes::MessageResponse,
};
use axum::{extract::State, http::HeaderMap, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::{
        jwt,
        middleware::{bearer_token, AuthContext},
        password,
    },
    models::user::{normalize_email, CreateUser, User},
};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address, bounded by the column width
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    /// Password (hashed before storage, never logged)
    #[validate(length(min = 7, message = "Password must be at least 7 characters long"))]
    pub password: String,

    /// Optional first name
    #[validate(length(max = 50, message = "First name must be at most 50 characters"))]
    pub first_name: Option<String>,

    /// Optional last name
    #[validate(length(max = 50, message = "Last name must be at most 50 characters"))]
    pub last_name: Option<String>,
}

/// Login request
///
/// Deliberately unvalidated: any credential mismatch, including a malformed
/// email, is answered with the same generic 401.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: String,

    /// Password
    pub password: String,
}

/// User profile as returned to clients
///
/// The password hash never appears here.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID
    pub id: Uuid,

    /// Email address (normalized)
    pub email: String,

    /// Optional first name
    pub first_name: Option<String>,

    /// Optional last name
    pub last_name: Option<String>,

    /// Whether the account is active
    pub is_active: bool,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Response for register and login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Signed bearer token
    pub access_token: String,

    /// Token type, always "bearer"
    pub token_type: String,

    /// The authenticated user's profile
    pub user: UserResponse,
}

/// Identity embedded in a verified token
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifiedUser {
    /// User ID
    pub id: Uuid,

    /// Email address
    pub email: String,
}

/// Token verification response
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Always true; invalid tokens are rejected with 401 instead
    pub valid: bool,

    /// Identity claims carried by the token
    pub user: VerifiedUser,

    /// Seconds until the token expires
    #[serde(rename = "expiresIn")]
    pub expires_in: i64,
}

/// Register a new user
///
/// Creates a user account and immediately returns a bearer token, so clients
/// can skip a separate login after signup.
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "SecureP@ss123",
///   "first_name": "Jane",
///   "last_name": "Doe"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "access_token": "eyJ...",
///   "token_type": "bearer",
///   "user": { "id": "uuid", "email": "user@example.com", ... }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Email already registered
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    // Validate request
    req.validate()?;

    // Normalization enforces a stricter pattern than the derive check
    let email = normalize_email(&req.email).ok_or_else(|| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "email".to_string(),
            message: "Invalid email format".to_string(),
        }])
    })?;

    // Pre-check for a clean client error before doing expensive hashing
    if User::find_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    // Hash password
    let password_hash = password::hash_password(&req.password)?;

    // Concurrent registrations racing past the pre-check hit the unique
    // constraint, which maps to the same 400
    let user = User::create(
        &state.db,
        CreateUser {
            email,
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    let access_token = issue_token(&state, &user)?;

    Ok(Json(AuthResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: user.into(),
    }))
}

/// Login endpoint
///
/// Authenticates a user and returns a bearer token.
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "SecureP@ss123"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "access_token": "eyJ...",
///   "token_type": "bearer",
///   "user": { "id": "uuid", "email": "user@example.com", ... }
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Incorrect email or password (also covers unknown
///   and deactivated accounts, so the response never reveals which)
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    // One response for unknown email, wrong password, and inactive account
    let invalid = || ApiError::Unauthorized("Incorrect email or password".to_string());

    let email = match normalize_email(&req.email) {
        Some(email) => email,
        None => return Err(invalid()),
    };

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&req.password, &user.password_hash) {
        return Err(invalid());
    }

    if !user.is_active {
        return Err(invalid());
    }

    tracing::info!(user_id = %user.id, "User logged in");

    let access_token = issue_token(&state, &user)?;

    Ok(Json(AuthResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: user.into(),
    }))
}

/// Logout endpoint
///
/// Tokens are stateless, so logout is an acknowledgement; clients discard
/// the token and it ages out at its expiry.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
pub async fn logout(Extension(auth): Extension<AuthContext>) -> ApiResult<Json<MessageResponse>> {
    tracing::debug!(user_id = %auth.user_id, "User logged out");

    Ok(Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    }))
}

/// Current user endpoint
///
/// Returns the authenticated user's profile from the database.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: The account behind the token no longer exists
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<UserResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

/// Token verification endpoint
///
/// Validates the bearer token from the Authorization header and reports the
/// identity it carries plus its remaining lifetime. Purely computational;
/// the database is never consulted.
///
/// # Response
///
/// ```json
/// {
///   "valid": true,
///   "user": { "id": "uuid", "email": "user@example.com" },
///   "expiresIn": 1800
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing, malformed, expired, or forged token, or
///   an Authorization header that is not a Bearer token
pub async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<VerifyResponse>> {
    let token = bearer_token(&headers)?;

    let claims = jwt::validate_token(token, state.token_config())
        .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    let expires_in = claims
        .time_until_expiration()
        .map(|d| d.num_seconds())
        .unwrap_or(0);

    Ok(Json(VerifyResponse {
        valid: true,
        user: VerifiedUser {
            id: claims.user_id,
            email: claims.sub,
        },
        expires_in,
    }))
}

/// Issues a bearer token for a user
fn issue_token(state: &AppState, user: &User) -> Result<String, ApiError> {
    let claims = jwt::Claims::new(user.id, user.email.clone(), state.config.jwt.ttl());
    Ok(jwt::create_token(&claims, state.token_config())?)
}
