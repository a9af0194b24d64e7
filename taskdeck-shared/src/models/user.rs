/// User model and database operations
///
/// This module provides the User model and the account lookup/creation
/// operations behind registration and login. Emails are stored normalized
/// (trimmed, lowercased) and their uniqueness is enforced by the
/// `users_email_key` constraint; the pre-insert existence check in the
/// registration flow is only a fast path.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(255) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     first_name VARCHAR(50),
///     last_name VARCHAR(50),
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT users_email_key UNIQUE (email)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::user::{normalize_email, CreateUser, User};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let email = normalize_email(" User@Example.com ").ok_or("invalid email")?;
/// let new_user = CreateUser {
///     email,
///     password_hash: "$argon2id$...".to_string(),
///     first_name: Some("Jane".to_string()),
///     last_name: None,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// println!("Created user: {}", user.id);
///
/// let found = User::find_by_email(&pool, "user@example.com").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

lazy_static! {
    // RFC-ish shape: local@domain.tld, with a TLD required
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email pattern is valid");
}

/// Normalizes an email address for storage and lookup
///
/// Trims surrounding whitespace and lowercases, then checks the result
/// against a `local@domain.tld` pattern (a top-level domain is required,
/// so `user@localhost` does not pass).
///
/// # Returns
///
/// The normalized address, or `None` if the input is not a plausible email
///
/// # Example
///
/// ```
/// use taskdeck_shared::models::user::normalize_email;
///
/// assert_eq!(
///     normalize_email("  User@Example.COM "),
///     Some("user@example.com".to_string())
/// );
/// assert_eq!(normalize_email("user@localhost"), None);
/// ```
pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    if EMAIL_REGEX.is_match(&email) {
        Some(email)
    } else {
        None
    }
}

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext, and the
/// hash is excluded from serialization so it cannot leak through a
/// response body.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, stored normalized
    ///
    /// Must be unique across all users
    pub email: String,

    /// Argon2id password hash
    ///
    /// Never store plaintext passwords!
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Optional first name
    pub first_name: Option<String>,

    /// Optional last name
    pub last_name: Option<String>,

    /// Whether the account is active
    ///
    /// Inactive accounts fail login with the same generic error as bad
    /// credentials
    pub is_active: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
///
/// The email must already be normalized via [`normalize_email`] and the
/// password already hashed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Normalized email address
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password!)
    pub password_hash: String,

    /// Optional first name
    pub first_name: Option<String>,

    /// Optional last name
    pub last_name: Option<String>,
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `data` - User creation data
    ///
    /// # Returns
    ///
    /// The newly created user with generated ID and timestamps
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint
    /// violation on `users_email_key`) or the database is unavailable
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use taskdeck_shared::models::user::{User, CreateUser};
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// let new_user = CreateUser {
    ///     email: "user@example.com".to_string(),
    ///     password_hash: "$argon2id$...".to_string(),
    ///     first_name: Some("Jane".to_string()),
    ///     last_name: Some("Doe".to_string()),
    /// };
    ///
    /// let user = User::create(&pool, new_user).await?;
    /// println!("Created user: {}", user.id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, first_name, last_name, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.first_name)
        .bind(data.last_name)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `id` - User ID to search for
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, is_active,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// Emails are stored normalized, so callers must pass an address that
    /// has been through [`normalize_email`] (or lowercased equivalently)
    /// for the lookup to hit.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `email` - Normalized email address to search for
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, is_active,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}
