/// Database models for TaskDeck
///
/// This module contains the database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and credentials
/// - `task`: Per-user task records with owner-scoped access
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::user::{User, CreateUser};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     first_name: Some("Jane".to_string()),
///     last_name: None,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
