/// Task model and database operations
///
/// This module provides the Task model and the owner-scoped CRUD operations
/// behind the task endpoints. Every read and mutation filters on
/// `(id, owner_id)` jointly: a task whose id exists but belongs to another
/// user is indistinguishable from a task that does not exist. The owner id
/// always comes from the authenticated request context, never from a
/// client-supplied field.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(200) NOT NULL,
///     description VARCHAR(1000),
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     priority task_priority NOT NULL DEFAULT 'medium',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::task::{CreateTask, Task, TaskPriority};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(owner_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     owner_id,
///     title: "Buy milk".to_string(),
///     description: None,
///     completed: false,
///     priority: TaskPriority::Medium,
/// }).await?;
///
/// // Only the owner's id unlocks the row
/// let found = Task::find_by_id_and_owner(&pool, task.id, owner_id).await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task priority level
///
/// Maps to the `task_priority` PostgreSQL enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority
    Low,

    /// Medium priority (the default for new tasks)
    Medium,

    /// High priority
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

impl TaskPriority {
    /// Gets the priority as its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

/// Task model representing a single tracked item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Owning user's ID
    pub owner_id: Uuid,

    /// Task title (1-200 characters)
    pub title: String,

    /// Optional longer description (up to 1000 characters)
    pub description: Option<String>,

    /// Whether the task is done
    pub completed: bool,

    /// Task priority
    pub priority: TaskPriority,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// Field constraints (title 1-200 chars, description up to 1000) are
/// enforced at the request boundary before this struct is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owning user's ID, taken from the authenticated context
    pub owner_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial completion state
    pub completed: bool,

    /// Priority level
    pub priority: TaskPriority,
}

/// Input for partially updating a task
///
/// All fields are optional; only non-None fields are applied. The
/// description uses a nested Option so `Some(None)` clears the stored
/// value while `None` leaves it untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,

    /// New completion state
    pub completed: Option<bool>,

    /// New priority
    pub priority: Option<TaskPriority>,
}

impl Task {
    /// Creates a new task in the database
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `data` - Task creation data
    ///
    /// # Returns
    ///
    /// The newly created task with generated ID and timestamps
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (owner_id, title, description, completed, priority)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, owner_id, title, description, completed, priority,
                      created_at, updated_at
            "#,
        )
        .bind(data.owner_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.completed)
        .bind(data.priority)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks belonging to one user, newest first
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `owner_id` - Owning user's ID
    pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, owner_id, title, description, completed, priority,
                   created_at, updated_at
            FROM tasks
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Finds a task by ID, scoped to its owner
    ///
    /// The predicate is a conjunction: both the id and the owner must match
    /// the same row, so another user's task id behaves exactly like an id
    /// that was never issued.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `id` - Task ID
    /// * `owner_id` - Authenticated owner's ID
    ///
    /// # Returns
    ///
    /// The task if found for this owner, None otherwise
    pub async fn find_by_id_and_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, owner_id, title, description, completed, priority,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Partially updates a task, scoped to its owner
    ///
    /// Only non-None fields in `data` are applied; the `updated_at`
    /// timestamp is always set to the current time. The update hits zero
    /// rows when the `(id, owner_id)` conjunction does not match, which the
    /// caller reports identically to a missing task.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `id` - Task ID
    /// * `owner_id` - Authenticated owner's ID
    /// * `data` - Fields to update
    ///
    /// # Returns
    ///
    /// The updated task if the conjunction matched, None otherwise
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.completed.is_some() {
            bind_count += 1;
            query.push_str(&format!(", completed = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND owner_id = $2 \
             RETURNING id, owner_id, title, description, completed, priority, \
             created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id).bind(owner_id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            // Binds NULL when clearing
            q = q.bind(description);
        }
        if let Some(completed) = data.completed {
            q = q.bind(completed);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task, scoped to its owner
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `id` - Task ID
    /// * `owner_id` - Authenticated owner's ID
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false if the conjunction matched nothing.
    /// A repeat delete is therefore false, never an error.
    pub async fn delete(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
