/// Task CRUD endpoints
///
/// All endpoints operate on the authenticated user's tasks only. Every query
/// filters on both the task id and the owner id, so another user's task is
/// indistinguishable from a missing one.
///
/// # Endpoints
///
/// - `GET    /tasks` - List the user's tasks, newest first
/// - `POST   /tasks` - Create a task
/// - `GET    /tasks/:id` - Fetch one task
/// - `PUT    /tasks/:id` - Partially update a task
/// - `DELETE /tasks/:id` - Delete a task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    routes::MessageResponse,
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Deserializer};
use taskdeck_shared::{
    auth::middleware::AuthContext,
    models::task::{CreateTask, Task, TaskPriority, UpdateTask},
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Optional free-form description
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    /// Completion flag (default: false)
    #[serde(default)]
    pub completed: bool,

    /// Priority (default: medium)
    #[serde(default)]
    pub priority: TaskPriority,
}

/// Update task request
///
/// All fields are optional; omitted fields keep their current value. The
/// description additionally distinguishes an explicit `null` (clear it) from
/// the field being absent (keep it).
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    /// New description, `null` clears it
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    /// New completion flag
    pub completed: Option<bool>,

    /// New priority
    pub priority: Option<TaskPriority>,
}

/// Keeps `null` distinguishable from an absent field
///
/// With `#[serde(default)]` an absent field stays `None`, while a present
/// field (including `null`) becomes `Some(...)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// List tasks endpoint
///
/// Returns every task owned by the authenticated user, newest first.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_by_owner(&state.db, auth.user_id).await?;

    Ok(Json(tasks))
}

/// Create task endpoint
///
/// Creates a task owned by the authenticated user. The owner comes from the
/// token, never from the request body.
///
/// # Endpoint
///
/// ```text
/// POST /tasks
/// Content-Type: application/json
///
/// {
///   "title": "Ship the release",
///   "description": "Cut the tag and push artifacts",
///   "priority": "high"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    // Validate request
    req.validate()?;

    let task = Task::create(
        &state.db,
        CreateTask {
            owner_id: auth.user_id,
            title: req.title,
            description: req.description,
            completed: req.completed,
            priority: req.priority,
        },
    )
    .await?;

    tracing::info!(task_id = %task.id, owner_id = %auth.user_id, "Task created");

    Ok(Json(task))
}

/// Get task endpoint
///
/// Fetches a single task by id, scoped to the authenticated user.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: No such task, or it belongs to someone else
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id_and_owner(&state.db, task_id, auth.user_id)
        .await?
        .ok_or_else(task_not_found)?;

    Ok(Json(task))
}

/// Update task endpoint
///
/// Applies a partial update: only the fields present in the body change.
/// Sending `"description": null` clears the description. The update is
/// scoped to the authenticated user.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: No such task, or it belongs to someone else
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    // Validate request
    req.validate()?;

    // The derive cannot see through the double Option
    if let Some(Some(description)) = &req.description {
        if description.chars().count() > 1000 {
            return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "description".to_string(),
                message: "Description must be at most 1000 characters".to_string(),
            }]));
        }
    }

    let task = Task::update(
        &state.db,
        task_id,
        auth.user_id,
        UpdateTask {
            title: req.title,
            description: req.description,
            completed: req.completed,
            priority: req.priority,
        },
    )
    .await?
    .ok_or_else(task_not_found)?;

    tracing::info!(task_id = %task.id, owner_id = %auth.user_id, "Task updated");

    Ok(Json(task))
}

/// Delete task endpoint
///
/// Deletes a task owned by the authenticated user.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: No such task, or it belongs to someone else
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = Task::delete(&state.db, task_id, auth.user_id).await?;

    if !deleted {
        return Err(task_not_found());
    }

    tracing::info!(task_id = %task_id, owner_id = %auth.user_id, "Task deleted");

    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

/// The shared miss response
///
/// Foreign tasks and missing tasks answer identically so ids cannot be
/// probed across accounts.
fn task_not_found() -> ApiError {
    ApiError::NotFound("Task not found or you don't have permission to access it".to_string())
}
