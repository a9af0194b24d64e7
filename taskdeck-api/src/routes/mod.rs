/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: API banner and health check endpoints
/// - `auth`: Authentication endpoints (register, login, logout, me, verify)
/// - `tasks`: Task CRUD endpoints

pub mod auth;
pub mod health;
pub mod tasks;

use serde::{Deserialize, Serialize};

/// Simple acknowledgement body shared by logout and task deletion
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation
    pub message: String,
}
