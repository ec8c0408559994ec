/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Liveness and store connectivity
/// - `auth`: Registration and login
/// - `tasks`: Task listing and CRUD
/// - `comments`: The per-task comment and comment listing
/// - `users`: User listing

pub mod auth;
pub mod comments;
pub mod health;
pub mod tasks;
pub mod users;

use serde::{Deserialize, Serialize};

/// Plain acknowledgement body for operations with nothing else to return
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
