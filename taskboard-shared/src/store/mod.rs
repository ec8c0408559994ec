/// Persistence seams for Taskboard
///
/// Services never talk to the database directly; they go through the
/// [`UserStore`], [`TaskStore`] and [`CommentStore`] traits, bundled as
/// [`Store`]. Two implementations exist:
///
/// - [`postgres::PgStore`]: sqlx/PostgreSQL, delegating to the model methods
/// - [`memory::MemoryStore`]: process-local maps behind an async lock, used
///   by tests and `STORE_BACKEND=memory`
///
/// Both enforce the same constraints: unique user email, and at most one
/// comment per task.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskboard_shared::store::{memory::MemoryStore, Store};
///
/// let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
/// assert_eq!(store.backend(), "memory");
/// ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    comment::{Comment, CreateComment},
    task::{CreateTask, Task, TaskFilter, UpdateTask},
    user::{CreateUser, User},
};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation {
        /// Name of the violated constraint
        constraint: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    /// Checks whether this error is a violation of the named constraint
    pub fn is_unique_violation_of(&self, name: &str) -> bool {
        matches!(self, StoreError::UniqueViolation { constraint } if constraint == name)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                };
            }
        }
        StoreError::Database(err)
    }
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Credential store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user; duplicate email ⇒ `UniqueViolation("users_email_key")`
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// All users, oldest first
    async fn list_users(&self) -> StoreResult<Vec<User>>;
}

/// Task store
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task>;

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;

    /// Tasks matching the filter, oldest first
    async fn list_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>>;

    /// Partial update; None if the task doesn't exist
    async fn update_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Option<Task>>;

    /// Removes the task only; its comment is kept
    async fn delete_task(&self, id: Uuid) -> StoreResult<bool>;

    /// Sets the comment reference if it is empty or already `comment_id`
    ///
    /// Returns false when the task is gone or points at another comment.
    async fn attach_comment(&self, task_id: Uuid, comment_id: Uuid) -> StoreResult<bool>;

    /// Clears the reference on any task pointing at `comment_id`
    async fn clear_comment_reference(&self, comment_id: Uuid) -> StoreResult<u64>;
}

/// Comment store
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Persists a comment; a second comment for the same task ⇒
    /// `UniqueViolation("comments_task_id_key")`
    async fn create_comment(&self, data: CreateComment) -> StoreResult<Comment>;

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>>;

    async fn find_comment_by_task(&self, task_id: Uuid) -> StoreResult<Option<Comment>>;

    /// All comments, or only the given task's, oldest first
    async fn list_comments(&self, task_id: Option<Uuid>) -> StoreResult<Vec<Comment>>;

    /// Replaces the text, preserving id and creation time
    async fn update_comment_text(&self, id: Uuid, text: &str) -> StoreResult<Option<Comment>>;

    /// Deletes and returns the comment, if it existed
    async fn delete_comment(&self, id: Uuid) -> StoreResult<Option<Comment>>;
}

/// Everything the services need from persistence
#[async_trait]
pub trait Store: UserStore + TaskStore + CommentStore {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Verifies the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}
