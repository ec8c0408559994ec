/// Domain operations over a [`Store`](crate::store::Store)
///
/// Each service function takes the store as `&S where S: Store + ?Sized`, so
/// the API can pass its `Arc<dyn Store>` and tests a concrete
/// [`MemoryStore`](crate::store::memory::MemoryStore).
///
/// # Modules
///
/// - [`accounts`]: Registration, login and user listing
/// - [`tasks`]: Task listing, creation, partial update and deletion
/// - [`comments`]: The one-comment-per-task upsert, edit, delete and listing

pub mod accounts;
pub mod comments;
pub mod tasks;

use uuid::Uuid;

use crate::auth::{authorization::AuthzError, jwt::JwtError, password::PasswordError};
use crate::models::{
    comment::{Comment, CommentView},
    task::{Task, TaskView},
    user::PublicUser,
};
use crate::store::{Store, StoreError, UserStore};

/// Error type for service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Referenced entity does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Input failed a domain rule
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// Caller lacks the role for this operation
    #[error(transparent)]
    Forbidden(#[from] AuthzError),

    /// Write would violate a uniqueness rule
    #[error("{0}")]
    Conflict(String),

    /// Credentials rejected
    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Jwt(#[from] JwtError),
}

impl ServiceError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Looks up an optional user reference as a public record
///
/// A reference to a user that no longer exists resolves to `None`.
pub(crate) async fn resolve_user<S>(store: &S, id: Option<Uuid>) -> ServiceResult<Option<PublicUser>>
where
    S: UserStore + ?Sized,
{
    match id {
        Some(id) => Ok(store.find_user(id).await?.map(PublicUser::from)),
        None => Ok(None),
    }
}

pub(crate) async fn comment_view<S>(store: &S, comment: Comment) -> ServiceResult<CommentView>
where
    S: Store + ?Sized,
{
    let author = resolve_user(store, comment.author_id).await?;
    Ok(CommentView::new(comment, author))
}

/// Resolves a task's assignee and comment
pub(crate) async fn task_view<S>(store: &S, task: Task) -> ServiceResult<TaskView>
where
    S: Store + ?Sized,
{
    let assigned_to = resolve_user(store, task.assigned_to).await?;

    let comment = match task.comment_id {
        Some(id) => match store.find_comment(id).await? {
            Some(comment) => Some(comment_view(store, comment).await?),
            None => None,
        },
        None => None,
    };

    Ok(TaskView::new(task, assigned_to, comment))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::user::{CreateUser, Role, User};
    use crate::store::{memory::MemoryStore, UserStore};

    pub async fn seed_user(store: &MemoryStore, email: &str, role: Role) -> User {
        store
            .create_user(CreateUser {
                first_name: "Test".to_string(),
                last_name: role.as_str().to_string(),
                email: email.to_string(),
                phone: None,
                password_hash: "unused".to_string(),
                role,
            })
            .await
            .unwrap()
    }
}
