/// PostgreSQL store
///
/// Thin adapter from the store traits onto the sqlx model methods. The
/// schema carries the invariants: `users_email_key` and
/// `comments_task_id_key` are unique constraints, and `tasks.comment_id` is
/// set with a conditional update so concurrent writers cannot clobber it.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CommentStore, Store, StoreResult, TaskStore, UserStore};
use crate::db::pool;
use crate::models::{
    comment::{Comment, CreateComment},
    task::{CreateTask, Task, TaskFilter, UpdateTask},
    user::{CreateUser, User},
};

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(User::list(&self.pool).await?)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        Ok(Task::list(&self.pool, filter).await?)
    }

    async fn update_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Option<Task>> {
        Ok(Task::update(&self.pool, id, data).await?)
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        Ok(Task::delete(&self.pool, id).await?)
    }

    async fn attach_comment(&self, task_id: Uuid, comment_id: Uuid) -> StoreResult<bool> {
        Ok(Task::attach_comment(&self.pool, task_id, comment_id).await?)
    }

    async fn clear_comment_reference(&self, comment_id: Uuid) -> StoreResult<u64> {
        Ok(Task::clear_comment_reference(&self.pool, comment_id).await?)
    }
}

#[async_trait]
impl CommentStore for PgStore {
    async fn create_comment(&self, data: CreateComment) -> StoreResult<Comment> {
        Ok(Comment::create(&self.pool, data).await?)
    }

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        Ok(Comment::find_by_id(&self.pool, id).await?)
    }

    async fn find_comment_by_task(&self, task_id: Uuid) -> StoreResult<Option<Comment>> {
        Ok(Comment::find_by_task(&self.pool, task_id).await?)
    }

    async fn list_comments(&self, task_id: Option<Uuid>) -> StoreResult<Vec<Comment>> {
        Ok(Comment::list(&self.pool, task_id).await?)
    }

    async fn update_comment_text(&self, id: Uuid, text: &str) -> StoreResult<Option<Comment>> {
        Ok(Comment::update_text(&self.pool, id, text).await?)
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        Ok(Comment::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(pool::health_check(&self.pool).await?)
    }
}
