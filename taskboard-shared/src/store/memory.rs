/// In-memory store
///
/// Keeps users, tasks and comments in insertion-ordered vectors behind a
/// single `tokio::sync::RwLock`. Each trait method takes the lock once, so
/// every individual operation is atomic, matching the single-statement
/// guarantees of the PostgreSQL store. Constraint behaviour mirrors the
/// schema: duplicate emails and second comments per task are rejected, and
/// deleting a comment nulls any task reference to it.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CommentStore, Store, StoreError, StoreResult, TaskStore, UserStore};
use crate::models::{
    comment::{Comment, CreateComment, ONE_COMMENT_PER_TASK},
    task::{CreateTask, Task, TaskFilter, UpdateTask},
    user::{CreateUser, User, UNIQUE_EMAIL},
};

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    tasks: Vec<Task>,
    comments: Vec<Comment>,
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut state = self.state.write().await;

        if state.users.iter().any(|u| u.email == data.email) {
            return Err(StoreError::UniqueViolation {
                constraint: UNIQUE_EMAIL.to_string(),
            });
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            phone: data.phone,
            password_hash: data.password_hash,
            role: data.role,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());

        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.state.read().await.users.clone())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            status: data.status,
            assigned_to: data.assigned_to,
            comment_id: None,
            created_at: now,
            updated_at: now,
        };
        self.state.write().await.tasks.push(task.clone());

        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let state = self.state.read().await;
        Ok(state.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    async fn update_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Option<Task>> {
        let mut state = self.state.write().await;

        Ok(state.tasks.iter_mut().find(|t| t.id == id).map(|task| {
            data.apply_to(task);
            task.updated_at = Utc::now();
            task.clone()
        }))
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != id);

        Ok(state.tasks.len() < before)
    }

    async fn attach_comment(&self, task_id: Uuid, comment_id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;

        match state.tasks.iter_mut().find(|t| t.id == task_id) {
            Some(task) if task.comment_id.is_none() || task.comment_id == Some(comment_id) => {
                task.comment_id = Some(comment_id);
                task.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn clear_comment_reference(&self, comment_id: Uuid) -> StoreResult<u64> {
        let mut state = self.state.write().await;
        Ok(clear_references(&mut state, comment_id))
    }
}

fn clear_references(state: &mut State, comment_id: Uuid) -> u64 {
    let now = Utc::now();
    let mut cleared = 0;

    for task in state
        .tasks
        .iter_mut()
        .filter(|t| t.comment_id == Some(comment_id))
    {
        task.comment_id = None;
        task.updated_at = now;
        cleared += 1;
    }

    cleared
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn create_comment(&self, data: CreateComment) -> StoreResult<Comment> {
        let mut state = self.state.write().await;

        if state.comments.iter().any(|c| c.task_id == data.task_id) {
            return Err(StoreError::UniqueViolation {
                constraint: ONE_COMMENT_PER_TASK.to_string(),
            });
        }

        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            text: data.text,
            author_id: data.author_id,
            task_id: data.task_id,
            created_at: now,
            updated_at: now,
        };
        state.comments.push(comment.clone());

        Ok(comment)
    }

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let state = self.state.read().await;
        Ok(state.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn find_comment_by_task(&self, task_id: Uuid) -> StoreResult<Option<Comment>> {
        let state = self.state.read().await;
        Ok(state.comments.iter().find(|c| c.task_id == task_id).cloned())
    }

    async fn list_comments(&self, task_id: Option<Uuid>) -> StoreResult<Vec<Comment>> {
        let state = self.state.read().await;
        Ok(state
            .comments
            .iter()
            .filter(|c| task_id.map_or(true, |id| c.task_id == id))
            .cloned()
            .collect())
    }

    async fn update_comment_text(&self, id: Uuid, text: &str) -> StoreResult<Option<Comment>> {
        let mut state = self.state.write().await;

        Ok(state.comments.iter_mut().find(|c| c.id == id).map(|comment| {
            comment.text = text.to_string();
            comment.updated_at = Utc::now();
            comment.clone()
        }))
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let mut state = self.state.write().await;

        let Some(index) = state.comments.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        let comment = state.comments.remove(index);
        // ON DELETE SET NULL
        clear_references(&mut state, id);

        Ok(Some(comment))
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
