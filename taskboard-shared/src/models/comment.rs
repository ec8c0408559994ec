/// Comment model and database operations
///
/// A comment is the single free-text note attached to a task. The
/// comment's `task_id` is the authoritative link; `tasks.comment_id` is a
/// convenience pointer kept in step by the comment service.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     text TEXT NOT NULL,
///     author_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     task_id UUID NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT comments_task_id_key UNIQUE (task_id)
/// );
/// ```
///
/// `task_id` has no foreign key: deleting a task leaves its comment behind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::task::{Task, TaskStatus};
use super::user::PublicUser;

/// Name of the constraint enforcing one comment per task
pub const ONE_COMMENT_PER_TASK: &str = "comments_task_id_key";

/// Comment model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique comment ID
    pub id: Uuid,

    /// Comment body
    pub text: String,

    /// User who wrote the comment, if known
    #[serde(rename = "author")]
    pub author_id: Option<Uuid>,

    /// Task this comment belongs to
    pub task_id: Uuid,

    /// When the comment was first created (preserved across edits)
    pub created_at: DateTime<Utc>,

    /// When the text was last changed
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new comment
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub text: String,
    pub author_id: Option<Uuid>,
    pub task_id: Uuid,
}

/// Comment with its author resolved, as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub text: String,
    pub author: Option<PublicUser>,
    pub task_id: Uuid,

    /// Owning task, filled in by the global comment listing only. Absent
    /// there when the task has been deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskSummary>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Just enough of a task to label a comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub id: Uuid,
    pub title: String,
    pub status: TaskStatus,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            status: task.status,
        }
    }
}

impl CommentView {
    pub fn new(comment: Comment, author: Option<PublicUser>) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            author,
            task_id: comment.task_id,
            task: None,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }

    pub fn with_task(mut self, task: Option<&Task>) -> Self {
        self.task = task.map(TaskSummary::from);
        self
    }
}

const COMMENT_COLUMNS: &str = "id, text, author_id, task_id, created_at, updated_at";

impl Comment {
    /// Creates a comment bound to a task
    ///
    /// # Errors
    ///
    /// Fails with a database error on constraint [`ONE_COMMENT_PER_TASK`]
    /// if the task already has a comment.
    pub async fn create(pool: &PgPool, data: CreateComment) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO comments (text, author_id, task_id)
            VALUES ($1, $2, $3)
            RETURNING {COMMENT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Comment>(&query)
            .bind(data.text)
            .bind(data.author_id)
            .bind(data.task_id)
            .fetch_one(pool)
            .await
    }

    /// Finds a comment by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");

        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds the comment bound to a task
    pub async fn find_by_task(pool: &PgPool, task_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE task_id = $1");

        sqlx::query_as::<_, Comment>(&query)
            .bind(task_id)
            .fetch_optional(pool)
            .await
    }

    /// Lists comments, optionally scoped to one task, oldest first
    pub async fn list(pool: &PgPool, task_id: Option<Uuid>) -> Result<Vec<Self>, sqlx::Error> {
        match task_id {
            Some(task_id) => {
                let query = format!(
                    "SELECT {COMMENT_COLUMNS} FROM comments WHERE task_id = $1 ORDER BY created_at ASC, id ASC"
                );
                sqlx::query_as::<_, Comment>(&query)
                    .bind(task_id)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COMMENT_COLUMNS} FROM comments ORDER BY created_at ASC, id ASC"
                );
                sqlx::query_as::<_, Comment>(&query).fetch_all(pool).await
            }
        }
    }

    /// Replaces the text in place, keeping id and `created_at`
    pub async fn update_text(
        pool: &PgPool,
        id: Uuid,
        text: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE comments
            SET text = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {COMMENT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(text)
            .fetch_optional(pool)
            .await
    }

    /// Deletes a comment, returning it if it existed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("DELETE FROM comments WHERE id = $1 RETURNING {COMMENT_COLUMNS}");

        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_wire_shape() {
        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            text: "Blocked on review".to_string(),
            author_id: None,
            task_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&comment).unwrap();
        assert_eq!(json["text"], "Blocked on review");
        assert_eq!(json["taskId"], comment.task_id.to_string());
        assert!(json["author"].is_null());

        let view = CommentView::new(comment.clone(), None);
        assert_eq!(view.id, comment.id);
        assert_eq!(view.created_at, comment.created_at);
        assert!(serde_json::to_value(&view).unwrap().get("task").is_none());
    }
}
