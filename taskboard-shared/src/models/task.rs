/// Task model and database operations
///
/// Tasks are the cards on the kanban board. A task optionally has an
/// assignee and holds a reference to at most one comment.
///
/// # Status Graph
///
/// ```text
/// TODO ⇄ IN-PROGRESS ⇄ DONE
///   ⇅__________________⇅
/// ```
///
/// Every status is reachable from every other; there is no transition guard.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('TODO', 'IN-PROGRESS', 'DONE');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(200) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     status task_status NOT NULL DEFAULT 'TODO',
///     assigned_to UUID REFERENCES users(id) ON DELETE SET NULL,
///     comment_id UUID REFERENCES comments(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{CreateTask, Task, TaskFilter, TaskStatus, UpdateTask};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     title: "Write release notes".to_string(),
///     description: String::new(),
///     status: TaskStatus::Todo,
///     assigned_to: None,
/// }).await?;
///
/// // Drag the card to the next column
/// Task::update(&pool, task.id, UpdateTask {
///     status: Some(TaskStatus::InProgress),
///     ..Default::default()
/// }).await?;
///
/// let in_progress = Task::list(&pool, &TaskFilter {
///     status: Some(TaskStatus::InProgress),
///     assigned_to: None,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::{fmt, str::FromStr};
use uuid::Uuid;

use super::{comment::CommentView, user::PublicUser};

/// Kanban status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    /// Not started
    #[default]
    #[sqlx(rename = "TODO")]
    #[serde(rename = "TODO")]
    Todo,

    /// Being worked on
    #[sqlx(rename = "IN-PROGRESS")]
    #[serde(rename = "IN-PROGRESS")]
    InProgress,

    /// Finished
    #[sqlx(rename = "DONE")]
    #[serde(rename = "DONE")]
    Done,
}

impl TaskStatus {
    /// All statuses in board column order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Converts status to its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN-PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TODO" => Ok(TaskStatus::Todo),
            "IN-PROGRESS" => Ok(TaskStatus::InProgress),
            "DONE" => Ok(TaskStatus::Done),
            other => Err(format!(
                "Unknown status '{}', expected one of TODO, IN-PROGRESS, DONE",
                other
            )),
        }
    }
}

/// Task model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Short title shown on the card
    pub title: String,

    /// Longer free-text description
    pub description: String,

    /// Current kanban column
    pub status: TaskStatus,

    /// Assigned user, if any
    pub assigned_to: Option<Uuid>,

    /// The task's single comment, if any
    ///
    /// Convenience pointer; the comment's `task_id` is authoritative.
    #[serde(rename = "comment")]
    pub comment_id: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub assigned_to: Option<Uuid>,
}

/// Partial update for a task
///
/// Only `Some` fields are written. `assigned_to: Some(None)` clears the
/// assignee.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<Option<Uuid>>,
}

impl UpdateTask {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.assigned_to.is_none()
    }

    /// Applies the supplied fields to a task in place
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(assigned_to) = self.assigned_to {
            task.assigned_to = assigned_to;
        }
    }
}

/// Filters for listing tasks; both are optional and combine with AND
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<Uuid>,
}

impl TaskFilter {
    /// Checks a task against the filter
    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |status| task.status == status)
            && self
                .assigned_to
                .map_or(true, |user_id| task.assigned_to == Some(user_id))
    }
}

/// Task with its assignee and comment resolved, as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub assigned_to: Option<PublicUser>,
    pub comment: Option<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskView {
    /// Builds a view from a task and its already-resolved references
    pub fn new(task: Task, assigned_to: Option<PublicUser>, comment: Option<CommentView>) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            assigned_to,
            comment,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

const TASK_COLUMNS: &str =
    "id, title, description, status, assigned_to, comment_id, created_at, updated_at";

impl Task {
    /// Creates a new task
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO tasks (title, description, status, assigned_to)
            VALUES ($1, $2, $3, $4)
            RETURNING {TASK_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(data.title)
            .bind(data.description)
            .bind(data.status)
            .bind(data.assigned_to)
            .fetch_one(pool)
            .await
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");

        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists tasks matching the filter, oldest first
    pub async fn list(pool: &PgPool, filter: &TaskFilter) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE TRUE");
        let mut bind_count = 0;

        if filter.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND status = ${}", bind_count));
        }
        if filter.assigned_to.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND assigned_to = ${}", bind_count));
        }
        query.push_str(" ORDER BY created_at ASC, id ASC");

        let mut q = sqlx::query_as::<_, Task>(&query);
        if let Some(status) = filter.status {
            q = q.bind(status);
        }
        if let Some(assigned_to) = filter.assigned_to {
            q = q.bind(assigned_to);
        }

        q.fetch_all(pool).await
    }

    /// Applies a partial update
    ///
    /// Returns the updated task, or None if it doesn't exist. The
    /// `updated_at` timestamp is always refreshed.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.assigned_to.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assigned_to = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {TASK_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(assigned_to) = data.assigned_to {
            q = q.bind(assigned_to);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes a task by ID
    ///
    /// The task's comment is left in place.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Points the task at a comment, but only if it has none (or already this one)
    ///
    /// Returns false when the task doesn't exist or references another comment.
    pub async fn attach_comment(
        pool: &PgPool,
        id: Uuid,
        comment_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET comment_id = $2, updated_at = NOW()
            WHERE id = $1 AND (comment_id IS NULL OR comment_id = $2)
            "#,
        )
        .bind(id)
        .bind(comment_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Clears the reference on every task pointing at a comment
    ///
    /// Returns the number of tasks touched.
    pub async fn clear_comment_reference(
        pool: &PgPool,
        comment_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET comment_id = NULL, updated_at = NOW()
            WHERE comment_id = $1
            "#,
        )
        .bind(comment_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}
