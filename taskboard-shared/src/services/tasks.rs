/// Task listing, creation, partial update and deletion
///
/// Creation and deletion are admin-only. Updates are open to admins and to
/// the task's assignee, which is what lets a user drag their own card across
/// the board. Deleting a task leaves its comment in the store.

use tracing::info;
use uuid::Uuid;

use super::{task_view, ServiceError, ServiceResult};
use crate::auth::{
    authorization::{require_admin, require_admin_or_assignee},
    gateway::AuthContext,
};
use crate::models::task::{CreateTask, TaskFilter, TaskView, UpdateTask};
use crate::store::Store;

fn check_title(title: &str) -> ServiceResult<()> {
    if title.trim().is_empty() {
        return Err(ServiceError::validation("title", "Title is required"));
    }
    Ok(())
}

async fn check_assignee<S>(store: &S, assignee: Option<Uuid>) -> ServiceResult<()>
where
    S: Store + ?Sized,
{
    if let Some(user_id) = assignee {
        if store.find_user(user_id).await?.is_none() {
            return Err(ServiceError::validation(
                "assignedTo",
                format!("No user with id {}", user_id),
            ));
        }
    }
    Ok(())
}

/// Lists tasks matching the filter with references resolved, oldest first
pub async fn list_tasks<S>(store: &S, filter: TaskFilter) -> ServiceResult<Vec<TaskView>>
where
    S: Store + ?Sized,
{
    let tasks = store.list_tasks(&filter).await?;

    let mut views = Vec::with_capacity(tasks.len());
    for task in tasks {
        views.push(task_view(store, task).await?);
    }

    Ok(views)
}

/// Creates a task (admin only)
pub async fn create_task<S>(
    store: &S,
    caller: &AuthContext,
    data: CreateTask,
) -> ServiceResult<TaskView>
where
    S: Store + ?Sized,
{
    require_admin(caller.role)?;
    check_title(&data.title)?;
    check_assignee(store, data.assigned_to).await?;

    let task = store.create_task(data).await?;

    info!(
        task_id = %task.id,
        created_by = %caller.user_id,
        status = %task.status,
        "Task created"
    );

    task_view(store, task).await
}

/// Applies a partial update (admin or assignee)
pub async fn update_task<S>(
    store: &S,
    caller: &AuthContext,
    id: Uuid,
    data: UpdateTask,
) -> ServiceResult<TaskView>
where
    S: Store + ?Sized,
{
    let task = store
        .find_task(id)
        .await?
        .ok_or(ServiceError::NotFound("Task"))?;

    require_admin_or_assignee(caller.role, caller.user_id, &task)?;

    if let Some(title) = &data.title {
        check_title(title)?;
    }
    if let Some(assignee) = data.assigned_to {
        check_assignee(store, assignee).await?;
    }

    if data.is_empty() {
        return task_view(store, task).await;
    }

    let updated = store
        .update_task(id, data)
        .await?
        .ok_or(ServiceError::NotFound("Task"))?;

    info!(task_id = %id, updated_by = %caller.user_id, status = %updated.status, "Task updated");

    task_view(store, updated).await
}

/// Deletes a task (admin only); its comment is kept
pub async fn delete_task<S>(store: &S, caller: &AuthContext, id: Uuid) -> ServiceResult<()>
where
    S: Store + ?Sized,
{
    require_admin(caller.role)?;

    if !store.delete_task(id).await? {
        return Err(ServiceError::NotFound("Task"));
    }

    info!(task_id = %id, deleted_by = %caller.user_id, "Task deleted");

    Ok(())
}
