/// Task endpoints
///
/// # Endpoints
///
/// - `GET /api/tasks?status=DONE&assignedTo=<uuid>` - List tasks
/// - `POST /api/tasks` - Create task (admin)
/// - `PUT /api/tasks/:id` - Partial update (admin or assignee)
/// - `DELETE /api/tasks/:id` - Delete task (admin)

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    routes::MessageResponse,
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use taskboard_shared::{
    auth::gateway::AuthContext,
    models::{
        double_option, empty_as_none,
        task::{CreateTask, TaskFilter, TaskStatus, TaskView, UpdateTask},
    },
    services::tasks,
};
use uuid::Uuid;
use validator::Validate;

/// Query filters; both optional, combined with AND. An empty value
/// (`?status=`) is the same as leaving the filter out.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<TaskStatus>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required (max 200 characters)"))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Defaults to TODO
    #[serde(default)]
    pub status: TaskStatus,

    pub assigned_to: Option<Uuid>,
}

/// Only the keys present in the body are changed; `"assignedTo": null`
/// clears the assignee.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to: Option<Option<Uuid>>,
}

impl From<UpdateTaskRequest> for UpdateTask {
    fn from(req: UpdateTaskRequest) -> Self {
        UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            assigned_to: req.assigned_to,
        }
    }
}

/// List tasks with assignee and comment resolved
pub async fn list_tasks(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListTasksQuery>,
) -> ApiResult<Json<Vec<TaskView>>> {
    let filter = TaskFilter {
        status: query.status,
        assigned_to: query.assigned_to,
    };

    Ok(Json(tasks::list_tasks(state.store.as_ref(), filter).await?))
}

/// Create a task
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or unknown assignee
/// - `403 Forbidden`: Caller is not an admin
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskView>)> {
    req.validate()?;

    let task = tasks::create_task(
        state.store.as_ref(),
        &auth,
        CreateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            assigned_to: req.assigned_to,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Partially update a task
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or unknown assignee
/// - `403 Forbidden`: Caller is neither admin nor assignee
/// - `404 Not Found`: No such task
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateTaskRequest>,
) -> ApiResult<Json<TaskView>> {
    req.validate()?;

    let task = tasks::update_task(state.store.as_ref(), &auth, id, req.into()).await?;

    Ok(Json(task))
}

/// Delete a task; its comment is kept
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    tasks::delete_task(state.store.as_ref(), &auth, id).await?;

    Ok(Json(MessageResponse::new("Task deleted")))
}
