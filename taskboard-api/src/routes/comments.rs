/// Comment endpoints
///
/// # Endpoints
///
/// - `GET /api/tasks/:taskId/comments` - The task's comment (as a list)
/// - `POST /api/tasks/:taskId/comments` - Create or edit the task's comment
/// - `GET /api/comments` - All comments
/// - `PUT /api/comments/:commentId` - Edit comment text
/// - `DELETE /api/comments/:commentId` - Delete comment and unlink its task

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiJson, ApiPath},
    routes::MessageResponse,
};
use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use taskboard_shared::{
    auth::gateway::AuthContext, models::comment::CommentView, services::comments,
};
use uuid::Uuid;
use validator::Validate;

/// Body for creating or editing a comment
#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = 5000, message = "Comment text is required (max 5000 characters)"))]
    pub text: String,
}

/// List comments for a task
///
/// # Errors
///
/// - `404 Not Found`: No such task
pub async fn list_task_comments(
    State(state): State<AppState>,
    ApiPath(task_id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<CommentView>>> {
    Ok(Json(
        comments::list_comments(state.store.as_ref(), Some(task_id)).await?,
    ))
}

/// Create the task's comment, or edit it in place
///
/// Answers 200 either way; the comment id is stable across edits.
pub async fn upsert_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(task_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<CommentRequest>,
) -> ApiResult<Json<CommentView>> {
    req.validate()?;

    let comment = comments::upsert_comment(state.store.as_ref(), &auth, task_id, &req.text).await?;

    Ok(Json(comment))
}

/// List all comments
pub async fn list_comments(State(state): State<AppState>) -> ApiResult<Json<Vec<CommentView>>> {
    Ok(Json(comments::list_comments(state.store.as_ref(), None).await?))
}

pub async fn update_comment(
    State(state): State<AppState>,
    ApiPath(comment_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<CommentRequest>,
) -> ApiResult<Json<CommentView>> {
    req.validate()?;

    Ok(Json(
        comments::update_comment(state.store.as_ref(), comment_id, &req.text).await?,
    ))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(comment_id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    comments::delete_comment(state.store.as_ref(), &auth, comment_id).await?;

    Ok(Json(MessageResponse::new(
        "Comment deleted and task updated successfully",
    )))
}
