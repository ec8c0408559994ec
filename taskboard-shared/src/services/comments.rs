/// Comment service: one comment per task, edited in place
///
/// A task carries at most one comment. Posting to a task that already has
/// one rewrites its text and keeps its id and creation time. Posting to a
/// task without one creates the comment and then links the task to it.
///
/// Those are two writes with no transaction around them, so the service
/// closes the gaps itself:
///
/// - the store allows a single comment per `task_id`; a writer that loses the
///   race to create falls back to editing the winner's comment
/// - the task link is set only if empty or already equal, so concurrent
///   writers cannot overwrite each other
/// - if the task vanishes between create and link, the new comment is
///   deleted again and the call reports the task as not found
/// - a link to a comment that no longer exists counts as no comment

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{comment_view, ServiceError, ServiceResult};
use crate::auth::gateway::AuthContext;
use crate::models::comment::{Comment, CommentView, CreateComment, ONE_COMMENT_PER_TASK};
use crate::store::Store;

fn check_text(text: &str) -> ServiceResult<()> {
    if text.trim().is_empty() {
        return Err(ServiceError::validation("text", "Comment text is required"));
    }
    Ok(())
}

/// Creates the task's comment, or edits it in place if it already has one
pub async fn upsert_comment<S>(
    store: &S,
    caller: &AuthContext,
    task_id: Uuid,
    text: &str,
) -> ServiceResult<CommentView>
where
    S: Store + ?Sized,
{
    check_text(text)?;

    let task = store
        .find_task(task_id)
        .await?
        .ok_or(ServiceError::NotFound("Task"))?;

    if let Some(comment_id) = task.comment_id {
        if let Some(updated) = store.update_comment_text(comment_id, text).await? {
            debug!(task_id = %task_id, comment_id = %comment_id, "Comment edited in place");
            return comment_view(store, updated).await;
        }

        warn!(task_id = %task_id, comment_id = %comment_id, "Task links a missing comment, clearing");
        store.clear_comment_reference(comment_id).await?;
    }

    let (comment, created) = create_or_adopt(store, caller, task_id, text).await?;

    if !link(store, task_id, comment.id).await? {
        if created {
            warn!(task_id = %task_id, comment_id = %comment.id, "Task deleted before link, removing comment");
            store.delete_comment(comment.id).await?;
        }
        return Err(ServiceError::NotFound("Task"));
    }

    if created {
        info!(task_id = %task_id, comment_id = %comment.id, author = %caller.user_id, "Comment created");
    }

    comment_view(store, comment).await
}

/// Inserts a comment for the task; on a lost race, edits the winner's instead
///
/// The flag is true when this call inserted the comment.
async fn create_or_adopt<S>(
    store: &S,
    caller: &AuthContext,
    task_id: Uuid,
    text: &str,
) -> ServiceResult<(Comment, bool)>
where
    S: Store + ?Sized,
{
    let data = CreateComment {
        text: text.to_string(),
        author_id: Some(caller.user_id),
        task_id,
    };

    match store.create_comment(data).await {
        Ok(comment) => Ok((comment, true)),
        Err(e) if e.is_unique_violation_of(ONE_COMMENT_PER_TASK) => {
            debug!(task_id = %task_id, "Comment already exists for task, editing it");

            let existing = store
                .find_comment_by_task(task_id)
                .await?
                .ok_or(ServiceError::NotFound("Comment"))?;
            let updated = store
                .update_comment_text(existing.id, text)
                .await?
                .ok_or(ServiceError::NotFound("Comment"))?;

            Ok((updated, false))
        }
        Err(e) => Err(e.into()),
    }
}

/// Points the task at the comment
///
/// Returns false if the task no longer exists. A stale link to a deleted
/// comment is cleared and the link retried once.
async fn link<S>(store: &S, task_id: Uuid, comment_id: Uuid) -> ServiceResult<bool>
where
    S: Store + ?Sized,
{
    for _ in 0..2 {
        if store.attach_comment(task_id, comment_id).await? {
            return Ok(true);
        }

        let Some(task) = store.find_task(task_id).await? else {
            return Ok(false);
        };

        match task.comment_id {
            Some(other) if other != comment_id => {
                if store.find_comment(other).await?.is_some() {
                    return Err(ServiceError::Conflict(
                        "Task is linked to another comment".to_string(),
                    ));
                }
                store.clear_comment_reference(other).await?;
            }
            _ => {}
        }
    }

    Err(ServiceError::Conflict(
        "Task comment changed concurrently".to_string(),
    ))
}

/// Replaces a comment's text
pub async fn update_comment<S>(store: &S, comment_id: Uuid, text: &str) -> ServiceResult<CommentView>
where
    S: Store + ?Sized,
{
    check_text(text)?;

    let comment = store
        .update_comment_text(comment_id, text)
        .await?
        .ok_or(ServiceError::NotFound("Comment"))?;

    comment_view(store, comment).await
}

/// Deletes a comment and clears the link on whichever task points at it
pub async fn delete_comment<S>(store: &S, caller: &AuthContext, comment_id: Uuid) -> ServiceResult<()>
where
    S: Store + ?Sized,
{
    let comment = store
        .delete_comment(comment_id)
        .await?
        .ok_or(ServiceError::NotFound("Comment"))?;

    store.clear_comment_reference(comment_id).await?;

    info!(
        comment_id = %comment_id,
        task_id = %comment.task_id,
        deleted_by = %caller.user_id,
        "Comment deleted"
    );

    Ok(())
}

/// All comments, or one task's, with authors resolved
///
/// The unscoped listing also labels each comment with its task. Scoping to
/// a task that does not exist is `NotFound`.
pub async fn list_comments<S>(store: &S, task_id: Option<Uuid>) -> ServiceResult<Vec<CommentView>>
where
    S: Store + ?Sized,
{
    if let Some(task_id) = task_id {
        if store.find_task(task_id).await?.is_none() {
            return Err(ServiceError::NotFound("Task"));
        }
    }

    let comments = store.list_comments(task_id).await?;

    let mut views = Vec::with_capacity(comments.len());
    for comment in comments {
        let owner = match task_id {
            Some(_) => None,
            None => store.find_task(comment.task_id).await?,
        };
        views.push(comment_view(store, comment).await?.with_task(owner.as_ref()));
    }

    Ok(views)
}
