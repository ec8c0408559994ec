/// User listing
///
/// `GET /api/users` returns every account without password hashes; the
/// board uses it to fill assignee pickers.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use taskboard_shared::{models::user::PublicUser, services::accounts};

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<PublicUser>>> {
    Ok(Json(accounts::list_users(state.store.as_ref()).await?))
}
