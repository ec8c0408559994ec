/// HTTP client for the Taskboard API
///
/// Wraps `reqwest` and the [`Session`]: login and register store the issued
/// token, every other call sends it as a bearer header. Responses are
/// decoded into the shared model types; error bodies become
/// [`ClientError::Api`].

use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use taskboard_shared::{
    models::{
        comment::CommentView,
        task::{TaskStatus, TaskView},
        user::{PublicUser, Role},
    },
    services::accounts::AuthResponse,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    board::KanbanBoard,
    error::{ClientError, ClientResult},
    session::Session,
};

/// `GET /api/tasks` filters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Uuid>,
}

/// Registration form
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Uuid>,
}

/// Partial task update; unset fields are left out of the body
///
/// `assigned_to: Some(None)` sends `"assignedTo": null`, which clears the
/// assignee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Option<Uuid>>,
}

/// `GET /health` body
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub store: String,
    pub database: String,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Serialize)]
struct CommentBody<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Taskboard API client
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Creates a client for the server at `base_url` (e.g. `http://localhost:5000`)
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        Self::with_http(reqwest::Client::new(), base_url, session)
    }

    /// Creates a client reusing an existing `reqwest::Client`
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>, session: Session) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn health(&self) -> ClientResult<HealthStatus> {
        let url = format!("{}/health", self.base_url);
        decode(self.http.get(url).send().await?).await
    }

    /// Registers an account and signs in as it
    pub async fn register(&mut self, account: &NewAccount) -> ClientResult<PublicUser> {
        let response: AuthResponse = decode(
            self.request(Method::POST, "/auth/register")
                .json(account)
                .send()
                .await?,
        )
        .await?;

        self.session.sign_in(response.token)?;
        info!(user_id = %response.user.id, "Registered");
        Ok(response.user)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<PublicUser> {
        let response: AuthResponse = decode(
            self.request(Method::POST, "/auth/login")
                .json(&Credentials { email, password })
                .send()
                .await?,
        )
        .await?;

        self.session.sign_in(response.token)?;
        info!(user_id = %response.user.id, "Logged in");
        Ok(response.user)
    }

    /// Clears the session locally; tokens are stateless, so there is no
    /// server call
    pub fn logout(&mut self) -> ClientResult<()> {
        self.session.sign_out()
    }

    pub async fn list_tasks(&self, query: &TaskQuery) -> ClientResult<Vec<TaskView>> {
        self.call(self.authed(Method::GET, "/tasks")?.query(query)).await
    }

    pub async fn create_task(&self, task: &NewTask) -> ClientResult<TaskView> {
        self.call(self.authed(Method::POST, "/tasks")?.json(task)).await
    }

    pub async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> ClientResult<TaskView> {
        self.call(self.authed(Method::PUT, &format!("/tasks/{}", id))?.json(patch))
            .await
    }

    /// Returns the server's confirmation message
    pub async fn delete_task(&self, id: Uuid) -> ClientResult<String> {
        let body: MessageBody = self
            .call(self.authed(Method::DELETE, &format!("/tasks/{}", id))?)
            .await?;
        Ok(body.message)
    }

    pub async fn task_comments(&self, task_id: Uuid) -> ClientResult<Vec<CommentView>> {
        self.call(self.authed(Method::GET, &format!("/tasks/{}/comments", task_id))?)
            .await
    }

    /// Creates the task's comment, or edits it if one exists
    pub async fn upsert_comment(&self, task_id: Uuid, text: &str) -> ClientResult<CommentView> {
        self.call(
            self.authed(Method::POST, &format!("/tasks/{}/comments", task_id))?
                .json(&CommentBody { text }),
        )
        .await
    }

    pub async fn list_comments(&self) -> ClientResult<Vec<CommentView>> {
        self.call(self.authed(Method::GET, "/comments")?).await
    }

    pub async fn update_comment(&self, id: Uuid, text: &str) -> ClientResult<CommentView> {
        self.call(
            self.authed(Method::PUT, &format!("/comments/{}", id))?
                .json(&CommentBody { text }),
        )
        .await
    }

    pub async fn delete_comment(&self, id: Uuid) -> ClientResult<String> {
        let body: MessageBody = self
            .call(self.authed(Method::DELETE, &format!("/comments/{}", id))?)
            .await?;
        Ok(body.message)
    }

    pub async fn list_users(&self) -> ClientResult<Vec<PublicUser>> {
        self.call(self.authed(Method::GET, "/users")?).await
    }

    /// Fetches tasks and lays them out as a board
    pub async fn load_board(&self, query: &TaskQuery) -> ClientResult<KanbanBoard> {
        Ok(KanbanBoard::new(self.list_tasks(query).await?))
    }

    /// Drags a card to another column
    ///
    /// The board changes first; the status-only update follows. If the
    /// server refuses, the card goes back. Returns `false` when nothing
    /// moved.
    pub async fn move_card(
        &self,
        board: &mut KanbanBoard,
        task_id: Uuid,
        to: TaskStatus,
    ) -> ClientResult<bool> {
        let Some((mv, patch)) = board.move_task(task_id, to) else {
            return Ok(false);
        };

        match self.update_task(task_id, &patch).await {
            Ok(task) => {
                board.replace(task);
                Ok(true)
            }
            Err(e) => {
                board.undo(mv);
                Err(e)
            }
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/api{}", self.base_url, path);
        debug!(%method, %url, "Request");
        let builder = self.http.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn authed(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        if !self.session.is_signed_in() {
            return Err(ClientError::NotSignedIn);
        }
        Ok(self.request(method, path))
    }

    async fn call<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        decode(builder.send().await?).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.bytes().await?;
    let err = ClientError::from_response(status, &body);
    debug!(%status, error = %err, "Request failed");
    Err(err)
}
