/// End-to-end tests for the Taskboard client
///
/// Each test starts the real API router on an ephemeral port, backed by the
/// in-memory store, and drives it through `ApiClient` over HTTP.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::StatusCode;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_client::api::{ApiClient, NewAccount, NewTask, TaskQuery};
use taskboard_client::error::ClientError;
use taskboard_client::pagination::Paginator;
use taskboard_client::session::Session;
use taskboard_shared::models::task::TaskStatus;
use taskboard_shared::models::user::Role;
use taskboard_shared::services::accounts::{self, Registration};
use taskboard_shared::store::memory::MemoryStore;
use tempfile::TempDir;

const SECRET: &str = "client-e2e-secret-at-least-32-bytes-long";
const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin-password";

struct TestServer {
    base_url: String,
    dir: TempDir,
}

impl TestServer {
    /// Starts a server with one admin account already registered
    async fn start() -> Self {
        let vars: HashMap<&str, &str> =
            [("STORE_BACKEND", "memory"), ("JWT_SECRET", SECRET)].into_iter().collect();
        let config = Config::from_lookup(move |key: &str| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        let store = Arc::new(MemoryStore::new());
        accounts::register(
            store.as_ref(),
            &config.auth_settings(),
            Registration {
                first_name: "Admin".to_string(),
                last_name: "User".to_string(),
                email: ADMIN_EMAIL.to_string(),
                phone: None,
                password: ADMIN_PASSWORD.to_string(),
                role: Role::Admin,
            },
        )
        .await
        .unwrap();

        let app = build_router(AppState::new(store, config));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer {
            base_url: format!("http://{}", addr),
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Client with its own session slot
    fn client(&self, name: &str) -> ApiClient {
        let session = Session::open(self.dir.path().join(format!("{}.json", name))).unwrap();
        ApiClient::new(&self.base_url, session)
    }
}

fn account(name: &str) -> NewAccount {
    NewAccount {
        first_name: name.to_string(),
        last_name: "Example".to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: None,
        password: "a-long-enough-password".to_string(),
        role: None,
    }
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;
    let health = server.client("anon").health().await.unwrap();

    assert_eq!(health.status, "healthy");
    assert_eq!(health.store, "memory");
}

#[tokio::test]
async fn test_full_flow() {
    let server = TestServer::start().await;

    // Register A, then log in again from a fresh client
    let mut a = server.client("a");
    let registered = a.register(&account("Alice")).await.unwrap();
    assert_eq!(registered.role, Role::User);

    let mut a = server.client("a2");
    let me = a.login("alice@example.com", "a-long-enough-password").await.unwrap();
    assert_eq!(a.session().user_id(), Some(me.id));
    assert!(!a.session().is_admin());

    // Admin creates a task for A plus one for nobody
    let mut admin = server.client("admin");
    admin.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
    assert!(admin.session().is_admin());

    let task = admin
        .create_task(&NewTask {
            title: "Write the report".to_string(),
            assigned_to: Some(me.id),
            ..Default::default()
        })
        .await
        .unwrap();
    admin
        .create_task(&NewTask {
            title: "Someone else's".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    // A's session query is scoped to A, even when asking for everyone
    let query = a.session().task_query(None, None);
    let mine = a.list_tasks(&query).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, task.id);

    // A comments, then re-comments in place
    let first = a.upsert_comment(task.id, "Started").await.unwrap();
    let second = a.upsert_comment(task.id, "Half done").await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(a.task_comments(task.id).await.unwrap().len(), 1);

    // Admin deletes the task; its comment list is gone
    let message = admin.delete_task(task.id).await.unwrap();
    assert_eq!(message, "Task deleted");

    let err = a.task_comments(task.id).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(err.user_message(), "Task not found");
}

#[tokio::test]
async fn test_board_move_updates_server() {
    let server = TestServer::start().await;
    let mut admin = server.client("admin");
    admin.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();

    let task = admin
        .create_task(&NewTask {
            title: "Drag me".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let mut board = admin.load_board(&TaskQuery::default()).await.unwrap();
    assert_eq!(board.column(TaskStatus::Todo).len(), 1);

    let moved = admin
        .move_card(&mut board, task.id, TaskStatus::InProgress)
        .await
        .unwrap();
    assert!(moved);
    assert!(board.column(TaskStatus::Todo).is_empty());

    let query = TaskQuery {
        status: Some(TaskStatus::InProgress),
        ..Default::default()
    };
    let remote = admin.list_tasks(&query).await.unwrap();
    assert_eq!(remote.len(), 1);
    assert_eq!(remote[0].title, "Drag me");
}

#[tokio::test]
async fn test_refused_move_is_undone() {
    let server = TestServer::start().await;
    let mut admin = server.client("admin");
    admin.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
    admin
        .create_task(&NewTask {
            title: "Not assigned to bob".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let mut bob = server.client("bob");
    bob.register(&account("Bob")).await.unwrap();

    // Bob sees the unfiltered list but may not move a task he doesn't own
    let mut board = bob.load_board(&TaskQuery::default()).await.unwrap();
    let id = board.column(TaskStatus::Todo)[0].id;

    let err = bob
        .move_card(&mut board, id, TaskStatus::Done)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    assert_eq!(board.column(TaskStatus::Todo).len(), 1);
    assert!(board.column(TaskStatus::Done).is_empty());
}

#[tokio::test]
async fn test_errors_surface_server_messages() {
    let server = TestServer::start().await;
    let mut client = server.client("c");

    let err = client.login("nobody@example.com", "whatever-password").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { .. }));
    assert_eq!(err.user_message(), "Invalid email or password");

    client.register(&account("Carol")).await.unwrap();
    let err = client
        .create_task(&NewTask {
            title: "Nope".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    assert_eq!(err.user_message(), "Admin access required");

    let mut dup = server.client("dup");
    let err = dup.register(&account("Carol")).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::CONFLICT));
}

#[tokio::test]
async fn test_session_survives_restart_and_logout() {
    let server = TestServer::start().await;
    let mut client = server.client("persist");
    client.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();

    // Same slot, new process
    let mut restarted = server.client("persist");
    assert!(restarted.session().is_admin());
    assert_eq!(restarted.list_users().await.unwrap().len(), 1);

    restarted.logout().unwrap();
    assert!(matches!(
        restarted.list_users().await,
        Err(ClientError::NotSignedIn)
    ));
    assert!(!server.client("persist").session().is_signed_in());
}

#[tokio::test]
async fn test_paging_the_task_table() {
    let server = TestServer::start().await;
    let mut admin = server.client("admin");
    admin.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();

    for i in 0..7 {
        admin
            .create_task(&NewTask {
                title: format!("task {}", i),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let tasks = admin.list_tasks(&TaskQuery::default()).await.unwrap();
    let pager = Paginator::default();
    assert_eq!(pager.total_pages(tasks.len()), 2);
    assert_eq!(pager.page(&tasks, 1).len(), 5);
    assert_eq!(pager.page(&tasks, 2).len(), 2);
    assert_eq!(pager.page(&tasks, 9).len(), 2);
}
