/// Common test utilities for integration tests
///
/// Every context gets its own in-memory store, so tests run in parallel
/// without a database and without cleanup.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::models::user::{PublicUser, Role};
use taskboard_shared::services::accounts::{self, Registration};
use taskboard_shared::store::memory::MemoryStore;
use tower::Service as _;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: axum::Router,
    pub config: Config,
    pub admin: PublicUser,
    pub admin_token: String,
    pub user: PublicUser,
    pub user_token: String,
}

/// Status plus parsed JSON body (Null when empty)
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = [
        ("STORE_BACKEND", "memory"),
        ("JWT_SECRET", TEST_SECRET),
        ("API_HOST", "127.0.0.1"),
        ("API_PORT", "0"),
    ]
    .into_iter()
    .collect();

    Config::from_lookup(move |key: &str| vars.get(key).map(|v| v.to_string()))
        .expect("test config")
}

impl TestContext {
    /// Fresh store with one admin and one regular user
    pub async fn new() -> Self {
        let config = test_config();
        let store = Arc::new(MemoryStore::new());
        let settings = config.auth_settings();

        let admin = accounts::register(store.as_ref(), &settings, registration("admin", Role::Admin))
            .await
            .expect("seed admin");
        let user = accounts::register(store.as_ref(), &settings, registration("user", Role::User))
            .await
            .expect("seed user");

        let app = build_router(AppState::new(store.clone(), config.clone()));

        TestContext {
            store,
            app,
            config,
            admin: admin.user,
            admin_token: admin.token,
            user: user.user,
            user_token: user.token,
        }
    }

    /// Sends a request; `token` becomes a bearer header, `body` a JSON body
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.call(request).await
    }

    /// Sends a prebuilt request
    pub async fn call(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("non-JSON body ({}): {}", status, String::from_utf8_lossy(&bytes))
            })
        };

        TestResponse { status, body }
    }

    pub async fn admin(&self, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
        self.send(method, uri, Some(&self.admin_token), body).await
    }

    pub async fn as_user(&self, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
        self.send(method, uri, Some(&self.user_token), body).await
    }

    /// Creates a task as admin and returns its id
    pub async fn create_task(&self, body: Value) -> String {
        let response = self.admin("POST", "/api/tasks", Some(body)).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_str().unwrap().to_string()
    }
}

fn registration(name: &str, role: Role) -> Registration {
    Registration {
        first_name: name.to_string(),
        last_name: "Tester".to_string(),
        email: format!("{}@example.com", name),
        phone: None,
        password: TEST_PASSWORD.to_string(),
        role,
    }
}
