//! # Taskboard Client Library
//!
//! Typed client for the Taskboard API plus the view state a front end needs:
//! the signed-in session, the kanban board and task table pagination.
//!
//! ## Modules
//!
//! - `api`: HTTP client for every API endpoint
//! - `session`: Token held in memory and in a single persisted slot
//! - `board`: Tasks grouped into status columns
//! - `pagination`: Fixed-size, 1-based paging for the task table
//! - `error`: Client error type and user-facing messages
//!
//! ## Example
//!
//! ```no_run
//! use taskboard_client::{api::ApiClient, session::Session};
//!
//! # async fn example() -> Result<(), taskboard_client::error::ClientError> {
//! let session = Session::open("/tmp/taskboard-session.json")?;
//! let mut client = ApiClient::new("http://localhost:5000", session);
//! client.login("ada@example.com", "analytical").await?;
//!
//! let query = client.session().task_query(None, None);
//! let tasks = client.list_tasks(&query).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod board;
pub mod error;
pub mod pagination;
pub mod session;
