//! Signed-in session
//!
//! Holds the bearer token in memory and mirrors it to a single persisted
//! slot (a small JSON file) so a restarted client stays signed in.
//!
//! # Claims
//!
//! The token payload is decoded *without* verifying the signature. Decoded
//! claims only decide what to display (admin controls, the default task
//! filter); the server re-checks the token and the role on every request.
//!
//! # File Format
//!
//! ```json
//! { "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..." }
//! ```
//!
//! On Unix the slot is written with 0600 permissions.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use taskboard_shared::auth::jwt::{decode_unverified, Claims};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::TaskQuery;
use crate::error::ClientResult;
use taskboard_shared::models::task::TaskStatus;

#[derive(Debug, Serialize, Deserialize)]
struct SessionSlot {
    token: String,
}

/// Client session
#[derive(Debug)]
pub struct Session {
    token: Option<String>,
    slot: PathBuf,
}

impl Session {
    /// Opens the session persisted at `slot`, or an empty one if the file
    /// does not exist yet
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or parsed.
    pub fn open(slot: impl Into<PathBuf>) -> ClientResult<Self> {
        let slot = slot.into();
        let token = match fs::read_to_string(&slot) {
            Ok(contents) => {
                let stored: SessionSlot = serde_json::from_str(&contents)?;
                debug!(path = %slot.display(), "Loaded session");
                Some(stored.token)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        Ok(Self { token, slot })
    }

    /// Where the token is persisted
    pub fn slot(&self) -> &Path {
        &self.slot
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    /// Stores a freshly issued token in memory and in the slot
    pub fn sign_in(&mut self, token: impl Into<String>) -> ClientResult<()> {
        let token = token.into();
        write_slot(&self.slot, &SessionSlot { token: token.clone() })?;
        self.token = Some(token);
        debug!(path = %self.slot.display(), "Session saved");
        Ok(())
    }

    /// Forgets the token and removes the slot
    pub fn sign_out(&mut self) -> ClientResult<()> {
        self.token = None;
        match fs::remove_file(&self.slot) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Decoded token payload, for display only
    ///
    /// Returns `None` when signed out or when the token is not a
    /// well-formed JWT. An expired token still decodes; the server will
    /// reject it on the next request.
    pub fn claims(&self) -> Option<Claims> {
        let token = self.token.as_deref()?;
        match decode_unverified(token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                warn!(error = %e, "Stored token does not decode");
                None
            }
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.claims().map(|c| c.id)
    }

    /// Whether to show admin-only controls
    pub fn is_admin(&self) -> bool {
        self.claims().map(|c| c.is_admin()).unwrap_or(false)
    }

    /// Task list query for this session
    ///
    /// Non-admins always see their own tasks, whatever assignee was asked
    /// for. Admins may filter by any assignee, or none.
    pub fn task_query(&self, status: Option<TaskStatus>, assignee: Option<Uuid>) -> TaskQuery {
        let assigned_to = match self.claims() {
            Some(claims) if claims.is_admin() => assignee,
            Some(claims) => Some(claims.id),
            None => assignee,
        };

        TaskQuery {
            status,
            assigned_to,
        }
    }
}

fn write_slot(path: &Path, slot: &SessionSlot) -> ClientResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, serde_json::to_vec_pretty(slot)?)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}
