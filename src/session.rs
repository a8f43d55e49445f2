//! Persisted login session: bearer token plus the cached user profile.
//!
//! Stored as JSON in the user config directory, written on login and
//! invite acceptance, removed on logout. There is no refresh or rotation;
//! when the server rejects the token the user logs in again.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::User;

const SESSION_FILE: &str = "session.json";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file is corrupt: {0}")]
    Json(#[from] serde_json::Error),

    #[error("not logged in")]
    NotLoggedIn,
}

/// A stored credential and the profile it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

pub fn session_path(config_dir: &Path) -> PathBuf {
    config_dir.join(SESSION_FILE)
}

pub fn load_session(config_dir: &Path) -> Result<Session, SessionError> {
    let path = session_path(config_dir);
    if !path.exists() {
        return Err(SessionError::NotLoggedIn);
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_session(config_dir: &Path, session: &Session) -> Result<(), SessionError> {
    fs::create_dir_all(config_dir)?;
    let content = serde_json::to_string_pretty(session)?;
    fs::write(session_path(config_dir), content)?;
    Ok(())
}

/// Remove the stored session. Absent file counts as logged out already.
pub fn clear_session(config_dir: &Path) -> Result<(), SessionError> {
    let path = session_path(config_dir);
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Platform config directory for this client.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("kanri"))
}
