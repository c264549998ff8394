//! Mock session store.
//!
//! Any non-empty username/password pair is accepted. The session is a single
//! JSON record `{username, token}` kept in one file, the way a browser app
//! would keep it under one local-storage key.

use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
    pub token: String,
}

/// File-backed session store.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Accepts any credentials that are non-empty after trimming and stores
    /// a fresh mock token.
    pub fn login(&self, username: &str, password: &str) -> Result<AuthUser, CatalogError> {
        let username = username.trim();
        if username.is_empty() || password.trim().is_empty() {
            return Err(CatalogError::Auth(
                "Username and password are required".to_string(),
            ));
        }
        let user = AuthUser {
            username: username.to_string(),
            token: mock_token(),
        };
        let json = serde_json::to_string(&user)?;
        std::fs::write(&self.path, json).map_err(|e| {
            CatalogError::Auth(format!(
                "failed to write session file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        tracing::info!("Signed in as {}", user.username);
        Ok(user)
    }

    /// Removes the stored session. Missing sessions are not an error.
    pub fn logout(&self) -> Result<(), CatalogError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CatalogError::Auth(format!(
                "failed to remove session file {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Returns the stored user, or `None` when the record is missing,
    /// unreadable, or has an empty username or token.
    pub fn current_user(&self) -> Option<AuthUser> {
        let stored = std::fs::read_to_string(&self.path).ok()?;
        let user: AuthUser = match serde_json::from_str(&stored) {
            Ok(user) => user,
            Err(e) => {
                tracing::debug!("Ignoring unreadable session file: {}", e);
                return None;
            }
        };
        if user.token.is_empty() || user.username.is_empty() {
            return None;
        }
        Some(user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// Returns the current user or an error suitable for refusing a
    /// protected command.
    pub fn require_user(&self) -> Result<AuthUser, CatalogError> {
        self.current_user().ok_or_else(|| {
            CatalogError::Auth("not signed in; run `catalog login` first".to_string())
        })
    }
}

/// `mock-token-{millis}-{7 base36 chars}`.
fn mock_token() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..7)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!(
        "mock-token-{}-{}",
        chrono::Utc::now().timestamp_millis(),
        suffix
    )
}
