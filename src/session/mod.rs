//! Session Store
//!
//! Single source of truth for the current authentication token. The token is
//! read synchronously from an injected [`TokenStore`] on every request; no
//! server round-trip is needed to read it and the client never validates it.
//!
//! ## States
//!
//! - `Anonymous`: no token stored
//! - `Authenticated`: a token is stored
//!
//! A successful [`login`] persists the returned token (replacing any previous
//! one). A failed login clears whatever was stored before. [`SessionStore::logout`]
//! clears unconditionally and never calls the server.

mod store;

pub use store::{FileTokenStore, MemoryTokenStore, StorageError, TokenStore};

use crate::api::{ApiClient, ApiResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Fixed storage key the token is persisted under
pub const TOKEN_KEY: &str = "authToken";

/// Opaque bearer credential issued by the backend at login
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn header_value(&self) -> String {
        format!("Token {}", self.0)
    }

    /// First few characters, safe to put in logs
    pub fn masked(&self) -> String {
        let prefix: String = self.0.chars().take(5).collect();
        format!("{prefix}...")
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&self.masked()).finish()
    }
}

/// Client-side authentication state, derived solely from token presence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

/// Username/password pair sent to the token endpoint
#[derive(Clone, Serialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Handle to the persisted session. Cheap to clone; clones share storage.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn TokenStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Session backed by process memory only
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    /// Session backed by a file on disk
    pub fn file(path: impl Into<std::path::PathBuf>) -> Self {
        Self::new(Arc::new(FileTokenStore::new(path)))
    }

    /// Current token, if any. Never mutates the session.
    ///
    /// An unreadable store is reported and treated as anonymous.
    pub fn get_token(&self) -> Option<Token> {
        match self.store.read(TOKEN_KEY) {
            Ok(value) => value.filter(|v| !v.is_empty()).map(Token),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session token");
                None
            }
        }
    }

    pub fn state(&self) -> SessionState {
        if self.get_token().is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    /// Persist a token, replacing any previous one
    pub fn persist(&self, token: &Token) -> Result<(), StorageError> {
        self.store.write(TOKEN_KEY, token.as_str())
    }

    /// Remove the token. Idempotent; no server call is made.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.store.clear(TOKEN_KEY)?;
        tracing::info!("User logged out, token removed");
        Ok(())
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.state())
            .finish()
    }
}

/// Exchange credentials for a token and persist it in the client's session.
///
/// On failure any previously stored token is cleared before the error is
/// returned, so a rejected login always leaves the session anonymous.
pub async fn login(client: &ApiClient, credentials: &LoginCredentials) -> ApiResult<Token> {
    let session = client.session();

    let result = client
        .post_json::<TokenResponse, _>("api-token-auth/", credentials)
        .await;

    match result {
        Ok(response) => {
            let token = Token(response.token);
            session.persist(&token)?;
            tracing::info!(username = %credentials.username, token = %token.masked(), "Login succeeded");
            Ok(token)
        }
        Err(e) => {
            tracing::error!(username = %credentials.username, error = %e, "Error during login");
            if let Err(clear_err) = session.store.clear(TOKEN_KEY) {
                tracing::warn!(error = %clear_err, "Failed to clear token after failed login");
            }
            Err(e)
        }
    }
}
