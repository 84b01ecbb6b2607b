//! # moraledu
//!
//! Client core for the Moral Education Platform: a typed REST client for the
//! school's behavior-tracking backend, the session that authenticates it,
//! and the application shell that gates everything behind that session.
//!
//! ## Features
//!
//! - **Token auth**: `Authorization: Token <value>` read from the session on every request
//! - **Durable session**: token persisted under a fixed key, in memory or on disk
//! - **Typed wrappers**: one function per endpoint, errors passed through untouched
//! - **Shell**: 401 on the protected fetch logs out, other failures keep the session
//! - **Dashboards**: concurrent section loading and chart-ready reshaping
//!
//! ## Modules
//!
//! - [`api`]: HTTP client and error types
//! - [`session`]: token storage, login and logout
//! - [`shell`]: top-level authentication gate
//! - [`resources`]: entity wrappers
//! - [`model`]: server records and drafts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use moraledu::{session, ApiClient, AppShell, Config, LoginCredentials, SessionStore, View};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let session = SessionStore::file(&config.session.file);
//!     let client = ApiClient::new(config.api.clone(), session.clone())?;
//!
//!     if !session.is_authenticated() {
//!         session::login(&client, &LoginCredentials::new("admin", "secret")).await?;
//!     }
//!
//!     let mut shell = AppShell::new(client, session);
//!     if let View::Authenticated(view) = shell.mount().await {
//!         println!("Signed in as {:?}", view.user.as_ref().map(|u| &u.username));
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod charts;
pub mod config;
pub mod csv_io;
pub mod forms;
pub mod logging;
pub mod model;
pub mod requests;
pub mod resources;
pub mod sections;
pub mod session;
pub mod shell;

#[cfg(test)]
mod test_support;

// Re-export top-level types for convenience
pub use api::{ApiClient, ApiError, ApiResult, ErrorKind};

pub use session::{
    FileTokenStore, LoginCredentials, MemoryTokenStore, SessionState, SessionStore, StorageError,
    Token, TokenStore, TOKEN_KEY,
};

pub use shell::{AppShell, Area, AuthenticatedView, Authenticator, View};

pub use config::{ApiConfig, Config, ConfigError, LogFormat, LoggingConfig, SessionConfig};

pub use forms::{submit, Validate, ValidationErrors};

pub use requests::RequestSlots;

pub use sections::{DashboardSnapshot, Section};

pub use model::{Id, Role, User};
