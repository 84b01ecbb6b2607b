//! Backend API layer
//!
//! [`ApiClient`] owns the HTTP connection pool, the base URL and a handle to
//! the session. Entity wrappers in [`crate::resources`] build on it.
//!
//! # Example
//!
//! ```rust,no_run
//! use moraledu::api::ApiClient;
//! use moraledu::config::ApiConfig;
//! use moraledu::session::{self, LoginCredentials, SessionStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = SessionStore::file("/tmp/moraledu-session.toml");
//!     let client = ApiClient::new(ApiConfig::default(), session)?;
//!
//!     session::login(&client, &LoginCredentials::new("admin", "secret")).await?;
//!     let grades = moraledu::resources::grades::list(&client).await?;
//!     println!("{} grades", grades.len());
//!     Ok(())
//! }
//! ```

mod client;
mod error;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult, ErrorKind};
