//! Entity Wrappers
//!
//! One async function per backend endpoint. Each performs exactly one HTTP
//! call through [`ApiClient`](crate::api::ApiClient), logs a failure with
//! `tracing::error!`, and hands back the original [`ApiError`](crate::api::ApiError)
//! untranslated. Paths are relative to the base URL and keep the backend's
//! trailing slash.

pub mod awards;
pub mod classes;
pub mod grades;
pub mod notifications;
pub mod observations;
pub mod relationships;
pub mod reports;
pub mod rules;
pub mod scores;
pub mod self_reports;
pub mod users;

/// Empty query string for endpoints that take no parameters
pub(crate) const NO_QUERY: &[(&str, &str)] = &[];
