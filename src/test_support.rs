//! Shared helpers for client tests: an in-process fake backend.

use crate::api::ApiClient;
use crate::config::ApiConfig;
use crate::session::SessionStore;

/// Serve `router` on an ephemeral local port; returns the API base URL
pub(crate) async fn spawn_backend(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}/api")
}

/// A base URL nothing is listening on
pub(crate) async fn unused_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}

pub(crate) fn client_for(base_url: &str, session: SessionStore) -> ApiClient {
    let config = ApiConfig {
        with_credentials: false,
        ..ApiConfig::new(base_url)
    };
    ApiClient::new(config, session).unwrap()
}
