//! Backend REST API Client
//!
//! One configured HTTP client shared by every entity wrapper. Before each
//! request the current token is read from the session and, when present,
//! sent as `Authorization: Token <value>`.
//!
//! Each call is a single attempt. There is no retry, queueing or
//! deduplication here; non-2xx responses come back as
//! [`ApiError::Status`] with the body untouched.

use super::error::{ApiError, ApiResult};
use crate::config::ApiConfig;
use crate::session::SessionStore;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Backend API client
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
    session: SessionStore,
}

impl ApiClient {
    /// Create a client for the configured backend, reading tokens from `session`
    pub fn new(config: ApiConfig, session: SessionStore) -> ApiResult<Self> {
        let mut builder = Client::builder().cookie_store(config.with_credentials);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            config,
            session,
        })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// The session tokens are read from
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Absolute URL for a path relative to the base URL
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Start a request with the auth header attached when a token exists
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));

        match self.session.get_token() {
            Some(token) => {
                tracing::trace!(token = %token.masked(), "Attaching auth token");
                builder.header(AUTHORIZATION, token.header_value())
            }
            None => builder,
        }
    }

    /// Send a prepared request; non-2xx statuses become errors
    pub async fn execute(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let request = builder.build()?;
        let request_id = Uuid::new_v4();
        let method = request.method().clone();
        let path = request.url().path().to_string();

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            "Sending request"
        );

        let response = self.http.execute(request).await?;
        let status = response.status();

        if status.is_success() {
            tracing::debug!(request_id = %request_id, status = status.as_u16(), "Request succeeded");
            Ok(response)
        } else {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(request_id = %request_id, error = %e, "Failed to read error body");
                    String::new()
                }
            };
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = status.as_u16(),
                "Request rejected"
            );
            Err(ApiError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// GET a JSON resource
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.execute(self.request(Method::GET, path)).await?;
        Self::decode(response).await
    }

    /// GET a JSON resource with query parameters
    pub async fn get_json_with<T, Q>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .execute(self.request(Method::GET, path).query(query))
            .await?;
        Self::decode(response).await
    }

    /// Send a JSON body and decode a JSON response
    pub async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.execute(self.request(method, path).json(body)).await?;
        Self::decode(response).await
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::POST, path, body).await
    }

    pub async fn put_json<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::PUT, path, body).await
    }

    pub async fn patch_json<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::PATCH, path, body).await
    }

    /// Send a JSON body and ignore whatever the server answers with
    pub async fn send_discard<B>(&self, method: Method, path: &str, body: &B) -> ApiResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.execute(self.request(method, path).json(body)).await?;
        Ok(())
    }

    /// DELETE a resource
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.execute(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    /// GET a binary payload (CSV exports)
    pub async fn get_bytes<Q>(&self, path: &str, query: &Q) -> ApiResult<Vec<u8>>
    where
        Q: Serialize + ?Sized,
    {
        let response = self
            .execute(self.request(Method::GET, path).query(query))
            .await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// POST a multipart form (CSV imports)
    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> ApiResult<T> {
        let response = self
            .execute(self.request(Method::POST, path).multipart(form))
            .await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorKind;
    use crate::session::Token;
    use crate::test_support::{client_for, spawn_backend, unused_base_url};
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::{delete, get},
        Json, Router,
    };
    use serde_json::json;

    fn echo_auth_backend() -> Router {
        Router::new().route(
            "/api/echo/",
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                Json(json!({ "authorization": auth }))
            }),
        )
    }

    #[test]
    fn test_url_joining() {
        let client = client_for("http://127.0.0.1:8000/api/", SessionStore::in_memory());
        assert_eq!(client.url("users/"), "http://127.0.0.1:8000/api/users/");
        assert_eq!(client.url("/grades/3/"), "http://127.0.0.1:8000/api/grades/3/");
    }

    #[test]
    fn test_request_carries_token_when_present() {
        let session = SessionStore::in_memory();
        session.persist(&Token::new("abc123")).unwrap();
        let client = client_for("http://127.0.0.1:8000/api", session);

        let request = client.request(Method::GET, "users/").build().unwrap();
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Token abc123"
        );
    }

    #[test]
    fn test_request_omits_header_when_anonymous() {
        let client = client_for("http://127.0.0.1:8000/api", SessionStore::in_memory());

        let request = client
            .request(Method::POST, "api-token-auth/")
            .build()
            .unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_reading_token_does_not_mutate_session() {
        let session = SessionStore::in_memory();
        session.persist(&Token::new("abc123")).unwrap();
        let client = client_for("http://127.0.0.1:8000/api", session.clone());

        for _ in 0..3 {
            let _ = client.request(Method::GET, "users/").build().unwrap();
        }
        assert_eq!(session.get_token().unwrap().as_str(), "abc123");
    }

    #[tokio::test]
    async fn test_token_read_at_call_time() {
        let base_url = spawn_backend(echo_auth_backend()).await;
        let session = SessionStore::in_memory();
        let client = client_for(&base_url, session.clone());

        let before: serde_json::Value = client.get_json("echo/").await.unwrap();
        assert!(before["authorization"].is_null());

        session.persist(&Token::new("abc123")).unwrap();
        let after: serde_json::Value = client.get_json("echo/").await.unwrap();
        assert_eq!(after["authorization"], "Token abc123");
    }

    #[tokio::test]
    async fn test_error_status_and_body_untouched() {
        let router = Router::new().route(
            "/api/grades/9/",
            delete(|| async { (StatusCode::NOT_FOUND, r#"{"detail":"Not found."}"#) }),
        );
        let base_url = spawn_backend(router).await;
        let client = client_for(&base_url, SessionStore::in_memory());

        let err = client.delete("grades/9/").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), Some(r#"{"detail":"Not found."}"#));
    }

    #[tokio::test]
    async fn test_unreadable_error_body_keeps_status() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        // Promise a longer body than is sent, then hang up
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            socket
                .write_all(b"HTTP/1.1 503 Service Unavailable\r\ncontent-length: 100\r\n\r\npartial")
                .await
                .unwrap();
        });

        let client = client_for(&format!("http://{addr}/api"), SessionStore::in_memory());
        let err = client.get_json::<serde_json::Value>("grades/").await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.body(), Some(""));
    }

    #[tokio::test]
    async fn test_decode_error() {
        let router = Router::new().route("/api/grades/", get(|| async { "not json" }));
        let base_url = spawn_backend(router).await;
        let client = client_for(&base_url, SessionStore::in_memory());

        let err = client
            .get_json::<Vec<serde_json::Value>>("grades/")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let client = client_for(&unused_base_url().await, SessionStore::in_memory());

        let err = client.get_json::<serde_json::Value>("users/me/").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(err.status(), None);
    }
}
