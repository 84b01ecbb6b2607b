//! `notifications/` endpoints

use crate::api::{ApiClient, ApiResult};
use crate::model::{Id, Notification, NotificationFilter};
use reqwest::Method;
use serde_json::json;

pub async fn list(client: &ApiClient, filter: &NotificationFilter) -> ApiResult<Vec<Notification>> {
    client
        .get_json_with("notifications/", filter)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch notifications"))
}

/// Number of unread notifications, counted from one capped listing
pub async fn unread_count(client: &ApiClient) -> ApiResult<usize> {
    client
        .get_json_with::<Vec<Notification>, _>("notifications/", &NotificationFilter::unread())
        .await
        .map(|unread| unread.len())
        .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch unread notification count"))
}

pub async fn mark_read(client: &ApiClient, id: Id) -> ApiResult<()> {
    client
        .send_discard(Method::PATCH, &format!("notifications/{id}/mark-read/"), &json!({}))
        .await
        .inspect_err(|e| tracing::error!(notification_id = id, error = %e, "Failed to mark notification as read"))
}

pub async fn mark_all_read(client: &ApiClient) -> ApiResult<()> {
    client
        .send_discard(Method::POST, "notifications/mark-all-read/", &json!({}))
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to mark all notifications as read"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;
    use crate::test_support::{client_for, spawn_backend};
    use axum::{
        extract::{Path, RawQuery},
        http::StatusCode,
        routing::{get, patch, post},
        Json, Router,
    };

    fn notification(id: u64) -> serde_json::Value {
        json!({
            "id": id,
            "user": 1,
            "title": "New award",
            "message": "You received a star",
            "notification_type": "info",
            "is_read": false,
            "created_at": "2024-10-08T08:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_unread_count_asks_for_unread_only() {
        let router = Router::new().route(
            "/api/notifications/",
            get(|RawQuery(query): RawQuery| async move {
                assert_eq!(query.as_deref(), Some("is_read=false&limit=100"));
                Json(json!([notification(1), notification(2), notification(3)]))
            }),
        );
        let base_url = spawn_backend(router).await;
        let client = client_for(&base_url, SessionStore::in_memory());

        assert_eq!(unread_count(&client).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_mark_read_accepts_empty_response() {
        let router = Router::new()
            .route(
                "/api/notifications/:id/mark-read/",
                patch(|Path(id): Path<u64>| async move {
                    assert_eq!(id, 9);
                    StatusCode::NO_CONTENT
                }),
            )
            .route(
                "/api/notifications/mark-all-read/",
                post(|| async { Json(json!({ "status": "ok" })) }),
            );
        let base_url = spawn_backend(router).await;
        let client = client_for(&base_url, SessionStore::in_memory());

        mark_read(&client, 9).await.unwrap();
        mark_all_read(&client).await.unwrap();
    }
}
