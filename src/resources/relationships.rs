//! `student-parent-relationships/` endpoints

use crate::api::{ApiClient, ApiResult};
use crate::model::{Id, StudentParentRelationship};
use serde_json::json;

const PATH: &str = "student-parent-relationships/";

pub async fn list(client: &ApiClient) -> ApiResult<Vec<StudentParentRelationship>> {
    client.get_json(PATH).await.inspect_err(
        |e| tracing::error!(error = %e, "Failed to fetch student-parent relationships"),
    )
}

pub async fn create(
    client: &ApiClient,
    student: Id,
    parent: Id,
) -> ApiResult<StudentParentRelationship> {
    client
        .post_json(PATH, &json!({ "student": student, "parent": parent }))
        .await
        .inspect_err(|e| {
            tracing::error!(student, parent, error = %e, "Failed to create student-parent relationship")
        })
}

pub async fn delete(client: &ApiClient, id: Id) -> ApiResult<()> {
    client
        .delete(&format!("{PATH}{id}/"))
        .await
        .inspect_err(|e| tracing::error!(relationship_id = id, error = %e, "Failed to delete relationship"))
}

/// Link a parent through the backend's dedicated action; the response shape
/// is not fixed, so it comes back as raw JSON
pub async fn assign_parent(
    client: &ApiClient,
    student: Id,
    parent: Id,
) -> ApiResult<serde_json::Value> {
    client
        .post_json(
            &format!("{PATH}assign_parent/"),
            &json!({ "student_id": student, "parent_id": parent }),
        )
        .await
        .inspect_err(|e| tracing::error!(student, parent, error = %e, "Failed to assign parent"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;
    use crate::test_support::{client_for, spawn_backend};
    use axum::{routing::post, Json, Router};
    use serde_json::Value;

    #[tokio::test]
    async fn test_assign_parent_body() {
        let router = Router::new().route(
            "/api/student-parent-relationships/assign_parent/",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "received": body }))
            }),
        );
        let base_url = spawn_backend(router).await;
        let client = client_for(&base_url, SessionStore::in_memory());

        let response = assign_parent(&client, 7, 20).await.unwrap();
        assert_eq!(response["received"], json!({ "student_id": 7, "parent_id": 20 }));
    }

    #[tokio::test]
    async fn test_create_body_uses_plain_ids() {
        let router = Router::new().route(
            "/api/student-parent-relationships/",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "id": 1,
                    "student": body["student"],
                    "parent": body["parent"],
                    "parent_username": "mrchen"
                }))
            }),
        );
        let base_url = spawn_backend(router).await;
        let client = client_for(&base_url, SessionStore::in_memory());

        let link = create(&client, 7, 20).await.unwrap();
        assert_eq!((link.student, link.parent), (7, 20));
        assert_eq!(link.parent_username.as_deref(), Some("mrchen"));
    }
}
