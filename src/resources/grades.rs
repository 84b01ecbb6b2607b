//! `grades/` endpoints

use crate::api::{ApiClient, ApiResult};
use crate::model::{Grade, GradeDraft, Id};

pub async fn list(client: &ApiClient) -> ApiResult<Vec<Grade>> {
    client
        .get_json("grades/")
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch grades"))
}

pub async fn create(client: &ApiClient, draft: &GradeDraft) -> ApiResult<Grade> {
    client
        .post_json("grades/", draft)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to create grade"))
}

pub async fn update(client: &ApiClient, id: Id, draft: &GradeDraft) -> ApiResult<Grade> {
    client
        .put_json(&format!("grades/{id}/"), draft)
        .await
        .inspect_err(|e| tracing::error!(grade_id = id, error = %e, "Failed to update grade"))
}

pub async fn delete(client: &ApiClient, id: Id) -> ApiResult<()> {
    client
        .delete(&format!("grades/{id}/"))
        .await
        .inspect_err(|e| tracing::error!(grade_id = id, error = %e, "Failed to delete grade"))
}
