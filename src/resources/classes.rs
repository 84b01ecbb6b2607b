//! `schoolclasses/` endpoints

use crate::api::{ApiClient, ApiResult};
use crate::model::{ClassDraft, Id, SchoolClass};

pub async fn list(client: &ApiClient) -> ApiResult<Vec<SchoolClass>> {
    client
        .get_json("schoolclasses/")
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch school classes"))
}

pub async fn create(client: &ApiClient, draft: &ClassDraft) -> ApiResult<SchoolClass> {
    client
        .post_json("schoolclasses/", draft)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to create school class"))
}

pub async fn update(client: &ApiClient, id: Id, draft: &ClassDraft) -> ApiResult<SchoolClass> {
    client
        .put_json(&format!("schoolclasses/{id}/"), draft)
        .await
        .inspect_err(|e| tracing::error!(class_id = id, error = %e, "Failed to update school class"))
}

pub async fn delete(client: &ApiClient, id: Id) -> ApiResult<()> {
    client
        .delete(&format!("schoolclasses/{id}/"))
        .await
        .inspect_err(|e| tracing::error!(class_id = id, error = %e, "Failed to delete school class"))
}
