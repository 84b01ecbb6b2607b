//! `awards/` endpoints

use crate::api::{ApiClient, ApiResult};
use crate::model::{Award, AwardDraft, AwardFilter, Id};

pub async fn list(client: &ApiClient, filter: &AwardFilter) -> ApiResult<Vec<Award>> {
    client
        .get_json_with("awards/", filter)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch awards"))
}

pub async fn create(client: &ApiClient, draft: &AwardDraft) -> ApiResult<Award> {
    client
        .post_json("awards/", draft)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to create award"))
}

pub async fn update(client: &ApiClient, id: Id, draft: &AwardDraft) -> ApiResult<Award> {
    client
        .put_json(&format!("awards/{id}/"), draft)
        .await
        .inspect_err(|e| tracing::error!(award_id = id, error = %e, "Failed to update award"))
}

pub async fn delete(client: &ApiClient, id: Id) -> ApiResult<()> {
    client
        .delete(&format!("awards/{id}/"))
        .await
        .inspect_err(|e| tracing::error!(award_id = id, error = %e, "Failed to delete award"))
}
