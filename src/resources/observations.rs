//! `parent-observations/` endpoints

use crate::api::{ApiClient, ApiResult};
use crate::model::{Id, ObservationDraft, ObservationFilter, ParentObservation, ReviewDecision};
use serde_json::json;

pub async fn list(
    client: &ApiClient,
    filter: &ObservationFilter,
) -> ApiResult<Vec<ParentObservation>> {
    client
        .get_json_with("parent-observations/", filter)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch parent observations"))
}

pub async fn create(client: &ApiClient, draft: &ObservationDraft) -> ApiResult<ParentObservation> {
    client
        .post_json("parent-observations/", draft)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to submit parent observation"))
}

/// Approve or reject a pending observation; returns the updated record
pub async fn review(
    client: &ApiClient,
    id: Id,
    decision: ReviewDecision,
) -> ApiResult<ParentObservation> {
    client
        .post_json(
            &format!("parent-observations/{id}/review/"),
            &json!({ "status": decision }),
        )
        .await
        .inspect_err(|e| {
            tracing::error!(observation_id = id, ?decision, error = %e, "Failed to review parent observation")
        })
}
