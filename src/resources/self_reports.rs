//! `student-self-reports/` endpoints

use crate::api::{ApiClient, ApiResult};
use crate::model::{Id, ReviewDecision, SelfReportDraft, SelfReportFilter, StudentSelfReport};
use serde_json::json;

pub async fn list(
    client: &ApiClient,
    filter: &SelfReportFilter,
) -> ApiResult<Vec<StudentSelfReport>> {
    client
        .get_json_with("student-self-reports/", filter)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch student self-reports"))
}

pub async fn create(client: &ApiClient, draft: &SelfReportDraft) -> ApiResult<StudentSelfReport> {
    client
        .post_json("student-self-reports/", draft)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to submit self-report"))
}

pub async fn review(
    client: &ApiClient,
    id: Id,
    decision: ReviewDecision,
    comment: Option<&str>,
) -> ApiResult<StudentSelfReport> {
    client
        .post_json(
            &format!("student-self-reports/{id}/review/"),
            &json!({ "status": decision, "reviewer_comment": comment }),
        )
        .await
        .inspect_err(|e| {
            tracing::error!(report_id = id, ?decision, error = %e, "Failed to review self-report")
        })
}
