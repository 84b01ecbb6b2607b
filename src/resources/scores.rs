//! `behavior-scores/` endpoints, with the summary aggregate and CSV export

use crate::api::{ApiClient, ApiResult};
use crate::model::{BehaviorScore, Id, ScoreDraft, ScoreFilter, ScoreSummary};

pub async fn list(client: &ApiClient, filter: &ScoreFilter) -> ApiResult<Vec<BehaviorScore>> {
    client
        .get_json_with("behavior-scores/", filter)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch behavior scores"))
}

/// Point totals for the records matching `filter`
pub async fn summary(client: &ApiClient, filter: &ScoreFilter) -> ApiResult<ScoreSummary> {
    client
        .get_json_with("behavior-scores/summary/", filter)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch behavior score summary"))
}

/// CSV of the records matching `filter`
pub async fn export(client: &ApiClient, filter: &ScoreFilter) -> ApiResult<Vec<u8>> {
    client
        .get_bytes("behavior-scores/export/", filter)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to export behavior scores"))
}

pub async fn create(client: &ApiClient, draft: &ScoreDraft) -> ApiResult<BehaviorScore> {
    client
        .post_json("behavior-scores/", draft)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to record behavior score"))
}

pub async fn update(client: &ApiClient, id: Id, draft: &ScoreDraft) -> ApiResult<BehaviorScore> {
    client
        .put_json(&format!("behavior-scores/{id}/"), draft)
        .await
        .inspect_err(|e| tracing::error!(score_id = id, error = %e, "Failed to update behavior score"))
}

pub async fn delete(client: &ApiClient, id: Id) -> ApiResult<()> {
    client
        .delete(&format!("behavior-scores/{id}/"))
        .await
        .inspect_err(|e| tracing::error!(score_id = id, error = %e, "Failed to delete behavior score"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;
    use crate::test_support::{client_for, spawn_backend};
    use axum::{extract::RawQuery, http::StatusCode, routing::get, Json, Router};
    use chrono::NaiveDate;
    use serde_json::json;

    #[tokio::test]
    async fn test_summary_with_date_range() {
        let router = Router::new().route(
            "/api/behavior-scores/summary/",
            get(|RawQuery(query): RawQuery| async move {
                assert_eq!(
                    query.as_deref(),
                    Some("school_class=4&start_date=2024-09-01&end_date=2024-09-30")
                );
                Json(json!({
                    "total_positive_points": 40,
                    "total_negative_points": 12,
                    "net_score": 28,
                    "total_records": 19,
                    "dimension_scores": { "Honesty": 10, "Diligence": 18 }
                }))
            }),
        );
        let base_url = spawn_backend(router).await;
        let client = client_for(&base_url, SessionStore::in_memory());

        let filter = ScoreFilter {
            school_class: Some(4),
            start_date: NaiveDate::from_ymd_opt(2024, 9, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 9, 30),
            ..Default::default()
        };
        let summary = summary(&client, &filter).await.unwrap();
        assert_eq!(summary.net_score, 28);
        assert_eq!(summary.dimension_scores["Diligence"], 18);
    }

    #[tokio::test]
    async fn test_export_failure_keeps_body() {
        let router = Router::new().route(
            "/api/behavior-scores/export/",
            get(|| async { (StatusCode::FORBIDDEN, "forbidden") }),
        );
        let base_url = spawn_backend(router).await;
        let client = client_for(&base_url, SessionStore::in_memory());

        let err = export(&client, &ScoreFilter::default()).await.unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert!(!err.is_auth_failure());
        assert_eq!(err.body(), Some("forbidden"));
    }
}
