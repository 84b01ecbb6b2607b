//! Read-only analytics under `reports/`

use crate::api::{ApiClient, ApiResult};
use crate::model::{
    AwardAnalytics, BehaviorTimeSeries, DimensionAnalysis, ReportFilter, UserEngagementReport,
};

pub async fn behavior_time_series(
    client: &ApiClient,
    filter: &ReportFilter,
) -> ApiResult<BehaviorTimeSeries> {
    client
        .get_json_with("reports/behavior-time-series/", filter)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch behavior time series"))
}

pub async fn award_analytics(
    client: &ApiClient,
    filter: &ReportFilter,
) -> ApiResult<AwardAnalytics> {
    client
        .get_json_with("reports/award-analytics/", filter)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch award analytics"))
}

pub async fn user_engagement(
    client: &ApiClient,
    filter: &ReportFilter,
) -> ApiResult<UserEngagementReport> {
    client
        .get_json_with("reports/user-engagement/", filter)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch user engagement"))
}

pub async fn dimension_analysis(
    client: &ApiClient,
    filter: &ReportFilter,
) -> ApiResult<Vec<DimensionAnalysis>> {
    client
        .get_json_with("reports/dimension-analysis/", filter)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch dimension analysis"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Interval;
    use crate::session::SessionStore;
    use crate::test_support::{client_for, spawn_backend};
    use axum::{extract::RawQuery, routing::get, Json, Router};
    use chrono::NaiveDate;
    use serde_json::json;

    #[tokio::test]
    async fn test_time_series_query() {
        let router = Router::new().route(
            "/api/reports/behavior-time-series/",
            get(|RawQuery(query): RawQuery| async move {
                assert_eq!(
                    query.as_deref(),
                    Some("start_date=2024-09-01&grade_id=2&interval=week")
                );
                Json(json!({
                    "positive_series": [{ "date": "2024-09-02", "count": 4, "points": 9 }],
                    "negative_series": []
                }))
            }),
        );
        let base_url = spawn_backend(router).await;
        let client = client_for(&base_url, SessionStore::in_memory());

        let filter = ReportFilter {
            start_date: NaiveDate::from_ymd_opt(2024, 9, 1),
            grade_id: Some(2),
            interval: Some(Interval::Week),
            ..Default::default()
        };
        let series = behavior_time_series(&client, &filter).await.unwrap();
        assert_eq!(series.positive_series[0].points, 9);
        assert!(series.negative_series.is_empty());
    }

    #[tokio::test]
    async fn test_user_engagement_shape() {
        let router = Router::new().route(
            "/api/reports/user-engagement/",
            get(|| async {
                Json(json!({
                    "parent_engagement": {
                        "total_observations": 10, "active_parents": 4, "approval_rate": 80.0,
                        "top_engaged_parents": [
                            { "parent_id": 20, "observation_count": 5, "approved_count": 4, "rejection_rate": 20.0 }
                        ]
                    },
                    "student_engagement": {
                        "total_reports": 3, "active_students": 2, "approval_rate": 66.7,
                        "top_engaged_students": []
                    },
                    "teacher_engagement": {
                        "total_scores": 50, "active_teachers": 5, "positive_negative_ratio": 3.2,
                        "most_active_teachers": []
                    }
                }))
            }),
        );
        let base_url = spawn_backend(router).await;
        let client = client_for(&base_url, SessionStore::in_memory());

        let report = user_engagement(&client, &ReportFilter::default()).await.unwrap();
        assert_eq!(report.parent_engagement.top_engaged_parents[0].parent_id, 20);
        assert_eq!(report.teacher_engagement.total_scores, 50);
    }
}
