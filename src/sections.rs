//! Concurrent Section Loading
//!
//! A view made of independent parts fires all of its fetches at once and
//! waits for every one of them to settle. Each part ends up as its own
//! [`Section`]; one failure never hides the others.

use crate::api::{ApiClient, ApiResult};
use crate::model::{
    Award, AwardAnalytics, AwardFilter, BehaviorScore, BehaviorTimeSeries, DimensionAnalysis,
    Grade, Id, ReportFilter, SchoolClass, ScoreFilter, ScoreSummary, UserEngagementReport,
};
use crate::resources::{awards, classes, grades, reports, scores};
use futures_util::future::join_all;
use serde::Serialize;
use std::future::Future;

/// Outcome of one independently loaded part of a view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Section<T> {
    Loaded(T),
    /// Message fit for display in place of the section
    Failed(String),
}

impl<T> Section<T> {
    /// Convert a finished fetch, logging a failure under `name`
    pub fn from_result(name: &str, result: ApiResult<T>) -> Self {
        match result {
            Ok(value) => Section::Loaded(value),
            Err(e) => {
                tracing::warn!(section = name, kind = ?e.kind(), error = %e, "Section failed to load");
                Section::Failed(e.user_message())
            }
        }
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Section::Loaded(value) => Some(value),
            Section::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Section::Loaded(_) => None,
            Section::Failed(message) => Some(message.as_str()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Section::Loaded(_))
    }
}

/// Await one fetch and settle it into a section
pub async fn settle<T, F>(name: &str, fetch: F) -> Section<T>
where
    F: Future<Output = ApiResult<T>>,
{
    Section::from_result(name, fetch.await)
}

/// Run same-typed named fetches concurrently; results keep input order
pub async fn settle_all<'a, T, F, I>(fetches: I) -> Vec<Section<T>>
where
    I: IntoIterator<Item = (&'a str, F)>,
    F: Future<Output = ApiResult<T>>,
{
    join_all(fetches.into_iter().map(|(name, fetch)| settle(name, fetch))).await
}

/// Everything the leadership dashboard shows
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub grades: Section<Vec<Grade>>,
    pub classes: Section<Vec<SchoolClass>>,
    pub score_summary: Section<ScoreSummary>,
    pub time_series: Section<BehaviorTimeSeries>,
    pub award_analytics: Section<AwardAnalytics>,
    pub engagement: Section<UserEngagementReport>,
    pub dimensions: Section<Vec<DimensionAnalysis>>,
}

impl DashboardSnapshot {
    pub fn failed_sections(&self) -> usize {
        [
            self.grades.is_loaded(),
            self.classes.is_loaded(),
            self.score_summary.is_loaded(),
            self.time_series.is_loaded(),
            self.award_analytics.is_loaded(),
            self.engagement.is_loaded(),
            self.dimensions.is_loaded(),
        ]
        .iter()
        .filter(|loaded| !**loaded)
        .count()
    }
}

/// Load every dashboard section concurrently
pub async fn load_dashboard(client: &ApiClient, filter: &ReportFilter) -> DashboardSnapshot {
    let score_filter = ScoreFilter {
        student: None,
        school_class: filter.class_id,
        grade: filter.grade_id,
        start_date: filter.start_date,
        end_date: filter.end_date,
    };

    let (grades, classes, score_summary, time_series, award_analytics, engagement, dimensions) = tokio::join!(
        settle("grades", grades::list(client)),
        settle("classes", classes::list(client)),
        settle("score_summary", scores::summary(client, &score_filter)),
        settle("time_series", reports::behavior_time_series(client, filter)),
        settle("award_analytics", reports::award_analytics(client, filter)),
        settle("engagement", reports::user_engagement(client, filter)),
        settle("dimensions", reports::dimension_analysis(client, filter)),
    );

    let snapshot = DashboardSnapshot {
        grades,
        classes,
        score_summary,
        time_series,
        award_analytics,
        engagement,
        dimensions,
    };
    tracing::info!(failed = snapshot.failed_sections(), "Dashboard loaded");
    snapshot
}

/// A student's own scores, awards and point totals
#[derive(Debug, Clone, Serialize)]
pub struct StudentOverview {
    pub scores: Section<Vec<BehaviorScore>>,
    pub awards: Section<Vec<Award>>,
    pub summary: Section<ScoreSummary>,
}

pub async fn load_student_overview(client: &ApiClient, student: Id) -> StudentOverview {
    let score_filter = ScoreFilter {
        student: Some(student),
        ..Default::default()
    };
    let award_filter = AwardFilter {
        student: Some(student),
        ..Default::default()
    };

    let (scores, awards, summary) = tokio::join!(
        settle("scores", scores::list(client, &score_filter)),
        settle("awards", awards::list(client, &award_filter)),
        settle("summary", scores::summary(client, &score_filter)),
    );

    StudentOverview {
        scores,
        awards,
        summary,
    }
}
