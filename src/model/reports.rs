//! Read-only analytics aggregates served by the reporting endpoints

use super::Id;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Interval {
    #[default]
    Day,
    Week,
    Month,
}

/// Filters accepted by every report endpoint
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ReportFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<Interval>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSeriesPoint {
    pub date: String,
    pub count: u64,
    pub points: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BehaviorTimeSeries {
    #[serde(default)]
    pub positive_series: Vec<TimeSeriesPoint>,
    #[serde(default)]
    pub negative_series: Vec<TimeSeriesPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AwardTypeCount {
    pub award_type: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StarLevelCount {
    pub level: u32,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopStudent {
    pub student_id: Id,
    pub student_name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyCount {
    pub month: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AwardAnalytics {
    #[serde(default)]
    pub awards_by_type: Vec<AwardTypeCount>,
    #[serde(default)]
    pub star_distribution: Vec<StarLevelCount>,
    #[serde(default)]
    pub top_students: Vec<TopStudent>,
    #[serde(default)]
    pub awards_over_time: Vec<MonthlyCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngagedParent {
    pub parent_id: Id,
    pub observation_count: u64,
    pub approved_count: u64,
    pub rejection_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParentEngagement {
    pub total_observations: u64,
    pub active_parents: u64,
    pub approval_rate: f64,
    #[serde(default)]
    pub top_engaged_parents: Vec<EngagedParent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngagedStudent {
    pub student_id: Id,
    pub report_count: u64,
    pub approved_count: u64,
    pub rejection_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StudentEngagement {
    pub total_reports: u64,
    pub active_students: u64,
    pub approval_rate: f64,
    #[serde(default)]
    pub top_engaged_students: Vec<EngagedStudent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveTeacher {
    pub recorded_by_id: Id,
    pub score_count: u64,
    pub positive_count: u64,
    pub negative_count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TeacherEngagement {
    pub total_scores: u64,
    pub active_teachers: u64,
    pub positive_negative_ratio: f64,
    #[serde(default)]
    pub most_active_teachers: Vec<ActiveTeacher>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserEngagementReport {
    pub parent_engagement: ParentEngagement,
    pub student_engagement: StudentEngagement,
    pub teacher_engagement: TeacherEngagement,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DimensionAnalysis {
    pub dimension_id: Id,
    pub dimension_name: String,
    pub positive_count: u64,
    pub negative_count: u64,
    pub positive_points: i64,
    pub negative_points: i64,
    pub net_points: i64,
    pub total_records: u64,
}
