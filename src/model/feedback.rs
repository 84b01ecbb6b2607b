//! Parent observations and student self-reports, both reviewed by staff

use super::Id;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// A review decision; pending is not a decision
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl From<ReviewDecision> for ReviewStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approved => ReviewStatus::Approved,
            ReviewDecision::Rejected => ReviewStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParentObservation {
    pub id: Id,
    #[serde(default)]
    pub parent: Option<Id>,
    pub student: Id,
    #[serde(default)]
    pub rule_sub_item: Option<Id>,
    pub description: String,
    pub date_of_behavior: NaiveDate,
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default)]
    pub status_display: Option<String>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub rule_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ObservationDraft {
    pub student: Option<Id>,
    pub rule_sub_item: Option<Id>,
    pub description: String,
    pub date_of_behavior: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ObservationFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReviewStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentSelfReport {
    pub id: Id,
    pub student: Id,
    #[serde(default)]
    pub rule_sub_item: Option<Id>,
    pub description: String,
    pub date_of_behavior: NaiveDate,
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default)]
    pub status_display: Option<String>,
    #[serde(default)]
    pub rule_name: Option<String>,
    #[serde(default)]
    pub reviewer_comment: Option<String>,
    #[serde(default)]
    pub reviewer_name: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SelfReportDraft {
    pub student: Id,
    pub rule_sub_item: Option<Id>,
    pub description: String,
    pub date_of_behavior: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SelfReportFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReviewStatus>,
}
