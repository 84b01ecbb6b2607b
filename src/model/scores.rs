//! Behavior scores recorded by teachers, and awards

use super::Id;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreType {
    #[default]
    Positive,
    Negative,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BehaviorScore {
    pub id: Id,
    pub student: Id,
    pub rule_sub_item: Id,
    pub school_class: Id,
    pub score_type: ScoreType,
    pub points: i32,
    #[serde(default)]
    pub comment: String,
    pub date_of_behavior: NaiveDate,
    #[serde(default)]
    pub recorded_by: Option<Id>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub rule_name: Option<String>,
    #[serde(default)]
    pub dimension_name: Option<String>,
    #[serde(default)]
    pub school_class_name: Option<String>,
    #[serde(default)]
    pub score_type_display: Option<String>,
}

impl BehaviorScore {
    /// Points with the sign of the score type applied
    pub fn signed_points(&self) -> i64 {
        match self.score_type {
            ScoreType::Positive => i64::from(self.points),
            ScoreType::Negative => -i64::from(self.points),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoreDraft {
    pub student: Option<Id>,
    pub rule_sub_item: Option<Id>,
    pub school_class: Option<Id>,
    pub score_type: ScoreType,
    pub points: i32,
    pub comment: String,
    pub date_of_behavior: Option<NaiveDate>,
}

impl Default for ScoreDraft {
    fn default() -> Self {
        Self {
            student: None,
            rule_sub_item: None,
            school_class: None,
            score_type: ScoreType::Positive,
            points: 1,
            comment: String::new(),
            date_of_behavior: None,
        }
    }
}

/// Filters shared by the score list, summary and CSV export endpoints
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ScoreFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_class: Option<Id>,
    /// Students whose home class belongs to this grade
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoreSummary {
    #[serde(default)]
    pub total_positive_points: i64,
    #[serde(default)]
    pub total_negative_points: i64,
    #[serde(default)]
    pub net_score: i64,
    #[serde(default)]
    pub total_records: u64,
    /// Net points keyed by dimension name
    #[serde(default)]
    pub dimension_scores: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AwardType {
    #[default]
    Star,
    Badge,
    Certificate,
    Other,
}

impl AwardType {
    pub fn label(&self) -> &'static str {
        match self {
            AwardType::Star => "Star Rating",
            AwardType::Badge => "Badge",
            AwardType::Certificate => "Certificate",
            AwardType::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Award {
    pub id: Id,
    pub student: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub award_type: AwardType,
    pub level: i32,
    pub award_date: NaiveDate,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub awarded_by: Option<Id>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AwardDraft {
    pub student: Option<Id>,
    pub name: String,
    pub description: String,
    pub award_type: AwardType,
    pub level: i32,
    pub award_date: Option<NaiveDate>,
}

impl Default for AwardDraft {
    fn default() -> Self {
        Self {
            student: None,
            name: String::new(),
            description: String::new(),
            award_type: AwardType::Star,
            level: 1,
            award_date: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AwardFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub award_type: Option<AwardType>,
}
