//! Pre-submit Form Validation
//!
//! Field-presence and range checks run on a draft before it is sent. A
//! failing draft never reaches the network: [`submit`] takes the request as
//! an unstarted future and drops it without polling when validation fails.

use crate::api::{ApiError, ApiResult};
use crate::model::{
    AwardDraft, AwardType, ChapterDraft, ClassDraft, DimensionDraft, GradeDraft, ObservationDraft,
    PromotionRequest, ScoreDraft, SelfReportDraft, SubItemDraft, UserDraft,
};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

/// Highest level a star award may carry
pub const MAX_STAR_LEVEL: i32 = 5;

/// Per-field validation messages, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`; the first message per field wins
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn require(&mut self, field: &str, present: bool) {
        if !present {
            self.add(field, "This field is required");
        }
    }

    pub fn require_text(&mut self, field: &str, value: &str) {
        self.require(field, !value.trim().is_empty());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// A draft that can be checked before submission
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Validate `draft`, then await `request` only if it passed
pub async fn submit<D, F, T>(draft: &D, request: F) -> ApiResult<T>
where
    D: Validate + ?Sized,
    F: Future<Output = ApiResult<T>>,
{
    if let Err(errors) = draft.validate() {
        tracing::debug!(fields = errors.len(), "Draft rejected before submission");
        return Err(ApiError::Validation(errors));
    }
    request.await
}

impl Validate for UserDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_text("username", &self.username);
        if let Some(password) = &self.password {
            errors.require_text("password", password);
        }
        errors.into_result()
    }
}

impl Validate for PromotionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.student_ids.is_empty() {
            errors.add("student_ids", "Select at least one student");
        }
        errors.into_result()
    }
}

impl Validate for GradeDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_text("name", &self.name);
        errors.into_result()
    }
}

impl Validate for ClassDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_text("name", &self.name);
        errors.require("grade", self.grade.is_some());
        errors.into_result()
    }
}

impl Validate for ChapterDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_text("name", &self.name);
        errors.into_result()
    }
}

impl Validate for DimensionDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("chapter", self.chapter.is_some());
        errors.require_text("name", &self.name);
        errors.into_result()
    }
}

impl Validate for SubItemDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("dimension", self.dimension.is_some());
        errors.require_text("name", &self.name);
        if matches!(self.max_score, Some(max) if max <= 0) {
            errors.add("max_score", "Max score must be positive");
        }
        errors.into_result()
    }
}

impl Validate for ScoreDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("student", self.student.is_some());
        errors.require("rule_sub_item", self.rule_sub_item.is_some());
        errors.require("school_class", self.school_class.is_some());
        errors.require("date_of_behavior", self.date_of_behavior.is_some());
        if self.points <= 0 {
            errors.add("points", "Points must be greater than zero");
        }
        errors.into_result()
    }
}

impl Validate for AwardDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_text("name", &self.name);
        errors.require("student", self.student.is_some());
        errors.require("award_date", self.award_date.is_some());
        if self.level < 1 {
            errors.add("level", "Level must be at least 1");
        } else if self.award_type == AwardType::Star && self.level > MAX_STAR_LEVEL {
            errors.add("level", format!("Star level must be between 1 and {MAX_STAR_LEVEL}"));
        }
        errors.into_result()
    }
}

impl Validate for ObservationDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("student", self.student.is_some());
        errors.require_text("description", &self.description);
        errors.into_result()
    }
}

impl Validate for SelfReportDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_text("description", &self.description);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorKind;
    use crate::model::Role;
    use crate::resources::awards;
    use crate::session::SessionStore;
    use crate::test_support::{client_for, spawn_backend};
    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn valid_award() -> AwardDraft {
        AwardDraft {
            student: Some(7),
            name: "Helpful classmate".to_string(),
            award_date: NaiveDate::from_ymd_opt(2024, 10, 8),
            ..Default::default()
        }
    }

    #[test]
    fn test_award_rules() {
        assert!(valid_award().validate().is_ok());

        let blank = AwardDraft {
            name: "   ".to_string(),
            student: None,
            award_date: None,
            ..valid_award()
        };
        let errors = blank.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.get("name").is_some());
        assert!(errors.get("student").is_some());
        assert!(errors.get("award_date").is_some());

        let too_many_stars = AwardDraft {
            level: 6,
            ..valid_award()
        };
        assert!(too_many_stars.validate().unwrap_err().get("level").is_some());

        let big_badge = AwardDraft {
            award_type: AwardType::Badge,
            level: 6,
            ..valid_award()
        };
        assert!(big_badge.validate().is_ok());

        let zero = AwardDraft {
            level: 0,
            ..valid_award()
        };
        assert_eq!(
            zero.validate().unwrap_err().get("level"),
            Some("Level must be at least 1")
        );
    }

    #[test]
    fn test_score_rules() {
        let draft = ScoreDraft {
            points: 0,
            ..Default::default()
        };
        let errors = draft.validate().unwrap_err();
        for field in ["student", "rule_sub_item", "school_class", "date_of_behavior", "points"] {
            assert!(errors.get(field).is_some(), "missing error for {field}");
        }

        let ok = ScoreDraft {
            student: Some(1),
            rule_sub_item: Some(2),
            school_class: Some(3),
            date_of_behavior: NaiveDate::from_ymd_opt(2024, 10, 1),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_user_password_optional_but_not_blank() {
        let mut draft = UserDraft::new("lchen", Role::Student);
        assert!(draft.validate().is_ok());

        draft.password = Some(" ".to_string());
        assert!(draft.validate().unwrap_err().get("password").is_some());
    }

    #[test]
    fn test_observation_and_hierarchy_rules() {
        let obs = ObservationDraft {
            student: None,
            rule_sub_item: None,
            description: String::new(),
            date_of_behavior: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
        };
        assert_eq!(obs.validate().unwrap_err().len(), 2);

        let dim = DimensionDraft {
            chapter: None,
            name: "Honesty".to_string(),
            description: String::new(),
            order: None,
        };
        assert!(dim.validate().unwrap_err().get("chapter").is_some());
    }

    #[test]
    fn test_display_lists_fields_in_order() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "This field is required");
        errors.add("level", "Level must be at least 1");
        errors.add("name", "ignored");
        assert_eq!(
            errors.to_string(),
            "level: Level must be at least 1; name: This field is required"
        );
    }

    #[tokio::test]
    async fn test_invalid_draft_sends_nothing() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/api/awards/",
                post(|State(hits): State<Arc<AtomicUsize>>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::CREATED, Json(json!({})))
                }),
            )
            .with_state(hits.clone());
        let base_url = spawn_backend(router).await;
        let client = client_for(&base_url, SessionStore::in_memory());

        let draft = AwardDraft {
            level: 9,
            ..valid_award()
        };
        let err = submit(&draft, awards::create(&client, &draft))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
