//! Grades and classes

use super::{Id, PersonRef};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Grade {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GradeDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GradeDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClassType {
    #[default]
    HomeClass,
    SubjectClass,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchoolClass {
    pub id: Id,
    pub name: String,
    /// Owning grade. Older backends only send `grade_name`.
    #[serde(default)]
    pub grade: Option<Id>,
    #[serde(default)]
    pub grade_name: Option<String>,
    #[serde(default)]
    pub class_type: Option<ClassType>,
    #[serde(default)]
    pub class_type_display: Option<String>,
    #[serde(default)]
    pub class_teachers: Vec<Id>,
    #[serde(default)]
    pub class_teachers_details: Vec<PersonRef>,
}

/// Create/update payload for a class. The backend takes the grade as `grade_id`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClassDraft {
    pub name: String,
    #[serde(rename = "grade_id")]
    pub grade: Option<Id>,
    pub class_type: ClassType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub class_teachers: Vec<Id>,
}

impl ClassDraft {
    pub fn new(name: impl Into<String>, grade: Id) -> Self {
        Self {
            name: name.into(),
            grade: Some(grade),
            class_type: ClassType::HomeClass,
            class_teachers: Vec::new(),
        }
    }
}
