//! Users, roles and family relationships

use super::school::SchoolClass;
use super::Id;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Platform role. The lowercase snake_case wire value is canonical; parsing
/// accepts any ASCII casing (`STUDENT`, `Student`) and normalizes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Student,
    Parent,
    TeachingTeacher,
    ClassTeacher,
    MoralEducationSupervisor,
    Principal,
    Director,
    SystemAdministrator,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::Student,
        Role::Parent,
        Role::TeachingTeacher,
        Role::ClassTeacher,
        Role::MoralEducationSupervisor,
        Role::Principal,
        Role::Director,
        Role::SystemAdministrator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Parent => "parent",
            Role::TeachingTeacher => "teaching_teacher",
            Role::ClassTeacher => "class_teacher",
            Role::MoralEducationSupervisor => "moral_education_supervisor",
            Role::Principal => "principal",
            Role::Director => "director",
            Role::SystemAdministrator => "system_administrator",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Parent => "Parent",
            Role::TeachingTeacher => "Teaching Teacher",
            Role::ClassTeacher => "Class Teacher",
            Role::MoralEducationSupervisor => "Moral Education Supervisor",
            Role::Principal => "Principal",
            Role::Director => "Director",
            Role::SystemAdministrator => "System Administrator",
        }
    }

    pub fn is_teacher(&self) -> bool {
        matches!(self, Role::TeachingTeacher | Role::ClassTeacher)
    }

    pub fn is_leadership(&self) -> bool {
        matches!(self, Role::Principal | Role::Director)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized role string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Lightweight reference to another user embedded in a record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonRef {
    pub id: Id,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Platform user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Id,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub role_display: Option<String>,
    /// Home class, for students
    #[serde(default)]
    pub school_class: Option<Id>,
    #[serde(default)]
    pub school_class_details: Option<SchoolClass>,
    /// Classes taught, for teaching teachers
    #[serde(default)]
    pub teaching_classes: Vec<Id>,
    #[serde(default)]
    pub children: Vec<PersonRef>,
    #[serde(default)]
    pub parents: Vec<PersonRef>,
}

impl User {
    /// "First Last", falling back to the username
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if full.is_empty() {
            self.username.clone()
        } else {
            full
        }
    }
}

/// Create/update payload for a user
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserDraft {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_class: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UserDraft {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            email: None,
            first_name: None,
            last_name: None,
            role,
            school_class: None,
            password: None,
        }
    }
}

/// Query filter for listing users
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl UserFilter {
    pub fn role(role: Role) -> Self {
        Self { role: Some(role) }
    }
}

/// Result of a bulk CSV user import
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ImportUsersResponse {
    #[serde(default)]
    pub created: u32,
    #[serde(default)]
    pub updated: u32,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Move a set of students into another class (and optionally grade)
#[derive(Debug, Clone, Serialize)]
pub struct PromotionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_grade_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_class_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_grade_id: Option<Id>,
    pub target_class_id: Id,
    pub student_ids: Vec<Id>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PromotionResult {
    pub success: bool,
    pub updated_count: u32,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub message: String,
}

/// Link between a student and a parent account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentParentRelationship {
    pub id: Id,
    pub student: Id,
    pub parent: Id,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub student_username: Option<String>,
    #[serde(default)]
    pub parent_name: Option<String>,
    #[serde(default)]
    pub parent_username: Option<String>,
}
