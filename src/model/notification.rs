//! In-app notifications

use super::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: Id,
    pub user: Id,
    #[serde(default)]
    pub user_name: Option<String>,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub notification_type: NotificationType,
    #[serde(default)]
    pub related_object_type: Option<String>,
    #[serde(default)]
    pub related_object_id: Option<Id>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct NotificationFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl NotificationFilter {
    /// Unread only, capped the way the badge counter asks for them
    pub fn unread() -> Self {
        Self {
            is_read: Some(false),
            limit: Some(100),
        }
    }
}
