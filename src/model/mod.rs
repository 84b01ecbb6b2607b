//! Server-owned records
//!
//! Plain serde mirrors of the backend's JSON. The client only holds
//! transient copies; display-only fields (`*_display`, `*_name`) are optional
//! because not every endpoint includes them.

mod feedback;
mod notification;
mod reports;
mod rules;
mod school;
mod scores;
mod user;

/// Backend primary key
pub type Id = u64;

pub use feedback::{
    ObservationDraft, ObservationFilter, ParentObservation, ReviewDecision, ReviewStatus,
    SelfReportDraft, SelfReportFilter, StudentSelfReport,
};
pub use notification::{Notification, NotificationFilter, NotificationType};
pub use reports::{
    ActiveTeacher, AwardAnalytics, AwardTypeCount, BehaviorTimeSeries, DimensionAnalysis,
    EngagedParent, EngagedStudent, Interval, MonthlyCount, ParentEngagement, ReportFilter,
    StarLevelCount, StudentEngagement, TeacherEngagement, TimeSeriesPoint, TopStudent,
    UserEngagementReport,
};
pub use rules::{
    ChapterDraft, ChapterNode, DimensionDraft, DimensionNode, RuleChapter, RuleDimension,
    RuleSubItem, RuleTree, SubItemDraft,
};
pub use school::{ClassDraft, ClassType, Grade, GradeDraft, SchoolClass};
pub use scores::{
    Award, AwardDraft, AwardFilter, AwardType, BehaviorScore, ScoreDraft, ScoreFilter,
    ScoreSummary, ScoreType,
};
pub use user::{
    ImportUsersResponse, PersonRef, PromotionRequest, PromotionResult, Role,
    StudentParentRelationship, UnknownRole, User, UserDraft, UserFilter,
};
