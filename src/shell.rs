//! Application Shell
//!
//! Gates everything behind the session. On mount the shell reads the token;
//! without one it goes straight to the login view and makes no request. With
//! one it makes a single protected fetch of the current user:
//!
//! - success: authenticated view with the user and their navigation areas
//! - 401: the token is cleared along with any cached data, back to login
//! - anything else: still authenticated, token kept, error shown
//!
//! Only the shell treats a 401 specially. Every other caller sees it as an
//! ordinary [`ApiError`].

use crate::api::{ApiClient, ApiError, ApiResult};
use crate::model::{Role, User};
use crate::resources::users;
use crate::session::{SessionStore, StorageError};
use async_trait::async_trait;
use serde::Serialize;

/// The protected fetch the shell uses to confirm a session
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn current_user(&self) -> ApiResult<User>;
}

#[async_trait]
impl Authenticator for ApiClient {
    async fn current_user(&self) -> ApiResult<User> {
        users::current(self).await
    }
}

/// A navigation destination offered to the current user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Area {
    Home,
    Notifications,
    GradeManagement,
    ClassManagement,
    UserManagement,
    StudentPromotion,
    StudentParent,
    RuleConfiguration,
    AwardManagement,
    BehaviorScores,
    AnalyticsDashboard,
    SelfReports,
    ParentObservations,
}

impl Area {
    pub fn label(&self) -> &'static str {
        match self {
            Area::Home => "Home",
            Area::Notifications => "Notifications",
            Area::GradeManagement => "Grade Management",
            Area::ClassManagement => "Class Management",
            Area::UserManagement => "User Management",
            Area::StudentPromotion => "Student Promotion",
            Area::StudentParent => "Student-Parent",
            Area::RuleConfiguration => "Rule Configuration",
            Area::AwardManagement => "Award Management",
            Area::BehaviorScores => "Behavior Scores",
            Area::AnalyticsDashboard => "Analytics Dashboard",
            Area::SelfReports => "Self-Reports",
            Area::ParentObservations => "Parent Observations",
        }
    }

    /// Navigation set for a role; every role gets home and notifications
    pub fn for_role(role: Role) -> Vec<Area> {
        let mut areas = vec![Area::Home, Area::Notifications];
        match role {
            Role::SystemAdministrator => areas.extend([
                Area::GradeManagement,
                Area::ClassManagement,
                Area::UserManagement,
                Area::StudentPromotion,
                Area::StudentParent,
            ]),
            Role::MoralEducationSupervisor => {
                areas.extend([Area::RuleConfiguration, Area::AwardManagement])
            }
            Role::Principal | Role::Director => areas.push(Area::AnalyticsDashboard),
            Role::TeachingTeacher | Role::ClassTeacher => {
                areas.extend([Area::BehaviorScores, Area::ParentObservations])
            }
            Role::Student => areas.push(Area::SelfReports),
            Role::Parent => areas.push(Area::ParentObservations),
        }
        areas
    }
}

/// What the shell is currently showing
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Protected fetch in progress
    Loading,
    Login,
    Authenticated(AuthenticatedView),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthenticatedView {
    /// Absent until the current-user fetch has succeeded once
    pub user: Option<User>,
    /// Last load failure, shown until the next successful load
    pub error: Option<String>,
}

/// Top-level authentication gate
pub struct AppShell<A> {
    auth: A,
    session: SessionStore,
    view: View,
}

impl<A: Authenticator> AppShell<A> {
    pub fn new(auth: A, session: SessionStore) -> Self {
        Self {
            auth,
            session,
            view: View::Loading,
        }
    }

    /// Decide the initial view from the stored token
    pub async fn mount(&mut self) -> &View {
        if self.session.is_authenticated() {
            self.load_current_user().await;
        } else {
            tracing::debug!("No stored token, showing login");
            self.view = View::Login;
        }
        &self.view
    }

    /// Called once login has stored a fresh token
    pub async fn on_login_success(&mut self) -> &View {
        self.load_current_user().await;
        &self.view
    }

    /// Re-run the protected fetch for an authenticated shell
    pub async fn refresh(&mut self) -> &View {
        if matches!(self.view, View::Login) {
            return &self.view;
        }
        self.load_current_user().await;
        &self.view
    }

    async fn load_current_user(&mut self) {
        let cached = self.current_user().cloned();
        self.view = View::Loading;

        match self.auth.current_user().await {
            Ok(user) => {
                tracing::info!(username = %user.username, role = %user.role, "Session confirmed");
                self.view = View::Authenticated(AuthenticatedView {
                    user: Some(user),
                    error: None,
                });
            }
            Err(e) => {
                self.view = View::Authenticated(AuthenticatedView {
                    user: cached,
                    error: None,
                });
                self.handle_load_error(&e);
            }
        }
    }

    /// Apply the shell's error rule to a failed top-level load: a 401 ends
    /// the session, anything else is shown without touching the token
    pub fn handle_load_error(&mut self, error: &ApiError) {
        if error.is_auth_failure() {
            tracing::warn!("Server rejected the stored token, logging out");
            if let Err(e) = self.logout() {
                tracing::error!(error = %e, "Failed to clear rejected token");
            }
            return;
        }

        tracing::warn!(kind = ?error.kind(), error = %error, "Load failed, keeping session");
        let message = error.user_message();
        let anonymous = !self.session.is_authenticated();
        match &mut self.view {
            View::Authenticated(view) => view.error = Some(message),
            // Anonymous stays anonymous; the session follows the token alone
            other if anonymous => *other = View::Login,
            other => {
                *other = View::Authenticated(AuthenticatedView {
                    user: None,
                    error: Some(message),
                })
            }
        }
    }

    /// Clear the session and every cached record; no network call
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.view = View::Login;
        self.session.logout()
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn current_user(&self) -> Option<&User> {
        match &self.view {
            View::Authenticated(view) => view.user.as_ref(),
            _ => None,
        }
    }

    /// Navigation areas for the signed-in user; empty until the user is known
    pub fn areas(&self) -> Vec<Area> {
        self.current_user()
            .map(|user| Area::for_role(user.role))
            .unwrap_or_default()
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Token;
    use crate::test_support::{client_for, spawn_backend, unused_base_url};
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays canned results and counts calls
    struct Scripted {
        responses: Mutex<VecDeque<ApiResult<User>>>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(responses: Vec<ApiResult<User>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Authenticator for &Scripted {
        async fn current_user(&self) -> ApiResult<User> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected current_user call")
        }
    }

    fn user(role: Role) -> User {
        serde_json::from_value(json!({ "id": 1, "username": "mwang", "role": role.as_str() }))
            .unwrap()
    }

    fn status(code: u16) -> ApiError {
        ApiError::Status {
            status: code,
            body: String::new(),
        }
    }

    fn signed_in() -> SessionStore {
        let session = SessionStore::in_memory();
        session.persist(&Token::new("abc123")).unwrap();
        session
    }

    #[tokio::test]
    async fn test_mount_without_token_makes_no_call() {
        let auth = Scripted::new(vec![]);
        let mut shell = AppShell::new(&auth, SessionStore::in_memory());

        assert_eq!(shell.mount().await, &View::Login);
        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
        assert!(shell.areas().is_empty());
    }

    #[tokio::test]
    async fn test_mount_with_valid_token() {
        let auth = Scripted::new(vec![Ok(user(Role::Principal))]);
        let mut shell = AppShell::new(&auth, signed_in());

        shell.mount().await;
        assert_eq!(shell.current_user().unwrap().username, "mwang");
        assert!(shell.areas().contains(&Area::AnalyticsDashboard));
        assert!(!shell.areas().contains(&Area::UserManagement));
    }

    #[tokio::test]
    async fn test_unauthorized_clears_token() {
        let auth = Scripted::new(vec![Err(status(401))]);
        let session = signed_in();
        let mut shell = AppShell::new(&auth, session.clone());

        assert_eq!(shell.mount().await, &View::Login);
        assert!(session.get_token().is_none());
    }

    #[tokio::test]
    async fn test_server_error_keeps_token() {
        let auth = Scripted::new(vec![Err(status(500))]);
        let session = signed_in();
        let mut shell = AppShell::new(&auth, session.clone());

        match shell.mount().await {
            View::Authenticated(view) => {
                assert!(view.user.is_none());
                assert_eq!(
                    view.error.as_deref(),
                    Some("The server rejected the request (500)")
                );
            }
            other => panic!("expected authenticated view, got {other:?}"),
        }
        assert_eq!(session.get_token().unwrap().as_str(), "abc123");
    }

    #[tokio::test]
    async fn test_forbidden_is_not_an_auth_failure() {
        let auth = Scripted::new(vec![Err(status(403))]);
        let session = signed_in();
        let mut shell = AppShell::new(&auth, session.clone());

        shell.mount().await;
        assert!(session.is_authenticated());
        assert!(matches!(shell.view(), View::Authenticated(_)));
    }

    #[tokio::test]
    async fn test_refresh_keeps_cached_user_on_error() {
        let auth = Scripted::new(vec![Ok(user(Role::Student)), Err(status(502))]);
        let mut shell = AppShell::new(&auth, signed_in());

        shell.mount().await;
        shell.refresh().await;

        assert_eq!(shell.current_user().unwrap().role, Role::Student);
        assert!(matches!(shell.view(), View::Authenticated(v) if v.error.is_some()));
        assert_eq!(shell.areas(), Area::for_role(Role::Student));
    }

    #[tokio::test]
    async fn test_login_success_then_logout() {
        let auth = Scripted::new(vec![Ok(user(Role::SystemAdministrator))]);
        let session = SessionStore::in_memory();
        let mut shell = AppShell::new(&auth, session.clone());

        shell.mount().await;
        session.persist(&Token::new("fresh")).unwrap();
        shell.on_login_success().await;
        assert!(shell.areas().contains(&Area::UserManagement));

        shell.logout().unwrap();
        assert_eq!(shell.view(), &View::Login);
        assert!(shell.current_user().is_none());
        assert!(session.get_token().is_none());

        // refresh after logout stays on login without calling out
        shell.refresh().await;
        assert_eq!(auth.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_error_while_anonymous_stays_on_login() {
        let auth = Scripted::new(vec![]);
        let session = SessionStore::in_memory();
        let mut shell = AppShell::new(&auth, session.clone());

        shell.mount().await;
        shell.handle_load_error(&status(500));

        assert_eq!(shell.view(), &View::Login);
        assert!(shell.current_user().is_none());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_load_error_before_mount_follows_token() {
        let auth = Scripted::new(vec![]);
        let mut anonymous = AppShell::new(&auth, SessionStore::in_memory());
        anonymous.handle_load_error(&status(502));
        assert_eq!(anonymous.view(), &View::Login);

        let mut signed_in = AppShell::new(&auth, signed_in());
        signed_in.handle_load_error(&status(502));
        assert!(matches!(signed_in.view(), View::Authenticated(v) if v.error.is_some()));
    }

    #[tokio::test]
    async fn test_against_backend_401() {
        let router = Router::new().route(
            "/api/users/me/",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "detail": "Invalid token." })),
                )
            }),
        );
        let base_url = spawn_backend(router).await;
        let session = signed_in();
        let client = client_for(&base_url, session.clone());
        let mut shell = AppShell::new(client, session.clone());

        assert_eq!(shell.mount().await, &View::Login);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_against_unreachable_backend() {
        let session = signed_in();
        let client = client_for(&unused_base_url().await, session.clone());
        let mut shell = AppShell::new(client, session.clone());

        shell.mount().await;
        assert!(session.is_authenticated());
        assert!(matches!(
            shell.view(),
            View::Authenticated(v) if v.error.as_deref() == Some("Could not reach the server")
        ));
    }
}
