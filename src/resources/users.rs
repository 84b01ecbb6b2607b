//! `users/` endpoints, including CSV import/export and promotion

use super::NO_QUERY;
use crate::api::{ApiClient, ApiResult};
use crate::model::{
    Id, ImportUsersResponse, PromotionRequest, PromotionResult, User, UserDraft, UserFilter,
};
use reqwest::multipart::{Form, Part};

pub async fn list(client: &ApiClient, filter: &UserFilter) -> ApiResult<Vec<User>> {
    client
        .get_json_with("users/", filter)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch users"))
}

/// The account the current token belongs to
pub async fn current(client: &ApiClient) -> ApiResult<User> {
    client
        .get_json("users/me/")
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch current user"))
}

pub async fn create(client: &ApiClient, draft: &UserDraft) -> ApiResult<User> {
    client
        .post_json("users/", draft)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to create user"))
}

pub async fn update(client: &ApiClient, id: Id, draft: &UserDraft) -> ApiResult<User> {
    client
        .put_json(&format!("users/{id}/"), draft)
        .await
        .inspect_err(|e| tracing::error!(user_id = id, error = %e, "Failed to update user"))
}

pub async fn delete(client: &ApiClient, id: Id) -> ApiResult<()> {
    client
        .delete(&format!("users/{id}/"))
        .await
        .inspect_err(|e| tracing::error!(user_id = id, error = %e, "Failed to delete user"))
}

/// Download all users as CSV
pub async fn export(client: &ApiClient) -> ApiResult<Vec<u8>> {
    client
        .get_bytes("users/export/", NO_QUERY)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to export users"))
}

/// Upload a CSV file as the multipart field `file`
pub async fn import(
    client: &ApiClient,
    file_name: &str,
    contents: Vec<u8>,
) -> ApiResult<ImportUsersResponse> {
    let part = Part::bytes(contents)
        .file_name(file_name.to_string())
        .mime_str("text/csv")?;
    let form = Form::new().part("file", part);

    client
        .post_multipart("users/import/", form)
        .await
        .inspect_err(|e| tracing::error!(file = file_name, error = %e, "Failed to import users"))
}

pub async fn promote_or_demote(
    client: &ApiClient,
    request: &PromotionRequest,
) -> ApiResult<PromotionResult> {
    client
        .post_json("users/promote-demote/", request)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to promote/demote students"))
}
