//! Rule taxonomy endpoints: `rule-chapters/`, `rule-dimensions/`, `rule-subitems/`
//!
//! Updates are partial (`PATCH`), unlike the grade and class endpoints.

use crate::api::{ApiClient, ApiResult};
use crate::model::{
    ChapterDraft, DimensionDraft, Id, RuleChapter, RuleDimension, RuleSubItem, SubItemDraft,
};
use serde::Serialize;

#[derive(Serialize)]
struct ByChapter {
    #[serde(skip_serializing_if = "Option::is_none")]
    chapter: Option<Id>,
}

#[derive(Serialize)]
struct ByDimension {
    #[serde(skip_serializing_if = "Option::is_none")]
    dimension: Option<Id>,
}

// Chapters

pub async fn list_chapters(client: &ApiClient) -> ApiResult<Vec<RuleChapter>> {
    client
        .get_json("rule-chapters/")
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch rule chapters"))
}

pub async fn get_chapter(client: &ApiClient, id: Id) -> ApiResult<RuleChapter> {
    client
        .get_json(&format!("rule-chapters/{id}/"))
        .await
        .inspect_err(|e| tracing::error!(chapter_id = id, error = %e, "Failed to fetch rule chapter"))
}

pub async fn create_chapter(client: &ApiClient, draft: &ChapterDraft) -> ApiResult<RuleChapter> {
    client
        .post_json("rule-chapters/", draft)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to create rule chapter"))
}

pub async fn update_chapter(
    client: &ApiClient,
    id: Id,
    draft: &ChapterDraft,
) -> ApiResult<RuleChapter> {
    client
        .patch_json(&format!("rule-chapters/{id}/"), draft)
        .await
        .inspect_err(|e| tracing::error!(chapter_id = id, error = %e, "Failed to update rule chapter"))
}

pub async fn delete_chapter(client: &ApiClient, id: Id) -> ApiResult<()> {
    client
        .delete(&format!("rule-chapters/{id}/"))
        .await
        .inspect_err(|e| tracing::error!(chapter_id = id, error = %e, "Failed to delete rule chapter"))
}

// Dimensions

/// All dimensions, or only those of `chapter`
pub async fn list_dimensions(
    client: &ApiClient,
    chapter: Option<Id>,
) -> ApiResult<Vec<RuleDimension>> {
    client
        .get_json_with("rule-dimensions/", &ByChapter { chapter })
        .await
        .inspect_err(|e| tracing::error!(?chapter, error = %e, "Failed to fetch rule dimensions"))
}

pub async fn get_dimension(client: &ApiClient, id: Id) -> ApiResult<RuleDimension> {
    client
        .get_json(&format!("rule-dimensions/{id}/"))
        .await
        .inspect_err(|e| tracing::error!(dimension_id = id, error = %e, "Failed to fetch rule dimension"))
}

pub async fn create_dimension(
    client: &ApiClient,
    draft: &DimensionDraft,
) -> ApiResult<RuleDimension> {
    client
        .post_json("rule-dimensions/", draft)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to create rule dimension"))
}

pub async fn update_dimension(
    client: &ApiClient,
    id: Id,
    draft: &DimensionDraft,
) -> ApiResult<RuleDimension> {
    client
        .patch_json(&format!("rule-dimensions/{id}/"), draft)
        .await
        .inspect_err(|e| tracing::error!(dimension_id = id, error = %e, "Failed to update rule dimension"))
}

pub async fn delete_dimension(client: &ApiClient, id: Id) -> ApiResult<()> {
    client
        .delete(&format!("rule-dimensions/{id}/"))
        .await
        .inspect_err(|e| tracing::error!(dimension_id = id, error = %e, "Failed to delete rule dimension"))
}

// Sub-items

/// All sub-items, or only those of `dimension`
pub async fn list_sub_items(
    client: &ApiClient,
    dimension: Option<Id>,
) -> ApiResult<Vec<RuleSubItem>> {
    client
        .get_json_with("rule-subitems/", &ByDimension { dimension })
        .await
        .inspect_err(|e| tracing::error!(?dimension, error = %e, "Failed to fetch rule sub-items"))
}

pub async fn get_sub_item(client: &ApiClient, id: Id) -> ApiResult<RuleSubItem> {
    client
        .get_json(&format!("rule-subitems/{id}/"))
        .await
        .inspect_err(|e| tracing::error!(sub_item_id = id, error = %e, "Failed to fetch rule sub-item"))
}

pub async fn create_sub_item(client: &ApiClient, draft: &SubItemDraft) -> ApiResult<RuleSubItem> {
    client
        .post_json("rule-subitems/", draft)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to create rule sub-item"))
}

pub async fn update_sub_item(
    client: &ApiClient,
    id: Id,
    draft: &SubItemDraft,
) -> ApiResult<RuleSubItem> {
    client
        .patch_json(&format!("rule-subitems/{id}/"), draft)
        .await
        .inspect_err(|e| tracing::error!(sub_item_id = id, error = %e, "Failed to update rule sub-item"))
}

pub async fn delete_sub_item(client: &ApiClient, id: Id) -> ApiResult<()> {
    client
        .delete(&format!("rule-subitems/{id}/"))
        .await
        .inspect_err(|e| tracing::error!(sub_item_id = id, error = %e, "Failed to delete rule sub-item"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;
    use crate::test_support::{client_for, spawn_backend};
    use axum::{
        extract::{Path, RawQuery},
        routing::{get, patch},
        Json, Router,
    };
    use serde_json::{json, Value};

    fn dimensions_backend() -> Router {
        Router::new().route(
            "/api/rule-dimensions/",
            get(|RawQuery(query): RawQuery| async move {
                let all = json!([
                    { "id": 10, "chapter": 1, "name": "Honesty" },
                    { "id": 11, "chapter": 2, "name": "Diligence" }
                ]);
                match query.as_deref() {
                    Some("chapter=2") => Json(json!([all[1].clone()])),
                    None | Some("") => Json(all),
                    Some(other) => panic!("unexpected query {other}"),
                }
            }),
        )
    }

    #[tokio::test]
    async fn test_list_dimensions_filter_is_optional() {
        let base_url = spawn_backend(dimensions_backend()).await;
        let client = client_for(&base_url, SessionStore::in_memory());

        let all = list_dimensions(&client, None).await.unwrap();
        assert_eq!(all.len(), 2);

        let second = list_dimensions(&client, Some(2)).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].name, "Diligence");
    }

    #[tokio::test]
    async fn test_update_sub_item_is_patch() {
        let router = Router::new().route(
            "/api/rule-subitems/:id/",
            patch(|Path(id): Path<u64>, Json(body): Json<Value>| async move {
                Json(json!({
                    "id": id,
                    "dimension": body["dimension"],
                    "name": body["name"],
                    "max_score": body["max_score"]
                }))
            }),
        );
        let base_url = spawn_backend(router).await;
        let client = client_for(&base_url, SessionStore::in_memory());

        let draft = SubItemDraft {
            dimension: Some(10),
            name: "Returns lost property".to_string(),
            max_score: Some(5),
            ..Default::default()
        };
        let item = update_sub_item(&client, 100, &draft).await.unwrap();
        assert_eq!(item.id, 100);
        assert_eq!(item.max_score, Some(5));
    }
}
