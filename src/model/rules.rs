//! Behavior rule taxonomy: chapters contain dimensions contain sub-items

use super::Id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleChapter {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: u32,
    /// Present only when the backend nests the tree
    #[serde(default)]
    pub dimensions: Option<Vec<RuleDimension>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleDimension {
    pub id: Id,
    pub chapter: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub sub_items: Option<Vec<RuleSubItem>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleSubItem {
    pub id: Id,
    pub dimension: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub max_score: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ChapterDraft {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DimensionDraft {
    pub chapter: Option<Id>,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SubItemDraft {
    pub dimension: Option<Id>,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_score: Option<i32>,
}

/// Fully resolved taxonomy, assembled client-side from flat listings
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RuleTree {
    pub chapters: Vec<ChapterNode>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChapterNode {
    pub chapter: RuleChapter,
    pub dimensions: Vec<DimensionNode>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DimensionNode {
    pub dimension: RuleDimension,
    pub sub_items: Vec<RuleSubItem>,
}

impl RuleTree {
    /// Group flat listings by parent id, each level sorted by `order` then name.
    /// Orphans (parent not in the listing) are dropped.
    pub fn assemble(
        mut chapters: Vec<RuleChapter>,
        mut dimensions: Vec<RuleDimension>,
        mut sub_items: Vec<RuleSubItem>,
    ) -> Self {
        chapters.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        dimensions.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        sub_items.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));

        let chapters = chapters
            .into_iter()
            .map(|chapter| {
                let dimensions = dimensions
                    .iter()
                    .filter(|d| d.chapter == chapter.id)
                    .map(|dimension| DimensionNode {
                        sub_items: sub_items
                            .iter()
                            .filter(|s| s.dimension == dimension.id)
                            .cloned()
                            .collect(),
                        dimension: dimension.clone(),
                    })
                    .collect();
                ChapterNode {
                    chapter,
                    dimensions,
                }
            })
            .collect();

        Self { chapters }
    }

    pub fn sub_item_count(&self) -> usize {
        self.chapters
            .iter()
            .flat_map(|c| &c.dimensions)
            .map(|d| d.sub_items.len())
            .sum()
    }
}
