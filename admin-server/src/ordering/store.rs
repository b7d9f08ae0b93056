//! Storage seams of the ordering engine

use crate::db::repository::RepoResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::SortOrderItem;
use shared::models::Variation;

/// One row of a ranked collection as the engine sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub id: i64,
    pub rank: i32,
}

impl RankEntry {
    pub fn new(id: i64, rank: i32) -> Self {
        Self { id, rank }
    }
}

impl From<RankEntry> for SortOrderItem {
    fn from(entry: RankEntry) -> Self {
        SortOrderItem {
            id: entry.id,
            sort_order: entry.rank,
        }
    }
}

/// A flat collection with a persisted integer rank per row
///
/// A store instance is bound to exactly one collection (all menu items, or
/// the payment methods of one admin group).
#[async_trait]
pub trait RankStore: Send + Sync {
    /// Every row of the collection, sorted by rank ascending then id
    async fn fetch_all(&self) -> RepoResult<Vec<RankEntry>>;

    /// Update exactly one row
    async fn set_rank(&self, id: i64, rank: i32) -> RepoResult<()>;

    /// Update every listed row in a single transaction
    async fn apply_ranks(&self, items: &[SortOrderItem]) -> RepoResult<()>;
}

/// Complete group placement of one variation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationPlacement {
    pub id: i64,
    pub category: Option<String>,
    pub sort: Option<i32>,
    pub sort_order: i32,
}

impl VariationPlacement {
    /// Current placement of a variation
    pub fn of(variation: &Variation) -> Self {
        Self {
            id: variation.id,
            category: variation.category.clone(),
            sort: variation.sort,
            sort_order: variation.sort_order,
        }
    }

    pub fn apply_to(&self, variation: &mut Variation) {
        variation.category = self.category.clone();
        variation.sort = self.sort;
        variation.sort_order = self.sort_order;
    }
}

/// A variation about to be inserted into a group
#[derive(Debug, Clone)]
pub struct VariationDraft {
    pub name: String,
    pub price: i64,
    pub category: Option<String>,
    pub sort: Option<i32>,
    pub sort_order: i32,
}

/// The variations of one menu item
#[async_trait]
pub trait VariationStore: Send + Sync {
    /// Every variation of the menu item, sorted by sort_order then id
    async fn fetch_variations(&self) -> RepoResult<Vec<Variation>>;

    /// Rewrite one variation's category, sort and sort_order
    async fn place(&self, placement: &VariationPlacement) -> RepoResult<()>;

    /// Rewrite every listed variation in a single transaction
    async fn place_all(&self, placements: &[VariationPlacement]) -> RepoResult<()>;

    async fn insert_variation(&self, draft: VariationDraft) -> RepoResult<Variation>;
}
