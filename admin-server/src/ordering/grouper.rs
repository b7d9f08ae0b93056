//! Grouper - category groups over the variations of one menu item
//!
//! 分组不落库：每次读取都由 variation 的 `category` / `sort` 重新推导。
//! Every operation rewrites member placements through the [`VariationStore`]
//! and returns the groups recomputed from the written state.

use super::group_key::GroupKey;
use super::sequencer::check_permutation;
use super::store::{VariationDraft, VariationPlacement, VariationStore};
use super::view::OrderedView;
use super::{OrderingError, OrderingResult, WriteMode};
use serde::Serialize;
use shared::models::{Variation, VariationCreate};
use std::collections::HashMap;

/// A derived category bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub key: GroupKey,
    /// Display name; empty for anonymous and placeholder groups
    pub label: String,
    /// Minimum `sort` among members; `None` sorts after every ranked group
    pub rank: Option<i32>,
    pub members: Vec<Variation>,
}

impl Group {
    fn max_sort_order(&self) -> i32 {
        self.members.iter().map(|v| v.sort_order).max().unwrap_or(0)
    }
}

/// Partition variations by group key
///
/// Members keep input order. Groups are ordered by rank ascending, unset
/// ranks last, equal ranks in the order their first member was encountered.
pub fn group_by(variations: &[Variation]) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for variation in variations {
        let key = GroupKey::resolve(variation.category.as_deref());
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(Group {
                label: key.label().to_string(),
                key,
                rank: None,
                members: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.rank = match (group.rank, variation.sort) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        group.members.push(variation.clone());
    }

    // stable: ties keep first-seen order
    groups.sort_by_key(|g| (g.rank.is_none(), g.rank));
    groups
}

/// Apply placements to a copy of `rows` and regroup in fetch order
fn settle(rows: &[Variation], placements: &[VariationPlacement]) -> Vec<Group> {
    let mut rows = rows.to_vec();
    for placement in placements {
        if let Some(row) = rows.iter_mut().find(|v| v.id == placement.id) {
            placement.apply_to(row);
        }
    }
    rows.sort_by_key(|v| (v.sort_order, v.id));
    group_by(&rows)
}

fn find_group<'a>(groups: &'a [Group], key: &GroupKey) -> OrderingResult<&'a Group> {
    groups
        .iter()
        .find(|g| &g.key == key)
        .ok_or_else(|| OrderingError::GroupNotFound(key.to_string()))
}

pub struct Grouper<S> {
    store: S,
    mode: WriteMode,
}

impl<S: VariationStore> Grouper<S> {
    pub fn new(store: S, mode: WriteMode) -> Self {
        Self { store, mode }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn groups(&self) -> OrderingResult<Vec<Group>> {
        let rows = self.store.fetch_variations().await?;
        Ok(group_by(&rows))
    }

    /// Rename a group
    ///
    /// A name that trims to empty turns a named group into a placeholder
    /// anchored on its first member, so it never falls into the anonymous
    /// bucket. Non-empty names are stored verbatim.
    pub async fn rename(&self, key: &GroupKey, new_name: &str) -> OrderingResult<Vec<Group>> {
        let rows = self.store.fetch_variations().await?;
        let groups = group_by(&rows);
        let group = find_group(&groups, key)?;

        let target = if new_name.trim().is_empty() {
            match key {
                GroupKey::Named { .. } => match group.members.first() {
                    Some(anchor) => GroupKey::placeholder_for(anchor.id),
                    None => return Err(OrderingError::GroupNotFound(key.to_string())),
                },
                // already without a label
                GroupKey::Anonymous | GroupKey::Placeholder { .. } => return Ok(groups),
            }
        } else {
            if GroupKey::is_reserved_name(new_name) {
                return Err(OrderingError::ReservedName(new_name.to_string()));
            }
            GroupKey::named(new_name)
        };

        if &target == key {
            return Ok(groups);
        }
        if groups.iter().any(|g| g.key == target) {
            return Err(OrderingError::NameInUse(new_name.to_string()));
        }

        tracing::info!(from = %key, to = %target, members = group.members.len(), "Renaming group");
        let category = target.category_value();
        let placements = group
            .members
            .iter()
            .map(|v| VariationPlacement {
                category: category.clone(),
                ..VariationPlacement::of(v)
            })
            .collect();
        self.write(&rows, placements).await
    }

    /// Set (or clear with `None`) the rank of every member
    pub async fn set_rank(&self, key: &GroupKey, rank: Option<i32>) -> OrderingResult<Vec<Group>> {
        if let Some(r) = rank
            && r < 1
        {
            return Err(OrderingError::InvalidRank(r));
        }
        let rows = self.store.fetch_variations().await?;
        let groups = group_by(&rows);
        let group = find_group(&groups, key)?;

        tracing::info!(group = %key, ?rank, "Setting group rank");
        let placements = group
            .members
            .iter()
            .map(|v| VariationPlacement {
                sort: rank,
                ..VariationPlacement::of(v)
            })
            .collect();
        self.write(&rows, placements).await
    }

    /// Create a variation inside a group
    ///
    /// Joining an existing group takes its rank and goes after its last
    /// member. A named or anonymous key with no members starts a new group;
    /// a placeholder key must already exist.
    pub async fn add_member(
        &self,
        key: &GroupKey,
        data: VariationCreate,
    ) -> OrderingResult<Variation> {
        if let GroupKey::Named { name } = key
            && GroupKey::is_reserved_name(name)
        {
            return Err(OrderingError::ReservedName(name.clone()));
        }
        // a blank name is the anonymous bucket
        let key = GroupKey::resolve(key.category_value().as_deref());

        let groups = self.groups().await?;
        let (sort, sort_order) = match groups.iter().find(|g| g.key == key) {
            Some(group) => (group.rank, group.max_sort_order() + 1),
            None if matches!(key, GroupKey::Placeholder { .. }) => {
                return Err(OrderingError::GroupNotFound(key.to_string()));
            }
            None => (None, 1),
        };

        let draft = VariationDraft {
            name: data.name,
            price: data.price,
            category: key.category_value(),
            sort,
            sort_order,
        };
        let created = self.store.insert_variation(draft).await?;
        tracing::info!(id = created.id, group = %key, sort_order, "Variation added to group");
        Ok(created)
    }

    /// Dissolve a group into the anonymous bucket
    ///
    /// Members lose their category and rank and are appended after the
    /// existing anonymous variations. Nothing is deleted.
    pub async fn delete_group(&self, key: &GroupKey, confirmed: bool) -> OrderingResult<Vec<Group>> {
        if !confirmed {
            return Err(OrderingError::ConfirmationRequired);
        }
        let rows = self.store.fetch_variations().await?;
        let groups = group_by(&rows);
        let group = find_group(&groups, key)?;

        let base = if key.is_anonymous() {
            0
        } else {
            groups
                .iter()
                .find(|g| g.key.is_anonymous())
                .map(Group::max_sort_order)
                .unwrap_or(0)
        };

        tracing::info!(group = %key, members = group.members.len(), "Deleting group");
        let placements = group
            .members
            .iter()
            .enumerate()
            .map(|(i, v)| VariationPlacement {
                id: v.id,
                category: None,
                sort: None,
                sort_order: base + i as i32 + 1,
            })
            .collect();
        self.write(&rows, placements).await
    }

    /// Rank groups by position: the group at index `i` gets `sort = i + 1`
    pub async fn reorder_groups(&self, new_order: &[GroupKey]) -> OrderingResult<Vec<Group>> {
        let rows = self.store.fetch_variations().await?;
        let groups = group_by(&rows);
        let present: Vec<GroupKey> = groups.iter().map(|g| g.key.clone()).collect();
        check_permutation(&present, new_order)?;

        tracing::info!(count = new_order.len(), mode = %self.mode, "Reordering groups");
        let mut placements = Vec::with_capacity(rows.len());
        for (i, key) in new_order.iter().enumerate() {
            let group = find_group(&groups, key)?;
            placements.extend(group.members.iter().map(|v| VariationPlacement {
                sort: Some(i as i32 + 1),
                ..VariationPlacement::of(v)
            }));
        }
        self.write(&rows, placements).await
    }

    /// Reorder the members of one group: `sort_order = i + 1`
    pub async fn reorder_members(&self, key: &GroupKey, ids: &[i64]) -> OrderingResult<Vec<Group>> {
        let rows = self.store.fetch_variations().await?;
        let groups = group_by(&rows);
        let group = find_group(&groups, key)?;
        let present: Vec<i64> = group.members.iter().map(|v| v.id).collect();
        check_permutation(&present, ids)?;

        tracing::info!(group = %key, count = ids.len(), "Reordering group members");
        let placements = ids
            .iter()
            .enumerate()
            .filter_map(|(i, id)| {
                group.members.iter().find(|v| v.id == *id).map(|v| VariationPlacement {
                    sort_order: i as i32 + 1,
                    ..VariationPlacement::of(v)
                })
            })
            .collect();
        self.write(&rows, placements).await
    }

    /// Group reorder with the new order shown immediately in `view`
    pub async fn reorder_groups_optimistic(
        &self,
        view: &mut OrderedView<Group>,
        new_order: &[GroupKey],
    ) -> OrderingResult<()> {
        let guess: Vec<Group> = new_order
            .iter()
            .enumerate()
            .filter_map(|(i, key)| {
                view.items().iter().find(|g| &g.key == key).map(|g| Group {
                    rank: Some(i as i32 + 1),
                    ..g.clone()
                })
            })
            .collect();
        view.stage(guess);

        match self.reorder_groups(new_order).await {
            Ok(settled) => {
                view.confirm(settled);
                Ok(())
            }
            Err(err) => {
                match self.groups().await {
                    Ok(fresh) => view.reconcile(fresh),
                    Err(e) => tracing::warn!(error = %e, "Re-read after failed write also failed"),
                }
                Err(err)
            }
        }
    }

    /// Persist the placements that differ from `rows`, then regroup
    async fn write(
        &self,
        rows: &[Variation],
        placements: Vec<VariationPlacement>,
    ) -> OrderingResult<Vec<Group>> {
        let changes: Vec<VariationPlacement> = placements
            .into_iter()
            .filter(|p| {
                rows.iter()
                    .find(|v| v.id == p.id)
                    .is_none_or(|v| &VariationPlacement::of(v) != p)
            })
            .collect();

        match self.mode {
            WriteMode::Atomic => {
                if !changes.is_empty() {
                    self.store.place_all(&changes).await.map_err(|e| {
                        tracing::error!(count = changes.len(), error = %e, "Batch placement failed");
                        OrderingError::Write(e)
                    })?;
                }
            }
            WriteMode::Sequential => {
                for (applied, placement) in changes.iter().enumerate() {
                    if let Err(e) = self.store.place(placement).await {
                        tracing::error!(id = placement.id, error = %e, "Failed to update variation");
                        return Err(OrderingError::batch(applied, changes.len(), e));
                    }
                }
            }
        }
        tracing::debug!(updated = changes.len(), "Group placements written");
        Ok(settle(rows, &changes))
    }
}
