//! Sequencer - dense ranks over a flat collection
//!
//! Every operation leaves the collection ranked exactly `1..N`.

use super::store::{RankEntry, RankStore};
use super::view::OrderedView;
use super::{OrderingError, OrderingResult, WriteMode};
use shared::SortOrderItem;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;

/// Writes of a shift-insert, in the order they are issued, plus the settled
/// collection they converge to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftPlan {
    pub steps: Vec<SortOrderItem>,
    pub settled: Vec<RankEntry>,
}

/// Renumber `1..N` in rank order; equal ranks keep their relative order
pub fn normalize(entries: &[RankEntry]) -> Vec<RankEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|e| e.rank);
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, e)| RankEntry::new(e.id, i as i32 + 1))
        .collect()
}

/// Place `moving_id` at `target`, pushing every other row at or beyond the
/// target down by one (highest rank first), then close gaps.
///
/// `current` must be sorted by rank; the caller checks that `moving_id` is in it.
pub fn plan_shift_insert(current: &[RankEntry], target: i32, moving_id: i64) -> ShiftPlan {
    let mut working = current.to_vec();
    let mut steps = Vec::new();

    let mut shifted: Vec<usize> = working
        .iter()
        .enumerate()
        .filter(|(_, e)| e.id != moving_id && e.rank >= target)
        .map(|(i, _)| i)
        .collect();
    shifted.sort_by(|a, b| working[*b].rank.cmp(&working[*a].rank));

    for idx in shifted {
        working[idx].rank += 1;
        steps.push(working[idx].into());
    }

    if let Some(moving) = working.iter_mut().find(|e| e.id == moving_id) {
        moving.rank = target;
        steps.push((*moving).into());
    }

    let settled = normalize(&working);
    let after_shift: HashMap<i64, i32> = working.iter().map(|e| (e.id, e.rank)).collect();
    steps.extend(
        settled
            .iter()
            .filter(|e| after_shift.get(&e.id) != Some(&e.rank))
            .map(|e| SortOrderItem::from(*e)),
    );

    ShiftPlan { steps, settled }
}

/// Rows whose rank differs between `before` and `after`
fn changed(before: &[RankEntry], after: &[RankEntry]) -> Vec<SortOrderItem> {
    let old: HashMap<i64, i32> = before.iter().map(|e| (e.id, e.rank)).collect();
    after
        .iter()
        .filter(|e| old.get(&e.id) != Some(&e.rank))
        .map(|e| SortOrderItem::from(*e))
        .collect()
}

/// `requested` must list every key of `present` exactly once
pub(crate) fn check_permutation<K>(present: &[K], requested: &[K]) -> OrderingResult<()>
where
    K: Eq + Hash + Display,
{
    let known: HashSet<&K> = present.iter().collect();
    let mut seen = HashSet::with_capacity(requested.len());
    for key in requested {
        if !known.contains(key) {
            return Err(OrderingError::InvalidPermutation(format!("unknown {key}")));
        }
        if !seen.insert(key) {
            return Err(OrderingError::InvalidPermutation(format!("duplicate {key}")));
        }
    }
    if seen.len() != known.len() {
        return Err(OrderingError::InvalidPermutation(format!(
            "expected {} entries, got {}",
            known.len(),
            seen.len()
        )));
    }
    Ok(())
}

pub struct Sequencer<S> {
    store: S,
    mode: WriteMode,
}

impl<S: RankStore> Sequencer<S> {
    pub fn new(store: S, mode: WriteMode) -> Self {
        Self { store, mode }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current collection, sorted by rank
    pub async fn fetch(&self) -> OrderingResult<Vec<RankEntry>> {
        Ok(self.store.fetch_all().await?)
    }

    /// Move one entity to `target_rank` and renumber the collection
    pub async fn shift_insert(
        &self,
        target_rank: i32,
        moving_id: i64,
    ) -> OrderingResult<Vec<RankEntry>> {
        if target_rank < 1 {
            return Err(OrderingError::InvalidRank(target_rank));
        }
        let current = self.store.fetch_all().await?;
        if !current.iter().any(|e| e.id == moving_id) {
            return Err(OrderingError::NotFound(moving_id));
        }

        let plan = plan_shift_insert(&current, target_rank, moving_id);
        tracing::info!(
            id = moving_id,
            target_rank,
            mode = %self.mode,
            "Shift-insert requested"
        );

        match self.mode {
            WriteMode::Atomic => self.write_atomic(&changed(&current, &plan.settled)).await?,
            WriteMode::Sequential => self.write_sequential(&plan.steps).await?,
        }
        Ok(plan.settled)
    }

    /// Apply a full permutation: the id at position `i` gets rank `i + 1`
    pub async fn reorder(&self, new_order: &[i64]) -> OrderingResult<Vec<RankEntry>> {
        let current = self.store.fetch_all().await?;
        let ids: Vec<i64> = current.iter().map(|e| e.id).collect();
        check_permutation(&ids, new_order)?;
        if current.len() <= 1 {
            return Ok(current);
        }

        let target: Vec<RankEntry> = new_order
            .iter()
            .enumerate()
            .map(|(i, id)| RankEntry::new(*id, i as i32 + 1))
            .collect();
        let changes = changed(&current, &target);
        tracing::info!(
            count = new_order.len(),
            changed = changes.len(),
            mode = %self.mode,
            "Reorder requested"
        );

        match self.mode {
            WriteMode::Atomic => self.write_atomic(&changes).await?,
            WriteMode::Sequential => self.write_sequential(&changes).await?,
        }
        Ok(target)
    }

    /// Reorder with the new order shown immediately in `view`
    pub async fn reorder_optimistic(
        &self,
        view: &mut OrderedView<RankEntry>,
        new_order: &[i64],
    ) -> OrderingResult<()> {
        let guess = new_order
            .iter()
            .enumerate()
            .map(|(i, id)| RankEntry::new(*id, i as i32 + 1))
            .collect();
        view.stage(guess);

        match self.reorder(new_order).await {
            Ok(settled) => {
                view.confirm(settled);
                Ok(())
            }
            Err(err) => {
                self.resync(view).await;
                Err(err)
            }
        }
    }

    /// Shift-insert with the result shown immediately in `view`
    pub async fn shift_insert_optimistic(
        &self,
        view: &mut OrderedView<RankEntry>,
        target_rank: i32,
        moving_id: i64,
    ) -> OrderingResult<()> {
        if target_rank >= 1 && view.items().iter().any(|e| e.id == moving_id) {
            let guess = plan_shift_insert(view.items(), target_rank, moving_id).settled;
            view.stage(guess);
        }

        match self.shift_insert(target_rank, moving_id).await {
            Ok(settled) => {
                view.confirm(settled);
                Ok(())
            }
            Err(err) => {
                self.resync(view).await;
                Err(err)
            }
        }
    }

    /// Replace the view with a fresh read; a failed read leaves it pending
    async fn resync(&self, view: &mut OrderedView<RankEntry>) {
        match self.store.fetch_all().await {
            Ok(fresh) => view.reconcile(fresh),
            Err(e) => tracing::warn!(error = %e, "Re-read after failed write also failed"),
        }
    }

    async fn write_atomic(&self, items: &[SortOrderItem]) -> OrderingResult<()> {
        if items.is_empty() {
            return Ok(());
        }
        self.store.apply_ranks(items).await.map_err(|e| {
            tracing::error!(count = items.len(), error = %e, "Batch rank update failed");
            OrderingError::Write(e)
        })?;
        tracing::info!(updated = items.len(), "Batch rank update committed");
        Ok(())
    }

    async fn write_sequential(&self, steps: &[SortOrderItem]) -> OrderingResult<()> {
        for (applied, step) in steps.iter().enumerate() {
            tracing::debug!(id = step.id, rank = step.sort_order, "Updating rank");
            if let Err(e) = self.store.set_rank(step.id, step.sort_order).await {
                tracing::error!(id = step.id, error = %e, "Failed to update rank");
                return Err(OrderingError::batch(applied, steps.len(), e));
            }
        }
        tracing::info!(
            updated = steps.len(),
            total = steps.len(),
            "Sequential rank update completed"
        );
        Ok(())
    }
}
