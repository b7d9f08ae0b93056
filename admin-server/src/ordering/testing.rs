//! In-memory stores with write-failure injection for engine tests

use super::store::{RankEntry, RankStore, VariationDraft, VariationPlacement, VariationStore};
use crate::db::repository::{RepoError, RepoResult};
use async_trait::async_trait;
use shared::SortOrderItem;
use shared::models::Variation;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

fn injected() -> RepoError {
    RepoError::Database("injected write failure".into())
}

/// Counts write calls and fails the one at `fail_at` (0-based)
#[derive(Default)]
struct WriteCounter {
    calls: AtomicUsize,
    fail_at: Option<usize>,
}

impl WriteCounter {
    fn next(&self) -> RepoResult<()> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(n) {
            return Err(injected());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryRankStore {
    rows: Mutex<Vec<RankEntry>>,
    writes: WriteCounter,
}

impl MemoryRankStore {
    pub fn with_ranks(ranks: &[(i64, i32)]) -> Self {
        Self {
            rows: Mutex::new(ranks.iter().map(|&(id, rank)| RankEntry::new(id, rank)).collect()),
            writes: WriteCounter::default(),
        }
    }

    pub fn failing_at(mut self, call: usize) -> Self {
        self.writes.fail_at = Some(call);
        self
    }

    /// (id, rank) pairs sorted by rank then id
    pub fn ranks(&self) -> Vec<(i64, i32)> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by_key(|e| (e.rank, e.id));
        rows.into_iter().map(|e| (e.id, e.rank)).collect()
    }

    pub fn write_calls(&self) -> usize {
        self.writes.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RankStore for MemoryRankStore {
    async fn fetch_all(&self) -> RepoResult<Vec<RankEntry>> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by_key(|e| (e.rank, e.id));
        Ok(rows)
    }

    async fn set_rank(&self, id: i64, rank: i32) -> RepoResult<()> {
        self.writes.next()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| RepoError::NotFound(format!("row {id}")))?;
        row.rank = rank;
        Ok(())
    }

    async fn apply_ranks(&self, items: &[SortOrderItem]) -> RepoResult<()> {
        self.writes.next()?;
        let mut rows = self.rows.lock().unwrap();
        if let Some(missing) = items.iter().find(|i| !rows.iter().any(|e| e.id == i.id)) {
            return Err(RepoError::NotFound(format!("row {}", missing.id)));
        }
        for item in items {
            if let Some(row) = rows.iter_mut().find(|e| e.id == item.id) {
                row.rank = item.sort_order;
            }
        }
        Ok(())
    }
}

pub fn variation(id: i64, category: Option<&str>, sort: Option<i32>, sort_order: i32) -> Variation {
    Variation {
        id,
        menu_item_id: 1,
        name: format!("Package {id}"),
        price: 100 * id,
        category: category.map(str::to_string),
        sort,
        sort_order,
        is_active: true,
        created_at: 0,
        updated_at: 0,
    }
}

#[derive(Default)]
pub struct MemoryVariationStore {
    rows: Mutex<Vec<Variation>>,
    next_id: AtomicUsize,
    writes: WriteCounter,
}

impl MemoryVariationStore {
    pub fn with_rows(rows: Vec<Variation>) -> Self {
        let next = rows.iter().map(|v| v.id).max().unwrap_or(0) as usize + 1;
        Self {
            rows: Mutex::new(rows),
            next_id: AtomicUsize::new(next),
            writes: WriteCounter::default(),
        }
    }

    pub fn failing_at(mut self, call: usize) -> Self {
        self.writes.fail_at = Some(call);
        self
    }

    pub fn row(&self, id: i64) -> Variation {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .unwrap()
    }

    pub fn write_calls(&self) -> usize {
        self.writes.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VariationStore for MemoryVariationStore {
    async fn fetch_variations(&self) -> RepoResult<Vec<Variation>> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by_key(|v| (v.sort_order, v.id));
        Ok(rows)
    }

    async fn place(&self, placement: &VariationPlacement) -> RepoResult<()> {
        self.writes.next()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|v| v.id == placement.id)
            .ok_or_else(|| RepoError::NotFound(format!("variation {}", placement.id)))?;
        placement.apply_to(row);
        Ok(())
    }

    async fn place_all(&self, placements: &[VariationPlacement]) -> RepoResult<()> {
        self.writes.next()?;
        let mut rows = self.rows.lock().unwrap();
        for placement in placements {
            if let Some(row) = rows.iter_mut().find(|v| v.id == placement.id) {
                placement.apply_to(row);
            }
        }
        Ok(())
    }

    async fn insert_variation(&self, draft: VariationDraft) -> RepoResult<Variation> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
        let mut row = variation(id, draft.category.as_deref(), draft.sort, draft.sort_order);
        row.name = draft.name;
        row.price = draft.price;
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }
}
