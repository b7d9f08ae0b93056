//! Rank Repository
//!
//! `sort_order` access shared by every flat ranked table.

use super::{RepoError, RepoResult};
use crate::ordering::{RankEntry, RankStore};
use async_trait::async_trait;
use shared::SortOrderItem;
use sqlx::{SqliteConnection, SqlitePool};

/// One ranked collection: a table, optionally narrowed to one parent
#[derive(Debug, Clone, Copy)]
pub struct RankScope {
    table: &'static str,
    parent: Option<(&'static str, i64)>,
}

impl RankScope {
    /// The whole catalog
    pub fn menu_items() -> Self {
        Self {
            table: "menu_item",
            parent: None,
        }
    }

    /// The payment methods of one admin group
    pub fn payment_methods(admin_group_id: i64) -> Self {
        Self {
            table: "payment_method",
            parent: Some(("admin_group_id", admin_group_id)),
        }
    }

    fn filter(&self) -> String {
        match self.parent {
            Some((column, _)) => format!(" AND {column} = ?"),
            None => String::new(),
        }
    }

    /// (id, sort_order) sorted by sort_order then id
    pub async fn fetch(&self, conn: &mut SqliteConnection) -> RepoResult<Vec<RankEntry>> {
        let sql = format!(
            "SELECT id, sort_order FROM {} WHERE 1 = 1{} ORDER BY sort_order, id",
            self.table,
            self.filter()
        );
        let mut query = sqlx::query_as::<_, (i64, i32)>(&sql);
        if let Some((_, parent_id)) = self.parent {
            query = query.bind(parent_id);
        }
        let rows = query.fetch_all(&mut *conn).await?;
        Ok(rows
            .into_iter()
            .map(|(id, rank)| RankEntry::new(id, rank))
            .collect())
    }

    /// Rank for a row appended after the current last one
    pub async fn next_rank(&self, conn: &mut SqliteConnection) -> RepoResult<i32> {
        let sql = format!(
            "SELECT COALESCE(MAX(sort_order), 0) FROM {} WHERE 1 = 1{}",
            self.table,
            self.filter()
        );
        let mut query = sqlx::query_scalar::<_, i32>(&sql);
        if let Some((_, parent_id)) = self.parent {
            query = query.bind(parent_id);
        }
        Ok(query.fetch_one(&mut *conn).await? + 1)
    }

    pub async fn set(&self, conn: &mut SqliteConnection, id: i64, rank: i32) -> RepoResult<()> {
        let sql = format!(
            "UPDATE {} SET sort_order = ?, updated_at = ? WHERE id = ?{}",
            self.table,
            self.filter()
        );
        let mut query = sqlx::query(&sql)
            .bind(rank)
            .bind(shared::util::now_millis())
            .bind(id);
        if let Some((_, parent_id)) = self.parent {
            query = query.bind(parent_id);
        }
        let rows = query.execute(&mut *conn).await?;
        if rows.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("{} {id} not found", self.table)));
        }
        Ok(())
    }

    /// Renumber the collection to 1..N in current order; returns rows touched
    pub async fn compact(&self, conn: &mut SqliteConnection) -> RepoResult<usize> {
        let current = self.fetch(conn).await?;
        let mut touched = 0;
        for (i, entry) in current.iter().enumerate() {
            let rank = i as i32 + 1;
            if entry.rank != rank {
                self.set(conn, entry.id, rank).await?;
                touched += 1;
            }
        }
        Ok(touched)
    }
}

/// [`RankStore`] over one SQLite collection
#[derive(Clone)]
pub struct SqliteRankStore {
    pool: SqlitePool,
    scope: RankScope,
}

impl SqliteRankStore {
    pub fn new(pool: SqlitePool, scope: RankScope) -> Self {
        Self { pool, scope }
    }

    pub fn menu_items(pool: SqlitePool) -> Self {
        Self::new(pool, RankScope::menu_items())
    }

    pub fn payment_methods(pool: SqlitePool, admin_group_id: i64) -> Self {
        Self::new(pool, RankScope::payment_methods(admin_group_id))
    }
}

#[async_trait]
impl RankStore for SqliteRankStore {
    async fn fetch_all(&self) -> RepoResult<Vec<RankEntry>> {
        let mut conn = self.pool.acquire().await?;
        self.scope.fetch(&mut conn).await
    }

    async fn set_rank(&self, id: i64, rank: i32) -> RepoResult<()> {
        let mut conn = self.pool.acquire().await?;
        self.scope.set(&mut conn, id, rank).await
    }

    async fn apply_ranks(&self, items: &[SortOrderItem]) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;
        for item in items {
            self.scope.set(&mut tx, item.id, item.sort_order).await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn seed(pool: &SqlitePool, table: &str, rows: &[(i64, i64, i32)]) {
        for &(id, parent, rank) in rows {
            let sql = match table {
                "menu_item" => "INSERT INTO menu_item (id, name, sort_order, created_at, updated_at) VALUES (?, 'item', ?, 0, 0)",
                _ => "INSERT INTO payment_method (id, admin_group_id, name, sort_order, created_at, updated_at) VALUES (?, ?, 'pm', ?, 0, 0)",
            };
            let query = sqlx::query(sql).bind(id);
            let query = if table == "menu_item" { query } else { query.bind(parent) };
            query.bind(rank).execute(pool).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_fetch_is_scoped_and_sorted() {
        let db = DbService::memory().await.unwrap();
        seed(
            &db.pool,
            "payment_method",
            &[(1, 10, 2), (2, 10, 1), (3, 20, 1), (4, 10, 2)],
        )
        .await;

        let store = SqliteRankStore::payment_methods(db.pool.clone(), 10);
        let entries = store.fetch_all().await.unwrap();

        assert_eq!(
            entries,
            vec![RankEntry::new(2, 1), RankEntry::new(1, 2), RankEntry::new(4, 2)]
        );
    }

    #[tokio::test]
    async fn test_set_rank_outside_scope_is_not_found() {
        let db = DbService::memory().await.unwrap();
        seed(&db.pool, "payment_method", &[(1, 10, 1), (2, 20, 1)]).await;

        let store = SqliteRankStore::payment_methods(db.pool.clone(), 10);

        assert!(matches!(
            store.set_rank(2, 5).await,
            Err(RepoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_apply_ranks_rolls_back_on_missing_row() {
        let db = DbService::memory().await.unwrap();
        seed(&db.pool, "menu_item", &[(1, 0, 1), (2, 0, 2)]).await;
        let store = SqliteRankStore::menu_items(db.pool.clone());

        let result = store
            .apply_ranks(&[
                SortOrderItem { id: 1, sort_order: 2 },
                SortOrderItem { id: 99, sort_order: 1 },
            ])
            .await;

        assert!(matches!(result, Err(RepoError::NotFound(_))));
        assert_eq!(
            store.fetch_all().await.unwrap(),
            vec![RankEntry::new(1, 1), RankEntry::new(2, 2)]
        );
    }

    #[tokio::test]
    async fn test_next_rank_and_compact() {
        let db = DbService::memory().await.unwrap();
        seed(&db.pool, "menu_item", &[(1, 0, 3), (2, 0, 7), (3, 0, 7)]).await;
        let scope = RankScope::menu_items();
        let mut conn = db.pool.acquire().await.unwrap();

        assert_eq!(scope.next_rank(&mut conn).await.unwrap(), 8);
        assert_eq!(scope.compact(&mut conn).await.unwrap(), 3);
        assert_eq!(
            scope.fetch(&mut conn).await.unwrap(),
            vec![RankEntry::new(1, 1), RankEntry::new(2, 2), RankEntry::new(3, 3)]
        );
        assert_eq!(scope.next_rank(&mut conn).await.unwrap(), 4);
    }
}
