//! Variation Repository
//!
//! Plain CRUD never touches `category`, `sort` or `sort_order`; group
//! placement goes through [`SqliteVariationStore`].

use super::{RepoError, RepoResult, require_name};
use crate::ordering::{VariationDraft, VariationPlacement, VariationStore};
use async_trait::async_trait;
use shared::models::{Variation, VariationUpdate};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str =
    "id, menu_item_id, name, price, category, sort, sort_order, is_active, created_at, updated_at";

/// Variations of a menu item, sorted by sort_order then id
pub async fn find_by_menu_item(pool: &SqlitePool, menu_item_id: i64) -> RepoResult<Vec<Variation>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM variation WHERE menu_item_id = ? ORDER BY sort_order, id"
    );
    let rows = sqlx::query_as::<_, Variation>(&sql)
        .bind(menu_item_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Variation>> {
    let sql = format!("SELECT {COLUMNS} FROM variation WHERE id = ?");
    let row = sqlx::query_as::<_, Variation>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn insert(
    pool: &SqlitePool,
    menu_item_id: i64,
    draft: VariationDraft,
) -> RepoResult<Variation> {
    require_name(&draft.name, "Variation")?;
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    sqlx::query(
        "INSERT INTO variation (id, menu_item_id, name, price, category, sort, sort_order, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?8)",
    )
    .bind(id)
    .bind(menu_item_id)
    .bind(&draft.name)
    .bind(draft.price)
    .bind(&draft.category)
    .bind(draft.sort)
    .bind(draft.sort_order)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create variation".into()))
}

/// Update name, price and active flag
pub async fn update(pool: &SqlitePool, id: i64, data: VariationUpdate) -> RepoResult<Variation> {
    if let Some(name) = &data.name {
        require_name(name, "Variation")?;
    }
    let rows = sqlx::query(
        "UPDATE variation SET name = COALESCE(?1, name), price = COALESCE(?2, price), is_active = COALESCE(?3, is_active), updated_at = ?4 WHERE id = ?5",
    )
    .bind(&data.name)
    .bind(data.price)
    .bind(data.is_active)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Variation {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Variation {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM variation WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Variation {id} not found")));
    }
    Ok(true)
}

async fn place(
    conn: &mut SqliteConnection,
    menu_item_id: i64,
    placement: &VariationPlacement,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE variation SET category = ?1, sort = ?2, sort_order = ?3, updated_at = ?4 WHERE id = ?5 AND menu_item_id = ?6",
    )
    .bind(&placement.category)
    .bind(placement.sort)
    .bind(placement.sort_order)
    .bind(shared::util::now_millis())
    .bind(placement.id)
    .bind(menu_item_id)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Variation {} not found in menu item {menu_item_id}",
            placement.id
        )));
    }
    Ok(())
}

/// [`VariationStore`] over the variations of one menu item
#[derive(Clone)]
pub struct SqliteVariationStore {
    pool: SqlitePool,
    menu_item_id: i64,
}

impl SqliteVariationStore {
    pub fn new(pool: SqlitePool, menu_item_id: i64) -> Self {
        Self { pool, menu_item_id }
    }
}

#[async_trait]
impl VariationStore for SqliteVariationStore {
    async fn fetch_variations(&self) -> RepoResult<Vec<Variation>> {
        find_by_menu_item(&self.pool, self.menu_item_id).await
    }

    async fn place(&self, placement: &VariationPlacement) -> RepoResult<()> {
        let mut conn = self.pool.acquire().await?;
        place(&mut conn, self.menu_item_id, placement).await
    }

    async fn place_all(&self, placements: &[VariationPlacement]) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;
        for placement in placements {
            place(&mut tx, self.menu_item_id, placement).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn insert_variation(&self, draft: VariationDraft) -> RepoResult<Variation> {
        insert(&self.pool, self.menu_item_id, draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::menu_item;
    use crate::ordering::{GroupKey, Grouper, WriteMode};
    use shared::models::{MenuItemCreate, VariationCreate};

    async fn setup() -> (DbService, i64) {
        let db = DbService::memory().await.unwrap();
        let item = menu_item::create(
            &db.pool,
            MenuItemCreate {
                name: "Mobile Legends".into(),
                description: None,
                image: None,
            },
        )
        .await
        .unwrap();
        (db, item.id)
    }

    fn draft(name: &str, category: Option<&str>, sort_order: i32) -> VariationDraft {
        VariationDraft {
            name: name.to_string(),
            price: 1000,
            category: category.map(str::to_string),
            sort: None,
            sort_order,
        }
    }

    #[tokio::test]
    async fn test_place_all_is_transactional() {
        let (db, item_id) = setup().await;
        let store = SqliteVariationStore::new(db.pool.clone(), item_id);
        let v = store
            .insert_variation(draft("86 Diamonds", Some("Diamonds"), 1))
            .await
            .unwrap();

        let result = store
            .place_all(&[
                VariationPlacement {
                    category: Some("Gems".into()),
                    ..VariationPlacement::of(&v)
                },
                VariationPlacement {
                    id: 12345,
                    category: None,
                    sort: None,
                    sort_order: 1,
                },
            ])
            .await;

        assert!(matches!(result, Err(RepoError::NotFound(_))));
        let row = find_by_id(&db.pool, v.id).await.unwrap().unwrap();
        assert_eq!(row.category.as_deref(), Some("Diamonds"));
    }

    #[tokio::test]
    async fn test_store_is_scoped_to_menu_item() {
        let (db, item_id) = setup().await;
        let other = menu_item::create(
            &db.pool,
            MenuItemCreate {
                name: "Free Fire".into(),
                description: None,
                image: None,
            },
        )
        .await
        .unwrap();
        let foreign = insert(&db.pool, other.id, draft("100 Diamonds", None, 1))
            .await
            .unwrap();

        let store = SqliteVariationStore::new(db.pool.clone(), item_id);
        assert!(store.fetch_variations().await.unwrap().is_empty());
        assert!(matches!(
            store.place(&VariationPlacement::of(&foreign)).await,
            Err(RepoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_menu_item_delete_cascades() {
        let (db, item_id) = setup().await;
        let v = insert(&db.pool, item_id, draft("Weekly Pass", None, 1))
            .await
            .unwrap();

        menu_item::delete(&db.pool, item_id).await.unwrap();

        assert!(find_by_id(&db.pool, v.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_does_not_touch_placement() {
        let (db, item_id) = setup().await;
        let v = insert(&db.pool, item_id, draft("Starlight", Some("Passes"), 3))
            .await
            .unwrap();

        let v = update(
            &db.pool,
            v.id,
            VariationUpdate {
                price: Some(4990),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(v.price, 4990);
        assert_eq!(v.category.as_deref(), Some("Passes"));
        assert_eq!(v.sort_order, 3);
    }

    #[tokio::test]
    async fn test_grouper_round_trip_on_sqlite() {
        let (db, item_id) = setup().await;
        let grouper = Grouper::new(
            SqliteVariationStore::new(db.pool.clone(), item_id),
            WriteMode::Atomic,
        );
        let diamonds = GroupKey::named("Diamonds");
        for name in ["86 Diamonds", "172 Diamonds"] {
            grouper
                .add_member(
                    &diamonds,
                    VariationCreate {
                        name: name.into(),
                        price: 1500,
                    },
                )
                .await
                .unwrap();
        }

        let groups = grouper.rename(&diamonds, "").await.unwrap();
        let placeholder = groups[0].key.clone();
        assert!(matches!(placeholder, GroupKey::Placeholder { .. }));

        let groups = grouper.rename(&placeholder, "Gems").await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "Gems");
        assert_eq!(groups[0].members.len(), 2);

        let groups = grouper.delete_group(&GroupKey::named("Gems"), true).await.unwrap();
        assert!(groups[0].key.is_anonymous());
        assert!(groups[0].members.iter().all(|v| v.sort.is_none()));
    }
}
