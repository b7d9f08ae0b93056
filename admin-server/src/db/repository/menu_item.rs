//! Menu Item Repository

use super::ranks::RankScope;
use super::{RepoError, RepoResult, require_name};
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str =
    "id, name, description, image, sort_order, is_active, created_at, updated_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    let sql = format!("SELECT {COLUMNS} FROM menu_item ORDER BY sort_order, id");
    let items = sqlx::query_as::<_, MenuItem>(&sql).fetch_all(pool).await?;
    Ok(items)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let sql = format!("SELECT {COLUMNS} FROM menu_item WHERE id = ?");
    let item = sqlx::query_as::<_, MenuItem>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

/// Create a menu item at the end of the catalog
pub async fn create(pool: &SqlitePool, data: MenuItemCreate) -> RepoResult<MenuItem> {
    require_name(&data.name, "Menu item")?;
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let mut tx = pool.begin().await?;
    let rank = RankScope::menu_items().next_rank(&mut tx).await?;
    sqlx::query(
        "INSERT INTO menu_item (id, name, description, image, sort_order, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.image.unwrap_or_default())
    .bind(rank)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))
}

/// Update descriptive fields; the rank is only changed through the sequencer
pub async fn update(pool: &SqlitePool, id: i64, data: MenuItemUpdate) -> RepoResult<MenuItem> {
    if let Some(name) = &data.name {
        require_name(name, "Menu item")?;
    }
    let rows = sqlx::query(
        "UPDATE menu_item SET name = COALESCE(?1, name), description = COALESCE(?2, description), image = COALESCE(?3, image), is_active = COALESCE(?4, is_active), updated_at = ?5 WHERE id = ?6",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.image)
    .bind(data.is_active)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))
}

/// Hard delete a menu item (its variations cascade) and close the rank gap
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;
    let rows = sqlx::query("DELETE FROM menu_item WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }
    let renumbered = RankScope::menu_items().compact(&mut tx).await?;
    tx.commit().await?;

    tracing::debug!(id, renumbered, "Menu item deleted");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn new_item(name: &str) -> MenuItemCreate {
        MenuItemCreate {
            name: name.to_string(),
            description: None,
            image: None,
        }
    }

    #[tokio::test]
    async fn test_create_appends_at_end() {
        let db = DbService::memory().await.unwrap();

        let a = create(&db.pool, new_item("Mobile Legends")).await.unwrap();
        let b = create(&db.pool, new_item("Free Fire")).await.unwrap();

        assert_eq!(a.sort_order, 1);
        assert_eq!(b.sort_order, 2);
        assert_eq!(b.image, "");
        let names: Vec<String> = find_all(&db.pool)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Mobile Legends", "Free Fire"]);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let db = DbService::memory().await.unwrap();
        assert!(matches!(
            create(&db.pool, new_item("  ")).await,
            Err(RepoError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_keeps_unset_fields() {
        let db = DbService::memory().await.unwrap();
        let item = create(
            &db.pool,
            MenuItemCreate {
                name: "PUBG".into(),
                description: Some("UC top-up".into()),
                image: Some("pubg.png".into()),
            },
        )
        .await
        .unwrap();

        let updated = update(
            &db.pool,
            item.id,
            MenuItemUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(!updated.is_active);
        assert_eq!(updated.description.as_deref(), Some("UC top-up"));
        assert_eq!(updated.image, "pubg.png");
        assert_eq!(updated.sort_order, item.sort_order);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = DbService::memory().await.unwrap();
        assert!(matches!(
            update(&db.pool, 42, MenuItemUpdate::default()).await,
            Err(RepoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_renumbers_remaining() {
        let db = DbService::memory().await.unwrap();
        let a = create(&db.pool, new_item("A")).await.unwrap();
        let b = create(&db.pool, new_item("B")).await.unwrap();
        let c = create(&db.pool, new_item("C")).await.unwrap();

        assert!(delete(&db.pool, b.id).await.unwrap());

        let ranks: Vec<(i64, i32)> = find_all(&db.pool)
            .await
            .unwrap()
            .into_iter()
            .map(|i| (i.id, i.sort_order))
            .collect();
        assert_eq!(ranks, vec![(a.id, 1), (c.id, 2)]);
        assert!(matches!(
            delete(&db.pool, b.id).await,
            Err(RepoError::NotFound(_))
        ));
    }
}
