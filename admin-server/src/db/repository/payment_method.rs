//! Payment Method Repository

use super::ranks::RankScope;
use super::{RepoError, RepoResult, require_name};
use shared::models::{PaymentMethod, PaymentMethodCreate, PaymentMethodUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, admin_group_id, name, account_name, account_number, image, sort_order, is_active, created_at, updated_at";

/// Payment methods of one admin group, in rank order
pub async fn find_by_group(pool: &SqlitePool, admin_group_id: i64) -> RepoResult<Vec<PaymentMethod>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM payment_method WHERE admin_group_id = ? ORDER BY sort_order, id"
    );
    let methods = sqlx::query_as::<_, PaymentMethod>(&sql)
        .bind(admin_group_id)
        .fetch_all(pool)
        .await?;
    Ok(methods)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<PaymentMethod>> {
    let sql = format!("SELECT {COLUMNS} FROM payment_method WHERE id = ?");
    let method = sqlx::query_as::<_, PaymentMethod>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(method)
}

/// Create a payment method at the end of its admin group
pub async fn create(
    pool: &SqlitePool,
    admin_group_id: i64,
    data: PaymentMethodCreate,
) -> RepoResult<PaymentMethod> {
    require_name(&data.name, "Payment method")?;
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let mut tx = pool.begin().await?;
    let rank = RankScope::payment_methods(admin_group_id)
        .next_rank(&mut tx)
        .await?;
    sqlx::query(
        "INSERT INTO payment_method (id, admin_group_id, name, account_name, account_number, image, sort_order, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?8)",
    )
    .bind(id)
    .bind(admin_group_id)
    .bind(&data.name)
    .bind(&data.account_name)
    .bind(&data.account_number)
    .bind(data.image.unwrap_or_default())
    .bind(rank)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create payment method".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: PaymentMethodUpdate,
) -> RepoResult<PaymentMethod> {
    if let Some(name) = &data.name {
        require_name(name, "Payment method")?;
    }
    let rows = sqlx::query(
        "UPDATE payment_method SET name = COALESCE(?1, name), account_name = COALESCE(?2, account_name), account_number = COALESCE(?3, account_number), image = COALESCE(?4, image), is_active = COALESCE(?5, is_active), updated_at = ?6 WHERE id = ?7",
    )
    .bind(&data.name)
    .bind(&data.account_name)
    .bind(&data.account_number)
    .bind(&data.image)
    .bind(data.is_active)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Payment method {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Payment method {id} not found")))
}

/// Hard delete and renumber the rest of the admin group
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let method = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Payment method {id} not found")))?;

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM payment_method WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let renumbered = RankScope::payment_methods(method.admin_group_id)
        .compact(&mut tx)
        .await?;
    tx.commit().await?;

    tracing::debug!(id, admin_group_id = method.admin_group_id, renumbered, "Payment method deleted");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_method(name: &str) -> PaymentMethodCreate {
        PaymentMethodCreate {
            name: name.to_string(),
            account_name: Some("Shop".into()),
            account_number: None,
            image: None,
        }
    }

    #[tokio::test]
    async fn test_ranks_are_per_admin_group() {
        let db = crate::db::DbService::memory().await.unwrap();

        let a = create(&db.pool, 1, new_method("Bank")).await.unwrap();
        let b = create(&db.pool, 2, new_method("Wallet")).await.unwrap();
        let c = create(&db.pool, 1, new_method("QR")).await.unwrap();

        assert_eq!((a.sort_order, b.sort_order, c.sort_order), (1, 1, 2));
        let group: Vec<i64> = find_by_group(&db.pool, 1)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(group, vec![a.id, c.id]);
    }

    #[tokio::test]
    async fn test_delete_renumbers_only_own_group() {
        let db = crate::db::DbService::memory().await.unwrap();
        let a = create(&db.pool, 1, new_method("A")).await.unwrap();
        let b = create(&db.pool, 1, new_method("B")).await.unwrap();
        let other = create(&db.pool, 2, new_method("X")).await.unwrap();

        delete(&db.pool, a.id).await.unwrap();

        let b = find_by_id(&db.pool, b.id).await.unwrap().unwrap();
        assert_eq!(b.sort_order, 1);
        let other = find_by_id(&db.pool, other.id).await.unwrap().unwrap();
        assert_eq!(other.sort_order, 1);
    }

    #[tokio::test]
    async fn test_update_renames() {
        let db = crate::db::DbService::memory().await.unwrap();
        let m = create(&db.pool, 1, new_method("Bank")).await.unwrap();

        let m = update(
            &db.pool,
            m.id,
            PaymentMethodUpdate {
                name: Some("Bank Transfer".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(m.name, "Bank Transfer");
        assert_eq!(m.account_name.as_deref(), Some("Shop"));
    }
}
