use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

/// Resumable sweep position. Singleton row; an empty last_user_id means the
/// next sweep starts from the beginning of the id order.
pub async fn load_cursor(pool: &SqlitePool) -> sqlx::Result<String> {
    let row = sqlx::query("SELECT last_user_id FROM precompute_cursor WHERE id = 1")
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.get("last_user_id")).unwrap_or_default())
}

const SQL_SAVE_CURSOR: &str = r#"
INSERT INTO precompute_cursor (id, last_user_id, updated_at)
VALUES (1, ?1, ?2)
ON CONFLICT (id) DO UPDATE SET
    last_user_id = excluded.last_user_id,
    updated_at = excluded.updated_at
"#;

pub async fn save_cursor(
    pool: &SqlitePool,
    last_user_id: &str,
    updated_at: DateTime<Utc>,
) -> sqlx::Result<()> {
    sqlx::query(SQL_SAVE_CURSOR)
        .bind(last_user_id)
        .bind(updated_at)
        .execute(pool)
        .await?;
    Ok(())
}

/// Next batch of active users in stable id order, strictly after the cursor.
pub async fn list_active_users_after(
    pool: &SqlitePool,
    after_user_id: &str,
    limit: i64,
) -> sqlx::Result<Vec<String>> {
    let rows = sqlx::query(
        "SELECT user_id FROM users \
         WHERE is_active = 1 AND user_id > ?1 \
         ORDER BY user_id \
         LIMIT ?2",
    )
    .bind(after_user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|r| r.get("user_id")).collect())
}
