use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

const SQL_INSERT_BLOCK: &str = r#"
INSERT INTO blocks (block_id, blocker_id, blocked_id, created_at)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT (blocker_id, blocked_id) DO NOTHING
"#;

pub async fn insert_block(
    pool: &SqlitePool,
    block_id: &str,
    blocker_id: &str,
    blocked_id: &str,
    created_at: DateTime<Utc>,
) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_BLOCK)
        .bind(block_id)
        .bind(blocker_id)
        .bind(blocked_id)
        .bind(created_at)
        .execute(pool)
        .await?;
    Ok(())
}

const SQL_IS_BLOCKED: &str = r#"
SELECT COUNT(*) AS n
FROM blocks
WHERE (blocker_id = ?1 AND blocked_id = ?2)
   OR (blocker_id = ?2 AND blocked_id = ?1)
"#;

/// Blocks hide both users from each other, whichever direction was recorded.
pub async fn is_blocked(pool: &SqlitePool, a: &str, b: &str) -> sqlx::Result<bool> {
    let row = sqlx::query(SQL_IS_BLOCKED)
        .bind(a)
        .bind(b)
        .fetch_one(pool)
        .await?;
    Ok(row.get::<i64, _>("n") > 0)
}

const SQL_BLOCKED_IDS: &str = r#"
SELECT blocked_id AS other FROM blocks WHERE blocker_id = ?1
UNION
SELECT blocker_id AS other FROM blocks WHERE blocked_id = ?1
"#;

/// Everyone in a block relation with this user, either direction.
pub async fn blocked_user_ids(pool: &SqlitePool, user_id: &str) -> sqlx::Result<Vec<String>> {
    let rows = sqlx::query(SQL_BLOCKED_IDS)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|r| r.get("other")).collect())
}
