use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::models::Disposition;

/// Exclusion Store writes. The UNIQUE(actor_id, target_id) constraint is the
/// sole serialization point for signals: a duplicate insert fails here and is
/// translated by the service layer, never pre-checked with a read.
const SQL_INSERT_SWIPE: &str = r#"
INSERT INTO swipes (swipe_id, actor_id, target_id, disposition, created_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub async fn insert_swipe(
    pool: &SqlitePool,
    swipe_id: &str,
    actor_id: &str,
    target_id: &str,
    disposition: Disposition,
    created_at: DateTime<Utc>,
) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_SWIPE)
        .bind(swipe_id)
        .bind(actor_id)
        .bind(target_id)
        .bind(disposition.as_str())
        .bind(created_at)
        .execute(pool)
        .await?;
    Ok(())
}

const SQL_HAS_POSITIVE_SIGNAL: &str = r#"
SELECT COUNT(*) AS n
FROM swipes
WHERE actor_id = ?1
  AND target_id = ?2
  AND disposition IN ('positive', 'strong_positive')
"#;

/// Reciprocity probe: does actor have a positive-flavored signal on target?
pub async fn has_positive_signal(
    pool: &SqlitePool,
    actor_id: &str,
    target_id: &str,
) -> sqlx::Result<bool> {
    let row = sqlx::query(SQL_HAS_POSITIVE_SIGNAL)
        .bind(actor_id)
        .bind(target_id)
        .fetch_one(pool)
        .await?;
    Ok(row.get::<i64, _>("n") > 0)
}

/// Every target this actor has signaled, any disposition. Feeds the
/// exclusion stage.
pub async fn swiped_target_ids(pool: &SqlitePool, actor_id: &str) -> sqlx::Result<Vec<String>> {
    let rows = sqlx::query("SELECT target_id FROM swipes WHERE actor_id = ?1")
        .bind(actor_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|r| r.get("target_id")).collect())
}

/// Positive-flavored targets only. Feeds the shared-taste similarity term.
pub async fn positive_target_ids(pool: &SqlitePool, actor_id: &str) -> sqlx::Result<Vec<String>> {
    let rows = sqlx::query(
        "SELECT target_id FROM swipes \
         WHERE actor_id = ?1 AND disposition IN ('positive', 'strong_positive')",
    )
    .bind(actor_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|r| r.get("target_id")).collect())
}

pub async fn count_for_pair(
    pool: &SqlitePool,
    actor_id: &str,
    target_id: &str,
) -> sqlx::Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM swipes WHERE actor_id = ?1 AND target_id = ?2")
        .bind(actor_id)
        .bind(target_id)
        .fetch_one(pool)
        .await?;
    Ok(row.get("n"))
}
