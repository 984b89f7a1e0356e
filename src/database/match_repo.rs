use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{canonical_pair, MatchRow, MATCH_STATUS_ACTIVE, MATCH_STATUS_ENDED};

/// Outcome of the atomic create-or-fetch on the canonical pair key.
#[derive(Debug)]
pub enum MatchCreation {
    Created(MatchRow),
    AlreadyExists(MatchRow),
}

const SQL_TRY_INSERT_MATCH: &str = r#"
INSERT INTO matches (match_id, pair_key, user_a, user_b, status, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
ON CONFLICT (pair_key) DO NOTHING
"#;

const SQL_GET_BY_PAIR_KEY: &str = r#"
SELECT match_id, pair_key, user_a, user_b, status, created_at, ended_at, ended_by
FROM matches
WHERE pair_key = ?1
"#;

/// Insert-or-fetch keyed on the canonical pair. Never read-then-write: the
/// insert races first and the pair_key UNIQUE constraint decides the winner,
/// so two concurrent reciprocal swipes converge on one row.
///
/// Returns `None` only if the row vanished between insert and fetch, which
/// the caller must treat as an integrity violation.
pub async fn create_or_fetch(
    pool: &SqlitePool,
    x: &str,
    y: &str,
    created_at: DateTime<Utc>,
) -> sqlx::Result<Option<MatchCreation>> {
    let (user_a, user_b, pair_key) = canonical_pair(x, y);
    let match_id = Uuid::new_v4().to_string();

    let inserted = sqlx::query(SQL_TRY_INSERT_MATCH)
        .bind(&match_id)
        .bind(&pair_key)
        .bind(&user_a)
        .bind(&user_b)
        .bind(MATCH_STATUS_ACTIVE)
        .bind(created_at)
        .execute(pool)
        .await?
        .rows_affected();

    let row = sqlx::query_as::<_, MatchRow>(SQL_GET_BY_PAIR_KEY)
        .bind(&pair_key)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|m| {
        if inserted > 0 && m.match_id == match_id {
            MatchCreation::Created(m)
        } else {
            MatchCreation::AlreadyExists(m)
        }
    }))
}

/// Lookup by unordered pair, any direction.
pub async fn find_by_pair(pool: &SqlitePool, x: &str, y: &str) -> sqlx::Result<Option<MatchRow>> {
    let (_, _, pair_key) = canonical_pair(x, y);
    sqlx::query_as::<_, MatchRow>(SQL_GET_BY_PAIR_KEY)
        .bind(pair_key)
        .fetch_optional(pool)
        .await
}

const SQL_GET_MATCH: &str = r#"
SELECT match_id, pair_key, user_a, user_b, status, created_at, ended_at, ended_by
FROM matches
WHERE match_id = ?1
"#;

pub async fn get_match(pool: &SqlitePool, match_id: &str) -> sqlx::Result<Option<MatchRow>> {
    sqlx::query_as::<_, MatchRow>(SQL_GET_MATCH)
        .bind(match_id)
        .fetch_optional(pool)
        .await
}

const SQL_END_MATCH: &str = r#"
UPDATE matches
SET status = ?2, ended_at = ?3, ended_by = ?4
WHERE match_id = ?1 AND status = ?5
"#;

/// Guarded active-to-ended transition. The status predicate makes a repeat
/// call affect zero rows, which keeps the first ended_at immutable.
pub async fn end_match(
    pool: &SqlitePool,
    match_id: &str,
    ended_by: &str,
    ended_at: DateTime<Utc>,
) -> sqlx::Result<u64> {
    let result = sqlx::query(SQL_END_MATCH)
        .bind(match_id)
        .bind(MATCH_STATUS_ENDED)
        .bind(ended_at)
        .bind(ended_by)
        .bind(MATCH_STATUS_ACTIVE)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
