use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::warn;

use crate::models::CandidateFeed;

/// Per-viewer feed memoization in an external table, so every service
/// instance sees the same cache. Purely a latency optimization: every read
/// path can fall back to recomputation.
const SQL_GET_FRESH: &str = r#"
SELECT payload
FROM candidate_cache
WHERE viewer_id = ?1 AND expires_at > ?2
"#;

pub async fn get(
    pool: &SqlitePool,
    viewer_id: &str,
    now: DateTime<Utc>,
) -> sqlx::Result<Option<CandidateFeed>> {
    let row = sqlx::query(SQL_GET_FRESH)
        .bind(viewer_id)
        .bind(now)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let payload: String = row.get("payload");
    match serde_json::from_str::<CandidateFeed>(&payload) {
        Ok(feed) => Ok(Some(feed)),
        Err(e) => {
            // Undecodable entries behave as a miss; the next put overwrites.
            warn!("undecodable cache payload for {}: {}", viewer_id, e);
            Ok(None)
        }
    }
}

const SQL_PUT: &str = r#"
INSERT INTO candidate_cache (viewer_id, payload, generated_at, expires_at)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT (viewer_id) DO UPDATE SET
    payload = excluded.payload,
    generated_at = excluded.generated_at,
    expires_at = excluded.expires_at
"#;

/// Idempotent upsert: a live request and the precompute sweep racing on the
/// same viewer both write independently-correct, recomputable data.
pub async fn put(
    pool: &SqlitePool,
    viewer_id: &str,
    feed: &CandidateFeed,
    ttl: Duration,
    now: DateTime<Utc>,
) -> sqlx::Result<()> {
    let payload = serde_json::to_string(feed).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
    let expires_at = now + chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero());
    sqlx::query(SQL_PUT)
        .bind(viewer_id)
        .bind(payload)
        .bind(feed.generated_at)
        .bind(expires_at)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn invalidate(pool: &SqlitePool, viewer_id: &str) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM candidate_cache WHERE viewer_id = ?1")
        .bind(viewer_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Housekeeping, called from the precompute sweep.
pub async fn purge_expired(pool: &SqlitePool, now: DateTime<Utc>) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM candidate_cache WHERE expires_at <= ?1")
        .bind(now)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
