use chrono::Utc;
use sqlx::SqlitePool;
use tracing::warn;

use crate::config::EngineConfig;
use crate::database::{candidate_cache_repo, precompute_repo};
use crate::error::{EngineError, EngineResult};
use crate::services::feed_service;
use crate::services::responsiveness::ResponsivenessSource;

/// Outcome of one precompute batch.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub scanned: usize,
    pub refreshed: usize,
    /// Users whose profile is not discovery-ready (no location, no prefs).
    pub skipped: usize,
    pub failed: usize,
    /// True when the sweep exhausted the id order and reset to the start.
    pub wrapped: bool,
}

/// One resumable batch of proactive feed refreshes.
///
/// Walks active users in stable id order from the stored cursor, rebuilding
/// each feed through the exact live pipeline with the longer precompute
/// TTL. Per-user failures are counted, logged, and skipped; the cursor
/// advances regardless so a bad profile cannot wedge the sweep.
pub async fn run_sweep(
    pool: &SqlitePool,
    config: &EngineConfig,
    responsiveness: &dyn ResponsivenessSource,
) -> EngineResult<SweepReport> {
    let now = Utc::now();
    candidate_cache_repo::purge_expired(pool, now).await?;

    let cursor = precompute_repo::load_cursor(pool).await?;
    let user_ids =
        precompute_repo::list_active_users_after(pool, &cursor, config.precompute_batch_size)
            .await?;

    let mut report = SweepReport {
        scanned: user_ids.len(),
        ..Default::default()
    };

    for user_id in &user_ids {
        match feed_service::rebuild_feed(
            pool,
            config,
            responsiveness,
            user_id,
            config.default_page_size,
            config.precompute_ttl,
        )
        .await
        {
            Ok(_) => report.refreshed += 1,
            Err(EngineError::Precondition(_)) => report.skipped += 1,
            Err(e) => {
                warn!("precompute refresh failed for {}: {}", user_id, e);
                report.failed += 1;
            }
        }
    }

    let next_cursor = if (user_ids.len() as i64) < config.precompute_batch_size {
        report.wrapped = true;
        String::new()
    } else {
        user_ids.last().cloned().unwrap_or_default()
    };
    precompute_repo::save_cursor(pool, &next_cursor, Utc::now()).await?;

    Ok(report)
}
