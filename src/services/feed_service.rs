use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::config::EngineConfig;
use crate::database::{candidate_cache_repo, swipe_repo};
use crate::error::EngineResult;
use crate::models::{CandidateFeed, CandidateSummary};
use crate::services::candidate_service::{self, age_in_years};
use crate::services::geo_service::NearbyUser;
use crate::services::ranking_service;
use crate::services::responsiveness::ResponsivenessSource;
use crate::services::scoring_service::{self, ScoreContext};

/// Feed entry point: cache hit returns immediately, miss runs the full
/// pipeline and writes through the cache. The cache is an optimization
/// only; this function is correct with an always-empty cache.
pub async fn get_feed(
    pool: &SqlitePool,
    config: &EngineConfig,
    responsiveness: &dyn ResponsivenessSource,
    viewer_id: &str,
    page_size: usize,
) -> EngineResult<CandidateFeed> {
    let now = Utc::now();
    if let Some(feed) = candidate_cache_repo::get(pool, viewer_id, now).await? {
        return Ok(feed.truncated(page_size));
    }
    rebuild_feed(
        pool,
        config,
        responsiveness,
        viewer_id,
        page_size,
        config.cache_ttl,
    )
    .await
}

/// Pipeline, scorer, and ranker for one viewer, then a cache write with the
/// given TTL. Shared verbatim between live misses and the precompute sweep;
/// their racing cache puts are both idempotent writes of recomputable data.
///
/// The cache holds the full ranked list and every read path truncates, so
/// a small first request never narrows what a later, wider request sees.
pub async fn rebuild_feed(
    pool: &SqlitePool,
    config: &EngineConfig,
    responsiveness: &dyn ResponsivenessSource,
    viewer_id: &str,
    page_size: usize,
    ttl: Duration,
) -> EngineResult<CandidateFeed> {
    let scored = score_candidates(pool, config, responsiveness, viewer_id).await?;

    let ranked = ranking_service::rank(
        scored,
        config.top_tier_fraction,
        config.rank_jitter,
        &mut rand::thread_rng(),
    );

    let feed = CandidateFeed {
        candidates: ranked,
        generated_at: Utc::now(),
    };
    candidate_cache_repo::put(pool, viewer_id, &feed, ttl, feed.generated_at).await?;
    info!(
        "feed rebuilt for {}: {} candidates",
        viewer_id,
        feed.candidates.len()
    );
    Ok(feed.truncated(page_size))
}

/// Filter pipeline plus per-pair scoring; unranked and untruncated.
async fn score_candidates(
    pool: &SqlitePool,
    config: &EngineConfig,
    responsiveness: &dyn ResponsivenessSource,
    viewer_id: &str,
) -> EngineResult<Vec<CandidateSummary>> {
    let viewer = candidate_service::load_viewer(pool, viewer_id).await?;
    let candidates = candidate_service::get_candidates(
        pool,
        &viewer,
        config.max_candidates_to_scan as usize,
        config.max_candidates_to_scan,
    )
    .await?;
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let viewer_likes: HashSet<String> = swipe_repo::positive_target_ids(pool, viewer_id)
        .await?
        .into_iter()
        .collect();
    let terms = scoring_service::default_terms();
    let now = Utc::now();
    let today = now.date_naive();

    let mut scored = Vec::with_capacity(candidates.len());
    for NearbyUser { user, distance_km } in candidates {
        let candidate_likes: HashSet<String> =
            swipe_repo::positive_target_ids(pool, &user.user_id)
                .await?
                .into_iter()
                .collect();
        let signal = responsiveness.reply_rate(&user.user_id).await;
        let score = scoring_service::score(
            &terms,
            &ScoreContext {
                candidate: &user,
                distance_km,
                viewer_likes: &viewer_likes,
                candidate_likes: &candidate_likes,
                responsiveness: signal,
                now,
                config,
            },
        );
        scored.push(CandidateSummary {
            age: user.birth_date.map(|b| age_in_years(b, today)),
            is_verified: user.verified(),
            user_id: user.user_id,
            name: user.name,
            city: user.city,
            main_photo_url: user.main_photo_url,
            distance_km,
            score,
        });
    }
    Ok(scored)
}

/// Invalidation hook shared by the swipe path, match creation, and the
/// location/preference write-throughs.
pub async fn invalidate_for(pool: &SqlitePool, viewer_id: &str) -> EngineResult<()> {
    candidate_cache_repo::invalidate(pool, viewer_id).await?;
    Ok(())
}
