use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{error, info};
use uuid::Uuid;

use crate::database::match_repo::MatchCreation;
use crate::database::{block_repo, event_repo, match_repo, swipe_repo, user_repo};
use crate::error::{is_unique_violation, Conflict, EngineError, EngineResult};
use crate::models::Disposition;
use crate::services::feed_service;

/// Result of recording one interest signal. `matched` flips exactly when a
/// reciprocal positive pair completes, and then `match_id` is always set.
#[derive(Debug, Clone, Serialize)]
pub struct SwipeOutcome {
    pub signal_id: String,
    pub matched: bool,
    pub match_id: Option<String>,
}

/// The match-detection state machine for one signal.
///
/// Validation order follows the pair state: self-swipe, blocked pair, then
/// the write-once insert (the UNIQUE constraint is the duplicate check, no
/// read-then-write), then the reciprocity probe and the atomic
/// create-or-fetch of the match record.
pub async fn record_swipe(
    pool: &SqlitePool,
    actor_id: &str,
    target_id: &str,
    disposition: Disposition,
) -> EngineResult<SwipeOutcome> {
    if actor_id == target_id {
        return Err(EngineError::Conflict(Conflict::SelfSwipe));
    }
    if user_repo::get_user(pool, target_id).await?.is_none() {
        return Err(EngineError::not_found(format!("user {}", target_id)));
    }
    if block_repo::is_blocked(pool, actor_id, target_id).await? {
        return Err(EngineError::Conflict(Conflict::BlockedPair));
    }

    let signal_id = Uuid::new_v4().to_string();
    let now = Utc::now();
    match swipe_repo::insert_swipe(pool, &signal_id, actor_id, target_id, disposition, now).await {
        Ok(()) => {}
        Err(e) if is_unique_violation(&e) => {
            return Err(EngineError::Conflict(Conflict::DuplicateSignal));
        }
        Err(e) => return Err(e.into()),
    }

    // The actor's cached feed still contains the target; drop it now.
    feed_service::invalidate_for(pool, actor_id).await?;

    if !disposition.is_positive() {
        return Ok(SwipeOutcome {
            signal_id,
            matched: false,
            match_id: None,
        });
    }

    if !swipe_repo::has_positive_signal(pool, target_id, actor_id).await? {
        return Ok(SwipeOutcome {
            signal_id,
            matched: false,
            match_id: None,
        });
    }

    let creation = match_repo::create_or_fetch(pool, actor_id, target_id, now)
        .await?
        .ok_or_else(|| {
            let msg = format!(
                "match row missing after create-or-fetch for {} / {}",
                actor_id, target_id
            );
            error!("{}", msg);
            EngineError::Integrity(msg)
        })?;

    let match_id = match creation {
        MatchCreation::Created(record) => {
            info!(
                "match created: {} between {} and {}",
                record.match_id, record.user_a, record.user_b
            );
            event_repo::insert_event(
                pool,
                event_repo::EVENT_MATCH_CREATED,
                &record.match_id,
                &serde_json::json!({
                    "match_id": record.match_id,
                    "user_a": record.user_a,
                    "user_b": record.user_b,
                    "timestamp": record.created_at,
                }),
                now,
            )
            .await?;
            // Neither participant should see the other in a feed again.
            feed_service::invalidate_for(pool, &record.user_a).await?;
            feed_service::invalidate_for(pool, &record.user_b).await?;
            record.match_id
        }
        // The other direction won the race; same match, same answer.
        MatchCreation::AlreadyExists(record) => record.match_id,
    };

    Ok(SwipeOutcome {
        signal_id,
        matched: true,
        match_id: Some(match_id),
    })
}

/// Active-to-ended transition, idempotent: repeating it (or racing another
/// unmatch) is a success that leaves the first ended_at in place, and the
/// ended event fires only for the request that actually transitioned.
pub async fn unmatch(pool: &SqlitePool, user_id: &str, match_id: &str) -> EngineResult<()> {
    let record = match_repo::get_match(pool, match_id)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("match {}", match_id)))?;

    // Non-participants get the same answer as a missing match.
    if !record.involves(user_id) {
        return Err(EngineError::not_found(format!("match {}", match_id)));
    }

    if !record.is_active() {
        return Ok(());
    }

    let now = Utc::now();
    let transitioned = match_repo::end_match(pool, match_id, user_id, now).await?;
    if transitioned > 0 {
        info!("match ended: {} by {}", match_id, user_id);
        event_repo::insert_event(
            pool,
            event_repo::EVENT_MATCH_ENDED,
            match_id,
            &serde_json::json!({
                "match_id": match_id,
                "ended_by": user_id,
                "timestamp": now,
            }),
            now,
        )
        .await?;
    }
    Ok(())
}
