mod common;

use chrono::Utc;
use ember::config::EngineConfig;
use ember::database::{block_repo, candidate_cache_repo};
use ember::error::{EngineError, Precondition};
use ember::models::Disposition;
use ember::services::responsiveness::StaticResponsivenessSource;
use ember::services::{feed_service, swipe_service};

use common::{seed_prefs, seed_ready_user, seed_user, test_pool};

fn cfg() -> EngineConfig {
    EngineConfig::default()
}

#[tokio::test]
async fn swiped_and_blocked_candidates_never_surface() {
    let pool = test_pool().await;
    let source = StaticResponsivenessSource::default();
    let config = cfg();

    seed_ready_user(&pool, "viewer", 52.00, 4.00).await;
    seed_ready_user(&pool, "swiped", 52.01, 4.00).await;
    seed_ready_user(&pool, "blocked-by-viewer", 52.02, 4.00).await;
    seed_ready_user(&pool, "blocks-the-viewer", 52.03, 4.00).await;
    seed_ready_user(&pool, "clean", 52.04, 4.00).await;

    swipe_service::record_swipe(&pool, "viewer", "swiped", Disposition::Negative)
        .await
        .unwrap();
    block_repo::insert_block(&pool, "b1", "viewer", "blocked-by-viewer", Utc::now())
        .await
        .unwrap();
    block_repo::insert_block(&pool, "b2", "blocks-the-viewer", "viewer", Utc::now())
        .await
        .unwrap();

    // Cache-miss path.
    let feed = feed_service::get_feed(&pool, &config, &source, "viewer", 25)
        .await
        .unwrap();
    let ids: Vec<&str> = feed.candidates.iter().map(|c| c.user_id.as_str()).collect();
    assert_eq!(ids, vec!["clean"]);

    // Cache-hit path returns the same exclusion-correct list.
    let cached = feed_service::get_feed(&pool, &config, &source, "viewer", 25)
        .await
        .unwrap();
    assert_eq!(cached.generated_at, feed.generated_at);
    assert_eq!(cached.candidates.len(), 1);
    assert_eq!(cached.candidates[0].user_id, "clean");
}

#[tokio::test]
async fn own_swipe_invalidates_cached_feed() {
    let pool = test_pool().await;
    let source = StaticResponsivenessSource::default();
    let config = cfg();

    seed_ready_user(&pool, "viewer", 52.00, 4.00).await;
    seed_ready_user(&pool, "cand", 52.01, 4.00).await;

    let feed = feed_service::get_feed(&pool, &config, &source, "viewer", 25)
        .await
        .unwrap();
    assert_eq!(feed.candidates.len(), 1);

    // The swipe must drop the target from the viewer's list immediately,
    // not after TTL expiry.
    swipe_service::record_swipe(&pool, "viewer", "cand", Disposition::Positive)
        .await
        .unwrap();
    let after = feed_service::get_feed(&pool, &config, &source, "viewer", 25)
        .await
        .unwrap();
    assert!(after.candidates.is_empty());
}

#[tokio::test]
async fn match_invalidates_both_cached_feeds() {
    let pool = test_pool().await;
    let source = StaticResponsivenessSource::default();
    let config = cfg();

    seed_ready_user(&pool, "alice", 52.00, 4.00).await;
    seed_ready_user(&pool, "bob", 52.01, 4.00).await;
    seed_ready_user(&pool, "carol", 52.02, 4.00).await;

    // Warm both caches; each list contains the other participant.
    let alice_before = feed_service::get_feed(&pool, &config, &source, "alice", 25)
        .await
        .unwrap();
    assert!(alice_before
        .candidates
        .iter()
        .any(|c| c.user_id == "bob"));
    feed_service::get_feed(&pool, &config, &source, "bob", 25)
        .await
        .unwrap();

    swipe_service::record_swipe(&pool, "bob", "alice", Disposition::Positive)
        .await
        .unwrap();
    let outcome = swipe_service::record_swipe(&pool, "alice", "bob", Disposition::Positive)
        .await
        .unwrap();
    assert!(outcome.matched);

    // Both caches were dropped on match creation, so neither participant
    // sees the other again even though the old entries had not expired.
    let alice_after = feed_service::get_feed(&pool, &config, &source, "alice", 25)
        .await
        .unwrap();
    assert!(alice_after.candidates.iter().all(|c| c.user_id != "bob"));
    let bob_after = feed_service::get_feed(&pool, &config, &source, "bob", 25)
        .await
        .unwrap();
    assert!(bob_after.candidates.iter().all(|c| c.user_id != "alice"));
}

#[tokio::test]
async fn candidate_without_preferences_row_is_still_visible() {
    let pool = test_pool().await;
    let source = StaticResponsivenessSource::default();
    let config = cfg();

    seed_ready_user(&pool, "viewer", 52.00, 4.00).await;
    // Fresh registration: verified, active, located, but never saved
    // preferences. Must not be invisible.
    seed_user(&pool, "newcomer", "male", 25, 52.01, 4.00).await;

    let feed = feed_service::get_feed(&pool, &config, &source, "viewer", 25)
        .await
        .unwrap();
    assert!(feed.candidates.iter().any(|c| c.user_id == "newcomer"));
}

#[tokio::test]
async fn viewer_preconditions_are_surfaced() {
    let pool = test_pool().await;
    let source = StaticResponsivenessSource::default();
    let config = cfg();

    // Known user, no location.
    seed_user(&pool, "nowhere", "female", 30, 52.0, 4.0).await;
    ember::database::user_repo::upsert_user(
        &pool,
        ember::database::user_repo::NewUser {
            user_id: "nowhere",
            name: None,
            gender: Some("female"),
            city: None,
            main_photo_url: None,
            bio: None,
            photo_count: 0,
            birth_date: None,
            latitude: None,
            longitude: None,
            is_verified: true,
            is_active: true,
            created_at: Utc::now(),
            last_active_at: None,
        },
    )
    .await
    .unwrap();
    let err = feed_service::get_feed(&pool, &config, &source, "nowhere", 25)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Precondition(Precondition::NoLocation)
    ));

    // Located but no preferences row.
    seed_user(&pool, "unconfigured", "female", 30, 52.0, 4.0).await;
    let err = feed_service::get_feed(&pool, &config, &source, "unconfigured", 25)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Precondition(Precondition::IncompleteProfile)
    ));

    // Unknown viewer is NotFound, distinct from Incomplete.
    let err = feed_service::get_feed(&pool, &config, &source, "ghost", 25)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn preference_filters_apply_to_candidates() {
    let pool = test_pool().await;
    let source = StaticResponsivenessSource::default();
    let config = cfg();

    seed_user(&pool, "viewer", "female", 30, 52.00, 4.00).await;
    seed_prefs(&pool, "viewer", 25, 35, Some(r#"["male"]"#), 50.0).await;

    seed_user(&pool, "fits", "male", 30, 52.01, 4.00).await;
    seed_user(&pool, "wrong-gender", "female", 30, 52.01, 4.01).await;
    seed_user(&pool, "too-young", "male", 19, 52.01, 4.02).await;
    seed_user(&pool, "too-far", "male", 30, 53.50, 4.00).await;

    let feed = feed_service::get_feed(&pool, &config, &source, "viewer", 25)
        .await
        .unwrap();
    let ids: Vec<&str> = feed.candidates.iter().map(|c| c.user_id.as_str()).collect();
    assert_eq!(ids, vec!["fits"]);
}

#[tokio::test]
async fn cache_hit_respects_requested_page_size() {
    let pool = test_pool().await;
    let source = StaticResponsivenessSource::default();
    let config = cfg();

    seed_ready_user(&pool, "viewer", 52.00, 4.00).await;
    for i in 0..5 {
        seed_ready_user(&pool, &format!("cand-{}", i), 52.01 + 0.001 * i as f64, 4.00).await;
    }

    let full = feed_service::get_feed(&pool, &config, &source, "viewer", 25)
        .await
        .unwrap();
    assert_eq!(full.candidates.len(), 5);

    let page = feed_service::get_feed(&pool, &config, &source, "viewer", 2)
        .await
        .unwrap();
    assert_eq!(page.candidates.len(), 2);
}

#[tokio::test]
async fn cached_feed_serves_pages_wider_than_the_first_request() {
    let pool = test_pool().await;
    let source = StaticResponsivenessSource::default();
    let config = cfg();

    seed_ready_user(&pool, "viewer", 52.00, 4.00).await;
    for i in 0..5 {
        seed_ready_user(&pool, &format!("cand-{}", i), 52.01 + 0.001 * i as f64, 4.00).await;
    }

    // A small first page warms the cache with the full ranked list, so a
    // wider request inside the TTL still sees everyone.
    let narrow = feed_service::get_feed(&pool, &config, &source, "viewer", 2)
        .await
        .unwrap();
    assert_eq!(narrow.candidates.len(), 2);

    let wide = feed_service::get_feed(&pool, &config, &source, "viewer", 25)
        .await
        .unwrap();
    assert_eq!(wide.generated_at, narrow.generated_at);
    assert_eq!(wide.candidates.len(), 5);
    for prefix in wide.candidates.iter().zip(narrow.candidates.iter()) {
        assert_eq!(prefix.0.user_id, prefix.1.user_id);
    }
}

#[tokio::test]
async fn undecodable_cache_entry_falls_back_to_recompute() {
    let pool = test_pool().await;
    let source = StaticResponsivenessSource::default();
    let config = cfg();

    seed_ready_user(&pool, "viewer", 52.00, 4.00).await;
    seed_ready_user(&pool, "cand", 52.01, 4.00).await;

    sqlx::query(
        "INSERT INTO candidate_cache (viewer_id, payload, generated_at, expires_at) \
         VALUES ('viewer', 'not json', ?1, ?2)",
    )
    .bind(Utc::now())
    .bind(Utc::now() + chrono::Duration::hours(1))
    .execute(&pool)
    .await
    .unwrap();
    assert!(candidate_cache_repo::get(&pool, "viewer", Utc::now())
        .await
        .unwrap()
        .is_none());

    let feed = feed_service::get_feed(&pool, &config, &source, "viewer", 25)
        .await
        .unwrap();
    assert_eq!(feed.candidates.len(), 1);
}
