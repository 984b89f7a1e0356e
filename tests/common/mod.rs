#![allow(dead_code)]

use chrono::{Datelike, Duration, NaiveDate, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use ember::database::{schema, user_repo};

pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    schema::ensure_schema(&pool).await.expect("schema");
    pool
}

fn birth_date_for_age(age: i64) -> NaiveDate {
    // January 1st is always in the past of the current year, so the
    // completed-years age equals the year difference.
    NaiveDate::from_ymd_opt(Utc::now().year() - age as i32, 1, 1).unwrap()
}

/// Verified, active user at the given point, one photo, recently active.
pub async fn seed_user(pool: &SqlitePool, id: &str, gender: &str, age: i64, lat: f64, lon: f64) {
    user_repo::upsert_user(
        pool,
        user_repo::NewUser {
            user_id: id,
            name: Some(id),
            gender: Some(gender),
            city: Some("Rotterdam"),
            main_photo_url: Some("https://img.example/p.jpg"),
            bio: Some("long enough bio to clear the completeness threshold easily"),
            photo_count: 1,
            birth_date: Some(birth_date_for_age(age)),
            latitude: Some(lat),
            longitude: Some(lon),
            is_verified: true,
            is_active: true,
            created_at: Utc::now() - Duration::days(100),
            last_active_at: Some(Utc::now() - Duration::hours(2)),
        },
    )
    .await
    .expect("seed user");
}

/// Preferences open to any gender unless a JSON set is given.
pub async fn seed_prefs(
    pool: &SqlitePool,
    id: &str,
    min_age: i64,
    max_age: i64,
    genders: Option<&str>,
    radius_km: f64,
) {
    user_repo::upsert_preferences(
        pool,
        user_repo::NewPreferences {
            user_id: id,
            min_age,
            max_age,
            interested_genders: genders,
            max_distance_km: radius_km,
        },
    )
    .await
    .expect("seed prefs");
}

/// Standard discovery-ready user: open preferences, 30 years old.
pub async fn seed_ready_user(pool: &SqlitePool, id: &str, lat: f64, lon: f64) {
    seed_user(pool, id, "female", 30, lat, lon).await;
    seed_prefs(pool, id, 18, 99, None, 50.0).await;
}
