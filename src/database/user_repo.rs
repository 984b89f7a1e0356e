use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::models::{UserPreferencesRow, UserRow};

const SQL_GET_USER: &str = r#"
SELECT
    user_id, name, gender, city, main_photo_url, bio, photo_count,
    birth_date, latitude, longitude, is_verified, is_active,
    created_at, last_active_at
FROM users
WHERE user_id = ?1
"#;

const SQL_GET_PREFERENCES: &str = r#"
SELECT user_id, min_age, max_age, interested_genders, max_distance_km
FROM user_preferences
WHERE user_id = ?1
"#;

pub async fn get_user(pool: &SqlitePool, user_id: &str) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(SQL_GET_USER)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn get_preferences(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Option<UserPreferencesRow>> {
    sqlx::query_as::<_, UserPreferencesRow>(SQL_GET_PREFERENCES)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Profile-store sync payload. The engine never invents profile data; rows
/// arrive through this write-through when the upstream profile changes.
pub struct NewUser<'a> {
    pub user_id: &'a str,
    pub name: Option<&'a str>,
    pub gender: Option<&'a str>,
    pub city: Option<&'a str>,
    pub main_photo_url: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub photo_count: i64,
    pub birth_date: Option<NaiveDate>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_active_at: Option<DateTime<Utc>>,
}

const SQL_UPSERT_USER: &str = r#"
INSERT INTO users (
    user_id, name, gender, city, main_photo_url, bio, photo_count,
    birth_date, latitude, longitude, is_verified, is_active,
    created_at, last_active_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
ON CONFLICT (user_id) DO UPDATE SET
    name = excluded.name,
    gender = excluded.gender,
    city = excluded.city,
    main_photo_url = excluded.main_photo_url,
    bio = excluded.bio,
    photo_count = excluded.photo_count,
    birth_date = excluded.birth_date,
    latitude = excluded.latitude,
    longitude = excluded.longitude,
    is_verified = excluded.is_verified,
    is_active = excluded.is_active,
    created_at = excluded.created_at,
    last_active_at = excluded.last_active_at
"#;

pub async fn upsert_user(pool: &SqlitePool, user: NewUser<'_>) -> sqlx::Result<()> {
    sqlx::query(SQL_UPSERT_USER)
        .bind(user.user_id)
        .bind(user.name)
        .bind(user.gender)
        .bind(user.city)
        .bind(user.main_photo_url)
        .bind(user.bio)
        .bind(user.photo_count)
        .bind(user.birth_date)
        .bind(user.latitude)
        .bind(user.longitude)
        .bind(user.is_verified)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.last_active_at)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_location(
    pool: &SqlitePool,
    user_id: &str,
    latitude: f64,
    longitude: f64,
) -> sqlx::Result<bool> {
    let result = sqlx::query("UPDATE users SET latitude = ?2, longitude = ?3 WHERE user_id = ?1")
        .bind(user_id)
        .bind(latitude)
        .bind(longitude)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub struct NewPreferences<'a> {
    pub user_id: &'a str,
    pub min_age: i64,
    pub max_age: i64,
    /// JSON array of gender values, None for "any gender".
    pub interested_genders: Option<&'a str>,
    pub max_distance_km: f64,
}

const SQL_UPSERT_PREFERENCES: &str = r#"
INSERT INTO user_preferences (user_id, min_age, max_age, interested_genders, max_distance_km)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (user_id) DO UPDATE SET
    min_age = excluded.min_age,
    max_age = excluded.max_age,
    interested_genders = excluded.interested_genders,
    max_distance_km = excluded.max_distance_km
"#;

pub async fn upsert_preferences(pool: &SqlitePool, prefs: NewPreferences<'_>) -> sqlx::Result<()> {
    sqlx::query(SQL_UPSERT_PREFERENCES)
        .bind(prefs.user_id)
        .bind(prefs.min_age)
        .bind(prefs.max_age)
        .bind(prefs.interested_genders)
        .bind(prefs.max_distance_km)
        .execute(pool)
        .await?;
    Ok(())
}
