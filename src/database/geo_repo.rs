use sqlx::SqlitePool;

use crate::models::UserRow;

/// Bounding-box prefilter for the geo stage. The box is a superset of the
/// radius circle; the service refines with haversine and sorts. Activity and
/// verification are deliberately not filtered here, the preference stage
/// owns those rules.
const SQL_USERS_IN_BBOX: &str = r#"
SELECT
    user_id, name, gender, city, main_photo_url, bio, photo_count,
    birth_date, latitude, longitude, is_verified, is_active,
    created_at, last_active_at
FROM users
WHERE user_id != ?1
  AND latitude IS NOT NULL
  AND longitude IS NOT NULL
  AND latitude BETWEEN ?2 AND ?3
  AND longitude BETWEEN ?4 AND ?5
LIMIT ?6
"#;

pub async fn load_users_in_bbox(
    pool: &SqlitePool,
    exclude_user_id: &str,
    bbox: (f64, f64, f64, f64),
    limit: i64,
) -> sqlx::Result<Vec<UserRow>> {
    let (min_lat, max_lat, min_lon, max_lon) = bbox;
    sqlx::query_as::<_, UserRow>(SQL_USERS_IN_BBOX)
        .bind(exclude_user_id)
        .bind(min_lat)
        .bind(max_lat)
        .bind(min_lon)
        .bind(max_lon)
        .bind(limit)
        .fetch_all(pool)
        .await
}
