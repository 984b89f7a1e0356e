use sqlx::SqlitePool;

use crate::database::geo_repo;
use crate::models::UserRow;

/// Geo-stage output: a candidate row plus refined great-circle distance.
#[derive(Debug, Clone)]
pub struct NearbyUser {
    pub user: UserRow,
    pub distance_km: f64,
}

/// Who is within `radius_km` of the point, ascending by distance, capped at
/// `limit` rows scanned. Bounding-box prefilter in SQL, haversine refinement
/// here; ties break on user id so output order is deterministic.
pub async fn nearby(
    pool: &SqlitePool,
    viewer_id: &str,
    lat: f64,
    lon: f64,
    radius_km: f64,
    limit: i64,
) -> sqlx::Result<Vec<NearbyUser>> {
    let bbox = bounding_box(lat, lon, radius_km);
    let rows = geo_repo::load_users_in_bbox(pool, viewer_id, bbox, limit).await?;

    let mut out: Vec<NearbyUser> = rows
        .into_iter()
        .filter_map(|user| {
            let (u_lat, u_lon) = user.location()?;
            let distance_km = haversine_km(lat, lon, u_lat, u_lon);
            (distance_km <= radius_km).then_some(NearbyUser { user, distance_km })
        })
        .collect();

    out.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.user.user_id.cmp(&b.user.user_id))
    });
    Ok(out)
}

pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let to_rad = |deg: f64| deg.to_radians();
    let dlat = to_rad(lat2 - lat1);
    let dlon = to_rad(lon2 - lon1);
    let a = (dlat / 2.0).sin().powi(2)
        + to_rad(lat1).cos() * to_rad(lat2).cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    6371.0 * c
}

fn bounding_box(lat: f64, lon: f64, radius_km: f64) -> (f64, f64, f64, f64) {
    let lat_change = radius_km / 111.0;
    let lat_rad = lat.to_radians();
    let lon_change = (radius_km / 111.0) / lat_rad.cos().abs();

    (
        lat - lat_change,
        lat + lat_change,
        lon - lon_change,
        lon + lon_change,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_known_distance() {
        // Amsterdam to Rotterdam is roughly 57 km.
        let d = haversine_km(52.3676, 4.9041, 51.9244, 4.4777);
        assert!((50.0..65.0).contains(&d), "got {}", d);
    }

    #[test]
    fn haversine_zero_for_same_point() {
        assert!(haversine_km(52.0, 4.0, 52.0, 4.0) < 1e-9);
    }

    #[test]
    fn bounding_box_contains_radius_circle() {
        let (min_lat, max_lat, min_lon, max_lon) = bounding_box(52.0, 4.0, 10.0);
        // A point 9 km due north stays inside the box.
        let north = 52.0 + 9.0 / 111.0;
        assert!(north > min_lat && north < max_lat);
        assert!(4.0 > min_lon && 4.0 < max_lon);
    }
}
