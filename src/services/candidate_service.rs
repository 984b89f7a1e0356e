use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::database::{block_repo, swipe_repo, user_repo};
use crate::error::{EngineError, EngineResult, Precondition};
use crate::models::{UserPreferencesRow, UserRow};
use crate::services::geo_service::{self, NearbyUser};

/// Viewer side of a candidate computation, validated once per request.
pub struct ViewerContext {
    pub user: UserRow,
    pub prefs: UserPreferencesRow,
    pub lat: f64,
    pub lon: f64,
}

/// Loads and validates the viewer. Unknown user is NotFound; a known user
/// without location or without a preferences row fails with the matching
/// precondition so the client can prompt for the missing piece.
pub async fn load_viewer(pool: &SqlitePool, viewer_id: &str) -> EngineResult<ViewerContext> {
    let user = user_repo::get_user(pool, viewer_id)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("user {}", viewer_id)))?;

    let (lat, lon) = user
        .location()
        .ok_or(EngineError::Precondition(Precondition::NoLocation))?;

    let prefs = user_repo::get_preferences(pool, viewer_id)
        .await?
        .ok_or(EngineError::Precondition(Precondition::IncompleteProfile))?;

    Ok(ViewerContext {
        user,
        prefs,
        lat,
        lon,
    })
}

/// The three-stage filter pipeline: geo, preference, exclusion. Each stage
/// narrows the previous one and the whole computation short-circuits to
/// empty as soon as any stage yields nothing. A failure in any stage aborts
/// the request; an under-filtered result is never returned.
///
/// `max_scan` caps the geo stage, `limit` caps the final distance-ordered
/// output.
pub async fn get_candidates(
    pool: &SqlitePool,
    viewer: &ViewerContext,
    limit: usize,
    max_scan: i64,
) -> EngineResult<Vec<NearbyUser>> {
    let nearby = geo_service::nearby(
        pool,
        &viewer.user.user_id,
        viewer.lat,
        viewer.lon,
        viewer.prefs.max_distance_km,
        max_scan,
    )
    .await?;
    if nearby.is_empty() {
        return Ok(Vec::new());
    }

    let interest = viewer.prefs.interest_set();
    let today = Utc::now().date_naive();
    let preferred: Vec<NearbyUser> = nearby
        .into_iter()
        .filter(|c| passes_preferences(&c.user, &viewer.prefs, interest.as_ref(), today))
        .collect();
    if preferred.is_empty() {
        return Ok(Vec::new());
    }

    let swiped: HashSet<String> = swipe_repo::swiped_target_ids(pool, &viewer.user.user_id)
        .await?
        .into_iter()
        .collect();
    let blocked: HashSet<String> = block_repo::blocked_user_ids(pool, &viewer.user.user_id)
        .await?
        .into_iter()
        .collect();

    let mut out: Vec<NearbyUser> = preferred
        .into_iter()
        .filter(|c| !swiped.contains(&c.user.user_id) && !blocked.contains(&c.user.user_id))
        .collect();
    out.truncate(limit);
    Ok(out)
}

fn passes_preferences(
    candidate: &UserRow,
    prefs: &UserPreferencesRow,
    interest: Option<&HashSet<String>>,
    today: NaiveDate,
) -> bool {
    if !candidate.active() || !candidate.verified() {
        return false;
    }

    // No interest set means any gender; a candidate without a recorded
    // gender only matches the unrestricted case.
    match interest {
        None => {}
        Some(set) => match candidate.gender.as_deref() {
            Some(g) if set.contains(g) => {}
            _ => return false,
        },
    }

    match candidate.birth_date {
        Some(birth) => {
            let age = age_in_years(birth, today);
            age >= prefs.min_age && age <= prefs.max_age
        }
        None => false,
    }
}

/// Age in completed calendar years, not day-count division: the birthday
/// itself flips the age.
pub fn age_in_years(birth: NaiveDate, on: NaiveDate) -> i64 {
    let mut age = i64::from(on.year()) - i64::from(birth.year());
    if (on.month(), on.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn user(id: &str, gender: Option<&str>, birth: &str) -> UserRow {
        UserRow {
            user_id: id.to_string(),
            name: None,
            gender: gender.map(str::to_string),
            city: None,
            main_photo_url: None,
            bio: None,
            photo_count: 0,
            birth_date: Some(birth.parse().unwrap()),
            latitude: Some(52.0),
            longitude: Some(4.0),
            is_verified: 1,
            is_active: 1,
            created_at: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
            last_active_at: None,
        }
    }

    fn prefs(min_age: i64, max_age: i64, genders: Option<&str>) -> UserPreferencesRow {
        UserPreferencesRow {
            user_id: "viewer".to_string(),
            min_age,
            max_age,
            interested_genders: genders.map(str::to_string),
            max_distance_km: 50.0,
        }
    }

    #[test]
    fn age_counts_completed_years() {
        let birth: NaiveDate = "1990-06-15".parse().unwrap();
        assert_eq!(age_in_years(birth, "2020-06-14".parse().unwrap()), 29);
        assert_eq!(age_in_years(birth, "2020-06-15".parse().unwrap()), 30);
        assert_eq!(age_in_years(birth, "2020-06-16".parse().unwrap()), 30);
    }

    #[test]
    fn missing_interest_set_matches_any_gender() {
        let p = prefs(18, 99, None);
        let today: NaiveDate = "2026-01-01".parse().unwrap();
        assert!(passes_preferences(
            &user("a", Some("female"), "1995-01-01"),
            &p,
            p.interest_set().as_ref(),
            today
        ));
        assert!(passes_preferences(
            &user("b", None, "1995-01-01"),
            &p,
            p.interest_set().as_ref(),
            today
        ));
    }

    #[test]
    fn interest_set_restricts_gender() {
        let p = prefs(18, 99, Some(r#"["female"]"#));
        let today: NaiveDate = "2026-01-01".parse().unwrap();
        let set = p.interest_set();
        assert!(passes_preferences(
            &user("a", Some("female"), "1995-01-01"),
            &p,
            set.as_ref(),
            today
        ));
        assert!(!passes_preferences(
            &user("b", Some("male"), "1995-01-01"),
            &p,
            set.as_ref(),
            today
        ));
        assert!(!passes_preferences(
            &user("c", None, "1995-01-01"),
            &p,
            set.as_ref(),
            today
        ));
    }

    #[test]
    fn age_range_is_inclusive() {
        let p = prefs(30, 31, None);
        let today: NaiveDate = "2026-01-02".parse().unwrap();
        assert!(passes_preferences(
            &user("a", None, "1995-01-01"),
            &p,
            None,
            today
        ));
        assert!(!passes_preferences(
            &user("b", None, "1997-01-01"),
            &p,
            None,
            today
        ));
    }

    #[test]
    fn unverified_or_inactive_candidates_fail() {
        let p = prefs(18, 99, None);
        let today: NaiveDate = "2026-01-01".parse().unwrap();
        let mut u = user("a", None, "1995-01-01");
        u.is_verified = 0;
        assert!(!passes_preferences(&u, &p, None, today));
        let mut u = user("b", None, "1995-01-01");
        u.is_active = 0;
        assert!(!passes_preferences(&u, &p, None, today));
    }
}
