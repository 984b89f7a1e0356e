use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

/// Projection of the Profile Store: everything discovery needs to filter and
/// score a user. Read-only here apart from the location/preference
/// write-throughs that keep the projection current.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: String,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub main_photo_url: Option<String>,
    pub bio: Option<String>,
    pub photo_count: i64,
    pub birth_date: Option<NaiveDate>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_verified: i64,
    pub is_active: i64,
    pub created_at: DateTime<Utc>,
    pub last_active_at: Option<DateTime<Utc>>,
}

impl UserRow {
    pub fn verified(&self) -> bool {
        self.is_verified != 0
    }

    pub fn active(&self) -> bool {
        self.is_active != 0
    }

    pub fn location(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserPreferencesRow {
    pub user_id: String,
    pub min_age: i64,
    pub max_age: i64,
    /// JSON array of gender values. NULL means "any gender": freshly
    /// registered users must stay visible before they pick an interest.
    pub interested_genders: Option<String>,
    pub max_distance_km: f64,
}

impl UserPreferencesRow {
    /// Parsed gender-interest set. `None` means no restriction; an
    /// undecodable column degrades to no restriction rather than hiding
    /// everyone from the viewer.
    pub fn interest_set(&self) -> Option<HashSet<String>> {
        let raw = self.interested_genders.as_deref()?;
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(values) => Some(values.into_iter().collect()),
            Err(e) => {
                warn!(
                    "undecodable interested_genders for {}: {}; treating as any",
                    self.user_id, e
                );
                None
            }
        }
    }
}
