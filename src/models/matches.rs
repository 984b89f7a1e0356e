use chrono::{DateTime, Utc};

pub const MATCH_STATUS_ACTIVE: &str = "active";
pub const MATCH_STATUS_ENDED: &str = "ended";

/// Mutual-interest record for a canonical user pair.
///
/// Exactly one row may exist per pair; `pair_key` carries the UNIQUE
/// constraint that makes creation a compare-and-set. The only mutation ever
/// applied is the active to ended transition.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MatchRow {
    pub match_id: String,
    pub pair_key: String,
    pub user_a: String,
    pub user_b: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub ended_by: Option<String>,
}

impl MatchRow {
    pub fn is_active(&self) -> bool {
        self.status == MATCH_STATUS_ACTIVE
    }

    pub fn involves(&self, user_id: &str) -> bool {
        self.user_a == user_id || self.user_b == user_id
    }
}

/// Normalizes an unordered pair: lower id first, so the pair key is canonical
/// regardless of which direction completed the match.
pub fn canonical_pair(x: &str, y: &str) -> (String, String, String) {
    let (a, b) = if x <= y { (x, y) } else { (y, x) };
    (a.to_string(), b.to_string(), format!("{}:{}", a, b))
}
