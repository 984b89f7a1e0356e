use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a ranked feed: enough to render a card without another
/// profile fetch. `score` is the unperturbed compatibility score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub user_id: String,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub city: Option<String>,
    pub main_photo_url: Option<String>,
    pub is_verified: bool,
    pub distance_km: f64,
    pub score: f64,
}

/// Cache value and API response body. Ephemeral: reconstructable from
/// durable state at any time, so losing it is a latency event, not data loss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateFeed {
    pub candidates: Vec<CandidateSummary>,
    pub generated_at: DateTime<Utc>,
}

impl CandidateFeed {
    pub fn truncated(mut self, page_size: usize) -> Self {
        self.candidates.truncate(page_size);
        self
    }
}
