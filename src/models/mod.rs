pub mod candidate;
pub mod matches;
pub mod swipes;
pub mod users;

pub use candidate::{CandidateFeed, CandidateSummary};
pub use matches::{canonical_pair, MatchRow, MATCH_STATUS_ACTIVE, MATCH_STATUS_ENDED};
pub use swipes::Disposition;
pub use users::{UserPreferencesRow, UserRow};
