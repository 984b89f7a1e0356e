use serde::{Deserialize, Serialize};

/// Direction of a one-time interest signal. Stored as its snake_case name;
/// the UNIQUE constraint on (actor_id, target_id) rejects re-signaling
/// instead of overwriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Positive,
    Negative,
    StrongPositive,
}

impl Disposition {
    pub fn as_str(self) -> &'static str {
        match self {
            Disposition::Positive => "positive",
            Disposition::Negative => "negative",
            Disposition::StrongPositive => "strong_positive",
        }
    }

    /// Both positive flavors count toward reciprocity.
    pub fn is_positive(self) -> bool {
        matches!(self, Disposition::Positive | Disposition::StrongPositive)
    }
}
