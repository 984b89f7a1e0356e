use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::config::EngineConfig;
use crate::models::UserRow;
use crate::services::responsiveness::ResponsivenessSignal;

/// Everything a term may look at for one (viewer, candidate) pair.
pub struct ScoreContext<'a> {
    pub candidate: &'a UserRow,
    pub distance_km: f64,
    /// Users the viewer has positively signaled.
    pub viewer_likes: &'a HashSet<String>,
    /// Users the candidate has positively signaled.
    pub candidate_likes: &'a HashSet<String>,
    pub responsiveness: ResponsivenessSignal,
    pub now: DateTime<Utc>,
    pub config: &'a EngineConfig,
}

/// One independently bounded contribution to the compatibility score. Terms
/// are pure functions of the context, so any of them can be swapped for an
/// external predictor without touching the rest of the pipeline.
pub trait ScoringTerm: Send + Sync {
    fn contribution(&self, ctx: &ScoreContext) -> f64;
}

pub fn default_terms() -> Vec<Box<dyn ScoringTerm>> {
    vec![
        Box::new(Completeness),
        Box::new(Recency),
        Box::new(SharedTaste),
        Box::new(Responsiveness),
        Box::new(Freshness),
        Box::new(DistancePenalty),
    ]
}

/// Weighted additive score, clamped to [0, 100]. Total over its domain:
/// missing signals degrade term-by-term instead of failing the pair.
pub fn score(terms: &[Box<dyn ScoringTerm>], ctx: &ScoreContext) -> f64 {
    let total: f64 = terms.iter().map(|t| t.contribution(ctx)).sum();
    total.clamp(0.0, 100.0)
}

/// 0-15: profile effort. Bio beyond 50 chars and photo-count steps,
/// capped so a wall of photos cannot run past the category bound.
pub struct Completeness;

impl ScoringTerm for Completeness {
    fn contribution(&self, ctx: &ScoreContext) -> f64 {
        let mut points = 0.0_f64;
        if ctx.candidate.bio.as_deref().map_or(0, str::len) > 50 {
            points += 5.0;
        }
        let photos = ctx.candidate.photo_count;
        if photos >= 1 {
            points += 2.0;
        }
        if photos >= 3 {
            points += 3.0;
        }
        if photos >= 5 {
            points += 5.0;
        }
        points.min(15.0)
    }
}

/// 0-20: step function of hours since the candidate was last active.
pub struct Recency;

impl ScoringTerm for Recency {
    fn contribution(&self, ctx: &ScoreContext) -> f64 {
        let Some(last_active) = ctx.candidate.last_active_at else {
            return 0.0;
        };
        let hours = (ctx.now - last_active).num_minutes() as f64 / 60.0;
        if hours < 1.0 {
            20.0
        } else if hours < 24.0 {
            15.0
        } else if hours < 72.0 {
            10.0
        } else if hours < 168.0 {
            5.0
        } else {
            0.0
        }
    }
}

/// 0-25: Jaccard similarity of the two positive-signal sets.
pub struct SharedTaste;

impl ScoringTerm for SharedTaste {
    fn contribution(&self, ctx: &ScoreContext) -> f64 {
        let union = ctx.viewer_likes.union(ctx.candidate_likes).count();
        if union == 0 {
            return 0.0;
        }
        let intersection = ctx.viewer_likes.intersection(ctx.candidate_likes).count();
        (intersection as f64 / union as f64) * 25.0
    }
}

/// 0-15: bucketed historical reply rate. No-history and unavailable both
/// take the configured benefit-of-the-doubt value so new or private users
/// are not penalized.
pub struct Responsiveness;

impl ScoringTerm for Responsiveness {
    fn contribution(&self, ctx: &ScoreContext) -> f64 {
        match ctx.responsiveness {
            ResponsivenessSignal::Rate(rate) => {
                if rate > 0.8 {
                    15.0
                } else if rate > 0.6 {
                    12.0
                } else if rate > 0.4 {
                    8.0
                } else if rate > 0.2 {
                    4.0
                } else {
                    0.0
                }
            }
            ResponsivenessSignal::NoHistory | ResponsivenessSignal::Unavailable => {
                ctx.config.responsiveness_default
            }
        }
    }
}

/// 0-10: boost for recently created accounts.
pub struct Freshness;

impl ScoringTerm for Freshness {
    fn contribution(&self, ctx: &ScoreContext) -> f64 {
        let days = (ctx.now - ctx.candidate.created_at).num_days();
        if days < 3 {
            10.0
        } else if days < 7 {
            7.0
        } else if days < 14 {
            5.0
        } else if days < 30 {
            3.0
        } else {
            0.0
        }
    }
}

/// 0 to -10: stepped distance penalty, subtracted from the total.
pub struct DistancePenalty;

impl ScoringTerm for DistancePenalty {
    fn contribution(&self, ctx: &ScoreContext) -> f64 {
        let d = ctx.distance_km;
        if d > 50.0 {
            -10.0
        } else if d > 30.0 {
            -7.0
        } else if d > 20.0 {
            -5.0
        } else if d > 10.0 {
            -3.0
        } else if d > 5.0 {
            -1.0
        } else {
            0.0
        }
    }
}
