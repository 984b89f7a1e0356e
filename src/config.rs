use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Tunable engine knobs, read once at startup.
///
/// The scoring defaults (benefit-of-the-doubt responsiveness, jitter range,
/// top-tier fraction) are product policy, not engineering constants, so they
/// stay env-tunable rather than hard-coded.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// TTL for feed results cached on the live request path.
    pub cache_ttl: Duration,
    /// Longer TTL for feeds written by the precompute sweep.
    pub precompute_ttl: Duration,
    /// Pause between precompute sweeps.
    pub precompute_interval: Duration,
    /// Users refreshed per sweep batch.
    pub precompute_batch_size: i64,
    /// Upper bound on candidates pulled from the geo stage per request.
    pub max_candidates_to_scan: i64,
    /// Page size used when the caller does not specify one.
    pub default_page_size: usize,
    /// Fraction of the ranked set that gets randomized exposure rotation.
    pub top_tier_fraction: f64,
    /// Half-width of the uniform score perturbation applied to the top tier.
    pub rank_jitter: f64,
    /// Responsiveness points granted when the signal is missing or the
    /// candidate has no message history.
    pub responsiveness_default: f64,
    /// Bound on the external responsiveness lookup.
    pub responsiveness_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            cache_ttl: Duration::from_secs(300),
            precompute_ttl: Duration::from_secs(1800),
            precompute_interval: Duration::from_secs(600),
            precompute_batch_size: 200,
            max_candidates_to_scan: 500,
            default_page_size: 25,
            top_tier_fraction: 0.2,
            rank_jitter: 2.5,
            responsiveness_default: 10.0,
            responsiveness_timeout: Duration::from_secs(2),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let base = EngineConfig::default();
        EngineConfig {
            cache_ttl: secs("EMBER_CACHE_TTL_SECS", base.cache_ttl),
            precompute_ttl: secs("EMBER_PRECOMPUTE_TTL_SECS", base.precompute_ttl),
            precompute_interval: secs("EMBER_PRECOMPUTE_INTERVAL_SECS", base.precompute_interval),
            precompute_batch_size: parsed("EMBER_PRECOMPUTE_BATCH", base.precompute_batch_size),
            max_candidates_to_scan: parsed("EMBER_MAX_SCAN", base.max_candidates_to_scan),
            default_page_size: parsed("EMBER_PAGE_SIZE", base.default_page_size),
            top_tier_fraction: parsed("EMBER_TOP_TIER_FRACTION", base.top_tier_fraction),
            rank_jitter: parsed("EMBER_RANK_JITTER", base.rank_jitter),
            responsiveness_default: parsed(
                "EMBER_RESPONSIVENESS_DEFAULT",
                base.responsiveness_default,
            ),
            responsiveness_timeout: secs(
                "EMBER_RESPONSIVENESS_TIMEOUT_SECS",
                base.responsiveness_timeout,
            ),
        }
    }
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn secs(key: &str, default: Duration) -> Duration {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}
