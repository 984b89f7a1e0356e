use rand::Rng;

use crate::models::CandidateSummary;

/// Diversity ranking: stable sort descending by score, then rotate exposure
/// inside the top tier with a bounded random perturbation. Pure descending
/// order starves mid-scoring users of visibility; jitter inside the tier
/// keeps approximate quality order while rotating who leads across calls.
///
/// The rng is injected so tests can seed it; only the ordering is
/// perturbed, the stored score stays exact. Returns the full ranked list;
/// paging is the caller's concern, so a cached ranking can serve any
/// page size.
pub fn rank<R: Rng>(
    mut candidates: Vec<CandidateSummary>,
    top_fraction: f64,
    jitter: f64,
    rng: &mut R,
) -> Vec<CandidateSummary> {
    if candidates.is_empty() {
        return candidates;
    }

    // Stable: equal scores keep the pipeline's distance-ascending order.
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let tier = tier_size(candidates.len(), top_fraction);
    let rest = candidates.split_off(tier);

    let mut perturbed: Vec<(f64, CandidateSummary)> = candidates
        .into_iter()
        .map(|c| (c.score + rng.gen_range(-jitter..=jitter), c))
        .collect();
    perturbed.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut out: Vec<CandidateSummary> = perturbed.into_iter().map(|(_, c)| c).collect();
    out.extend(rest);
    out
}

/// Ceiling of `fraction` of the set, never more than the whole set.
fn tier_size(len: usize, fraction: f64) -> usize {
    (((len as f64) * fraction).ceil() as usize).min(len)
}
