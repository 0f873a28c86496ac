use std::collections::HashMap;

use rand::Rng;

use crate::client::api::ErrorRecord;
use crate::session::question::Question;

/// Cap on how much more often a missed question may be drawn.
pub const MAX_WEIGHT: u32 = 5;

pub fn weight_for(error_count: u32) -> u32 {
    (error_count.saturating_mul(2)).clamp(1, MAX_WEIGHT)
}

/// Roulette-wheel sampling without replacement, biased toward prompts the
/// player has missed before. Pools no larger than `limit` come back as-is.
pub fn select_weighted<R: Rng>(
    candidates: Vec<Question>,
    errors: &[ErrorRecord],
    limit: usize,
    rng: &mut R,
) -> Vec<Question> {
    if candidates.len() <= limit {
        return candidates;
    }

    let by_prompt: HashMap<&str, u32> = errors
        .iter()
        .map(|e| (e.question.as_str(), e.error_count))
        .collect();

    let mut pool: Vec<(Question, u32)> = candidates
        .into_iter()
        .map(|q| {
            let w = by_prompt.get(q.prompt.as_str()).map_or(1, |&c| weight_for(c));
            (q, w)
        })
        .collect();

    let mut selected = Vec::with_capacity(limit);
    while selected.len() < limit && !pool.is_empty() {
        let total: u32 = pool.iter().map(|(_, w)| w).sum();
        let target = rng.gen_range(0.0..f64::from(total));

        let mut cumulative = 0.0;
        let mut pick = pool.len() - 1;
        for (i, (_, w)) in pool.iter().enumerate() {
            cumulative += f64::from(*w);
            if target < cumulative {
                pick = i;
                break;
            }
        }
        selected.push(pool.remove(pick).0);
    }
    selected
}
