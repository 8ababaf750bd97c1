use super::difficulty::ItemDifficulty;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Strategy for picking which catalog items a round of questions draws on.
/// Returns indices into `ids`; picking with replacement is expected, since
/// a round may ask for more questions than the pool has items.
pub trait ItemSelector {
    fn pick_indices(
        &self,
        ids: &[&str],
        count: usize,
        stats: &HashMap<String, ItemDifficulty>,
    ) -> Vec<usize>;
}

/// Uniform random selection.
pub struct RandomSelector;

impl ItemSelector for RandomSelector {
    fn pick_indices(
        &self,
        ids: &[&str],
        count: usize,
        _stats: &HashMap<String, ItemDifficulty>,
    ) -> Vec<usize> {
        if ids.is_empty() {
            return Vec::new();
        }
        let mut rng = rand::thread_rng();
        (0..count).map(|_| rng.gen_range(0..ids.len())).collect()
    }
}

/// Selection biased toward items the learner misses most. Items are scored
/// from recorded stats, and picks come from the top third of that ranking
/// so weak items dominate without drilling a single word forever.
pub struct WeakestFirstSelector;

impl ItemSelector for WeakestFirstSelector {
    fn pick_indices(
        &self,
        ids: &[&str],
        count: usize,
        stats: &HashMap<String, ItemDifficulty>,
    ) -> Vec<usize> {
        if ids.is_empty() {
            return Vec::new();
        }
        if stats.is_empty() {
            // No history yet; behave like uniform selection
            return RandomSelector.pick_indices(ids, count, stats);
        }

        let mut scored: Vec<(usize, f64)> = ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (idx, item_score(id, stats)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let pool_size = ((scored.len() as f64 * 0.3).ceil() as usize)
            .max(1)
            .min(scored.len());
        let pool = &scored[0..pool_size];

        let mut rng = rand::thread_rng();
        (0..count)
            .map(|_| pool.choose(&mut rng).map(|(idx, _)| *idx).unwrap_or(0))
            .collect()
    }
}

fn item_score(id: &str, stats: &HashMap<String, ItemDifficulty>) -> f64 {
    match stats.get(id) {
        Some(difficulty) => {
            let miss_penalty = difficulty.miss_rate * 2.0;
            // Slow recall counts against an item once the answer takes
            // longer than five seconds
            let timing_penalty = if difficulty.avg_answer_ms > 5000.0 {
                (difficulty.avg_answer_ms - 5000.0) / 1000.0
            } else {
                0.0
            };
            miss_penalty + timing_penalty
        }
        // Unseen items get a middling score so they still come up
        None => 50.0,
    }
}
