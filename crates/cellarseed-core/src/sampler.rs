//! Stratified sampling across segment pools.
//!
//! Given per-segment candidate pools keyed by item code, draws a globally
//! deduplicated sample of at most `target` items, allocating as evenly as
//! possible across segments and backfilling from the global pool when some
//! segments are too sparse to meet their quota.
//!
//! The random draw itself is not contractual; only the quota math and the
//! cardinality/dedup guarantees are. Callers must not rely on ordering.

use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;

/// Draws `min(target, total distinct items)` items from `segments`,
/// deduplicated globally by item code.
///
/// Allocation: with `m` non-empty segments, each segment contributes up to
/// `base = target / m` distinct new items, and the first `target - base * m`
/// segments (in randomized order) contribute one extra. An item code already
/// picked via another segment neither consumes quota nor is picked again.
/// If the per-segment pass falls short (sparse segments), the shortfall is
/// backfilled from a shuffled global pool of all candidates.
///
/// Empty input, empty pools, and undersized pools are all legal: the result
/// is simply smaller, never an error.
#[must_use]
pub fn stratified_sample<T: Clone>(
    segments: &HashMap<String, HashMap<String, T>>,
    target: usize,
) -> Vec<T> {
    let mut rng = rand::rng();

    let mut seg_keys: Vec<&String> = segments
        .iter()
        .filter(|(_, pool)| !pool.is_empty())
        .map(|(key, _)| key)
        .collect();
    if seg_keys.is_empty() || target == 0 {
        return Vec::new();
    }
    seg_keys.shuffle(&mut rng);

    let m = seg_keys.len();
    let base = target / m;
    let remainder = target - base * m;

    let mut picked_codes: HashSet<&str> = HashSet::new();
    let mut picked: Vec<T> = Vec::with_capacity(target);

    let shuffled_pool = |key: &String, rng: &mut rand::rngs::ThreadRng| {
        let mut pool: Vec<(&str, &T)> = segments[key]
            .iter()
            .map(|(code, item)| (code.as_str(), item))
            .collect();
        pool.shuffle(rng);
        pool
    };

    // Base allocation: up to `base` distinct new picks per segment.
    for key in &seg_keys {
        let mut taken = 0usize;
        for (code, item) in shuffled_pool(key, &mut rng) {
            if taken >= base {
                break;
            }
            if picked_codes.insert(code) {
                picked.push(item.clone());
                taken += 1;
            }
        }
    }

    // Remainder: one extra pick from each of the first `remainder` segments.
    for key in seg_keys.iter().take(remainder) {
        for (code, item) in shuffled_pool(key, &mut rng) {
            if picked_codes.insert(code) {
                picked.push(item.clone());
                break;
            }
        }
    }

    // Backfill from the global pool when sparse segments left us short.
    if picked.len() < target {
        let mut global: Vec<(&str, &T)> = seg_keys
            .iter()
            .flat_map(|key| segments[*key].iter().map(|(c, it)| (c.as_str(), it)))
            .collect();
        global.shuffle(&mut rng);
        for (code, item) in global {
            if picked.len() >= target {
                break;
            }
            if picked_codes.insert(code) {
                picked.push(item.clone());
            }
        }
    }

    picked.truncate(target);
    picked
}
