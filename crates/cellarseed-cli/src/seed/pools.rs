//! Candidate collection: one pool of unique items per plan segment.

use std::collections::HashMap;

use cellarseed_core::plan;
use cellarseed_search::{SearchClient, SearchError, SearchItem};

/// Walks every plan segment sequentially and fills its candidate pool,
/// cycling all sort orders to diversify what each segment discovers.
///
/// Pools are keyed by segment key, items within a pool by item code, so a
/// code fetched under several sorts occupies one slot. Segments that yield
/// nothing still appear in the result with an empty pool.
///
/// # Errors
///
/// Propagates the first fetch error; a failed (segment, sort) pass aborts
/// the whole collection.
pub(super) async fn collect_pools(
    client: &SearchClient,
    candidates_per_segment: usize,
) -> Result<HashMap<String, HashMap<String, SearchItem>>, SearchError> {
    let per_sort = plan::per_sort_target(candidates_per_segment, plan::SORTS.len());
    let mut pools: HashMap<String, HashMap<String, SearchItem>> = HashMap::new();

    for segment in plan::segments() {
        let key = segment.key();
        tracing::info!(
            segment = %key,
            candidates = candidates_per_segment,
            per_sort,
            "collecting segment"
        );

        let pool = pools.entry(key.clone()).or_default();
        for sort in plan::SORTS {
            let fetched = client
                .fetch_segment(segment.keyword, sort, segment.price, per_sort)
                .await?;
            tracing::info!(segment = %key, sort, fetched = fetched.len(), "sort pass complete");

            for item in fetched {
                if let Some(code) = item.item_code.clone() {
                    pool.insert(code, item);
                }
            }
        }

        tracing::info!(segment = %key, pool_size = pool.len(), "segment pool complete");
    }

    Ok(pools)
}
