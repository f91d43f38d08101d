//! The `seed` command: collect candidate pools per segment, sample a
//! balanced set, map it to rows, and hand it to the sync step.

mod pools;
mod sync;

use std::collections::HashMap;

use cellarseed_core::{AppConfig, OfferRow, WineRow};
use cellarseed_search::{item_to_rows, SearchClient, SearchItem};

pub struct SeedOptions {
    pub target: usize,
    pub candidates_per_segment: usize,
    pub dry_run: bool,
}

/// Runs one full seeding pass.
///
/// Zero fetched or sampled items is a clean no-op: the run logs and exits
/// without touching the database. Any fetch or store error aborts the whole
/// run; there is no skip-and-continue for failed segments.
///
/// # Errors
///
/// Returns an error on configuration, fetch, or database failure.
pub async fn run(config: &AppConfig, options: SeedOptions) -> anyhow::Result<()> {
    let client = SearchClient::from_config(config)?;

    let segment_pools = pools::collect_pools(&client, options.candidates_per_segment).await?;
    let candidate_total: usize = segment_pools.values().map(HashMap::len).sum();
    tracing::info!(
        segments = segment_pools.len(),
        candidates = candidate_total,
        "candidate collection complete"
    );

    let sampled = cellarseed_core::stratified_sample(&segment_pools, options.target);
    tracing::info!(
        sampled = sampled.len(),
        target = options.target,
        "stratified sampling complete"
    );

    if sampled.is_empty() {
        tracing::warn!("0 items sampled; nothing to write");
        return Ok(());
    }

    let (wines, offers, skipped) = build_rows(&sampled);
    if skipped > 0 {
        tracing::warn!(skipped, "sampled items dropped during row mapping");
    }
    if wines.is_empty() {
        tracing::warn!("no mappable rows; nothing to write");
        return Ok(());
    }

    if options.dry_run {
        tracing::info!(
            wines = wines.len(),
            offers = offers.len(),
            "dry run; skipping database writes"
        );
        return Ok(());
    }

    let pool = cellarseed_db::connect_pool(
        &config.database_url,
        cellarseed_db::PoolConfig::from(config),
    )
    .await?;

    sync::persist(&pool, &wines, offers).await
}

/// Maps sampled items to wine rows plus `(source_item_code, offer)` pairs.
///
/// Items the mapper rejects (no usable item code) are counted, not silently
/// lost. The sampled input is already unique by code, so the output carries
/// one pair per wine.
fn build_rows(items: &[SearchItem]) -> (Vec<WineRow>, Vec<(String, OfferRow)>, usize) {
    let mut wines = Vec::with_capacity(items.len());
    let mut offers = Vec::with_capacity(items.len());
    let mut skipped = 0;

    for item in items {
        match item_to_rows(item) {
            Some((wine, offer)) => {
                offers.push((wine.source_item_code.clone(), offer));
                wines.push(wine);
            }
            None => skipped += 1,
        }
    }

    (wines, offers, skipped)
}
