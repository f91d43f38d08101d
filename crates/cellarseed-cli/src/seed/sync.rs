//! Database sync: upsert the sampled wines, resolve their ids, and refresh
//! this merchant's offers.

use cellarseed_core::{OfferRow, WineRow, MERCHANT};
use cellarseed_db::{replace_offers, upsert_wines, wine_ids_by_code};

/// Writes the sampled rows to the store.
///
/// Offer rows whose wine id cannot be resolved after the upsert are dropped,
/// each with a warning plus a summary count; they are never written with a
/// dangling reference.
///
/// # Errors
///
/// Returns an error if any batched write or lookup fails. Batches are not
/// wrapped in one transaction, so a mid-run failure can leave wines upserted
/// with offers only partially refreshed.
pub(super) async fn persist(
    pool: &sqlx::PgPool,
    wines: &[WineRow],
    offers: Vec<(String, OfferRow)>,
) -> anyhow::Result<()> {
    tracing::info!(wines = wines.len(), "upserting wine rows");
    let written = upsert_wines(pool, wines).await?;
    tracing::info!(written, "wine upsert complete");

    let codes: Vec<String> = wines
        .iter()
        .map(|wine| wine.source_item_code.clone())
        .collect();
    let ids = wine_ids_by_code(pool, &codes).await?;

    let mut resolved: Vec<(i64, OfferRow)> = Vec::with_capacity(offers.len());
    let mut dropped: usize = 0;
    for (code, offer) in offers {
        if let Some(&wine_id) = ids.get(&code) {
            resolved.push((wine_id, offer));
        } else {
            tracing::warn!(code = %code, "offer dropped; wine id did not resolve after upsert");
            dropped += 1;
        }
    }
    if dropped > 0 {
        tracing::warn!(dropped, "offers dropped due to unresolved wine ids");
    }

    tracing::info!(wines = resolved.len(), "refreshing offers");
    let inserted = replace_offers(pool, MERCHANT, &resolved).await?;
    tracing::info!(inserted, dropped, "seeding complete");

    Ok(())
}
