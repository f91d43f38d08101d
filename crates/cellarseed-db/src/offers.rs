//! Database operations for the `offer` table.

use std::collections::BTreeSet;

use sqlx::{PgPool, Postgres, QueryBuilder};

use cellarseed_core::OfferRow;

use crate::{DbError, CHUNK};

/// Replaces the given merchant's offers for the affected wines.
///
/// First deletes every existing offer row for `merchant` whose `wine_id`
/// appears in `offers`, then inserts the fresh rows, both in batches. Wines
/// not mentioned in `offers` are left untouched, as are other merchants'
/// offers on the same wines.
///
/// Returns the number of offer rows inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any delete or insert batch fails.
pub async fn replace_offers(
    pool: &PgPool,
    merchant: &str,
    offers: &[(i64, OfferRow)],
) -> Result<u64, DbError> {
    if offers.is_empty() {
        return Ok(0);
    }

    let wine_ids: Vec<i64> = offers
        .iter()
        .map(|(wine_id, _)| *wine_id)
        .collect::<BTreeSet<i64>>()
        .into_iter()
        .collect();

    for chunk in wine_ids.chunks(CHUNK) {
        sqlx::query("DELETE FROM offer WHERE merchant = $1 AND wine_id = ANY($2)")
            .bind(merchant)
            .bind(chunk)
            .execute(pool)
            .await?;
    }

    let mut inserted: u64 = 0;
    for chunk in offers.chunks(CHUNK) {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO offer \
                 (wine_id, merchant, url, price_yen, review_count, review_average) ",
        );
        builder.push_values(chunk, |mut b, (wine_id, offer)| {
            b.push_bind(wine_id)
                .push_bind(&offer.merchant)
                .push_bind(&offer.url)
                .push_bind(offer.price_yen)
                .push_bind(offer.review_count)
                .push_bind(offer.review_average);
        });

        inserted += builder.build().execute(pool).await?.rows_affected();
    }

    Ok(inserted)
}
