//! Database operations for the `wine` table.

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};

use cellarseed_core::WineRow;

use crate::{DbError, CHUNK};

/// Upserts wine rows in batches, keyed on `source_item_code`.
///
/// A conflicting row has its descriptive fields overwritten with the fresh
/// values and `updated_at` bumped; the internal `id` is preserved so offers
/// from earlier runs keep pointing at the same wine.
///
/// Returns the number of rows written (inserted or updated).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any batch fails.
pub async fn upsert_wines(pool: &PgPool, rows: &[WineRow]) -> Result<u64, DbError> {
    let mut written: u64 = 0;

    for chunk in rows.chunks(CHUNK) {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO wine \
                 (source, source_item_code, display_name, style, country, region, \
                  grapes, tags, spice_tags, v_social, v_adventure, v_light, v_food) ",
        );
        builder.push_values(chunk, |mut b, row| {
            b.push_bind(&row.source)
                .push_bind(&row.source_item_code)
                .push_bind(&row.display_name)
                .push_bind(row.style.as_str())
                .push_bind(&row.country)
                .push_bind(&row.region)
                .push_bind(&row.grapes)
                .push_bind(&row.tags)
                .push_bind(&row.spice_tags)
                .push_bind(row.v_social)
                .push_bind(row.v_adventure)
                .push_bind(row.v_light)
                .push_bind(row.v_food);
        });
        builder.push(
            " ON CONFLICT (source_item_code) DO UPDATE SET \
                 source       = EXCLUDED.source, \
                 display_name = EXCLUDED.display_name, \
                 style        = EXCLUDED.style, \
                 country      = EXCLUDED.country, \
                 region       = EXCLUDED.region, \
                 grapes       = EXCLUDED.grapes, \
                 tags         = EXCLUDED.tags, \
                 spice_tags   = EXCLUDED.spice_tags, \
                 v_social     = EXCLUDED.v_social, \
                 v_adventure  = EXCLUDED.v_adventure, \
                 v_light      = EXCLUDED.v_light, \
                 v_food       = EXCLUDED.v_food, \
                 updated_at   = NOW()",
        );

        written += builder.build().execute(pool).await?.rows_affected();
    }

    Ok(written)
}

/// Resolves source item codes to internal wine ids, in batches.
///
/// Codes with no matching row are simply absent from the returned map; the
/// caller decides what an unresolved code means.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any lookup fails.
pub async fn wine_ids_by_code(
    pool: &PgPool,
    codes: &[String],
) -> Result<HashMap<String, i64>, DbError> {
    let mut ids = HashMap::with_capacity(codes.len());

    for chunk in codes.chunks(CHUNK) {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT source_item_code, id FROM wine WHERE source_item_code = ANY($1)",
        )
        .bind(chunk)
        .fetch_all(pool)
        .await?;

        for (code, id) in rows {
            ids.insert(code, id);
        }
    }

    Ok(ids)
}
