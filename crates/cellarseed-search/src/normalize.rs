//! Mapping from raw search items to normalized catalog/offer rows.
//!
//! Pure functions, no I/O. The coercion rules are deliberately strict:
//! a price that arrives as a string maps to `None`, not to a parsed value;
//! only genuinely numeric JSON values become integers.

use serde_json::Value;

use cellarseed_core::{OfferRow, WineRow, MERCHANT};

use crate::types::SearchItem;

/// Maps one raw item to a `(WineRow, OfferRow)` pair.
///
/// Returns `None` when the item has no item code: without the natural key
/// there is nothing to upsert against, and the caller accounts for the skip.
#[must_use]
pub fn item_to_rows(item: &SearchItem) -> Option<(WineRow, OfferRow)> {
    let code = item.item_code.as_deref().filter(|c| !c.is_empty())?;
    let name = item.item_name.as_deref().unwrap_or("");

    let wine = WineRow::new(code.to_owned(), name);

    let url = item
        .affiliate_url
        .as_deref()
        .filter(|u| !u.is_empty())
        .or(item.item_url.as_deref())
        .map(str::to_owned);

    let offer = OfferRow {
        merchant: MERCHANT.to_owned(),
        url,
        price_yen: coerce_int(&item.item_price),
        review_count: coerce_int(&item.review_count).and_then(|n| i32::try_from(n).ok()),
        review_average: coerce_float(&item.review_average),
    };

    Some((wine, offer))
}

/// Integer coercion: numeric JSON values only; strings and everything else
/// map to `None`. Fractional numbers are truncated toward zero.
fn coerce_int(value: &Value) -> Option<i64> {
    let number = value.as_number()?;
    #[allow(clippy::cast_possible_truncation)]
    number
        .as_i64()
        .or_else(|| number.as_f64().map(|f| f as i64))
}

/// Float coercion: numbers pass through; non-blank numeric strings parse;
/// everything else maps to `None`.
fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
