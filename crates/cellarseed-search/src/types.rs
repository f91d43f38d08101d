//! Raw Item Search payload types.
//!
//! Field types are deliberately loose: the API mixes numbers and numeric
//! strings for prices and review stats depending on the envelope version,
//! and the coercion rules ("integer only when the source value is numeric")
//! live in `normalize.rs`, not here. Unknown fields are ignored.

use serde::Deserialize;
use serde_json::Value;

/// One raw item record as returned by the Item Search endpoint.
///
/// `item_code` is the external identity; records without one are unusable
/// and get skipped by both the fetch dedup and the row mapper.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    #[serde(default)]
    pub item_code: Option<String>,
    #[serde(default)]
    pub item_name: Option<String>,
    /// Number or numeric string; coerced at mapping time.
    #[serde(default)]
    pub item_price: Value,
    /// Canonical item page URL.
    #[serde(default)]
    pub item_url: Option<String>,
    /// Affiliate-tracking URL; preferred over `item_url` when present.
    #[serde(default)]
    pub affiliate_url: Option<String>,
    #[serde(default)]
    pub review_count: Value,
    #[serde(default)]
    pub review_average: Value,
    #[serde(default)]
    pub shop_name: Option<String>,
    #[serde(default)]
    pub shop_code: Option<String>,
    #[serde(default)]
    pub genre_id: Value,
}

/// One decoded page of search results plus the totals the API reported,
/// used to compute the last page.
#[derive(Debug)]
pub struct SearchPage {
    pub items: Vec<SearchItem>,
    /// Total matching item count (`count`/`Count`), when reported.
    pub total_count: Option<u64>,
    /// Page size the API applied (`hits`/`Hits`), when reported.
    pub page_size: Option<u64>,
}
