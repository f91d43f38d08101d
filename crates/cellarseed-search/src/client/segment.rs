//! Paginated per-segment fetch loop for `SearchClient`.

use std::collections::HashSet;

use cellarseed_core::plan::PriceRange;

use crate::error::SearchError;
use crate::types::SearchItem;

use super::{SearchClient, MAX_PAGES, PAGE_SIZE};

impl SearchClient {
    /// Collects up to `target` items unique by item code for one
    /// (keyword, sort, price bracket) combination.
    ///
    /// Pages from 1 and stops when the target is reached, a page comes back
    /// empty, the reported last page (`ceil(count / hits)`) has been fetched,
    /// or the page safety ceiling is hit. Items without an item code are
    /// skipped; they have no identity to dedup or upsert on.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`SearchClient::search_page`]; a failed page
    /// discards the whole segment/sort combination.
    pub async fn fetch_segment(
        &self,
        keyword: &str,
        sort: &str,
        price: PriceRange,
        target: usize,
    ) -> Result<Vec<SearchItem>, SearchError> {
        let mut items: Vec<SearchItem> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        if target == 0 {
            return Ok(items);
        }

        let mut page: u32 = 1;
        loop {
            let result = self.search_page(keyword, sort, price, page).await?;
            if result.items.is_empty() {
                break;
            }

            for item in result.items {
                let Some(code) = item.item_code.clone() else {
                    continue;
                };
                if !seen.insert(code) {
                    continue;
                }
                items.push(item);
                if items.len() >= target {
                    break;
                }
            }
            if items.len() >= target {
                break;
            }

            // Last page per the API's reported totals; absent or zero totals
            // mean the current page is all there is.
            let hits = result.page_size.filter(|h| *h > 0).unwrap_or(u64::from(PAGE_SIZE));
            let last_page = result
                .total_count
                .map_or(u64::from(page), |count| count.div_ceil(hits));
            if u64::from(page) >= last_page {
                break;
            }

            page += 1;
            if page > MAX_PAGES {
                tracing::warn!(keyword, sort, "page ceiling reached mid-segment");
                break;
            }
        }

        Ok(items)
    }
}
