//! The fixed collection plan: which segments to fetch and how much to ask for.
//!
//! A segment is one (keyword, price bracket) pair, the sampling stratum the
//! stratified sampler balances across. Sort orders are a diversification axis
//! only: cycling them changes *which* items a segment discovers, but sorts are
//! never part of segment identity.

/// Global sample target for one run.
pub const TARGET: usize = 300;

/// Candidate pool size to aim for per segment, spread across all sort orders.
pub const CANDIDATES_PER_SEGMENT: usize = 24;

/// Sort orders cycled per segment to diversify discovery.
pub const SORTS: [&str; 4] = ["-reviewCount", "-reviewAverage", "-affiliateRate", "standard"];

/// Search keywords (one axis of the segment cross product).
pub const KEYWORDS: [&str; 6] = [
    "赤ワイン 750ml",
    "白ワイン 750ml",
    "スパークリングワイン 750ml",
    "ロゼワイン 750ml",
    "フランス ワイン 750ml",
    "イタリア ワイン 750ml",
];

/// Price brackets in yen (the other axis). Half-open intervals; an absent
/// `max` means unbounded above.
pub const PRICE_RANGES: [PriceRange; 4] = [
    PriceRange {
        min: Some(0),
        max: Some(2_000),
    },
    PriceRange {
        min: Some(2_000),
        max: Some(5_000),
    },
    PriceRange {
        min: Some(5_000),
        max: Some(10_000),
    },
    PriceRange {
        min: Some(10_000),
        max: None,
    },
];

/// A half-open price interval in yen, optionally unbounded above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

/// One sampling stratum: a (keyword, price bracket) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub keyword: &'static str,
    pub price: PriceRange,
}

impl Segment {
    /// Stable key identifying this segment in pools and logs,
    /// e.g. `"赤ワイン 750ml|0-2000"` or `"赤ワイン 750ml|10000-inf"`.
    #[must_use]
    pub fn key(&self) -> String {
        let min = self
            .price
            .min
            .map_or_else(|| "0".to_string(), |v| v.to_string());
        let max = self
            .price
            .max
            .map_or_else(|| "inf".to_string(), |v| v.to_string());
        format!("{}|{min}-{max}", self.keyword)
    }
}

/// The full keyword × price-bracket cross product, in plan order.
#[must_use]
pub fn segments() -> Vec<Segment> {
    let mut out = Vec::with_capacity(KEYWORDS.len() * PRICE_RANGES.len());
    for keyword in KEYWORDS {
        for price in PRICE_RANGES {
            out.push(Segment { keyword, price });
        }
    }
    out
}

/// Per-sort sub-target: how many items to ask the fetcher for on each
/// (segment, sort) pass so that all sorts together roughly fill the
/// segment's candidate budget. Never less than 1.
#[must_use]
pub fn per_sort_target(candidates_per_segment: usize, sort_count: usize) -> usize {
    (candidates_per_segment / sort_count.max(1)).max(1)
}
