//! Normalized row shapes for the `wine` and `offer` tables, plus the
//! keyword-based style and tag derivation applied to item display names.

use serde::{Deserialize, Serialize};

/// Source / merchant identifier for every row written by this job.
pub const SOURCE: &str = "rakuten";
pub const MERCHANT: &str = "rakuten";

/// Storage limit for `wine.display_name`.
const MAX_DISPLAY_NAME_CHARS: usize = 255;

/// Default for the four preference-vector fields until a profiling pass
/// scores them properly.
const NEUTRAL_PREFERENCE: i16 = 50;

/// Wine style derived from the display name.
///
/// Classification is ordered substring matching, first match wins:
/// sparkling > rose > white > red > other. Native-script tokens are matched
/// case-sensitively, romanized tokens case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Sparkling,
    Rose,
    White,
    Red,
    Other,
}

impl Style {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Style::Sparkling => "sparkling",
            Style::Rose => "rose",
            Style::White => "white",
            Style::Red => "red",
            Style::Other => "other",
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive-tag vocabulary, scanned in order against display names.
/// Every matching term is included; insertion order follows this list.
const TAG_VOCABULARY: [&str; 11] = [
    "スモーキー",
    "ミネラル",
    "果実味",
    "樽香",
    "ビター",
    "フローラル",
    "すっきり",
    "濃厚",
    "軽やか",
    "辛口",
    "甘口",
];

/// Classifies a display name into a [`Style`], first match wins.
#[must_use]
pub fn classify_style(display_name: &str) -> Style {
    let lower = display_name.to_lowercase();
    if display_name.contains("スパークリング")
        || lower.contains("sparkling")
        || display_name.contains("シャンパン")
    {
        Style::Sparkling
    } else if display_name.contains("ロゼ") || lower.contains("rose") {
        Style::Rose
    } else if display_name.contains("白") || display_name.contains("ホワイト") {
        Style::White
    } else if display_name.contains("赤") || display_name.contains("レッド") {
        Style::Red
    } else {
        Style::Other
    }
}

/// Returns every vocabulary term that appears in the display name,
/// in vocabulary order.
#[must_use]
pub fn extract_tags(display_name: &str) -> Vec<String> {
    TAG_VOCABULARY
        .iter()
        .filter(|term| display_name.contains(*term))
        .map(|term| (*term).to_string())
        .collect()
}

/// Truncates a display name to the storage limit, on a character boundary.
#[must_use]
pub fn truncate_display_name(display_name: &str) -> String {
    display_name.chars().take(MAX_DISPLAY_NAME_CHARS).collect()
}

/// A normalized `wine` catalog row, keyed by `source_item_code` for upsert.
///
/// `country`, `region` and `grapes` have no source in the search payload and
/// stay `None`; the preference vector defaults to 50 across the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WineRow {
    pub source: String,
    pub source_item_code: String,
    pub display_name: String,
    pub style: Style,
    pub country: Option<String>,
    pub region: Option<String>,
    pub grapes: Option<Vec<String>>,
    pub tags: Vec<String>,
    pub spice_tags: Vec<String>,
    pub v_social: i16,
    pub v_adventure: i16,
    pub v_light: i16,
    pub v_food: i16,
}

impl WineRow {
    /// Builds a catalog row from already-derived fields, filling the
    /// placeholder attributes and preference-vector defaults.
    #[must_use]
    pub fn new(source_item_code: String, display_name: &str) -> Self {
        Self {
            source: SOURCE.to_string(),
            source_item_code,
            style: classify_style(display_name),
            tags: extract_tags(display_name),
            display_name: truncate_display_name(display_name),
            country: None,
            region: None,
            grapes: None,
            spice_tags: Vec::new(),
            v_social: NEUTRAL_PREFERENCE,
            v_adventure: NEUTRAL_PREFERENCE,
            v_light: NEUTRAL_PREFERENCE,
            v_food: NEUTRAL_PREFERENCE,
        }
    }
}

/// A normalized `offer` row for the current merchant listing of one wine.
/// Not independently keyed: offers are fully replaced per (merchant, wine)
/// on every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferRow {
    pub merchant: String,
    pub url: Option<String>,
    pub price_yen: Option<i64>,
    pub review_count: Option<i32>,
    pub review_average: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparkling_wins_over_red_when_both_tokens_present() {
        assert_eq!(
            classify_style("スパークリング 赤ワイン セット"),
            Style::Sparkling
        );
        assert_eq!(classify_style("Sparkling Red Blend 750ml"), Style::Sparkling);
    }

    #[test]
    fn champagne_classifies_as_sparkling() {
        assert_eq!(classify_style("シャンパン ブリュット"), Style::Sparkling);
    }

    #[test]
    fn rose_wins_over_white() {
        assert_eq!(classify_style("ロゼ 白ワイン 飲み比べ"), Style::Rose);
        assert_eq!(classify_style("Domaine ROSE Blanc"), Style::Rose);
    }

    #[test]
    fn white_tokens_native_and_katakana() {
        assert_eq!(classify_style("白ワイン 辛口"), Style::White);
        assert_eq!(classify_style("ホワイトブレンド"), Style::White);
    }

    #[test]
    fn red_tokens_native_and_katakana() {
        assert_eq!(classify_style("赤ワイン フルボディ"), Style::Red);
        assert_eq!(classify_style("レッドブレンド"), Style::Red);
    }

    #[test]
    fn white_wins_over_red_in_priority_order() {
        assert_eq!(classify_style("紅白ワインセット 赤 白"), Style::White);
    }

    #[test]
    fn romanized_tokens_match_case_insensitively() {
        assert_eq!(classify_style("SPARKLING WINE"), Style::Sparkling);
        assert_eq!(classify_style("Rosé ROSE 2020"), Style::Rose);
    }

    #[test]
    fn unmatched_name_is_other() {
        assert_eq!(classify_style("オレンジワイン 750ml"), Style::Other);
        assert_eq!(classify_style(""), Style::Other);
    }

    #[test]
    fn tags_follow_vocabulary_order_not_name_order() {
        // Name mentions 甘口 before スモーキー, but the vocabulary lists
        // スモーキー first.
        let tags = extract_tags("甘口でスモーキーな一本");
        assert_eq!(tags, vec!["スモーキー".to_string(), "甘口".to_string()]);
    }

    #[test]
    fn all_matching_tags_are_included() {
        let tags = extract_tags("果実味 樽香 辛口 フルボディ");
        assert_eq!(
            tags,
            vec![
                "果実味".to_string(),
                "樽香".to_string(),
                "辛口".to_string()
            ]
        );
    }

    #[test]
    fn no_tags_for_unmatched_name() {
        assert!(extract_tags("普通のワイン").is_empty());
    }

    #[test]
    fn display_name_is_truncated_to_255_chars() {
        let long = "あ".repeat(300);
        let truncated = truncate_display_name(&long);
        assert_eq!(truncated.chars().count(), 255);
    }

    #[test]
    fn short_display_name_is_untouched() {
        assert_eq!(truncate_display_name("シャブリ"), "シャブリ");
    }

    #[test]
    fn wine_row_defaults_are_applied() {
        let row = WineRow::new("shop:10001".to_string(), "赤ワイン 辛口 750ml");
        assert_eq!(row.source, "rakuten");
        assert_eq!(row.style, Style::Red);
        assert_eq!(row.tags, vec!["辛口".to_string()]);
        assert!(row.country.is_none());
        assert!(row.grapes.is_none());
        assert!(row.spice_tags.is_empty());
        assert_eq!(row.v_social, 50);
        assert_eq!(row.v_adventure, 50);
        assert_eq!(row.v_light, 50);
        assert_eq!(row.v_food, 50);
    }
}
