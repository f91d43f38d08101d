//! Client for the Rakuten Ichiba Item Search API: rate-limited paginated
//! fetching per (keyword, price bracket, sort) with tolerant response
//! unwrapping, plus normalization of raw items into catalog/offer rows.

mod client;
mod envelope;
mod error;
mod normalize;
mod retry;
mod types;

pub use client::SearchClient;
pub use error::SearchError;
pub use normalize::item_to_rows;
pub use types::{SearchItem, SearchPage};
