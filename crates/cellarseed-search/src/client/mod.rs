//! HTTP client for the Rakuten Ichiba Item Search endpoint.

mod segment;

use std::time::Duration;

use reqwest::{header, Client, Url};

use cellarseed_core::plan::PriceRange;
use cellarseed_core::AppConfig;

use crate::envelope::{extract_error_message, extract_items, extract_u64};
use crate::error::SearchError;
use crate::retry::retry_with_backoff;
use crate::types::{SearchItem, SearchPage};

const DEFAULT_ENDPOINT: &str =
    "https://openapi.rakuten.co.jp/ichibams/api/IchibaItem/Search/20220601";

/// Fixed page size; the API maximum.
pub(crate) const PAGE_SIZE: u32 = 30;

/// Safety ceiling on pages fetched for one (segment, sort) combination.
pub(crate) const MAX_PAGES: u32 = 100;

/// Upper bound on the random jitter added to the mandatory pre-request delay.
const REQUEST_JITTER_MS: u64 = 150;

/// How much of an error response body is carried in diagnostics.
const MAX_ERROR_BODY_CHARS: usize = 800;

/// Statuses treated as transient and retried with back-off.
const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Requested field list. `affiliateRate` is deliberately absent: including
/// it in `elements` tends to produce 400 responses.
const ELEMENTS: &str = "itemCode,itemName,itemPrice,itemUrl,affiliateUrl,mediumImageUrls,\
reviewCount,reviewAverage,genreId,shopName,shopCode,tagIds";

/// Client for the Item Search API.
///
/// Owns the HTTP client, credentials, and the rate-limit/retry knobs. Every
/// request is preceded by a mandatory delay (base + jitter) to stay under
/// the undocumented rate limit; transient failures are retried with
/// exponential back-off. Use [`SearchClient::with_endpoint`] to point at a
/// mock server in tests.
pub struct SearchClient {
    client: Client,
    endpoint: Url,
    app_id: String,
    access_key: String,
    affiliate_id: Option<String>,
    max_retries: u32,
    backoff_base_ms: u64,
    request_delay_ms: u64,
}

impl SearchClient {
    /// Creates a client for the production endpoint from the app config.
    ///
    /// The `Origin`/`Referer` overrides are installed as default headers for
    /// gatekeeper compatibility.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SearchError::InvalidEndpoint`] if the
    /// configured header values are malformed.
    pub fn from_config(config: &AppConfig) -> Result<Self, SearchError> {
        let mut headers = header::HeaderMap::new();
        let header_value = |name: &str, value: &str| {
            header::HeaderValue::from_str(value).map_err(|e| SearchError::InvalidEndpoint {
                endpoint: DEFAULT_ENDPOINT.to_owned(),
                reason: format!("invalid {name} header value: {e}"),
            })
        };
        headers.insert(header::ORIGIN, header_value("Origin", &config.rakuten_origin)?);
        headers.insert(
            header::REFERER,
            header_value("Referer", &config.rakuten_referer)?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("cellarseed/0.1 (catalog-seeding)")
            .default_headers(headers)
            .build()?;

        let endpoint =
            Url::parse(DEFAULT_ENDPOINT).map_err(|e| SearchError::InvalidEndpoint {
                endpoint: DEFAULT_ENDPOINT.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint,
            app_id: config.rakuten_app_id.clone(),
            access_key: config.rakuten_access_key.clone(),
            affiliate_id: config.rakuten_affiliate_id.clone(),
            max_retries: config.max_retries,
            backoff_base_ms: config.backoff_base_ms,
            request_delay_ms: config.request_delay_ms,
        })
    }

    /// Points the client at a custom endpoint (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidEndpoint`] if `endpoint` does not parse.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, SearchError> {
        self.endpoint = Url::parse(endpoint).map_err(|e| SearchError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(self)
    }

    /// Fetches one page of search results, with the mandatory pre-request
    /// delay and automatic retry on transient errors.
    ///
    /// # Errors
    ///
    /// - [`SearchError::RetryableStatus`]: 429/5xx after all retries exhausted.
    /// - [`SearchError::UnexpectedStatus`]: any other non-2xx status, with
    ///   the (truncated) body for diagnosis; never retried.
    /// - [`SearchError::ApiError`]: a 2xx response whose payload encodes an
    ///   API-level error; never retried.
    /// - [`SearchError::Deserialize`]: body is not valid JSON; never retried.
    /// - [`SearchError::Http`]: network failure after all retries exhausted.
    pub async fn search_page(
        &self,
        keyword: &str,
        sort: &str,
        price: PriceRange,
        page: u32,
    ) -> Result<SearchPage, SearchError> {
        let url = self.build_url(keyword, sort, price, page);

        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                self.pace().await;

                let response = self
                    .client
                    .get(url.clone())
                    .bearer_auth(&self.access_key)
                    .send()
                    .await?;
                let status = response.status();

                if RETRYABLE_STATUSES.contains(&status.as_u16()) {
                    return Err(SearchError::RetryableStatus {
                        status: status.as_u16(),
                    });
                }

                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(SearchError::UnexpectedStatus {
                        status: status.as_u16(),
                        body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
                    });
                }

                let text = response.text().await?;
                let body: serde_json::Value =
                    serde_json::from_str(&text).map_err(|e| SearchError::Deserialize {
                        context: format!("search page {page} for keyword {keyword:?}"),
                        source: e,
                    })?;

                if let Some(message) = extract_error_message(&body) {
                    return Err(SearchError::ApiError(message));
                }

                Ok(body)
            }
        })
        .await?;

        let items: Vec<SearchItem> = extract_items(&body)
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();

        Ok(SearchPage {
            items,
            total_count: extract_u64(&body, &["count", "Count"]),
            page_size: extract_u64(&body, &["hits", "Hits"]),
        })
    }

    /// Sleeps for the mandatory inter-request delay plus jitter. A zero
    /// base delay disables pacing entirely (tests).
    async fn pace(&self) {
        if self.request_delay_ms == 0 {
            return;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let jitter = (rand::random::<f64>() * REQUEST_JITTER_MS as f64) as u64;
        tokio::time::sleep(Duration::from_millis(self.request_delay_ms + jitter)).await;
    }

    /// Builds the request URL with all query parameters percent-encoded.
    ///
    /// The access key is duplicated into the query string alongside the
    /// bearer header; the upstream gatekeeper requires both.
    fn build_url(&self, keyword: &str, sort: &str, price: PriceRange, page: u32) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("applicationId", &self.app_id);
            pairs.append_pair("accessKey", &self.access_key);
            pairs.append_pair("format", "json");
            pairs.append_pair("formatVersion", "2");
            if let Some(affiliate_id) = &self.affiliate_id {
                pairs.append_pair("affiliateId", affiliate_id);
            }
            pairs.append_pair("hits", &PAGE_SIZE.to_string());
            pairs.append_pair("page", &page.to_string());
            pairs.append_pair("sort", sort);
            pairs.append_pair("elements", ELEMENTS);
            pairs.append_pair("keyword", keyword);
            if let Some(min) = price.min {
                pairs.append_pair("minPrice", &min.to_string());
            }
            if let Some(max) = price.max {
                pairs.append_pair("maxPrice", &max.to_string());
            }
        }
        url
    }
}
