/// Immutable process configuration, read once at startup and passed
/// explicitly to the search client and persistence layer.
#[derive(Clone)]
pub struct AppConfig {
    pub rakuten_app_id: String,
    pub rakuten_access_key: String,
    pub rakuten_affiliate_id: Option<String>,
    pub rakuten_origin: String,
    pub rakuten_referer: String,
    pub database_url: String,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Mandatory pre-request delay applied before every search API call.
    pub request_delay_ms: u64,
    /// Additional attempts after the first failure for retryable errors.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("rakuten_app_id", &self.rakuten_app_id)
            .field("rakuten_access_key", &"[redacted]")
            .field(
                "rakuten_affiliate_id",
                &self.rakuten_affiliate_id.as_ref().map(|_| "[redacted]"),
            )
            .field("rakuten_origin", &self.rakuten_origin)
            .field("rakuten_referer", &self.rakuten_referer)
            .field("database_url", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("request_delay_ms", &self.request_delay_ms)
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .finish()
    }
}
