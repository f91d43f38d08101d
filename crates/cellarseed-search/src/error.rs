use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("retryable HTTP status {status} from the search API")]
    RetryableStatus { status: u16 },

    #[error("unexpected HTTP status {status} from the search API: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("search API returned an error payload: {0}")]
    ApiError(String),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid search endpoint \"{endpoint}\": {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}
