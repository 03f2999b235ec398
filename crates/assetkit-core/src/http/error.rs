//! Error type for a single asset fetch (transport, status, or redirect failure).

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The transport could not complete the exchange (DNS, connect, TLS, read).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },
    /// Final response was not 2xx (including a 3xx without `Location`).
    #[error("request failed with status {status} for {url}")]
    HttpStatus { status: u32, url: String },
    /// The server kept redirecting past the configured limit.
    #[error("too many redirects (limit {limit}) for {url}")]
    TooManyRedirects { limit: u32, url: String },
    /// A `Location` header that cannot be resolved to an absolute URL.
    #[error("invalid redirect location {location:?} from {url}")]
    InvalidRedirect {
        location: String,
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl FetchError {
    pub fn transport(url: &str, source: impl Into<BoxError>) -> Self {
        FetchError::Transport {
            url: url.to_string(),
            source: source.into(),
        }
    }

    /// HTTP status behind the failure, if the server answered at all.
    pub fn status(&self) -> Option<u32> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
