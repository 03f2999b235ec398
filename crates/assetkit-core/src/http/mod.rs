//! HTTP transport for asset downloads.
//!
//! Uses the curl crate (libcurl) for one GET per call. Redirects are *not*
//! followed here: the fetcher inspects each 3xx and decides whether to hop,
//! so the redirect limit and `Location` resolution stay under our control.

mod error;
mod parse;

pub use error::{BoxError, FetchError};

use std::str;

/// One raw HTTP exchange.
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u32,
    /// `Location` header value, if any (unresolved, as sent by the server).
    pub location: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }
}

/// Performs a single GET without following redirects.
///
/// The fetcher only depends on this trait; tests substitute a scripted transport.
pub trait Transport {
    fn get(&self, url: &str) -> Result<Response, FetchError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<Response, FetchError> {
        (**self).get(url)
    }
}

/// libcurl-backed transport. No transfer timeout is set; a stalled CDN blocks the call.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    user_agent: Option<String>,
}

impl CurlTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    fn perform(&self, url: &str) -> Result<Response, curl::Error> {
        let mut headers: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(false)?;
        if let Some(ua) = &self.user_agent {
            easy.useragent(ua)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        let parsed = parse::parse_headers(&headers);
        if let Some(expected) = parsed.content_length {
            if (200..300).contains(&status) && expected != body.len() as u64 {
                tracing::warn!(
                    "{} declared Content-Length {} but sent {} bytes",
                    url,
                    expected,
                    body.len()
                );
            }
        }

        Ok(Response {
            status,
            location: parsed.location,
            body,
        })
    }
}

impl Transport for CurlTransport {
    fn get(&self, url: &str) -> Result<Response, FetchError> {
        tracing::debug!("GET {}", url);
        self.perform(url).map_err(|e| FetchError::transport(url, e))
    }
}
