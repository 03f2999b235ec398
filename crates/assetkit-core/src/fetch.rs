//! Redirect-following GET into an in-memory buffer.

use crate::http::{FetchError, Transport};
use crate::release::resolve_location;

/// Fetches `url` into memory, following 3xx responses that carry a `Location`.
///
/// `max_redirects` bounds the number of requests that may answer with a redirect:
/// a chain of N redirects followed by a 2xx succeeds iff `N < max_redirects`.
/// A 3xx without `Location`, or any other non-2xx final status, is `HttpStatus`.
pub fn fetch_buffer<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    max_redirects: u32,
) -> Result<Vec<u8>, FetchError> {
    let mut current = url.to_string();
    let mut request = 1u32;

    loop {
        let response = transport.get(&current)?;

        if response.is_redirect() {
            if let Some(location) = response.location.as_deref() {
                if request >= max_redirects {
                    return Err(FetchError::TooManyRedirects {
                        limit: max_redirects,
                        url: url.to_string(),
                    });
                }
                let next = resolve_location(&current, location).map_err(|source| {
                    FetchError::InvalidRedirect {
                        location: location.to_string(),
                        url: current.clone(),
                        source,
                    }
                })?;
                tracing::debug!("{} redirected ({}) to {}", current, response.status, next);
                current = next;
                request += 1;
                continue;
            }
        }

        if !response.is_success() {
            return Err(FetchError::HttpStatus {
                status: response.status,
                url: current,
            });
        }

        return Ok(response.body);
    }
}
