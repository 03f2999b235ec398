//! Resolve a redirect `Location` header against the URL that produced it.

use url::Url;

/// Returns the absolute URL for `location` relative to `current`.
/// Absolute locations are returned normalized; relative ones are joined.
pub fn resolve_location(current: &str, location: &str) -> Result<String, url::ParseError> {
    let base = Url::parse(current)?;
    Ok(base.join(location)?.to_string())
}
