//! Parse raw response header lines collected by curl.

/// Headers the fetcher cares about, taken from the last response block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ParsedHeaders {
    pub location: Option<String>,
    pub content_length: Option<u64>,
}

/// Parse collected header lines. A status line (`HTTP/...`) starts a new block,
/// so interim responses such as `100 Continue` do not leak into the result.
pub(crate) fn parse_headers(lines: &[String]) -> ParsedHeaders {
    let mut parsed = ParsedHeaders::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            parsed = ParsedHeaders::default();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("location") && !value.is_empty() {
                parsed.location = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    parsed.content_length = Some(n);
                }
            }
        }
    }

    parsed
}
