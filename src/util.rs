use http::HeaderMap;
use thiserror::Error;

/// Per-call headers override defaults on a name-by-name basis.
pub(crate) fn merge_headers(default_headers: &HeaderMap, request_headers: &HeaderMap) -> HeaderMap {
    let mut merged = default_headers.clone();
    for (name, value) in request_headers {
        merged.insert(name.clone(), value.clone());
    }
    merged
}

/// Append query pairs to a URL, keeping any query string already present.
/// An unparseable URL passes through untouched and fails the usual URL
/// validation at request time instead.
pub(crate) fn append_query_pairs(raw: &str, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return raw.to_owned();
    }
    match url::Url::parse(raw) {
        Ok(mut parsed) => {
            parsed.query_pairs_mut().extend_pairs(pairs);
            parsed.to_string()
        }
        Err(_) => raw.to_owned(),
    }
}

#[derive(Debug, Error)]
#[error("invalid request url {url}: {reason}")]
pub(crate) struct InvalidRequestUrl {
    url: String,
    reason: String,
}

/// Requests must target an absolute http(s) URL; anything else fails the
/// attempt with a generic client error before the transport is touched.
pub(crate) fn check_absolute_http_url(raw: &str) -> Result<(), InvalidRequestUrl> {
    let parsed = url::Url::parse(raw).map_err(|source| InvalidRequestUrl {
        url: raw.to_owned(),
        reason: source.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(InvalidRequestUrl {
            url: raw.to_owned(),
            reason: format!("unsupported scheme {}", parsed.scheme()),
        });
    }
    if parsed.host_str().is_none() {
        return Err(InvalidRequestUrl {
            url: raw.to_owned(),
            reason: "missing host".to_owned(),
        });
    }
    Ok(())
}
