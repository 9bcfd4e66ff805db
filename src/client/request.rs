use std::collections::BTreeMap;
use std::time::Duration;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method};
use serde::Serialize;
use serde_json::Value;

use crate::error::HttpClientError;
use crate::meta::ResolvedTimeout;
use crate::outcome::RequestOutcome;
use crate::response::ResponseStream;
use crate::util::{append_query_pairs, merge_headers};
use crate::EgressResult;

use super::{HttpClient, RequestParts};

/// Per-call options for one request. Finish with [`send`](Self::send),
/// [`send_for_headers`](Self::send_for_headers), or
/// [`send_stream`](Self::send_stream).
pub struct RequestBuilder<'a> {
    client: &'a HttpClient,
    method: Method,
    url: String,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<Bytes>,
    timeout_override: Option<Duration>,
    follow_redirects: bool,
    context: BTreeMap<String, Value>,
}

impl<'a> RequestBuilder<'a> {
    pub(crate) fn new(client: &'a HttpClient, method: Method, url: String) -> Self {
        Self {
            client,
            method,
            url,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
            timeout_override: None,
            follow_redirects: true,
            context: BTreeMap::new(),
        }
    }

    /// Set a header for this call only, overriding any default of the
    /// same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn try_header(self, name: &str, value: &str) -> EgressResult<Self> {
        let name: HeaderName = name.parse().map_err(|source| HttpClientError::Client {
            method: self.method.clone(),
            url: self.url.clone(),
            source: Box::new(source),
        })?;
        let value: HeaderValue = value.parse().map_err(|source| HttpClientError::Client {
            method: self.method.clone(),
            url: self.url.clone(),
            source: Box::new(source),
        })?;
        Ok(self.header(name, value))
    }

    /// Append one query parameter to the request URL. Values are
    /// form-encoded; a query string already on the URL is kept.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Override the timeout for this call. A zero override is a caller
    /// error, rejected here before any request is made.
    pub fn timeout(mut self, timeout: Duration) -> EgressResult<Self> {
        if timeout.is_zero() {
            return Err(HttpClientError::InvalidTimeoutOverride { timeout });
        }
        self.timeout_override = Some(timeout);
        Ok(self)
    }

    /// Whether to follow redirects (default: follow). With redirects
    /// disabled a 3xx is a normal success carrying its status metadata.
    pub fn follow_redirects(mut self, follow_redirects: bool) -> Self {
        self.follow_redirects = follow_redirects;
        self
    }

    /// Add one caller-context entry for diagnostics. Context never
    /// changes request execution; it is merged into the metadata record.
    pub fn context_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn context<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.context
            .extend(entries.into_iter().map(|(key, value)| (key.into(), value.into())));
        self
    }

    /// Raw request payload. Intended for POST; mutually exclusive with
    /// [`json`](Self::json) in intent, last write wins.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// JSON request payload; sets `content-type: application/json`.
    pub fn json<T>(self, payload: &T) -> EgressResult<Self>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(payload).map_err(|source| HttpClientError::Client {
            method: self.method.clone(),
            url: self.url.clone(),
            source: Box::new(source),
        })?;
        let with_body = self.body(Bytes::from(body));
        Ok(with_body.header(CONTENT_TYPE, HeaderValue::from_static("application/json")))
    }

    fn resolved_timeout(&self) -> ResolvedTimeout {
        match self.timeout_override {
            Some(timeout) => ResolvedTimeout::Total(timeout),
            None => self.client.config().resolved_default_timeout(),
        }
    }

    fn into_parts(self) -> (&'a HttpClient, RequestParts) {
        let timeout = self.resolved_timeout();
        let headers = merge_headers(self.client.config().default_headers(), &self.headers);
        let url = append_query_pairs(&self.url, &self.query);
        let parts = RequestParts {
            method: self.method,
            url,
            headers,
            body: self.body.unwrap_or_default(),
            follow_redirects: self.follow_redirects,
            timeout,
            context: self.context,
        };
        (self.client, parts)
    }

    /// Execute and buffer the response body (GET/POST success value).
    pub fn send(self) -> RequestOutcome<Bytes> {
        let (client, parts) = self.into_parts();
        client.run_buffered(parts)
    }

    /// Execute and return the response header mapping (HEAD success value).
    pub fn send_for_headers(self) -> RequestOutcome<HeaderMap> {
        let (client, parts) = self.into_parts();
        client.run_for_headers(parts)
    }

    /// Execute in streaming mode and return a handle to the live response
    /// (download success value).
    pub fn send_stream(self) -> RequestOutcome<ResponseStream> {
        let (client, parts) = self.into_parts();
        client.run_streaming(parts)
    }
}
