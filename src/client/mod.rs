use std::collections::BTreeMap;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, Method};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::meta::ResolvedTimeout;

mod execute;
mod request;
mod transport;

pub use request::RequestBuilder;

const DEFAULT_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 8;
const DEFAULT_POOL_MAX_IDLE_CONNECTIONS: usize = 16;

/// Everything one attempt sequence needs, resolved before the first
/// attempt and immutable for the rest of the call.
pub(crate) struct RequestParts {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) follow_redirects: bool,
    pub(crate) timeout: ResolvedTimeout,
    pub(crate) context: BTreeMap<String, Value>,
}

/// Synchronous HTTP client: the single egress path for outbound requests.
///
/// One instance wraps a shared [`ureq::Agent`] (the pooled transport
/// context) and an immutable [`ClientConfig`]. The agent is internally
/// thread-safe, so the client can be shared across threads; the engine
/// itself adds no synchronization and runs each call, including backoff
/// sleeps, on the caller's thread.
pub struct HttpClient {
    config: ClientConfig,
    agent: ureq::Agent,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Self {
        let agent = transport::make_agent(&config);
        Self { config, agent }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn request(&self, method: Method, url: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, method, url.into())
    }

    /// GET a URL; finish with [`RequestBuilder::send`] for the body bytes.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.request(Method::GET, url)
    }

    /// HEAD a URL; finish with [`RequestBuilder::send_for_headers`].
    pub fn head(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.request(Method::HEAD, url)
    }

    /// POST to a URL; attach a payload with [`RequestBuilder::body`] or
    /// [`RequestBuilder::json`], finish with [`RequestBuilder::send`].
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.request(Method::POST, url)
    }

    /// GET a URL in streaming mode; finish with
    /// [`RequestBuilder::send_stream`] for a [`crate::ResponseStream`]
    /// instead of buffered bytes.
    pub fn download(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.request(Method::GET, url)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
