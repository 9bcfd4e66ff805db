use std::thread::sleep;
use std::time::Instant;

use bytes::Bytes;
use http::HeaderMap;
use tracing::{debug, warn};
use ureq::ResponseExt;

use crate::error::HttpClientError;
use crate::meta::{RequestMeta, ResolvedTimeout};
use crate::outcome::RequestOutcome;
use crate::response::ResponseStream;
use crate::retry;
use crate::util;

use super::{transport, HttpClient, RequestParts};

impl HttpClient {
    /// GET/POST path: buffer the response body.
    pub(crate) fn run_buffered(&self, parts: RequestParts) -> RequestOutcome<Bytes> {
        let method = parts.method.clone();
        let url = parts.url.clone();
        self.run_with_retry(&parts, |mut response| {
            transport::read_body_bytes(&mut response).map_err(|source| HttpClientError::Client {
                method: method.clone(),
                url: url.clone(),
                source: Box::new(source),
            })
        })
    }

    /// HEAD path: the success value is the response header mapping.
    pub(crate) fn run_for_headers(&self, parts: RequestParts) -> RequestOutcome<HeaderMap> {
        self.run_with_retry(&parts, |response| Ok(response.headers().clone()))
    }

    /// Download path: hand back the live response instead of buffering.
    pub(crate) fn run_streaming(&self, parts: RequestParts) -> RequestOutcome<ResponseStream> {
        let method = parts.method.clone();
        self.run_with_retry(&parts, |response| {
            let url = response.get_uri().to_string();
            Ok(ResponseStream::new(method.clone(), url, response))
        })
    }

    /// The attempt loop. One call runs entirely on the caller's thread:
    /// `Attempting(n) -> Success | RetryWait -> Attempting(n+1) | Failure`,
    /// at most `1 + retries` attempts, backoff strictly between attempts.
    fn run_with_retry<T>(
        &self,
        parts: &RequestParts,
        extract: impl Fn(ureq::http::Response<ureq::Body>) -> Result<T, HttpClientError>,
    ) -> RequestOutcome<T> {
        let max_attempts = self.config().retries().saturating_add(1);
        let mut attempt: u32 = 1;

        loop {
            let attempt_started = Instant::now();
            match self.run_once(parts) {
                Ok(response) => {
                    let elapsed = attempt_started.elapsed();
                    let status = response.status();
                    let response_url = response.get_uri().to_string();
                    let meta = RequestMeta::new(
                        parts.method.clone(),
                        parts.url.clone(),
                        attempt,
                        parts.timeout,
                        parts.context.clone(),
                    )
                    .with_response(status, response_url, elapsed);

                    return match extract(response) {
                        Ok(value) => RequestOutcome::success(value, meta),
                        Err(error) => {
                            let kind = error.kind();
                            warn!(
                                method = %parts.method,
                                url = %parts.url,
                                kind = kind.as_str(),
                                "failed to read response body"
                            );
                            RequestOutcome::failure(error, meta.with_final_error(kind))
                        }
                    };
                }
                Err(error) => {
                    let eligible = attempt < max_attempts
                        && retry::is_idempotent_safe(&parts.method)
                        && retry::is_retryable_error(&error);
                    if eligible {
                        let delay = retry::backoff_delay(self.config().backoff_base(), attempt);
                        debug!(
                            method = %parts.method,
                            url = %parts.url,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            kind = error.kind().as_str(),
                            "retrying after transport failure"
                        );
                        if !delay.is_zero() {
                            sleep(delay);
                        }
                        attempt += 1;
                        continue;
                    }

                    warn!(
                        method = %parts.method,
                        url = %parts.url,
                        attempts = attempt,
                        kind = error.kind().as_str(),
                        "request failed"
                    );
                    let meta = RequestMeta::new(
                        parts.method.clone(),
                        parts.url.clone(),
                        attempt,
                        parts.timeout,
                        parts.context.clone(),
                    )
                    .with_final_error(error.kind());
                    return RequestOutcome::failure(error, meta);
                }
            }
        }
    }

    /// One transport call: build, configure timeouts and redirect policy,
    /// run, and translate any failure into the typed taxonomy.
    fn run_once(
        &self,
        parts: &RequestParts,
    ) -> Result<ureq::http::Response<ureq::Body>, HttpClientError> {
        util::check_absolute_http_url(&parts.url).map_err(|source| HttpClientError::Client {
            method: parts.method.clone(),
            url: parts.url.clone(),
            source: Box::new(source),
        })?;

        let mut builder = ureq::http::Request::builder()
            .method(parts.method.clone())
            .uri(parts.url.as_str());
        for (name, value) in &parts.headers {
            builder = builder.header(name, value);
        }
        let request =
            builder
                .body(parts.body.to_vec())
                .map_err(|source| HttpClientError::Client {
                    method: parts.method.clone(),
                    url: parts.url.clone(),
                    source: Box::new(source),
                })?;

        let mut configured = self.agent.configure_request(request);
        configured = match parts.timeout {
            ResolvedTimeout::Unbounded => configured,
            ResolvedTimeout::Total(timeout) => configured.timeout_global(Some(timeout)),
            ResolvedTimeout::ConnectRead { connect, read } => configured
                .timeout_connect(Some(connect))
                .timeout_recv_response(Some(read))
                .timeout_recv_body(Some(read)),
        };
        if !parts.follow_redirects {
            configured = configured.max_redirects(0).max_redirects_will_error(false);
        }
        let request = configured.build();

        self.agent.run(request).map_err(|source| {
            transport::map_transport_error(source, &parts.method, &parts.url, parts.timeout)
        })
    }
}
