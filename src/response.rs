use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};

use crate::error::HttpClientError;
use crate::EgressResult;

/// Streaming download handle returned by [`crate::RequestBuilder::send_stream`].
///
/// The body stays on the wire until it is read; dropping the handle drops
/// the connection back to the agent's pool.
pub struct ResponseStream {
    method: Method,
    url: String,
    response: ureq::http::Response<ureq::Body>,
}

impl ResponseStream {
    pub(crate) fn new(
        method: Method,
        url: String,
        response: ureq::http::Response<ureq::Body>,
    ) -> Self {
        Self {
            method,
            url,
            response,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.response.headers()
    }

    /// Final URL of the response, after any followed redirects.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Consume the handle and read the body through a blocking reader.
    pub fn into_reader(self) -> ureq::BodyReader<'static> {
        self.response.into_body().into_reader()
    }

    /// Buffer the remaining body. Read failures surface as generic client
    /// errors, the same as any other post-response transport fault.
    pub fn into_bytes(mut self) -> EgressResult<Bytes> {
        let mut collected = Vec::new();
        let mut reader = self.response.body_mut().as_reader();
        std::io::Read::read_to_end(&mut reader, &mut collected).map_err(|source| {
            HttpClientError::Client {
                method: self.method.clone(),
                url: self.url.clone(),
                source: Box::new(source),
            }
        })?;
        Ok(Bytes::from(collected))
    }

    /// Stream the body into `writer`, returning the number of bytes copied.
    pub fn copy_to_writer<W>(mut self, writer: &mut W) -> EgressResult<u64>
    where
        W: std::io::Write + ?Sized,
    {
        let mut reader = self.response.body_mut().as_reader();
        std::io::copy(&mut reader, writer).map_err(|source| HttpClientError::Client {
            method: self.method.clone(),
            url: self.url.clone(),
            source: Box::new(source),
        })
    }
}

impl std::fmt::Debug for ResponseStream {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ResponseStream")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("status", &self.response.status())
            .finish_non_exhaustive()
    }
}
