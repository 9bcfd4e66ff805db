use std::time::Duration;

use http::Method;
use thiserror::Error;

use crate::meta::ResolvedTimeout;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Connection-establishment fault classes that qualify for automatic retry.
///
/// The class is reported even on the terminal attempt: it names the kind of
/// fault, not a promise that another attempt will follow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransportErrorKind {
    Dns,
    Connect,
    Reset,
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Dns => "dns",
            Self::Connect => "connect",
            Self::Reset => "reset",
        };
        formatter.write_str(text)
    }
}

/// Stable kind names attached to failure metadata as `final_error`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    RequestTimeout,
    RetryableTransport,
    ClientError,
    InvalidTimeout,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequestTimeout => "request_timeout",
            Self::RetryableTransport => "retryable_transport",
            Self::ClientError => "client_error",
            Self::InvalidTimeout => "invalid_timeout",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Error taxonomy for a single request execution.
///
/// HTTP status codes never appear here; a 404 or 500 is a successful
/// transport outcome and is reported through the metadata record instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HttpClientError {
    /// The transport did not complete within the resolved timeout.
    #[error("request timed out for {method} {url} (timeout {timeout}): {source}")]
    Timeout {
        method: Method,
        url: String,
        timeout: ResolvedTimeout,
        #[source]
        source: BoxError,
    },
    /// A connection could not be established (DNS, refused, reset).
    #[error("connection failed ({kind}) for {method} {url}: {source}")]
    ConnectFailed {
        kind: TransportErrorKind,
        method: Method,
        url: String,
        #[source]
        source: BoxError,
    },
    /// Any other transport-level failure, including malformed requests.
    #[error("client error for {method} {url}: {source}")]
    Client {
        method: Method,
        url: String,
        #[source]
        source: BoxError,
    },
    /// Caller-input validation error, rejected before any request is made.
    #[error("timeout override must be greater than zero (got {timeout:?})")]
    InvalidTimeoutOverride { timeout: Duration },
}

impl HttpClientError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout { .. } => ErrorKind::RequestTimeout,
            Self::ConnectFailed { .. } => ErrorKind::RetryableTransport,
            Self::Client { .. } => ErrorKind::ClientError,
            Self::InvalidTimeoutOverride { .. } => ErrorKind::InvalidTimeout,
        }
    }
}
