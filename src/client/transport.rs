use bytes::Bytes;
use http::Method;

use crate::config::ClientConfig;
use crate::error::{HttpClientError, TransportErrorKind};
use crate::meta::ResolvedTimeout;

use super::{
    DEFAULT_POOL_IDLE_TIMEOUT, DEFAULT_POOL_MAX_IDLE_CONNECTIONS, DEFAULT_POOL_MAX_IDLE_PER_HOST,
};

/// Build the shared agent: connection pooling with fixed defaults, HTTP
/// statuses never reported as errors, TLS verification per config.
pub(super) fn make_agent(config: &ClientConfig) -> ureq::Agent {
    let tls_config = ureq::tls::TlsConfig::builder()
        .disable_verification(!config.verify_tls())
        .build();

    let mut builder = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .max_idle_age(DEFAULT_POOL_IDLE_TIMEOUT)
        .max_idle_connections_per_host(DEFAULT_POOL_MAX_IDLE_PER_HOST)
        .max_idle_connections(DEFAULT_POOL_MAX_IDLE_CONNECTIONS)
        .tls_config(tls_config);
    if let Some(user_agent) = config.user_agent() {
        builder = builder.user_agent(user_agent);
    }

    builder.build().new_agent()
}

fn is_timeout_error(error: &ureq::Error) -> bool {
    match error {
        ureq::Error::Timeout(_) => true,
        ureq::Error::Io(source) => matches!(
            source.kind(),
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
        ),
        _ => false,
    }
}

/// Connection-establishment fault class, when the failure belongs to one.
fn classify_connect_error(error: &ureq::Error) -> Option<TransportErrorKind> {
    match error {
        ureq::Error::HostNotFound => Some(TransportErrorKind::Dns),
        ureq::Error::ConnectionFailed | ureq::Error::ConnectProxyFailed(_) => {
            Some(TransportErrorKind::Connect)
        }
        ureq::Error::Io(source) => match source.kind() {
            std::io::ErrorKind::NotFound => Some(TransportErrorKind::Dns),
            std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::NotConnected
            | std::io::ErrorKind::AddrNotAvailable => Some(TransportErrorKind::Connect),
            std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::UnexpectedEof => Some(TransportErrorKind::Reset),
            _ => None,
        },
        _ => None,
    }
}

/// Translate a transport failure into the engine's taxonomy, once, at the
/// transport boundary. Every retry decision downstream works on the typed
/// error, never on the raw transport error.
pub(super) fn map_transport_error(
    error: ureq::Error,
    method: &Method,
    url: &str,
    timeout: ResolvedTimeout,
) -> HttpClientError {
    if is_timeout_error(&error) {
        return HttpClientError::Timeout {
            method: method.clone(),
            url: url.to_owned(),
            timeout,
            source: Box::new(error),
        };
    }
    match classify_connect_error(&error) {
        Some(kind) => HttpClientError::ConnectFailed {
            kind,
            method: method.clone(),
            url: url.to_owned(),
            source: Box::new(error),
        },
        None => HttpClientError::Client {
            method: method.clone(),
            url: url.to_owned(),
            source: Box::new(error),
        },
    }
}

/// Buffer the whole response body.
pub(super) fn read_body_bytes(
    response: &mut ureq::http::Response<ureq::Body>,
) -> std::io::Result<Bytes> {
    let mut reader = response.body_mut().as_reader();
    let mut collected = Vec::new();
    std::io::Read::read_to_end(&mut reader, &mut collected)?;
    Ok(Bytes::from(collected))
}
