use std::time::Duration;

use http::HeaderMap;
use thiserror::Error;

use crate::meta::ResolvedTimeout;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be greater than zero when provided")]
    NonPositiveTimeout { name: &'static str },
    #[error("connect_timeout and read_timeout must be set together")]
    PartialTimeoutPair,
}

/// Immutable client configuration, validated once at construction.
///
/// Retry counts and durations are unsigned types, so negative values are
/// unrepresentable; the checks that remain are zero timeouts and a
/// half-specified connect/read pair.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    user_agent: Option<String>,
    default_headers: HeaderMap,
    retries: u32,
    verify_tls: bool,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    timeout: Option<Duration>,
    backoff_base: Duration,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Default headers sent with every request. The map is owned by the
    /// config and only handed out by shared reference.
    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Retry attempts beyond the first.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn backoff_base(&self) -> Duration {
        self.backoff_base
    }

    /// Timeout used when no per-call override is given: the connect/read
    /// pair when configured, else the scalar timeout, else none.
    pub(crate) fn resolved_default_timeout(&self) -> ResolvedTimeout {
        match (self.connect_timeout, self.read_timeout) {
            (Some(connect), Some(read)) => ResolvedTimeout::ConnectRead { connect, read },
            _ => match self.timeout {
                Some(timeout) => ResolvedTimeout::Total(timeout),
                None => ResolvedTimeout::Unbounded,
            },
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            default_headers: HeaderMap::new(),
            retries: 0,
            verify_tls: true,
            connect_timeout: None,
            read_timeout: None,
            timeout: None,
            backoff_base: Duration::ZERO,
        }
    }
}

pub struct ClientConfigBuilder {
    user_agent: Option<String>,
    default_headers: HeaderMap,
    retries: u32,
    verify_tls: bool,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    timeout: Option<Duration>,
    backoff_base: Duration,
}

impl ClientConfigBuilder {
    fn new() -> Self {
        Self {
            user_agent: None,
            default_headers: HeaderMap::new(),
            retries: 0,
            verify_tls: true,
            connect_timeout: None,
            read_timeout: None,
            timeout: None,
            backoff_base: Duration::ZERO,
        }
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replace the default header map. The map is cloned into the config
    /// at build time; later changes to the caller's copy have no effect.
    pub fn default_headers(mut self, default_headers: HeaderMap) -> Self {
        self.default_headers = default_headers;
        self
    }

    pub fn default_header(
        mut self,
        name: http::header::HeaderName,
        value: http::header::HeaderValue,
    ) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = Some(connect_timeout);
        self
    }

    pub fn read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = Some(read_timeout);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    pub fn try_build(self) -> Result<ClientConfig, ConfigError> {
        if self.connect_timeout.is_some() != self.read_timeout.is_some() {
            return Err(ConfigError::PartialTimeoutPair);
        }
        check_positive("timeout", self.timeout)?;
        check_positive("connect_timeout", self.connect_timeout)?;
        check_positive("read_timeout", self.read_timeout)?;

        Ok(ClientConfig {
            user_agent: self.user_agent,
            default_headers: self.default_headers,
            retries: self.retries,
            verify_tls: self.verify_tls,
            connect_timeout: self.connect_timeout,
            read_timeout: self.read_timeout,
            timeout: self.timeout,
            backoff_base: self.backoff_base,
        })
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn check_positive(name: &'static str, timeout: Option<Duration>) -> Result<(), ConfigError> {
    match timeout {
        Some(value) if value.is_zero() => Err(ConfigError::NonPositiveTimeout { name }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use http::header::{HeaderName, HeaderValue};
    use http::HeaderMap;

    use super::{ClientConfig, ConfigError};
    use crate::meta::ResolvedTimeout;

    #[test]
    fn defaults_are_stable() {
        let config = ClientConfig::default();

        assert_eq!(config.user_agent(), None);
        assert!(config.default_headers().is_empty());
        assert_eq!(config.retries(), 0);
        assert!(config.verify_tls());
        assert_eq!(config.connect_timeout(), None);
        assert_eq!(config.read_timeout(), None);
        assert_eq!(config.timeout(), None);
        assert_eq!(config.backoff_base(), Duration::ZERO);
    }

    #[test]
    fn default_headers_are_copied_at_build_time() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-test"),
            HeaderValue::from_static("1"),
        );

        let config = ClientConfig::builder()
            .default_headers(headers.clone())
            .try_build()
            .expect("valid config");

        headers.insert(
            HeaderName::from_static("x-test"),
            HeaderValue::from_static("2"),
        );

        assert_eq!(
            config.default_headers().get("x-test"),
            Some(&HeaderValue::from_static("1"))
        );
    }

    #[test]
    fn default_header_maps_are_independent_across_configs() {
        let first = ClientConfig::builder()
            .default_header(
                HeaderName::from_static("x-test"),
                HeaderValue::from_static("a"),
            )
            .try_build()
            .expect("valid config");
        let second = ClientConfig::default();

        assert_eq!(first.default_headers().len(), 1);
        assert!(second.default_headers().is_empty());
    }

    #[test]
    fn rejects_partial_connect_read_pair() {
        let connect_only = ClientConfig::builder()
            .connect_timeout(Duration::from_secs(1))
            .try_build();
        assert_eq!(connect_only.unwrap_err(), ConfigError::PartialTimeoutPair);

        let read_only = ClientConfig::builder()
            .read_timeout(Duration::from_secs(2))
            .try_build();
        assert_eq!(read_only.unwrap_err(), ConfigError::PartialTimeoutPair);
    }

    #[test]
    fn rejects_zero_timeouts() {
        let scalar = ClientConfig::builder().timeout(Duration::ZERO).try_build();
        assert_eq!(
            scalar.unwrap_err(),
            ConfigError::NonPositiveTimeout { name: "timeout" }
        );

        let pair = ClientConfig::builder()
            .connect_timeout(Duration::ZERO)
            .read_timeout(Duration::from_secs(1))
            .try_build();
        assert_eq!(
            pair.unwrap_err(),
            ConfigError::NonPositiveTimeout {
                name: "connect_timeout"
            }
        );

        let pair = ClientConfig::builder()
            .connect_timeout(Duration::from_secs(1))
            .read_timeout(Duration::ZERO)
            .try_build();
        assert_eq!(
            pair.unwrap_err(),
            ConfigError::NonPositiveTimeout {
                name: "read_timeout"
            }
        );
    }

    #[test]
    fn zero_backoff_base_is_allowed() {
        let config = ClientConfig::builder()
            .backoff_base(Duration::ZERO)
            .retries(3)
            .try_build()
            .expect("valid config");
        assert_eq!(config.backoff_base(), Duration::ZERO);
    }

    #[test]
    fn timeout_pair_supersedes_scalar_timeout() {
        let config = ClientConfig::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(1))
            .read_timeout(Duration::from_secs(3))
            .try_build()
            .expect("valid config");

        assert_eq!(
            config.resolved_default_timeout(),
            ResolvedTimeout::ConnectRead {
                connect: Duration::from_secs(1),
                read: Duration::from_secs(3),
            }
        );
    }

    #[test]
    fn scalar_timeout_applies_without_a_pair() {
        let config = ClientConfig::builder()
            .timeout(Duration::from_secs(10))
            .try_build()
            .expect("valid config");
        assert_eq!(
            config.resolved_default_timeout(),
            ResolvedTimeout::Total(Duration::from_secs(10))
        );

        let unbounded = ClientConfig::default();
        assert_eq!(
            unbounded.resolved_default_timeout(),
            ResolvedTimeout::Unbounded
        );
    }
}
