use std::time::Duration;

use http::Method;

use crate::error::{ErrorKind, HttpClientError};

/// Only GET and HEAD are eligible for automatic retry. POST is never
/// retried here, even under retryable failures, to avoid duplicate side
/// effects.
pub(crate) fn is_idempotent_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD)
}

/// Retryable transport conditions: timeouts and connection-establishment
/// failures. Everything else is terminal on first sight.
pub(crate) fn is_retryable_error(error: &HttpClientError) -> bool {
    matches!(
        error.kind(),
        ErrorKind::RequestTimeout | ErrorKind::RetryableTransport
    )
}

/// Exponential backoff before the next attempt: `base * 2^(n-1)` where `n`
/// is the number of attempts completed so far. A zero base disables the
/// delay entirely.
pub(crate) fn backoff_delay(base: Duration, completed_attempts: u32) -> Duration {
    if base.is_zero() {
        return Duration::ZERO;
    }
    let exponent = completed_attempts.saturating_sub(1).min(31);
    base.saturating_mul(1_u32 << exponent)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use http::Method;

    use super::{backoff_delay, is_idempotent_safe, is_retryable_error};
    use crate::error::{HttpClientError, TransportErrorKind};
    use crate::meta::ResolvedTimeout;

    fn timeout_error() -> HttpClientError {
        HttpClientError::Timeout {
            method: Method::GET,
            url: "http://example.com/".to_owned(),
            timeout: ResolvedTimeout::Total(Duration::from_secs(1)),
            source: "timed out".into(),
        }
    }

    fn connect_error() -> HttpClientError {
        HttpClientError::ConnectFailed {
            kind: TransportErrorKind::Connect,
            method: Method::GET,
            url: "http://example.com/".to_owned(),
            source: "refused".into(),
        }
    }

    fn generic_error() -> HttpClientError {
        HttpClientError::Client {
            method: Method::GET,
            url: "http://example.com/".to_owned(),
            source: "boom".into(),
        }
    }

    #[test]
    fn only_get_and_head_are_idempotent_safe() {
        assert!(is_idempotent_safe(&Method::GET));
        assert!(is_idempotent_safe(&Method::HEAD));
        assert!(!is_idempotent_safe(&Method::POST));
        assert!(!is_idempotent_safe(&Method::PUT));
        assert!(!is_idempotent_safe(&Method::DELETE));
    }

    #[test]
    fn timeouts_and_connect_failures_are_retryable() {
        assert!(is_retryable_error(&timeout_error()));
        assert!(is_retryable_error(&connect_error()));
        assert!(!is_retryable_error(&generic_error()));
        assert!(!is_retryable_error(
            &HttpClientError::InvalidTimeoutOverride {
                timeout: Duration::ZERO,
            }
        ));
    }

    #[test]
    fn backoff_doubles_per_completed_attempt() {
        let base = Duration::from_millis(100);
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(100));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(200));
        assert_eq!(backoff_delay(base, 3), Duration::from_millis(400));
        assert_eq!(backoff_delay(base, 4), Duration::from_millis(800));
    }

    #[test]
    fn zero_base_disables_the_delay() {
        for attempt in 1..6 {
            assert_eq!(backoff_delay(Duration::ZERO, attempt), Duration::ZERO);
        }
    }

    #[test]
    fn large_attempt_counts_saturate_instead_of_overflowing() {
        let delay = backoff_delay(Duration::from_secs(3600), 64);
        assert!(delay >= Duration::from_secs(3600));
    }
}
