use std::collections::BTreeMap;
use std::time::Duration;

use http::{Method, StatusCode};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::ErrorKind;

/// The timeout that applied to every attempt of one request, after
/// precedence resolution (override > connect/read pair > scalar > none).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResolvedTimeout {
    /// No timeout configured anywhere; attempts may block indefinitely.
    Unbounded,
    /// A single budget covering the whole attempt.
    Total(Duration),
    /// Distinct budgets for the connect phase and the read phase.
    ConnectRead { connect: Duration, read: Duration },
}

impl ResolvedTimeout {
    fn to_value(self) -> Value {
        match self {
            Self::Unbounded => Value::Null,
            Self::Total(timeout) => Value::from(timeout.as_secs_f64()),
            Self::ConnectRead { connect, read } => Value::from(vec![
                Value::from(connect.as_secs_f64()),
                Value::from(read.as_secs_f64()),
            ]),
        }
    }
}

impl std::fmt::Display for ResolvedTimeout {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unbounded => formatter.write_str("none"),
            Self::Total(timeout) => write!(formatter, "{}s", timeout.as_secs_f64()),
            Self::ConnectRead { connect, read } => write!(
                formatter,
                "connect {}s / read {}s",
                connect.as_secs_f64(),
                read.as_secs_f64()
            ),
        }
    }
}

/// Diagnostic record attached to every request outcome, success or failure.
///
/// Response-derived fields (`status`, `reason`, `elapsed`, the final URL)
/// are only present when at least one transport response was obtained.
#[derive(Clone, Debug)]
pub struct RequestMeta {
    method: Method,
    url: String,
    attempts: u32,
    timeout: ResolvedTimeout,
    status: Option<StatusCode>,
    reason: Option<&'static str>,
    elapsed: Option<Duration>,
    final_error: Option<&'static str>,
    context: BTreeMap<String, Value>,
}

impl RequestMeta {
    pub(crate) fn new(
        method: Method,
        url: String,
        attempts: u32,
        timeout: ResolvedTimeout,
        context: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            method,
            url,
            attempts,
            timeout,
            status: None,
            reason: None,
            elapsed: None,
            final_error: None,
            context,
        }
    }

    /// Record the transport response: status, reason phrase, elapsed time,
    /// and the response-reported URL (which may differ after redirects).
    pub(crate) fn with_response(
        mut self,
        status: StatusCode,
        response_url: String,
        elapsed: Duration,
    ) -> Self {
        self.status = Some(status);
        self.reason = status.canonical_reason();
        self.elapsed = Some(elapsed);
        self.url = response_url;
        self
    }

    pub(crate) fn with_final_error(mut self, kind: ErrorKind) -> Self {
        self.final_error = Some(kind.as_str());
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Final request URL: the response-reported URL when a response was
    /// obtained, otherwise the URL the caller requested.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn timeout(&self) -> ResolvedTimeout {
        self.timeout
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status.map(|status| status.as_u16())
    }

    pub fn reason(&self) -> Option<&'static str> {
        self.reason
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    /// Kind name of the terminal error, present only on failure outcomes.
    pub fn final_error(&self) -> Option<&'static str> {
        self.final_error
    }

    /// Caller-supplied context, preserved verbatim.
    pub fn context(&self) -> &BTreeMap<String, Value> {
        &self.context
    }

    /// Flatten into the canonical mapping shape.
    ///
    /// Context entries are merged in as defaults: they never overwrite a
    /// canonical field the engine has set, and the full context is also
    /// kept intact under the `context` key so shadowed values survive.
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        let mut map = BTreeMap::new();
        map.insert("method".to_owned(), Value::from(self.method.as_str()));
        map.insert("url".to_owned(), Value::from(self.url.as_str()));
        map.insert("attempts".to_owned(), Value::from(self.attempts));
        map.insert("timeout_s".to_owned(), self.timeout.to_value());
        if let Some(status) = self.status {
            map.insert("status".to_owned(), Value::from(status.as_u16()));
            map.insert("status_code".to_owned(), Value::from(status.as_u16()));
        }
        if let Some(reason) = self.reason {
            map.insert("reason".to_owned(), Value::from(reason));
        }
        if let Some(elapsed) = self.elapsed {
            map.insert("elapsed_s".to_owned(), Value::from(elapsed.as_secs_f64()));
        }
        if let Some(final_error) = self.final_error {
            map.insert("final_error".to_owned(), Value::from(final_error));
        }
        if !self.context.is_empty() {
            map.insert(
                "context".to_owned(),
                Value::Object(
                    self.context
                        .iter()
                        .map(|(key, value)| (key.clone(), value.clone()))
                        .collect(),
                ),
            );
            for (key, value) in &self.context {
                map.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
        map
    }
}

impl Serialize for RequestMeta {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_map().serialize(serializer)
    }
}
