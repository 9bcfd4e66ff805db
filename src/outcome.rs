use crate::error::HttpClientError;
use crate::meta::RequestMeta;

/// Uniform result of one request execution: a value or a typed error, plus
/// the metadata record in either case.
///
/// An outcome is created fresh per call and owned by the caller; nothing
/// links one call's outcome to the next.
#[derive(Debug)]
pub struct RequestOutcome<T> {
    result: Result<T, HttpClientError>,
    meta: RequestMeta,
}

impl<T> RequestOutcome<T> {
    pub(crate) fn success(value: T, meta: RequestMeta) -> Self {
        Self {
            result: Ok(value),
            meta,
        }
    }

    pub(crate) fn failure(error: HttpClientError, meta: RequestMeta) -> Self {
        Self {
            result: Err(error),
            meta,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn value(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&HttpClientError> {
        self.result.as_ref().err()
    }

    pub fn meta(&self) -> &RequestMeta {
        &self.meta
    }

    /// Discard the metadata and keep the plain result.
    pub fn into_result(self) -> Result<T, HttpClientError> {
        self.result
    }

    pub fn into_parts(self) -> (Result<T, HttpClientError>, RequestMeta) {
        (self.result, self.meta)
    }
}
