//! `egress` is a synchronous HTTP egress client: one validated configuration,
//! one request engine, and a uniform result shape for every call.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use egress::prelude::{ClientConfig, HttpClient};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .user_agent("my-service/1.0")
//!         .retries(2)
//!         .connect_timeout(Duration::from_secs(3))
//!         .read_timeout(Duration::from_secs(10))
//!         .backoff_base(Duration::from_millis(250))
//!         .try_build()?;
//!     let client = HttpClient::new(config);
//!
//!     let outcome = client
//!         .get("https://example.com/feed.json")
//!         .context_entry("job", "feed-sync")
//!         .send();
//!
//!     if outcome.is_ok() {
//!         println!("fetched {} bytes", outcome.value().map_or(0, |b| b.len()));
//!     }
//!     println!("meta: {}", serde_json::to_string(outcome.meta())?);
//!     Ok(())
//! }
//! ```
//!
//! # Result Shape
//!
//! Every call returns a [`RequestOutcome`]: the success value or a typed
//! [`HttpClientError`], plus a [`RequestMeta`] record describing the call
//! either way. HTTP statuses are never errors here; a 404 or 500 is a
//! successful exchange whose status is reported in the metadata.

mod client;
mod config;
mod error;
mod meta;
mod outcome;
mod response;
mod retry;
mod util;

pub use crate::client::{HttpClient, RequestBuilder};
pub use crate::config::{ClientConfig, ClientConfigBuilder, ConfigError};
pub use crate::error::{ErrorKind, HttpClientError, TransportErrorKind};
pub use crate::meta::{RequestMeta, ResolvedTimeout};
pub use crate::outcome::RequestOutcome;
pub use crate::response::ResponseStream;

pub type EgressResult<T> = std::result::Result<T, HttpClientError>;

pub mod prelude {
    pub use crate::{
        ClientConfig, ClientConfigBuilder, ConfigError, EgressResult, ErrorKind, HttpClient,
        HttpClientError, RequestMeta, RequestOutcome, ResolvedTimeout, ResponseStream,
        TransportErrorKind,
    };
}
