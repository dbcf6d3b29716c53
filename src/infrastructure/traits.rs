//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io;
use std::path::Path;
use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use crate::infrastructure::TransportError;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file, replacing any previous content.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;
}

/// Transport for Overpass QL queries.
pub trait OverpassTransport: Send + Sync {
    /// POST `query` to `endpoint` and return the full response body.
    ///
    /// Blocks until the whole body has arrived or the configured time bound
    /// has elapsed. Non-success statuses are errors.
    fn post_query(&self, endpoint: &str, query: &str) -> Result<String, TransportError>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }
}

/// Upper bound for a response body; full-area extracts easily exceed ureq's 10 MB default.
const MAX_RESPONSE_BYTES: u64 = 512 * 1024 * 1024;

/// Blocking HTTP transport backed by a `ureq` agent.
///
/// The query is sent form-encoded in the `data` field, as the Overpass
/// interpreter expects.
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    /// Create a transport whose requests give up after `timeout` in total.
    pub fn new(timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        let agent: Agent = config.into();
        Self { agent }
    }
}

impl OverpassTransport for UreqTransport {
    fn post_query(&self, endpoint: &str, query: &str) -> Result<String, TransportError> {
        debug!("post_query: endpoint={}, query_len={}", endpoint, query.len());
        let mut response = self
            .agent
            .post(endpoint)
            .header("User-Agent", concat!("osmfetch/", env!("CARGO_PKG_VERSION")))
            .send_form([("data", query)])
            .map_err(transport_error)?;
        debug!("post_query: status={}", response.status());

        response
            .body_mut()
            .with_config()
            .limit(MAX_RESPONSE_BYTES)
            .read_to_string()
            .map_err(|e| match transport_error(e) {
                TransportError::Connection(message) => TransportError::Body(message),
                other => other,
            })
    }
}

fn transport_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::StatusCode(code) => TransportError::Status(code),
        ureq::Error::Timeout(_) => TransportError::Timeout,
        other => TransportError::Connection(other.to_string()),
    }
}
