//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use osmfetch::config::Settings;
use osmfetch::infrastructure::di::ServiceContainer;
use osmfetch::infrastructure::traits::{OverpassTransport, RealFileSystem};
use osmfetch::infrastructure::TransportError;

/// Transport returning a canned response and recording every request.
pub struct StubTransport {
    response: Result<String, TransportError>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl StubTransport {
    pub fn ok(body: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(body.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: TransportError) -> Arc<Self> {
        Arc::new(Self {
            response: Err(error),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl OverpassTransport for StubTransport {
    fn post_query(&self, endpoint: &str, query: &str) -> Result<String, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), query.to_string()));
        self.response.clone()
    }
}

/// Container with the real filesystem and the given transport.
pub fn container(transport: Arc<StubTransport>) -> ServiceContainer {
    ServiceContainer::with_deps(Settings::default(), Arc::new(RealFileSystem), transport)
}

pub fn write_file(path: &Path, content: &str) {
    std::fs::write(path, content).expect("write fixture");
}
