//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{ExportService, FetchService};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, OverpassTransport, RealFileSystem, UreqTransport};

/// Container holding settings and I/O implementations; hands out services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Overpass transport abstraction
    pub transport: Arc<dyn OverpassTransport>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let transport = UreqTransport::new(Duration::from_secs(settings.request_timeout_secs));
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(transport))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        transport: Arc<dyn OverpassTransport>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            transport,
        }
    }

    pub fn fetch_service(&self) -> FetchService {
        FetchService::new(
            Arc::clone(&self.transport),
            self.settings.endpoint.clone(),
            self.settings.query_timeout_secs,
        )
    }

    pub fn export_service(&self) -> ExportService {
        ExportService::new(Arc::clone(&self.fs))
    }
}
