//! JSON export service
//!
//! Writes output documents as pretty-printed UTF-8 JSON and reads them back.

use std::io;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::OutputDocument;
use crate::infrastructure::traits::FileSystem;

/// Service for persisting output documents.
pub struct ExportService {
    fs: Arc<dyn FileSystem>,
}

impl ExportService {
    /// Create a new export service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Serialize `document` with two-space indentation and write it to `path`.
    ///
    /// Non-ASCII text is written as-is. Missing parent directories are not
    /// created, and the write is not atomic.
    pub fn save<T: Serialize + ?Sized>(&self, document: &T, path: &Path) -> ApplicationResult<()> {
        let mut json = serde_json::to_string_pretty(document).map_err(|e| {
            ApplicationError::OperationFailed {
                context: format!("serialize output for {}", path.display()),
                source: Box::new(e),
            }
        })?;
        json.push('\n');

        debug!("save: path={}, bytes={}", path.display(), json.len());
        self.fs
            .write(path, &json)
            .map_err(|e| io_failure("write output", path, e))
    }

    /// Read a previously saved document.
    pub fn load(&self, path: &Path) -> ApplicationResult<OutputDocument> {
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| io_failure("read output", path, e))?;
        serde_json::from_str(&content).map_err(|e| ApplicationError::OperationFailed {
            context: format!("parse output {}", path.display()),
            source: Box::new(e),
        })
    }
}

fn io_failure(action: &str, path: &Path, e: io::Error) -> ApplicationError {
    ApplicationError::OperationFailed {
        context: format!("{action}: {}", path.display()),
        source: Box::new(e),
    }
}
