//! Explorer handler that records link requests in the log.

use stellaris_core::effects::{ExplorerEffects, ExplorerError};

/// Headless explorer handler: there is no browser to open, so the requested
/// URL is emitted as a structured log event for the host to act on.
#[derive(Debug, Clone, Default)]
pub struct TracingExplorerHandler;

impl TracingExplorerHandler {
    /// Create a new handler
    pub fn new() -> Self {
        Self
    }
}

impl ExplorerEffects for TracingExplorerHandler {
    fn open(&self, url: &str) -> Result<(), ExplorerError> {
        tracing::info!(%url, "explorer link requested");
        Ok(())
    }
}
