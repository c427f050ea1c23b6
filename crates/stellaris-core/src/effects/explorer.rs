//! Block explorer effect interface.

use serde::{Deserialize, Serialize};

/// Error type for explorer operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum ExplorerError {
    /// The explorer link could not be opened
    #[error("Failed to open explorer at {url}: {reason}")]
    OpenFailed {
        /// URL that was requested
        url: String,
        /// Failure reason
        reason: String,
    },
}

/// Collaborator that shows a link in a block explorer. Fire-and-forget: no
/// result flows back into the ceremony.
pub trait ExplorerEffects: Send + Sync {
    /// Open `url` in the explorer.
    fn open(&self, url: &str) -> Result<(), ExplorerError>;
}

/// Blanket implementation for Arc<T> where T: ExplorerEffects
impl<T: ExplorerEffects + ?Sized> ExplorerEffects for std::sync::Arc<T> {
    fn open(&self, url: &str) -> Result<(), ExplorerError> {
        (**self).open(url)
    }
}
