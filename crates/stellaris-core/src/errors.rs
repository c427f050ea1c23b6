//! Unified error system for Stellaris core
//!
//! A single, flat error type shared by every layer. Domain-specific errors
//! (catalog, timer, wallet, explorer) convert into it so that hosts can
//! report failures uniformly.

use serde::{Deserialize, Serialize};

use crate::effects::{ExplorerError, TimerError, WalletError};
use crate::token::CatalogError;

/// Unified error type for all Stellaris operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum StellarisError {
    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        /// Error message describing what was not found
        message: String,
    },

    /// Configuration could not be loaded or failed validation
    #[error("Config error: {message}")]
    Config {
        /// Error message describing the configuration failure
        message: String,
    },

    /// An external collaborator (wallet, explorer, timer runtime) failed
    #[error("Collaborator error: {message}")]
    Collaborator {
        /// Error message describing the collaborator failure
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl StellarisError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a collaborator error
    pub fn collaborator(message: impl Into<String>) -> Self {
        Self::Collaborator {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<CatalogError> for StellarisError {
    fn from(err: CatalogError) -> Self {
        Self::invalid(err.to_string())
    }
}

impl From<TimerError> for StellarisError {
    fn from(err: TimerError) -> Self {
        Self::collaborator(err.to_string())
    }
}

impl From<WalletError> for StellarisError {
    fn from(err: WalletError) -> Self {
        Self::collaborator(err.to_string())
    }
}

impl From<ExplorerError> for StellarisError {
    fn from(err: ExplorerError) -> Self {
        Self::collaborator(err.to_string())
    }
}

/// Result alias used throughout the workspace
pub type Result<T> = std::result::Result<T, StellarisError>;
