//! Stellaris Core - Ceremony Foundation Types
//!
//! Pure types and effect interfaces shared by every Stellaris crate. Nothing
//! here performs I/O or owns a runtime.
//!
//! - `token`: token identifiers, display metadata, the ordered catalog
//! - `effects`: timer, wallet and explorer collaborator traits
//! - `reactive`: `Dynamic<T>` for publishing observable state
//! - `config`: layered configuration loading
//! - `errors`: unified error type

#![forbid(unsafe_code)]

/// Layered configuration loading
pub mod config;

/// Pure effect interfaces (no implementations)
pub mod effects;

/// Unified error handling
pub mod errors;

/// Reactive primitives for publishing observable state
pub mod reactive;

/// Token identifiers and the token catalog
pub mod token;

pub use config::StellarisConfig;
pub use errors::{Result, StellarisError};
pub use token::{AccentColor, CatalogError, Token, TokenCatalog, TokenId};
