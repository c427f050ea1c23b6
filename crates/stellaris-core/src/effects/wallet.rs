//! Wallet connection effect interface.
//!
//! The ceremony never inspects wallet internals. It only needs to know whether
//! a connection attempt succeeded.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for wallet operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum WalletError {
    /// The user or the wallet declined the connection
    #[error("Wallet connection rejected: {reason}")]
    Rejected {
        /// Reason reported by the wallet
        reason: String,
    },
    /// No wallet is reachable
    #[error("Wallet unavailable: {reason}")]
    Unavailable {
        /// Reason reported by the wallet backend
        reason: String,
    },
}

/// Account exposed by a connected wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAccount {
    /// Account address as reported by the wallet
    pub address: String,
}

/// Wallet connection collaborator.
#[async_trait]
pub trait WalletEffects: Send + Sync {
    /// Attempt to connect a wallet.
    async fn connect(&self) -> Result<WalletAccount, WalletError>;
}

/// Blanket implementation for Arc<T> where T: WalletEffects
#[async_trait]
impl<T: WalletEffects + ?Sized> WalletEffects for std::sync::Arc<T> {
    async fn connect(&self) -> Result<WalletAccount, WalletError> {
        (**self).connect().await
    }
}
