//! Mock wallet handler
//!
//! Stands in for a real wallet backend: every connection attempt succeeds
//! with a fixed account. No network calls are made.

use async_trait::async_trait;
use stellaris_core::effects::{WalletAccount, WalletEffects, WalletError};

/// Address reported by [`MockWalletHandler::default`]
pub const MOCK_WALLET_ADDRESS: &str = "0x5te11a415";

/// Wallet handler that always connects.
#[derive(Debug, Clone)]
pub struct MockWalletHandler {
    address: String,
}

impl MockWalletHandler {
    /// Create a mock wallet reporting `address`
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

impl Default for MockWalletHandler {
    fn default() -> Self {
        Self::new(MOCK_WALLET_ADDRESS)
    }
}

#[async_trait]
impl WalletEffects for MockWalletHandler {
    async fn connect(&self) -> Result<WalletAccount, WalletError> {
        tracing::debug!(address = %self.address, "mock wallet connected");
        Ok(WalletAccount {
            address: self.address.clone(),
        })
    }
}
