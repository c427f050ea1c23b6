//! Scripted and recording collaborators
//!
//! - [`ScriptedWallet`]: returns queued connection outcomes, then a default
//! - [`RecordingExplorer`]: records every URL it is asked to open

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use stellaris_core::effects::{
    ExplorerEffects, ExplorerError, WalletAccount, WalletEffects, WalletError,
};

/// Address reported by a [`ScriptedWallet`] that accepts
pub const SCRIPTED_ADDRESS: &str = "0xc0ffee";

/// Wallet that answers from a script.
#[derive(Debug, Clone)]
pub struct ScriptedWallet {
    script: Arc<Mutex<VecDeque<bool>>>,
    fallback: bool,
    attempts: Arc<Mutex<u32>>,
}

impl ScriptedWallet {
    /// Wallet that always connects
    pub fn accepting() -> Self {
        Self::with_script([], true)
    }

    /// Wallet that always declines
    pub fn declining() -> Self {
        Self::with_script([], false)
    }

    /// Wallet answering `script` in order, then `fallback`
    pub fn with_script(script: impl IntoIterator<Item = bool>, fallback: bool) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into_iter().collect())),
            fallback,
            attempts: Arc::new(Mutex::new(0)),
        }
    }

    /// Queue one more outcome
    pub fn push(&self, accept: bool) {
        self.script.lock().push_back(accept);
    }

    /// Number of connection attempts so far
    pub fn attempts(&self) -> u32 {
        *self.attempts.lock()
    }

    /// Answer the next connection attempt synchronously
    pub fn next_outcome(&self) -> Result<WalletAccount, WalletError> {
        *self.attempts.lock() += 1;
        let accept = self.script.lock().pop_front().unwrap_or(self.fallback);
        if accept {
            Ok(WalletAccount {
                address: SCRIPTED_ADDRESS.to_string(),
            })
        } else {
            Err(WalletError::Rejected {
                reason: "scripted decline".to_string(),
            })
        }
    }
}

impl Default for ScriptedWallet {
    fn default() -> Self {
        Self::accepting()
    }
}

#[async_trait]
impl WalletEffects for ScriptedWallet {
    async fn connect(&self) -> Result<WalletAccount, WalletError> {
        self.next_outcome()
    }
}

/// Explorer that records opened URLs.
#[derive(Debug, Clone, Default)]
pub struct RecordingExplorer {
    opened: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingExplorer {
    /// Explorer that records and succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Explorer that records and then fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// URLs requested so far
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().clone()
    }
}

impl ExplorerEffects for RecordingExplorer {
    fn open(&self, url: &str) -> Result<(), ExplorerError> {
        self.opened.lock().push(url.to_string());
        if self.fail {
            return Err(ExplorerError::OpenFailed {
                url: url.to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}
