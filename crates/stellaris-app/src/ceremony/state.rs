//! # Ceremony State
//!
//! The single mutable entity of a ceremony. Only the stage machine produces
//! new states; everything else reads them.

use serde::{Deserialize, Serialize};
use stellaris_core::TokenId;

use super::stage::CeremonyStage;

/// State of one ceremony.
///
/// Invariants:
/// - `given_token` is set iff the stage is past `AwaitingGiveChoice`
/// - `received_token` is set iff the stage is past `AwaitingReceiveChoice`
/// - `given_token != received_token` when both are set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CeremonyState {
    pub(crate) ceremony: u64,
    pub(crate) stage: CeremonyStage,
    pub(crate) wallet_connected: bool,
    pub(crate) given_token: Option<TokenId>,
    pub(crate) received_token: Option<TokenId>,
    pub(crate) secondary_coin_visible: bool,
}

impl CeremonyState {
    /// State of the first ceremony after mount.
    pub fn new() -> Self {
        Self::fresh(1)
    }

    /// A fresh state for ceremony number `ceremony`.
    pub fn fresh(ceremony: u64) -> Self {
        Self {
            ceremony,
            stage: CeremonyStage::AwaitingWallet,
            wallet_connected: false,
            given_token: None,
            received_token: None,
            secondary_coin_visible: false,
        }
    }

    /// Ceremony number; increases by one on every reset.
    pub fn ceremony(&self) -> u64 {
        self.ceremony
    }

    /// Current stage
    pub fn stage(&self) -> CeremonyStage {
        self.stage
    }

    /// Whether a wallet is connected
    pub fn wallet_connected(&self) -> bool {
        self.wallet_connected
    }

    /// Token the user gives, once chosen
    pub fn given_token(&self) -> Option<&TokenId> {
        self.given_token.as_ref()
    }

    /// Token the user receives, once chosen
    pub fn received_token(&self) -> Option<&TokenId> {
        self.received_token.as_ref()
    }

    /// Whether the offered coin is visible on the receive panel
    pub fn secondary_coin_visible(&self) -> bool {
        self.secondary_coin_visible
    }

    /// True if nothing has happened in this ceremony yet.
    pub fn is_fresh(&self) -> bool {
        *self == Self::fresh(self.ceremony)
    }

    /// Check the data-model invariants.
    pub fn invariants_hold(&self) -> bool {
        let given_ok =
            self.given_token.is_some() == (self.stage > CeremonyStage::AwaitingGiveChoice);
        let received_ok =
            self.received_token.is_some() == (self.stage > CeremonyStage::AwaitingReceiveChoice);
        let distinct = match (&self.given_token, &self.received_token) {
            (Some(given), Some(received)) => given != received,
            _ => true,
        };
        let connected_ok = self.wallet_connected == (self.stage > CeremonyStage::AwaitingWallet);
        given_ok && received_ok && distinct && connected_ok
    }
}

impl Default for CeremonyState {
    fn default() -> Self {
        Self::new()
    }
}
