//! Intents, events and triggers
//!
//! `CeremonyIntent` is what the shell sends. `CeremonyEvent` is what travels on
//! the serialized queue (intents, wallet outcomes and fired timers).
//! `Trigger` is what the pure transition function sees once the machine has
//! resolved timer handles.

use serde::{Deserialize, Serialize};
use stellaris_core::effects::{TimerFired, TimerPurpose};
use stellaris_core::TokenId;

/// User intent emitted by the shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CeremonyIntent {
    /// Connect a wallet
    ConnectWallet,
    /// Pick the token to give
    PickGive(TokenId),
    /// Pick the token to receive
    PickReceive(TokenId),
    /// Start over
    Reset,
    /// Open the block explorer from the summary
    ViewOnExplorer,
}

/// Event on the ceremony queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CeremonyEvent {
    /// Shell intent
    Intent(CeremonyIntent),
    /// Result of a wallet connection attempt
    WalletOutcome {
        /// Whether the wallet connected
        connected: bool,
    },
    /// A scheduled timer elapsed
    TimerFired(TimerFired),
}

impl From<CeremonyIntent> for CeremonyEvent {
    fn from(intent: CeremonyIntent) -> Self {
        Self::Intent(intent)
    }
}

impl From<TimerFired> for CeremonyEvent {
    fn from(fired: TimerFired) -> Self {
        Self::TimerFired(fired)
    }
}

/// Input to [`transition`](super::transition::transition)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Shell intent
    Intent(CeremonyIntent),
    /// Wallet connection outcome
    WalletOutcome {
        /// Whether the wallet connected
        connected: bool,
    },
    /// A live timer for this purpose elapsed
    TimerElapsed(TimerPurpose),
}
