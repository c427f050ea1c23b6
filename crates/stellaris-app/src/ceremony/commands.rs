//! Ceremony commands
//!
//! Side effects produced by transitions. The machine executes timer commands
//! itself; shell requests are handed to whoever drives the machine.

use std::time::Duration;

use serde::Serialize;
use stellaris_core::effects::TimerPurpose;
use stellaris_core::TokenId;

use super::stage::CeremonyStage;

/// Command produced by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CeremonyCommand {
    /// Schedule the timer for `purpose`
    ArmTimer {
        /// Which timer
        purpose: TimerPurpose,
        /// Delay before it fires
        delay: Duration,
    },
    /// Cancel the live timer for `purpose`, if any
    CancelTimer {
        /// Which timer
        purpose: TimerPurpose,
    },
    /// Request for an external collaborator
    Shell(ShellRequest),
}

/// Request for an external collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ShellRequest {
    /// Attempt a wallet connection and report the outcome
    ConnectWallet,
    /// Open the block explorer
    OpenExplorer {
        /// Link to open
        url: String,
    },
}

/// What happened to an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// The stage changed
    Advanced {
        /// Stage before the event
        from: CeremonyStage,
        /// Stage after the event
        to: CeremonyStage,
    },
    /// State changed within the same stage
    Updated,
    /// Nothing changed yet; a collaborator was asked to act
    Delegated,
    /// Not applicable in the current state
    Ignored(IgnoreReason),
    /// Applicable but refused by a guard
    Rejected(RejectReason),
}

impl Disposition {
    /// True if the event changed the ceremony state
    pub fn changed_state(&self) -> bool {
        matches!(self, Self::Advanced { .. } | Self::Updated)
    }
}

/// Why an event was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The current stage does not accept this event
    OutOfStage,
    /// Reset on a ceremony that has not started
    AlreadyFresh,
    /// Timer handle is no longer live
    StaleTimer,
}

/// Why an event was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The token is already committed on the other side
    DuplicateToken(TokenId),
    /// The token is not in the catalog
    UnknownToken(TokenId),
    /// The wallet did not connect
    WalletDeclined,
}
