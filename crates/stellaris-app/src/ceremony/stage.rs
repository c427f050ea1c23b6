//! # Ceremony Stages
//!
//! The six stages of a ceremony, in order, and what each one shows.

use serde::{Deserialize, Serialize};
use stellaris_core::effects::TimerPurpose;

/// Stage of a ceremony.
///
/// The flow is linear:
/// 1. AwaitingWallet - ask the user to connect a wallet
/// 2. AwaitingGiveChoice - the left hand asks for a token to give
/// 3. RetractingGive - the left hand retracts with the coin (timed)
/// 4. AwaitingReceiveChoice - the right hand offers a token to receive
/// 5. PresentingReceive - the right hand pushes the coin out (timed)
/// 6. Complete - summary, explorer link, reset
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum CeremonyStage {
    /// Waiting for the wallet connection
    #[default]
    AwaitingWallet,
    /// Waiting for the token to give
    AwaitingGiveChoice,
    /// Left hand retracting with the given coin
    RetractingGive,
    /// Waiting for the token to receive
    AwaitingReceiveChoice,
    /// Right hand presenting the received coin
    PresentingReceive,
    /// Ceremony finished
    Complete,
}

/// Interactive panel shown for a stage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Panel {
    /// Wallet connection prompt
    ConnectWallet,
    /// Token picker for the token to give
    GivePicker,
    /// Token picker for the token to receive
    ReceivePicker,
    /// Completion summary with reset and explorer actions
    Summary,
}

impl CeremonyStage {
    /// Get all stages in order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::AwaitingWallet,
            Self::AwaitingGiveChoice,
            Self::RetractingGive,
            Self::AwaitingReceiveChoice,
            Self::PresentingReceive,
            Self::Complete,
        ]
    }

    /// Get the next stage in the nominal flow, or None at the end.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::AwaitingWallet => Some(Self::AwaitingGiveChoice),
            Self::AwaitingGiveChoice => Some(Self::RetractingGive),
            Self::RetractingGive => Some(Self::AwaitingReceiveChoice),
            Self::AwaitingReceiveChoice => Some(Self::PresentingReceive),
            Self::PresentingReceive => Some(Self::Complete),
            Self::Complete => None,
        }
    }

    /// Check if this is the terminal stage.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Complete
    }

    /// Get stage number (1-indexed for display).
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::AwaitingWallet => 1,
            Self::AwaitingGiveChoice => 2,
            Self::RetractingGive => 3,
            Self::AwaitingReceiveChoice => 4,
            Self::PresentingReceive => 5,
            Self::Complete => 6,
        }
    }

    /// Get total number of stages.
    #[must_use]
    pub fn total_steps() -> u8 {
        6
    }

    /// Get stage title for display.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::AwaitingWallet => "Connect Wallet",
            Self::AwaitingGiveChoice => "Choose Your Token",
            Self::RetractingGive => "Token Accepted",
            Self::AwaitingReceiveChoice => "Receive a Token",
            Self::PresentingReceive => "Token Presented",
            Self::Complete => "Promise Sealed",
        }
    }

    /// Panel the shell should show, or None while an animation plays.
    #[must_use]
    pub fn panel(self) -> Option<Panel> {
        match self {
            Self::AwaitingWallet => Some(Panel::ConnectWallet),
            Self::AwaitingGiveChoice => Some(Panel::GivePicker),
            Self::AwaitingReceiveChoice => Some(Panel::ReceivePicker),
            Self::Complete => Some(Panel::Summary),
            Self::RetractingGive | Self::PresentingReceive => None,
        }
    }

    /// Timers armed on entering this stage, canceled on leaving it.
    #[must_use]
    pub fn owned_timers(self) -> &'static [TimerPurpose] {
        match self {
            Self::RetractingGive | Self::PresentingReceive => &[TimerPurpose::StageAdvance],
            Self::AwaitingReceiveChoice => &[TimerPurpose::CoinFade],
            Self::AwaitingWallet | Self::AwaitingGiveChoice | Self::Complete => &[],
        }
    }
}
