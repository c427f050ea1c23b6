//! Observable ceremony view
//!
//! Everything the shell renders, derived from the state in one pure step and
//! published by the runtime after every processed event.

use serde::Serialize;
use stellaris_core::TokenId;

use crate::ceremony::animation::{bind, CeremonyPose};
use crate::ceremony::gate::{picker_options, TokenOption};
use crate::ceremony::{CeremonyStage, CeremonyState, Panel};
use crate::config::CeremonyContext;

/// Summary shown once a ceremony completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionSummary {
    /// Token given
    pub given: TokenId,
    /// Token received
    pub received: TokenId,
    /// Explorer link
    pub explorer_url: String,
}

impl CompletionSummary {
    /// One-line description for the summary panel
    pub fn headline(&self) -> String {
        format!("You gave {} and received {}", self.given, self.received)
    }
}

/// Snapshot of a ceremony for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CeremonyView {
    /// Ceremony number
    pub ceremony: u64,
    /// Current stage
    pub stage: CeremonyStage,
    /// Step number (1-indexed)
    pub step: u8,
    /// Number of steps
    pub total_steps: u8,
    /// Stage title
    pub title: &'static str,
    /// Interactive panel, or None while animating
    pub panel: Option<Panel>,
    /// Wallet connected
    pub wallet_connected: bool,
    /// Token given
    pub given_token: Option<TokenId>,
    /// Token received
    pub received_token: Option<TokenId>,
    /// Offered coin visible on the receive panel
    pub secondary_coin_visible: bool,
    /// Options of the give picker
    pub give_options: Vec<TokenOption>,
    /// Options of the receive picker
    pub receive_options: Vec<TokenOption>,
    /// Animation targets
    pub pose: CeremonyPose,
    /// Set once complete
    pub summary: Option<CompletionSummary>,
}

impl CeremonyView {
    /// Derive the view of `state`.
    pub fn derive(ctx: &CeremonyContext, state: &CeremonyState) -> Self {
        let stage = state.stage();
        let summary = match (stage, state.given_token(), state.received_token()) {
            (CeremonyStage::Complete, Some(given), Some(received)) => Some(CompletionSummary {
                given: given.clone(),
                received: received.clone(),
                explorer_url: ctx.explorer_url(),
            }),
            _ => None,
        };

        Self {
            ceremony: state.ceremony(),
            stage,
            step: stage.number(),
            total_steps: CeremonyStage::total_steps(),
            title: stage.title(),
            panel: stage.panel(),
            wallet_connected: state.wallet_connected(),
            given_token: state.given_token().cloned(),
            received_token: state.received_token().cloned(),
            secondary_coin_visible: state.secondary_coin_visible(),
            give_options: picker_options(ctx.catalog(), state.received_token()),
            receive_options: picker_options(ctx.catalog(), state.given_token()),
            pose: bind(stage, state.secondary_coin_visible()),
            summary,
        }
    }

    /// Identifiers of the enabled options of the active picker
    pub fn enabled_options(&self) -> Vec<&TokenId> {
        let options = match self.panel {
            Some(Panel::GivePicker) => &self.give_options,
            Some(Panel::ReceivePicker) => &self.receive_options,
            _ => return Vec::new(),
        };
        options
            .iter()
            .filter(|o| !o.disabled)
            .map(|o| &o.id)
            .collect()
    }
}
