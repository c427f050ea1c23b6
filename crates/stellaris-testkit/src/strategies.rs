//! Property test strategies for ceremony sequences
//!
//! Steps are generated against the standard catalog, with an occasional
//! unknown symbol so rejection paths are exercised too.

use proptest::prelude::*;

// Re-export proptest for convenience
pub use proptest;

use stellaris_app::{CeremonyError, CeremonyStage, Disposition};
use stellaris_core::token::STANDARD_TOKENS;
use stellaris_core::TokenId;

use crate::harness::CeremonyHarness;

/// Symbol that is never in the standard catalog
pub const UNKNOWN_SYMBOL: &str = "DOGE";

/// One user action or clock advance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarnessStep {
    /// Connect; the wallet answers `accept`
    Connect {
        /// Scripted wallet answer
        accept: bool,
    },
    /// Pick the token to give
    PickGive(TokenId),
    /// Pick the token to receive
    PickReceive(TokenId),
    /// Start over
    Reset,
    /// Open the explorer
    ViewOnExplorer,
    /// Advance the simulated clock
    Advance(u64),
}

impl HarnessStep {
    /// Apply this step to `harness`
    pub fn apply(&self, harness: &mut CeremonyHarness) -> Result<Vec<Disposition>, CeremonyError> {
        let single = |d: Disposition| vec![d];
        match self {
            Self::Connect { accept } => {
                // Out-of-stage connects never reach the wallet
                if harness.stage() == CeremonyStage::AwaitingWallet {
                    harness.wallet().push(*accept);
                }
                harness.connect().map(single)
            }
            Self::PickGive(token) => harness.pick_give(token.clone()).map(single),
            Self::PickReceive(token) => harness.pick_receive(token.clone()).map(single),
            Self::Reset => harness.reset().map(single),
            Self::ViewOnExplorer => harness.view_on_explorer().map(single),
            Self::Advance(ms) => harness.advance_ms(*ms),
        }
    }
}

/// Strategy for a token identifier, mostly from the standard catalog
pub fn arb_token() -> impl Strategy<Value = TokenId> {
    prop_oneof![
        9 => proptest::sample::select(
            STANDARD_TOKENS.iter().map(|(symbol, _, _)| *symbol).collect::<Vec<_>>()
        )
        .prop_map(TokenId::from),
        1 => Just(TokenId::from(UNKNOWN_SYMBOL)),
    ]
}

/// Strategy for a clock advance around the default stage delays
pub fn arb_advance() -> impl Strategy<Value = u64> {
    prop_oneof![
        0u64..200,
        Just(900),
        Just(1100),
        Just(4000),
        800u64..5000,
    ]
}

/// Strategy for a single step
pub fn arb_step() -> impl Strategy<Value = HarnessStep> {
    prop_oneof![
        3 => any::<bool>().prop_map(|accept| HarnessStep::Connect { accept }),
        4 => arb_token().prop_map(HarnessStep::PickGive),
        4 => arb_token().prop_map(HarnessStep::PickReceive),
        1 => Just(HarnessStep::Reset),
        1 => Just(HarnessStep::ViewOnExplorer),
        4 => arb_advance().prop_map(HarnessStep::Advance),
    ]
}

/// Strategy for a sequence of up to `max_len` steps
pub fn arb_steps(max_len: usize) -> impl Strategy<Value = Vec<HarnessStep>> {
    proptest::collection::vec(arb_step(), 0..=max_len)
}
