//! # Ceremony Stage Machine
//!
//! Owns the ceremony state and the live timer handles. Each event is turned
//! into a [`Trigger`], run through the pure [`transition`], and the resulting
//! commands are executed against the timer collaborator before the new state
//! is committed. Shell requests are returned to the caller.

use std::collections::BTreeMap;
use std::sync::Arc;

use stellaris_core::effects::{TimerEffects, TimerFired, TimerHandle, TimerPurpose};
use stellaris_core::TokenId;

use super::commands::{CeremonyCommand, Disposition, IgnoreReason, ShellRequest};
use super::intent::{CeremonyEvent, CeremonyIntent, Trigger};
use super::stage::CeremonyStage;
use super::state::CeremonyState;
use super::transition::transition;
use crate::config::CeremonyContext;
use crate::errors::CeremonyError;
use crate::views::CeremonyView;

/// Result of handling one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// What happened to the event
    pub disposition: Disposition,
    /// Requests for external collaborators, in order
    pub requests: Vec<ShellRequest>,
}

impl Outcome {
    fn ignored(reason: IgnoreReason) -> Self {
        Self {
            disposition: Disposition::Ignored(reason),
            requests: Vec::new(),
        }
    }
}

/// Stage machine for one in-flight ceremony.
pub struct CeremonyMachine<T: TimerEffects> {
    ctx: Arc<CeremonyContext>,
    state: CeremonyState,
    timers: T,
    live: BTreeMap<TimerPurpose, TimerHandle>,
}

impl<T: TimerEffects> CeremonyMachine<T> {
    /// Create a machine holding a fresh ceremony
    pub fn new(ctx: Arc<CeremonyContext>, timers: T) -> Self {
        let state = CeremonyState::new();
        tracing::info!(ceremony = state.ceremony(), "ceremony started");
        Self {
            ctx,
            state,
            timers,
            live: BTreeMap::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> &CeremonyState {
        &self.state
    }

    /// Current stage
    pub fn stage(&self) -> CeremonyStage {
        self.state.stage()
    }

    /// Shared settings
    pub fn context(&self) -> &Arc<CeremonyContext> {
        &self.ctx
    }

    /// Timer collaborator
    pub fn timers(&self) -> &T {
        &self.timers
    }

    /// Derive the current view
    pub fn view(&self) -> CeremonyView {
        CeremonyView::derive(&self.ctx, &self.state)
    }

    /// Live handle for `purpose`, if a timer is pending
    pub fn live_timer(&self, purpose: TimerPurpose) -> Option<TimerHandle> {
        self.live.get(&purpose).copied()
    }

    /// Handle one event from the queue.
    ///
    /// Timer bookkeeping is staged and only committed once every arm has
    /// succeeded. On error the state and the live handles are left as they
    /// were before the event, so a failed timer fire can be redelivered.
    pub fn handle(&mut self, event: CeremonyEvent) -> Result<Outcome, CeremonyError> {
        let trigger = match event {
            CeremonyEvent::Intent(intent) => Trigger::Intent(intent),
            CeremonyEvent::WalletOutcome { connected } => Trigger::WalletOutcome { connected },
            CeremonyEvent::TimerFired(fired) if self.is_live(fired) => {
                Trigger::TimerElapsed(fired.purpose)
            }
            CeremonyEvent::TimerFired(fired) => {
                tracing::debug!(
                    ceremony = self.state.ceremony(),
                    purpose = %fired.purpose,
                    handle = %fired.handle,
                    "stale timer ignored"
                );
                return Ok(Outcome::ignored(IgnoreReason::StaleTimer));
            }
        };

        let next = transition(&self.ctx, &self.state, &trigger);

        let mut live = self.live.clone();
        if let Trigger::TimerElapsed(purpose) = &trigger {
            live.remove(purpose);
        }
        let mut armed = Vec::new();
        let mut retired = Vec::new();
        let mut requests = Vec::new();
        for command in next.commands {
            match command {
                CeremonyCommand::ArmTimer { purpose, delay } => {
                    let handle = match self.timers.schedule(purpose, delay) {
                        Ok(handle) => handle,
                        Err(err) => {
                            self.abandon(&armed);
                            return Err(err.into());
                        }
                    };
                    armed.push(handle);
                    retired.extend(live.insert(purpose, handle));
                }
                CeremonyCommand::CancelTimer { purpose } => {
                    retired.extend(live.remove(&purpose));
                }
                CeremonyCommand::Shell(request) => requests.push(request),
            }
        }

        self.live = live;
        for handle in retired {
            if let Err(err) = self.timers.cancel(handle) {
                tracing::warn!(%handle, error = %err, "timer cancel failed");
            }
        }

        let ceremony = self.state.ceremony();
        self.state = next.state;
        self.log(ceremony, &trigger, &next.disposition);

        Ok(Outcome {
            disposition: next.disposition,
            requests,
        })
    }

    /// Whether `fired` carries the live handle for its purpose
    fn is_live(&self, fired: TimerFired) -> bool {
        self.live.get(&fired.purpose) == Some(&fired.handle)
    }

    /// Cancel timers armed by an event that failed part way
    fn abandon(&self, armed: &[TimerHandle]) {
        for &handle in armed {
            if let Err(err) = self.timers.cancel(handle) {
                tracing::warn!(%handle, error = %err, "abandoned timer cancel failed");
            }
        }
    }

    fn log(&self, ceremony: u64, trigger: &Trigger, disposition: &Disposition) {
        match disposition {
            Disposition::Advanced {
                from,
                to: CeremonyStage::AwaitingWallet,
            } => {
                tracing::info!(
                    ceremony,
                    from = ?from,
                    next_ceremony = self.state.ceremony(),
                    "ceremony reset"
                );
            }
            Disposition::Advanced { from, to } => {
                tracing::debug!(ceremony, from = ?from, to = ?to, "stage advanced");
                if *to == CeremonyStage::Complete {
                    tracing::info!(
                        ceremony,
                        given = ?self.state.given_token(),
                        received = ?self.state.received_token(),
                        "ceremony complete"
                    );
                }
            }
            Disposition::Updated => {
                tracing::debug!(
                    ceremony,
                    secondary_coin_visible = self.state.secondary_coin_visible(),
                    "ceremony updated"
                );
            }
            Disposition::Delegated => {
                tracing::debug!(ceremony, trigger = ?trigger, "delegated to shell");
            }
            Disposition::Ignored(reason) => {
                tracing::debug!(ceremony, trigger = ?trigger, reason = ?reason, "event ignored");
            }
            Disposition::Rejected(reason) => {
                tracing::debug!(ceremony, trigger = ?trigger, reason = ?reason, "event rejected");
            }
        }
    }

    /// Request a wallet connection
    pub fn connect_wallet(&mut self) -> Result<Outcome, CeremonyError> {
        self.handle(CeremonyIntent::ConnectWallet.into())
    }

    /// Report the outcome of a wallet connection attempt
    pub fn wallet_outcome(&mut self, connected: bool) -> Result<Outcome, CeremonyError> {
        self.handle(CeremonyEvent::WalletOutcome { connected })
    }

    /// Pick the token to give
    pub fn pick_give(&mut self, token: impl Into<TokenId>) -> Result<Outcome, CeremonyError> {
        self.handle(CeremonyIntent::PickGive(token.into()).into())
    }

    /// Pick the token to receive
    pub fn pick_receive(&mut self, token: impl Into<TokenId>) -> Result<Outcome, CeremonyError> {
        self.handle(CeremonyIntent::PickReceive(token.into()).into())
    }

    /// Start over
    pub fn reset(&mut self) -> Result<Outcome, CeremonyError> {
        self.handle(CeremonyIntent::Reset.into())
    }

    /// Request the explorer link
    pub fn view_on_explorer(&mut self) -> Result<Outcome, CeremonyError> {
        self.handle(CeremonyIntent::ViewOnExplorer.into())
    }

    /// Deliver a fired timer
    pub fn timer_fired(&mut self, fired: TimerFired) -> Result<Outcome, CeremonyError> {
        self.handle(fired.into())
    }
}

impl<T: TimerEffects> Drop for CeremonyMachine<T> {
    fn drop(&mut self) {
        for (_, handle) in std::mem::take(&mut self.live) {
            let _ = self.timers.cancel(handle);
        }
    }
}
