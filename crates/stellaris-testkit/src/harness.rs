//! # Ceremony Harness
//!
//! Drives a [`CeremonyMachine`] synchronously with simulated timers, a scripted
//! wallet and a recording explorer. Shell requests are served inline, the way
//! the async runtime serves them, so a test reads as a list of user actions
//! and clock advances.
//!
//! ```rust
//! use stellaris_app::CeremonyStage;
//! use stellaris_testkit::CeremonyHarness;
//!
//! let mut h = CeremonyHarness::new();
//! h.connect().unwrap();
//! h.pick_give("BTC").unwrap();
//! h.advance_ms(900).unwrap();
//! assert_eq!(h.stage(), CeremonyStage::AwaitingReceiveChoice);
//! ```

use std::sync::Arc;

use stellaris_app::{
    CeremonyContext, CeremonyError, CeremonyEvent, CeremonyIntent, CeremonyMachine,
    CeremonyStage, CeremonyState, CeremonyView, Disposition, ShellRequest,
};
use stellaris_core::effects::{ExplorerEffects, TimerFired};
use stellaris_core::TokenId;

use crate::mock_effects::{RecordingExplorer, ScriptedWallet};
use crate::time::SimulatedTimerHandler;

/// Synchronous ceremony driver for tests
pub struct CeremonyHarness {
    machine: CeremonyMachine<SimulatedTimerHandler>,
    timers: SimulatedTimerHandler,
    wallet: ScriptedWallet,
    explorer: RecordingExplorer,
    history: Vec<Disposition>,
}

impl CeremonyHarness {
    /// Harness over the standard context with an accepting wallet
    pub fn new() -> Self {
        Self::with_context(CeremonyContext::standard())
    }

    /// Harness over `ctx` with an accepting wallet
    pub fn with_context(ctx: CeremonyContext) -> Self {
        let timers = SimulatedTimerHandler::new();
        Self {
            machine: CeremonyMachine::new(Arc::new(ctx), timers.clone()),
            timers,
            wallet: ScriptedWallet::accepting(),
            explorer: RecordingExplorer::new(),
            history: Vec::new(),
        }
    }

    /// Replace the wallet
    pub fn with_wallet(mut self, wallet: ScriptedWallet) -> Self {
        self.wallet = wallet;
        self
    }

    /// Send one event and serve the shell requests it produces.
    ///
    /// Returns the disposition of the last event processed: for a wallet
    /// connection that is the wallet outcome, not the delegation.
    pub fn send(&mut self, event: CeremonyEvent) -> Result<Disposition, CeremonyError> {
        let mut next = Some(event);
        let mut last = None;

        while let Some(event) = next.take() {
            let outcome = self.machine.handle(event)?;
            self.history.push(outcome.disposition.clone());
            last = Some(outcome.disposition);

            for request in outcome.requests {
                match request {
                    ShellRequest::ConnectWallet => {
                        let connected = self.wallet.next_outcome().is_ok();
                        next = Some(CeremonyEvent::WalletOutcome { connected });
                    }
                    ShellRequest::OpenExplorer { url } => {
                        let _ = self.explorer.open(&url);
                    }
                }
            }
        }

        Ok(last.unwrap_or(Disposition::Updated))
    }

    /// Connect the wallet
    pub fn connect(&mut self) -> Result<Disposition, CeremonyError> {
        self.send(CeremonyIntent::ConnectWallet.into())
    }

    /// Pick the token to give
    pub fn pick_give(&mut self, token: impl Into<TokenId>) -> Result<Disposition, CeremonyError> {
        self.send(CeremonyIntent::PickGive(token.into()).into())
    }

    /// Pick the token to receive
    pub fn pick_receive(
        &mut self,
        token: impl Into<TokenId>,
    ) -> Result<Disposition, CeremonyError> {
        self.send(CeremonyIntent::PickReceive(token.into()).into())
    }

    /// Start over
    pub fn reset(&mut self) -> Result<Disposition, CeremonyError> {
        self.send(CeremonyIntent::Reset.into())
    }

    /// Open the explorer
    pub fn view_on_explorer(&mut self) -> Result<Disposition, CeremonyError> {
        self.send(CeremonyIntent::ViewOnExplorer.into())
    }

    /// Deliver a timer event as if the scheduler had fired it
    pub fn inject_timer(&mut self, fired: TimerFired) -> Result<Disposition, CeremonyError> {
        self.send(fired.into())
    }

    /// Advance the clock by `ms`, firing every timer that comes due.
    ///
    /// Returns the dispositions of the fired timers, in firing order.
    pub fn advance_ms(&mut self, ms: u64) -> Result<Vec<Disposition>, CeremonyError> {
        let target = self.timers.now_ms().saturating_add(ms);
        let mut fired = Vec::new();
        while let Some(event) = self.timers.pop_due(target) {
            fired.push(self.send(event.into())?);
        }
        self.timers.set_now(target);
        Ok(fired)
    }

    /// Advance until no timer is pending
    pub fn settle(&mut self) -> Result<Vec<Disposition>, CeremonyError> {
        let mut fired = Vec::new();
        while let Some(due) = self.timers.next_due() {
            let step = due.saturating_sub(self.timers.now_ms());
            fired.extend(self.advance_ms(step)?);
        }
        Ok(fired)
    }

    /// Current stage
    pub fn stage(&self) -> CeremonyStage {
        self.machine.stage()
    }

    /// Current state
    pub fn state(&self) -> &CeremonyState {
        self.machine.state()
    }

    /// Current view
    pub fn view(&self) -> CeremonyView {
        self.machine.view()
    }

    /// Simulated timers
    pub fn timers(&self) -> &SimulatedTimerHandler {
        &self.timers
    }

    /// Wallet collaborator
    pub fn wallet(&self) -> &ScriptedWallet {
        &self.wallet
    }

    /// URLs handed to the explorer
    pub fn opened_urls(&self) -> Vec<String> {
        self.explorer.opened()
    }

    /// Every disposition so far, in order
    pub fn history(&self) -> &[Disposition] {
        &self.history
    }

    /// Machine under test
    pub fn machine(&self) -> &CeremonyMachine<SimulatedTimerHandler> {
        &self.machine
    }
}

impl Default for CeremonyHarness {
    fn default() -> Self {
        Self::new()
    }
}
