//! # Ceremony Runtime
//!
//! Async runtime that drives one ceremony with real timers.
//!
//! ## Architecture
//!
//! - **State**: `CeremonyState`, owned by the machine
//! - **Transitions**: `transition()` (pure)
//! - **Effects**: timers via `TokioTimerHandler`, wallet and explorer via the
//!   collaborators given to the runtime
//!
//! Intents from [`CeremonyHandle`]s and fired timers share one unbounded
//! queue, so the machine sees every event in delivery order. After each event
//! the runtime publishes a fresh [`CeremonyView`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! let (runtime, handle) = CeremonyRuntime::new(ctx, MockWalletHandler::default(), TracingExplorerHandler::new());
//! tokio::spawn(runtime.run());
//!
//! handle.connect_wallet()?;
//! handle.pick_give("BTC")?;
//! let view = handle.wait_for(|v| v.stage == CeremonyStage::AwaitingReceiveChoice).await;
//! ```

use std::sync::Arc;

use stellaris_core::effects::{ExplorerEffects, TimerFired, WalletEffects};
use stellaris_core::reactive::{Dynamic, Subscription};
use stellaris_core::TokenId;
use stellaris_effects::TokioTimerHandler;
use tokio::sync::{mpsc, Notify};

use crate::ceremony::{
    CeremonyEvent, CeremonyIntent, CeremonyMachine, CeremonyStage, Disposition, ShellRequest,
};
use crate::config::CeremonyContext;
use crate::errors::CeremonyError;
use crate::views::CeremonyView;

/// Event on the runtime queue
#[derive(Debug)]
enum RuntimeEvent {
    Ceremony(CeremonyEvent),
    Shutdown,
}

impl From<TimerFired> for RuntimeEvent {
    fn from(fired: TimerFired) -> Self {
        Self::Ceremony(fired.into())
    }
}

/// Sends `Shutdown` once the last handle is dropped.
#[derive(Debug)]
struct ShutdownOnDrop(mpsc::UnboundedSender<RuntimeEvent>);

impl Drop for ShutdownOnDrop {
    fn drop(&mut self) {
        let _ = self.0.send(RuntimeEvent::Shutdown);
    }
}

/// Runtime that drives the ceremony machine.
pub struct CeremonyRuntime<W, X> {
    machine: CeremonyMachine<TokioTimerHandler<RuntimeEvent>>,
    events: mpsc::UnboundedReceiver<RuntimeEvent>,
    wallet: W,
    explorer: X,
    view: Dynamic<CeremonyView>,
    published: Arc<Notify>,
}

impl<W, X> CeremonyRuntime<W, X>
where
    W: WalletEffects,
    X: ExplorerEffects,
{
    /// Create a runtime and the handle that feeds it.
    pub fn new(ctx: Arc<CeremonyContext>, wallet: W, explorer: X) -> (Self, CeremonyHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let machine = CeremonyMachine::new(ctx, TokioTimerHandler::new(tx.clone()));
        let view = Dynamic::new(machine.view());
        let published = Arc::new(Notify::new());

        let handle = CeremonyHandle {
            events: tx.clone(),
            _shutdown: Arc::new(ShutdownOnDrop(tx)),
            view: view.clone(),
            published: published.clone(),
        };

        let runtime = Self {
            machine,
            events: rx,
            wallet,
            explorer,
            view,
            published,
        };
        (runtime, handle)
    }

    /// Published view
    pub fn view(&self) -> &Dynamic<CeremonyView> {
        &self.view
    }

    /// Current stage
    pub fn stage(&self) -> CeremonyStage {
        self.machine.stage()
    }

    /// Process one event and any wallet outcome it leads to, then publish.
    ///
    /// Returns the disposition of every event processed, in order.
    pub async fn step(&mut self, event: CeremonyEvent) -> Result<Vec<Disposition>, CeremonyError> {
        let mut dispositions = Vec::new();
        let mut next = Some(event);

        while let Some(event) = next.take() {
            let outcome = self.machine.handle(event)?;
            dispositions.push(outcome.disposition);

            for request in outcome.requests {
                match request {
                    ShellRequest::ConnectWallet => {
                        let ceremony = self.machine.state().ceremony();
                        let connected = connect_wallet(&self.wallet, ceremony).await;
                        next = Some(CeremonyEvent::WalletOutcome { connected });
                    }
                    ShellRequest::OpenExplorer { url } => {
                        if let Err(err) = self.explorer.open(&url) {
                            tracing::warn!(%url, error = %err, "explorer collaborator failed");
                        }
                    }
                }
            }
        }

        self.publish();
        Ok(dispositions)
    }

    fn publish(&self) {
        if self.view.set_if_changed(self.machine.view()) {
            self.published.notify_waiters();
        }
    }

    /// Process events until shutdown or until every handle is dropped.
    pub async fn run(mut self) -> Result<(), CeremonyError> {
        tracing::debug!("ceremony runtime started");
        let result = loop {
            match self.events.recv().await {
                Some(RuntimeEvent::Ceremony(event)) => {
                    if let Err(err) = self.step(event).await {
                        break Err(err);
                    }
                }
                Some(RuntimeEvent::Shutdown) | None => break Ok(()),
            }
        };

        self.events.close();
        self.published.notify_waiters();
        tracing::debug!(
            ceremony = self.machine.state().ceremony(),
            stage = ?self.machine.stage(),
            "ceremony runtime stopped"
        );
        result
    }
}

/// Attempt a wallet connection; the ceremony only sees whether it worked.
async fn connect_wallet<W: WalletEffects>(wallet: &W, ceremony: u64) -> bool {
    match wallet.connect().await {
        Ok(account) => {
            tracing::info!(ceremony, address = %account.address, "wallet connected");
            true
        }
        Err(err) => {
            tracing::warn!(ceremony, error = %err, "wallet connection failed");
            false
        }
    }
}

/// Cloneable intent and observation surface of a running ceremony.
#[derive(Clone)]
pub struct CeremonyHandle {
    events: mpsc::UnboundedSender<RuntimeEvent>,
    _shutdown: Arc<ShutdownOnDrop>,
    view: Dynamic<CeremonyView>,
    published: Arc<Notify>,
}

impl CeremonyHandle {
    /// Queue an intent
    pub fn send(&self, intent: CeremonyIntent) -> Result<(), CeremonyError> {
        self.events
            .send(RuntimeEvent::Ceremony(intent.into()))
            .map_err(|_| CeremonyError::RuntimeClosed)
    }

    /// Connect a wallet
    pub fn connect_wallet(&self) -> Result<(), CeremonyError> {
        self.send(CeremonyIntent::ConnectWallet)
    }

    /// Pick the token to give
    pub fn pick_give(&self, token: impl Into<TokenId>) -> Result<(), CeremonyError> {
        self.send(CeremonyIntent::PickGive(token.into()))
    }

    /// Pick the token to receive
    pub fn pick_receive(&self, token: impl Into<TokenId>) -> Result<(), CeremonyError> {
        self.send(CeremonyIntent::PickReceive(token.into()))
    }

    /// Start over
    pub fn reset(&self) -> Result<(), CeremonyError> {
        self.send(CeremonyIntent::Reset)
    }

    /// Open the explorer from the summary
    pub fn view_on_explorer(&self) -> Result<(), CeremonyError> {
        self.send(CeremonyIntent::ViewOnExplorer)
    }

    /// Stop the runtime after the events already queued
    pub fn shutdown(&self) -> Result<(), CeremonyError> {
        self.events
            .send(RuntimeEvent::Shutdown)
            .map_err(|_| CeremonyError::RuntimeClosed)
    }

    /// Whether the runtime has stopped
    pub fn is_closed(&self) -> bool {
        self.events.is_closed()
    }

    /// Latest published view
    pub fn view(&self) -> CeremonyView {
        self.view.get()
    }

    /// Subscribe to published views
    pub fn subscribe(&self) -> Subscription<CeremonyView> {
        self.view.subscribe()
    }

    /// Wait for the next view published after `sub` last observed one.
    ///
    /// Returns `None` once the runtime has stopped.
    pub async fn changed(&self, sub: &mut Subscription<CeremonyView>) -> Option<CeremonyView> {
        loop {
            let notified = self.published.notified();
            if let Some(view) = sub.poll() {
                return Some(view);
            }
            if self.is_closed() {
                return None;
            }
            notified.await;
        }
    }

    /// Wait until a published view satisfies `predicate`.
    ///
    /// Views are coalesced, so a predicate should describe a state the
    /// ceremony rests in rather than a passing one.
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&CeremonyView) -> bool,
    ) -> Option<CeremonyView> {
        let mut sub = self.subscribe();
        let current = sub.get();
        if predicate(&current) {
            return Some(current);
        }
        while let Some(view) = self.changed(&mut sub).await {
            if predicate(&view) {
                return Some(view);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;
    use stellaris_core::effects::{ExplorerError, WalletAccount, WalletError};
    use stellaris_effects::{MockWalletHandler, TracingExplorerHandler};

    struct DecliningWallet;

    #[async_trait]
    impl WalletEffects for DecliningWallet {
        async fn connect(&self) -> Result<WalletAccount, WalletError> {
            Err(WalletError::Rejected {
                reason: "user closed the prompt".to_string(),
            })
        }
    }

    struct BrokenExplorer;

    impl ExplorerEffects for BrokenExplorer {
        fn open(&self, url: &str) -> Result<(), ExplorerError> {
            Err(ExplorerError::OpenFailed {
                url: url.to_string(),
                reason: "no browser".to_string(),
            })
        }
    }

    fn standard() -> Arc<CeremonyContext> {
        Arc::new(CeremonyContext::standard())
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_connects_wallet_inline() {
        let (mut runtime, _handle) =
            CeremonyRuntime::new(standard(), MockWalletHandler::default(), TracingExplorerHandler);
        let dispositions = runtime
            .step(CeremonyIntent::ConnectWallet.into())
            .await
            .unwrap();
        assert_eq!(
            dispositions,
            vec![
                Disposition::Delegated,
                Disposition::Advanced {
                    from: CeremonyStage::AwaitingWallet,
                    to: CeremonyStage::AwaitingGiveChoice
                }
            ]
        );
        assert_eq!(runtime.view().get().stage, CeremonyStage::AwaitingGiveChoice);
    }

    #[tokio::test(start_paused = true)]
    async fn test_declined_wallet_stays_unconnected() {
        let (mut runtime, _handle) =
            CeremonyRuntime::new(standard(), DecliningWallet, TracingExplorerHandler);
        runtime
            .step(CeremonyIntent::ConnectWallet.into())
            .await
            .unwrap();
        let view = runtime.view().get();
        assert_eq!(view.stage, CeremonyStage::AwaitingWallet);
        assert!(!view.wallet_connected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_drives_timed_stages() {
        let (runtime, handle) =
            CeremonyRuntime::new(standard(), MockWalletHandler::default(), BrokenExplorer);
        let task = tokio::spawn(runtime.run());

        handle.connect_wallet().unwrap();
        handle.pick_give("BTC").unwrap();
        let view = handle
            .wait_for(|v| v.stage == CeremonyStage::AwaitingReceiveChoice)
            .await
            .unwrap();
        assert!(view.secondary_coin_visible);

        handle.pick_receive("APT").unwrap();
        let view = handle
            .wait_for(|v| v.stage == CeremonyStage::Complete)
            .await
            .unwrap();
        assert_eq!(view.given_token, Some(TokenId::from("BTC")));
        assert_eq!(view.received_token, Some(TokenId::from("APT")));

        // Explorer failure is logged, not fatal
        handle.view_on_explorer().unwrap();
        handle.shutdown().unwrap();
        task.await.unwrap().unwrap();
        assert!(handle.is_closed());
        assert!(handle.pick_give("ETH").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fade_applies_while_waiting() {
        let (runtime, handle) = CeremonyRuntime::new(
            standard(),
            MockWalletHandler::default(),
            TracingExplorerHandler,
        );
        let task = tokio::spawn(runtime.run());

        handle.connect_wallet().unwrap();
        handle.pick_give("ETH").unwrap();
        let view = handle
            .wait_for(|v| {
                v.stage == CeremonyStage::AwaitingReceiveChoice && !v.secondary_coin_visible
            })
            .await
            .unwrap();
        assert_eq!(view.pose.right_coin.keyframe.opacity, 0.0);

        drop(handle);
        task.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_changed_ends_after_shutdown() {
        let (runtime, handle) = CeremonyRuntime::new(
            standard(),
            MockWalletHandler::default(),
            TracingExplorerHandler,
        );
        let task = tokio::spawn(runtime.run());
        let mut sub = handle.subscribe();
        handle.shutdown().unwrap();
        task.await.unwrap().unwrap();
        let next = tokio::time::timeout(Duration::from_secs(1), handle.changed(&mut sub)).await;
        assert_eq!(next.unwrap(), None);
    }
}
