//! Stellaris Effects - Production Handlers
//!
//! Implementations of the effect traits defined in `stellaris-core`:
//!
//! - [`TokioTimerHandler`]: timers as tokio tasks feeding an mpsc queue
//! - [`MockWalletHandler`]: stub wallet that always connects
//! - [`TracingExplorerHandler`]: logs explorer links for the host
//!
//! Deterministic handlers for tests live in `stellaris-testkit`.

#![forbid(unsafe_code)]

pub mod explorer;
pub mod timer;
pub mod wallet;

pub use explorer::TracingExplorerHandler;
pub use timer::TokioTimerHandler;
pub use wallet::{MockWalletHandler, MOCK_WALLET_ADDRESS};
