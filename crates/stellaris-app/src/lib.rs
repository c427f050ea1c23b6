//! Stellaris App - Headless Ceremony Core
//!
//! Everything needed to run the swap ceremony without a renderer:
//!
//! - `ceremony`: stages, state, selection gate, pure transitions, animation
//!   binder and the stage machine
//! - `views`: the observable [`CeremonyView`] derived from the state
//! - `config`: [`CeremonyConfig`] and the compiled [`CeremonyContext`]
//! - `runtime`: [`CeremonyRuntime`] with real timers and its [`CeremonyHandle`]
//!
//! Shells render `CeremonyView` and send intents through a handle. Tests drive
//! [`CeremonyMachine`] directly with simulated timers from `stellaris-testkit`.

#![forbid(unsafe_code)]

pub mod ceremony;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod views;

pub use ceremony::{
    CeremonyEvent, CeremonyIntent, CeremonyMachine, CeremonyStage, CeremonyState, Disposition,
    IgnoreReason, Outcome, Panel, RejectReason, ShellRequest,
};
pub use config::{CeremonyConfig, CeremonyContext, ExplorerConfig, StageTimings, TokenEntry};
pub use errors::CeremonyError;
pub use runtime::{CeremonyHandle, CeremonyRuntime};
pub use views::{CeremonyView, CompletionSummary};
