//! Stellaris Testkit - Deterministic Ceremony Testing
//!
//! - `time`: [`SimulatedTimerHandler`], timers on a virtual clock
//! - `mock_effects`: [`ScriptedWallet`] and [`RecordingExplorer`]
//! - `harness`: [`CeremonyHarness`], a synchronous ceremony driver
//! - `strategies`: proptest strategies for step sequences
//!
//! The end-to-end ceremony tests live in this crate's `tests/` directory.

#![forbid(unsafe_code)]

pub mod harness;
pub mod mock_effects;
pub mod strategies;
pub mod time;

pub use harness::CeremonyHarness;
pub use mock_effects::{RecordingExplorer, ScriptedWallet, SCRIPTED_ADDRESS};
pub use strategies::HarnessStep;
pub use time::SimulatedTimerHandler;
