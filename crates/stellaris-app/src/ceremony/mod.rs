//! # Ceremony
//!
//! The guided swap ceremony: stages, state, selection gate, pure transition
//! table, animation binder and the stage machine that ties them together.
//!
//! ## Architecture
//!
//! ```text
//! CeremonyEvent ──► CeremonyMachine ──► transition(ctx, state, trigger)
//!                        │                      │
//!                        │◄── Transition ───────┘
//!                        ├── ArmTimer / CancelTimer ──► TimerEffects
//!                        └── ShellRequest ──► caller (wallet, explorer)
//! ```

pub mod animation;
pub mod commands;
pub mod gate;
pub mod intent;
pub mod machine;
pub mod stage;
pub mod state;
pub mod transition;


pub use animation::{bind, CeremonyPose, CoinTarget, LimbTarget, Motion, Offset, Side};
pub use commands::{CeremonyCommand, Disposition, IgnoreReason, RejectReason, ShellRequest};
pub use gate::{picker_options, selectable, TokenOption};
pub use intent::{CeremonyEvent, CeremonyIntent, Trigger};
pub use machine::{CeremonyMachine, Outcome};
pub use stage::{CeremonyStage, Panel};
pub use state::CeremonyState;
pub use transition::{transition, Transition};
