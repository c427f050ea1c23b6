//! # Effect Interfaces
//!
//! Pure trait signatures for the collaborators the ceremony talks to. No
//! implementations live here:
//!
//! - [`TimerEffects`]: delayed, cancelable timers delivered as events
//! - [`WalletEffects`]: wallet connection (boolean outcome to the ceremony)
//! - [`ExplorerEffects`]: block explorer links
//!
//! Production handlers are in `stellaris-effects`; deterministic handlers for
//! tests are in `stellaris-testkit`.

pub mod explorer;
pub mod timer;
pub mod wallet;

pub use explorer::{ExplorerEffects, ExplorerError};
pub use timer::{TimerEffects, TimerError, TimerFired, TimerHandle, TimerPurpose};
pub use wallet::{WalletAccount, WalletEffects, WalletError};
