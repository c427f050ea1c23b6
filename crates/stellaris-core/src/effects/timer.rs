//! Timer scheduling effect interface.
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `stellaris-effects` (tokio), `stellaris-testkit` (simulated)
//! - **Usage**: The ceremony stage machine, for timed stage advances and the coin fade
//!
//! Timers never call back into the caller. A fired timer is reported as a
//! [`TimerFired`] value that the handler places on the owner's event queue,
//! so the owner processes it like any other event.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Error type for timer operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum TimerError {
    /// No async runtime is available to drive the timer
    #[error("Timer runtime unavailable")]
    RuntimeUnavailable,
    /// The event queue that receives fired timers has been closed
    #[error("Timer event queue closed")]
    QueueClosed,
}

/// Logical purpose of a timer. At most one timer per purpose is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimerPurpose {
    /// Automatic advance out of an animation stage
    StageAdvance,
    /// Onset of the secondary coin fade while the receive panel is shown
    CoinFade,
}

impl TimerPurpose {
    /// All purposes, in a fixed order
    pub const ALL: [TimerPurpose; 2] = [TimerPurpose::StageAdvance, TimerPurpose::CoinFade];
}

impl fmt::Display for TimerPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StageAdvance => f.write_str("stage-advance"),
            Self::CoinFade => f.write_str("coin-fade"),
        }
    }
}

/// Opaque handle identifying one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Wrap a raw handle value (handlers allocate these)
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw handle value
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Event produced when a timer elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerFired {
    /// Purpose the timer was scheduled for
    pub purpose: TimerPurpose,
    /// Handle returned when the timer was scheduled
    pub handle: TimerHandle,
}

/// Delayed, cancelable timer scheduling.
///
/// Contract:
/// - `schedule` returns immediately; it never waits for the delay.
/// - At most one live handle per purpose. Scheduling a purpose that already
///   holds a live handle cancels the previous handle first.
/// - A live timer fires exactly once; a canceled timer never fires.
/// - `cancel` is idempotent: canceling an unknown, fired or already canceled
///   handle succeeds and does nothing.
pub trait TimerEffects: Send + Sync {
    /// Schedule a timer for `purpose` that fires after `delay`.
    fn schedule(&self, purpose: TimerPurpose, delay: Duration) -> Result<TimerHandle, TimerError>;

    /// Cancel a previously scheduled timer.
    fn cancel(&self, handle: TimerHandle) -> Result<(), TimerError>;
}

/// Blanket implementation for Arc<T> where T: TimerEffects
impl<T: TimerEffects + ?Sized> TimerEffects for std::sync::Arc<T> {
    fn schedule(&self, purpose: TimerPurpose, delay: Duration) -> Result<TimerHandle, TimerError> {
        (**self).schedule(purpose, delay)
    }

    fn cancel(&self, handle: TimerHandle) -> Result<(), TimerError> {
        (**self).cancel(handle)
    }
}
