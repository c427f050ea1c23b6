//! Simulated timers for deterministic testing
//!
//! Timers never fire on their own. Tests advance a virtual clock and collect
//! the timers that came due, in due order, then feed them to the machine.

use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use stellaris_core::effects::{TimerEffects, TimerError, TimerFired, TimerHandle, TimerPurpose};

#[derive(Debug, Default)]
struct SimulatedClock {
    now_ms: u64,
    next_handle: u64,
    /// (due_ms, handle) -> event, so iteration order is firing order
    pending: BTreeMap<(u64, TimerHandle), TimerFired>,
    live: HashMap<TimerPurpose, (u64, TimerHandle)>,
    scheduled: u64,
    canceled: u64,
}

impl SimulatedClock {
    fn remove(&mut self, purpose: TimerPurpose) -> bool {
        match self.live.remove(&purpose) {
            Some((due, handle)) => {
                self.pending.remove(&(due, handle));
                true
            }
            None => false,
        }
    }
}

/// Timer handler driven by a virtual millisecond clock.
///
/// Clones share the same clock, so a test can keep one clone while the
/// machine owns another.
#[derive(Debug, Clone, Default)]
pub struct SimulatedTimerHandler {
    clock: Arc<Mutex<SimulatedClock>>,
}

impl SimulatedTimerHandler {
    /// Create a handler with the clock at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.clock.lock().now_ms
    }

    /// Move the clock forward to `ms` without firing anything.
    ///
    /// Moving backwards is ignored.
    pub fn set_now(&self, ms: u64) {
        let mut clock = self.clock.lock();
        clock.now_ms = clock.now_ms.max(ms);
    }

    /// Remove and return the earliest timer due at or before `until_ms`,
    /// moving the clock to its due time.
    pub fn pop_due(&self, until_ms: u64) -> Option<TimerFired> {
        let mut clock = self.clock.lock();
        let (&(due, handle), _) = clock.pending.iter().next()?;
        if due > until_ms {
            return None;
        }
        let fired = clock.pending.remove(&(due, handle))?;
        clock.live.remove(&fired.purpose);
        clock.now_ms = clock.now_ms.max(due);
        Some(fired)
    }

    /// Due time of the earliest pending timer
    pub fn next_due(&self) -> Option<u64> {
        self.clock.lock().pending.keys().next().map(|(due, _)| *due)
    }

    /// Number of timers waiting to fire
    pub fn pending_count(&self) -> usize {
        self.clock.lock().pending.len()
    }

    /// Whether a timer for `purpose` is waiting to fire
    pub fn is_pending(&self, purpose: TimerPurpose) -> bool {
        self.clock.lock().live.contains_key(&purpose)
    }

    /// Total number of `schedule` calls
    pub fn scheduled_count(&self) -> u64 {
        self.clock.lock().scheduled
    }

    /// Number of `cancel` calls that removed a pending timer
    pub fn canceled_count(&self) -> u64 {
        self.clock.lock().canceled
    }
}

impl TimerEffects for SimulatedTimerHandler {
    fn schedule(&self, purpose: TimerPurpose, delay: Duration) -> Result<TimerHandle, TimerError> {
        let mut clock = self.clock.lock();
        if clock.remove(purpose) {
            tracing::trace!(%purpose, "superseded simulated timer");
        }

        clock.next_handle += 1;
        clock.scheduled += 1;
        let handle = TimerHandle::from_raw(clock.next_handle);
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        let due = clock.now_ms.saturating_add(delay_ms);
        clock
            .pending
            .insert((due, handle), TimerFired { purpose, handle });
        clock.live.insert(purpose, (due, handle));
        Ok(handle)
    }

    fn cancel(&self, handle: TimerHandle) -> Result<(), TimerError> {
        let mut clock = self.clock.lock();
        let purpose = clock
            .live
            .iter()
            .find(|(_, (_, live))| *live == handle)
            .map(|(purpose, _)| *purpose);
        if let Some(purpose) = purpose {
            clock.remove(purpose);
            clock.canceled += 1;
        }
        Ok(())
    }
}
