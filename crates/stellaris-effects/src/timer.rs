//! Tokio timer handler
//!
//! Each scheduled timer is a spawned task that sleeps for the delay and then
//! sends a [`TimerFired`] into the owner's event queue. Canceling aborts the
//! task. If a timer fires in the same instant it is canceled, its event may
//! already be queued; owners discard such events by comparing handles.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use stellaris_core::effects::{TimerEffects, TimerError, TimerFired, TimerHandle, TimerPurpose};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

struct LiveTimer {
    handle: TimerHandle,
    task: JoinHandle<()>,
}

#[derive(Default)]
struct TimerTable {
    next_handle: u64,
    live: HashMap<TimerPurpose, LiveTimer>,
}

/// Production timer handler backed by tokio tasks.
///
/// Generic over the queue's event type so the owner can merge timer fires
/// with its other events on a single channel.
pub struct TokioTimerHandler<E> {
    events: mpsc::UnboundedSender<E>,
    table: Mutex<TimerTable>,
}

impl<E> TokioTimerHandler<E>
where
    E: From<TimerFired> + Send + 'static,
{
    /// Create a handler that delivers fired timers into `events`.
    pub fn new(events: mpsc::UnboundedSender<E>) -> Self {
        Self {
            events,
            table: Mutex::new(TimerTable::default()),
        }
    }

    /// Number of timers that have been scheduled and not yet finished or
    /// been canceled.
    pub fn pending_count(&self) -> usize {
        self.table
            .lock()
            .live
            .values()
            .filter(|t| !t.task.is_finished())
            .count()
    }
}

impl<E> TimerEffects for TokioTimerHandler<E>
where
    E: From<TimerFired> + Send + 'static,
{
    fn schedule(&self, purpose: TimerPurpose, delay: Duration) -> Result<TimerHandle, TimerError> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| TimerError::RuntimeUnavailable)?;
        if self.events.is_closed() {
            return Err(TimerError::QueueClosed);
        }

        let mut table = self.table.lock();
        if let Some(previous) = table.live.remove(&purpose) {
            previous.task.abort();
            tracing::trace!(%purpose, handle = %previous.handle, "superseded timer aborted");
        }

        table.next_handle += 1;
        let handle = TimerHandle::from_raw(table.next_handle);
        let events = self.events.clone();
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the owner shut down; nothing left to notify.
            let _ = events.send(E::from(TimerFired { purpose, handle }));
        });
        table.live.insert(purpose, LiveTimer { handle, task });

        tracing::trace!(%purpose, %handle, delay_ms = delay.as_millis() as u64, "timer scheduled");
        Ok(handle)
    }

    fn cancel(&self, handle: TimerHandle) -> Result<(), TimerError> {
        let mut table = self.table.lock();
        let purpose = table
            .live
            .iter()
            .find(|(_, live)| live.handle == handle)
            .map(|(purpose, _)| *purpose);
        if let Some(live) = purpose.and_then(|p| table.live.remove(&p)) {
            live.task.abort();
            tracing::trace!(%handle, "timer canceled");
        }
        Ok(())
    }
}

impl<E> Drop for TokioTimerHandler<E> {
    fn drop(&mut self) {
        for (_, live) in self.table.get_mut().live.drain() {
            live.task.abort();
        }
    }
}
