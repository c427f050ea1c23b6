//! Dynamic<T> - A published value with versioned change detection
//!
//! The runtime publishes each new ceremony view into a `Dynamic`, and shells
//! hold a `Subscription` that reports whether anything changed since they
//! last rendered. Subscriptions are version-based, so a burst of updates
//! coalesces into the latest value.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

struct DynamicInner<T> {
    value: RwLock<T>,
    /// Incremented on every accepted update
    version: AtomicU64,
}

/// A reactive value that can be observed for changes.
///
/// Cloning a `Dynamic` shares the underlying value; every clone sees every
/// update.
///
/// # Example
///
/// ```rust
/// use stellaris_core::reactive::Dynamic;
///
/// let stage = Dynamic::new("awaiting-wallet");
/// let mut sub = stage.subscribe();
///
/// stage.set("awaiting-give-choice");
/// assert_eq!(sub.poll(), Some("awaiting-give-choice"));
/// assert_eq!(sub.poll(), None);
/// ```
#[derive(Clone)]
pub struct Dynamic<T> {
    inner: Arc<DynamicInner<T>>,
}

impl<T: Clone + Send + Sync + 'static> Dynamic<T> {
    /// Create a new Dynamic with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(DynamicInner {
                value: RwLock::new(value),
                version: AtomicU64::new(0),
            }),
        }
    }

    /// Clone out the current value.
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }

    /// Read the current value in place without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.read())
    }

    /// Current version; starts at 0 and increments on each update.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    /// Replace the value unconditionally and bump the version.
    pub fn set(&self, value: T) {
        *self.inner.value.write() = value;
        self.inner.version.fetch_add(1, Ordering::Release);
    }

    /// Replace the value only if it differs from the current one.
    ///
    /// Returns `true` if the value changed (and the version was bumped).
    pub fn set_if_changed(&self, value: T) -> bool
    where
        T: PartialEq,
    {
        {
            let mut guard = self.inner.value.write();
            if *guard == value {
                return false;
            }
            *guard = value;
        }
        self.inner.version.fetch_add(1, Ordering::Release);
        true
    }

    /// Subscribe to future changes. The subscription starts at the current
    /// version, so the first `poll` only reports later updates.
    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            source: self.inner.clone(),
            last_version: self.version(),
        }
    }
}

impl<T: Clone + Send + Sync + Default + 'static> Default for Dynamic<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + Send + Sync + std::fmt::Debug + 'static> std::fmt::Debug for Dynamic<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dynamic")
            .field("value", &*self.inner.value.read())
            .field("version", &self.version())
            .finish()
    }
}

/// Poll-based subscription to a [`Dynamic`].
pub struct Subscription<T> {
    source: Arc<DynamicInner<T>>,
    last_version: u64,
}

impl<T: Clone + Send + Sync + 'static> Subscription<T> {
    /// Whether the source changed since the last poll.
    pub fn has_changed(&self) -> bool {
        self.source.version.load(Ordering::Acquire) > self.last_version
    }

    /// Return the latest value if the source changed since the last poll.
    pub fn poll(&mut self) -> Option<T> {
        let current = self.source.version.load(Ordering::Acquire);
        if current > self.last_version {
            self.last_version = current;
            Some(self.source.value.read().clone())
        } else {
            None
        }
    }

    /// Current value, regardless of change state.
    pub fn get(&self) -> T {
        self.source.value.read().clone()
    }

    /// Version this subscription last observed.
    pub fn last_observed_version(&self) -> u64 {
        self.last_version
    }
}
