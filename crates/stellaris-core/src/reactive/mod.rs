//! # Reactive Primitives
//!
//! - [`Dynamic<T>`]: a published value with versioned change detection
//! - [`Subscription<T>`]: a poll-based reader that tracks the last version seen
//!
//! Runtime-agnostic: only `parking_lot` locks and atomics, usable from sync
//! and async code alike.

mod dynamic;

pub use dynamic::{Dynamic, Subscription};
