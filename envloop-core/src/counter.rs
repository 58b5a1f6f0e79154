//! Named counters shared between components.
//!
//! A [`Counter`] keeps monotonically increasing totals, e.g., the number of
//! episodes and environment steps, and may be shared by any number of
//! [`EnvironmentLoop`](crate::EnvironmentLoop)s running in parallel threads.
//!
//! ```rust
//! use envloop_core::{Counter, SharedCounter};
//!
//! let counter = SharedCounter::new();
//! let other = counter.clone();
//!
//! counter.increment(&[("episodes", 1), ("steps", 10)]);
//! let counts = other.increment(&[("episodes", 1), ("steps", 5)]);
//!
//! assert_eq!(counts["episodes"], 2);
//! assert_eq!(counts["steps"], 15);
//! ```
use log::warn;
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

/// Snapshot of counter totals, keyed by name.
pub type Counts = BTreeMap<String, u64>;

/// Process-wide named counters.
pub trait Counter {
    /// Adds the given deltas and returns all totals after the addition.
    ///
    /// Addition and snapshot are a single atomic operation; no other increment
    /// can be observed in between.
    fn increment(&self, deltas: &[(&str, u64)]) -> Counts;

    /// Returns all totals.
    fn get_counts(&self) -> Counts;
}

/// A thread-safe [`Counter`].
///
/// Cloning returns a handle to the same totals.
#[derive(Clone, Debug, Default)]
pub struct SharedCounter {
    counts: Arc<Mutex<Counts>>,
}

impl SharedCounter {
    /// Constructs a counter with no totals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a counter starting from the given totals.
    ///
    /// Used to resume counting, for example, from a checkpoint.
    pub fn from_counts(counts: Counts) -> Self {
        Self {
            counts: Arc::new(Mutex::new(counts)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Counts> {
        // Totals are plain integers, so a panic in another holder cannot leave them torn.
        self.counts.lock().unwrap_or_else(|poisoned| {
            warn!("Counter lock was poisoned, recovering the totals");
            poisoned.into_inner()
        })
    }
}

impl Counter for SharedCounter {
    fn increment(&self, deltas: &[(&str, u64)]) -> Counts {
        let mut counts = self.lock();
        for (key, delta) in deltas {
            *counts.entry(key.to_string()).or_insert(0) += delta;
        }
        counts.clone()
    }

    fn get_counts(&self) -> Counts {
        self.lock().clone()
    }
}

impl<C: Counter + ?Sized> Counter for &C {
    fn increment(&self, deltas: &[(&str, u64)]) -> Counts {
        (**self).increment(deltas)
    }

    fn get_counts(&self) -> Counts {
        (**self).get_counts()
    }
}

impl<C: Counter + ?Sized> Counter for Arc<C> {
    fn increment(&self, deltas: &[(&str, u64)]) -> Counts {
        (**self).increment(deltas)
    }

    fn get_counts(&self) -> Counts {
        (**self).get_counts()
    }
}
