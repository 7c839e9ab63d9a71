//! Baseline-trajectory cache scoped to one cost evaluation.
//!
//! Multiple perturbed factors frequently share the same measurement time
//! sequence, and the control (unperturbed) trajectory depends only on that
//! sequence. Caching it avoids repeating the single most expensive step of
//! an evaluation. The key is the exact bit pattern of the time values, not
//! a formatted string, so equality is precise and collision-free for
//! distinct sequences.
//!
//! A cache lives for exactly one evaluation call. It is created on entry,
//! dropped on exit, and never shared across calls or workers; reuse across
//! candidates would serve stale trajectories.

use crate::network::types::Trace;
use ndarray::ArrayView1;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Per-call memo of control trajectories keyed by their time sequence.
#[derive(Debug, Default)]
pub struct BaselineCache {
    entries: HashMap<Vec<u64>, Trace>,
    hits: usize,
    misses: usize,
}

impl BaselineCache {
    /// Create an empty cache for one evaluation call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the control trace for `times`, computing it on first use.
    ///
    /// The key is the exact value sequence (`f64::to_bits` per element);
    /// two rows with bit-identical time columns share one entry regardless
    /// of their factor index.
    pub fn get_or_insert_with<F>(&mut self, times: ArrayView1<'_, f64>, compute: F) -> &Trace
    where
        F: FnOnce() -> Trace,
    {
        let key: Vec<u64> = times.iter().map(|&t| t.to_bits()).collect();
        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                entry.into_mut()
            }
            Entry::Vacant(slot) => {
                self.misses += 1;
                slot.insert(compute())
            }
        }
    }

    /// Number of lookups served from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Number of lookups that had to compute a trajectory.
    pub fn misses(&self) -> usize {
        self.misses
    }
}
