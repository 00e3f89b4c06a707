use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::counters::tally::TallySnapshot;
use crate::counters::{CounterKey, SharedCounter, TallyCounter};
use crate::factories::CounterFactory;

/// Keeps one [`TallyCounter`] per type and hands it out on every lookup.
///
/// Unlike most factories, this one retains what it creates so the totals
/// survive between lookups and can be exported later.
///
/// # Examples
///
/// ```rust
/// use counter_hooks::counters::CounterKey;
/// use counter_hooks::factories::{SharedFactory, TallyFactory};
/// use counter_hooks::registry::CounterRegistry;
/// use std::sync::Arc;
///
/// struct Pdf;
///
/// let tallies = Arc::new(TallyFactory::new());
/// let registry = CounterRegistry::new();
/// registry.register(Arc::clone(&tallies) as SharedFactory);
///
/// registry.notify_read(&CounterKey::of::<Pdf>(), &Pdf, 4096);
/// registry.notify_read(&CounterKey::of::<Pdf>(), &Pdf, 1024);
///
/// let snapshot = &tallies.snapshots()[0];
/// assert_eq!(snapshot.reads, 2);
/// assert_eq!(snapshot.bytes_read, 5120);
/// ```
#[derive(Default)]
pub struct TallyFactory {
    tallies: Mutex<HashMap<CounterKey, Arc<TallyCounter>>>,
}

impl TallyFactory {
    /// Creates a factory with no tallies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the tally for `key`, creating it if needed.
    pub fn tally(&self, key: &CounterKey) -> Arc<TallyCounter> {
        let mut tallies = self.tallies.lock().unwrap_or_else(|p| p.into_inner());
        Arc::clone(
            tallies
                .entry(*key)
                .or_insert_with(|| Arc::new(TallyCounter::new(*key))),
        )
    }

    /// Returns all tallies, ordered by type name.
    pub fn tallies(&self) -> Vec<Arc<TallyCounter>> {
        let tallies = self.tallies.lock().unwrap_or_else(|p| p.into_inner());
        let mut all: Vec<_> = tallies.values().cloned().collect();
        all.sort_by_key(|t| t.key().name());
        all
    }

    /// Captures all tallies, ordered by type name.
    pub fn snapshots(&self) -> Vec<TallySnapshot> {
        self.tallies().iter().map(|t| t.snapshot()).collect()
    }

    /// Captures all tallies and resets them.
    pub fn snapshots_and_reset(&self) -> Vec<TallySnapshot> {
        self.tallies()
            .iter()
            .map(|t| t.snapshot_and_reset())
            .collect()
    }
}

impl CounterFactory for TallyFactory {
    fn counter_for(&self, key: &CounterKey) -> Option<SharedCounter> {
        Some(self.tally(key))
    }
}

impl fmt::Debug for TallyFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tallies()).finish()
    }
}
