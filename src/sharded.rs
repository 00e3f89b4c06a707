//! Sharded atomic storage backing the aggregating collectors.
//!
//! Document events arrive from every thread that reads or writes a document,
//! so the tallies kept by [`TallyCounter`](crate::counters::tally::TallyCounter)
//! are spread across cache-padded slots instead of a single atomic:
//!
//! ```text
//!                          ┌─────────────────────────────────────┐
//!                          │         Sharded Structure           │
//!                          ├─────────────────────────────────────┤
//!   Thread 0 ──writes──►   │ [Slot 0] ████████ (CachePadded)     │
//!   Thread 1 ──writes──►   │ [Slot 1] ████████ (CachePadded)     │
//!        ...               │    ...                              │
//!   Thread 63 ─writes──►   │ [Slot 63] ███████ (CachePadded)     │
//!                          └─────────────────────────────────────┘
//!                                          │
//!                                          ▼
//!                                   value() aggregates
//!                                   all slots on read
//! ```
//!
//! Slots are assigned round-robin the first time a thread touches any sharded
//! value; after 64 threads assignment wraps around.

pub mod unsigned;

use std::fmt::{Debug, Display};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Number of shards (slots) used by each sharded value.
///
/// Each slot is cache-line padded, so a value costs `64 × 64 = 4KB`.
pub(crate) const NUM_COMPONENTS: usize = 64;

static NEXT_SLOT_ID: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    /// Slot index of the current thread, stable for the thread's lifetime.
    pub(crate) static THREAD_SLOT_INDEX: usize = next_slot_id();
}

/// Assigns the next slot to a thread, in `[0, NUM_COMPONENTS)`.
fn next_slot_id() -> usize {
    NEXT_SLOT_ID.fetch_add(1, Ordering::Relaxed) % NUM_COMPONENTS
}

/// A named value that can be read by observers.
///
/// # Examples
///
/// ```rust
/// use counter_hooks::sharded::Observable;
/// use counter_hooks::sharded::unsigned::Unsigned;
///
/// let reads = Unsigned::new().with_name("reads");
/// reads.add(5);
///
/// assert_eq!(reads.name(), "reads");
/// assert_eq!(reads.value(), 5);
/// ```
pub trait Observable: Debug {
    /// Returns the name of this value, or an empty string if unnamed.
    fn name(&self) -> &str;

    /// Returns the current aggregated value across all shards.
    fn value(&self) -> u64;

    /// Returns the current value and resets it.
    ///
    /// Each shard is swapped atomically, the aggregate is not: updates racing
    /// with the reset land either in the returned value or in the next one.
    fn value_and_reset(&self) -> u64;
}

impl Display for dyn Observable + '_ {
    /// Formats as `name:value` if named, or just `value` otherwise.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.name().is_empty() {
            write!(f, "{}:{}", self.name(), self.value())
        } else {
            write!(f, "{}", self.value())
        }
    }
}
