//! Aggregating counter backed by sharded atomics.
//!
//! A [`TallyCounter`] keeps four running totals for one document type:
//! reads, writes, bytes read and bytes written. Updates go to the calling
//! thread's shard, so many threads can process documents of the same type
//! without contending on a single cache line.
//!
//! Tallies are usually created and retained by a
//! [`TallyFactory`](crate::factories::TallyFactory), which hands out the same
//! tally every time a given type is looked up.

use std::any::Any;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::counters::{Counter, CounterKey};
use crate::sharded::unsigned::Unsigned;
use crate::sharded::Observable;

/// Running totals of document events for one type.
///
/// # Examples
///
/// ```rust
/// use counter_hooks::counters::{Counter, CounterKey, TallyCounter};
///
/// struct Invoice;
///
/// let tally = TallyCounter::new(CounterKey::of::<Invoice>());
/// tally.on_document_read(&Invoice, 1200);
/// tally.on_document_write(&Invoice, 800);
/// tally.on_document_write(&Invoice, 200);
///
/// let snapshot = tally.snapshot();
/// assert_eq!(snapshot.reads, 1);
/// assert_eq!(snapshot.writes, 2);
/// assert_eq!(snapshot.bytes_written, 1000);
/// ```
pub struct TallyCounter {
    key: CounterKey,
    reads: Unsigned,
    writes: Unsigned,
    bytes_read: Unsigned,
    bytes_written: Unsigned,
}

impl TallyCounter {
    /// Creates an empty tally for `key`.
    pub fn new(key: CounterKey) -> Self {
        Self {
            key,
            reads: Unsigned::new().with_name("reads"),
            writes: Unsigned::new().with_name("writes"),
            bytes_read: Unsigned::new().with_name("bytes_read"),
            bytes_written: Unsigned::new().with_name("bytes_written"),
        }
    }

    /// Returns the key this tally was created for.
    pub fn key(&self) -> CounterKey {
        self.key
    }

    /// Returns the individual totals as observables, for custom exporters.
    pub fn observables(&self) -> [&dyn Observable; 4] {
        [
            &self.reads,
            &self.writes,
            &self.bytes_read,
            &self.bytes_written,
        ]
    }

    /// Captures the current totals.
    pub fn snapshot(&self) -> TallySnapshot {
        TallySnapshot {
            type_name: self.key.name().to_string(),
            reads: self.reads.value(),
            writes: self.writes.value(),
            bytes_read: self.bytes_read.value(),
            bytes_written: self.bytes_written.value(),
        }
    }

    /// Captures the current totals and resets them.
    pub fn snapshot_and_reset(&self) -> TallySnapshot {
        TallySnapshot {
            type_name: self.key.name().to_string(),
            reads: self.reads.value_and_reset(),
            writes: self.writes.value_and_reset(),
            bytes_read: self.bytes_read.value_and_reset(),
            bytes_written: self.bytes_written.value_and_reset(),
        }
    }
}

impl Counter for TallyCounter {
    #[inline]
    fn on_document_read(&self, _document: &dyn Any, length: u64) {
        self.reads.add(1);
        self.bytes_read.add_len(length);
    }

    #[inline]
    fn on_document_write(&self, _document: &dyn Any, length: u64) {
        self.writes.add(1);
        self.bytes_written.add_len(length);
    }
}

impl fmt::Debug for TallyCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.key.short_name())?;
        for observable in self.observables() {
            write!(f, " {}", observable)?;
        }
        write!(f, " }}")
    }
}

/// A point-in-time copy of a [`TallyCounter`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TallySnapshot {
    /// Fully qualified name of the observed type.
    pub type_name: String,
    /// Number of documents read.
    pub reads: u64,
    /// Number of documents written.
    pub writes: u64,
    /// Total bytes read.
    pub bytes_read: u64,
    /// Total bytes written.
    pub bytes_written: u64,
}
