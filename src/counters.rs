//! The counter capability and the built-in counters.
//!
//! A [`Counter`] observes document read and write events for one type of
//! document producer. Counters are handed out by
//! [`CounterFactory`](crate::factories::CounterFactory) implementations and
//! invoked by the host whenever a document is read or written.
//!
//! # Available Counters
//!
//! | Type | Description |
//! |------|-------------|
//! | [`DefaultCounter`] | Counts events and logs an occasional notice |
//! | [`LineCounter`] | Writes one line per event to stdout or any writer |
//! | [`TallyCounter`] | Aggregates events and bytes in sharded atomics |
//!
//! # Contract
//!
//! Counters are best-effort observers. Event methods return nothing and must
//! not panic on normal input: failures inside a counter (an I/O error, a full
//! buffer) are absorbed by the counter itself.

pub mod default;
pub mod line;
pub mod tally;

pub use default::DefaultCounter;
pub use line::LineCounter;
pub use tally::TallyCounter;

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A shared, type-erased counter.
pub type SharedCounter = Arc<dyn Counter>;

/// Identifies the type of object producing document events.
///
/// Keys compare and hash by [`TypeId`] only; the type name is kept for
/// diagnostics.
///
/// # Examples
///
/// ```rust
/// use counter_hooks::counters::CounterKey;
///
/// struct PdfDocument;
///
/// let key = CounterKey::of::<PdfDocument>();
/// assert_eq!(key, CounterKey::of::<PdfDocument>());
/// assert_ne!(key, CounterKey::of::<String>());
/// assert!(key.name().ends_with("PdfDocument"));
/// ```
#[derive(Clone, Copy)]
pub struct CounterKey {
    id: TypeId,
    name: &'static str,
}

impl CounterKey {
    /// Returns the key for type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Returns the underlying [`TypeId`].
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Returns the fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the type name without its module path.
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        match base.rfind("::") {
            Some(pos) => &self.name[pos + 2..],
            None => self.name,
        }
    }
}

impl PartialEq for CounterKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CounterKey {}

impl Hash for CounterKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for CounterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CounterKey").field(&self.name).finish()
    }
}

impl fmt::Display for CounterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Receives document events for the type it was created for.
///
/// `document` is the object that was read or written; counters that care
/// about its concrete type can downcast it. `length` is the document size in
/// bytes.
///
/// # Examples
///
/// ```rust
/// use counter_hooks::counters::Counter;
/// use std::any::Any;
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// #[derive(Default)]
/// struct BytesWritten(AtomicU64);
///
/// impl Counter for BytesWritten {
///     fn on_document_read(&self, _document: &dyn Any, _length: u64) {}
///
///     fn on_document_write(&self, _document: &dyn Any, length: u64) {
///         self.0.fetch_add(length, Ordering::Relaxed);
///     }
/// }
///
/// let counter = BytesWritten::default();
/// counter.on_document_write(&"report.pdf", 512);
/// assert_eq!(counter.0.load(Ordering::Relaxed), 512);
/// ```
pub trait Counter: Send + Sync {
    /// Called after a document has been read.
    fn on_document_read(&self, document: &dyn Any, length: u64);

    /// Called after a document has been written.
    fn on_document_write(&self, document: &dyn Any, length: u64);
}
