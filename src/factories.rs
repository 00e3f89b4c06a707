//! The counter factory capability and the built-in factories.
//!
//! A [`CounterFactory`] decides, per type, whether it wants to observe
//! documents of that type. Factories are registered with a
//! [`CounterRegistry`](crate::registry::CounterRegistry) and queried on every
//! lookup.
//!
//! # Available Factories
//!
//! | Factory | Interest policy |
//! |---------|-----------------|
//! | [`SimpleCounterFactory`] | Every type, always the same counter |
//! | [`TypedCounterFactory`] | An explicit set of types |
//! | [`TallyFactory`] | Every type, one retained tally per type |
//! | any `Fn(&CounterKey) -> Option<SharedCounter>` | Whatever the closure decides |

mod tally;
mod typed;

pub use tally::TallyFactory;
pub use typed::TypedCounterFactory;

use std::fmt;
use std::sync::Arc;

use crate::counters::{CounterKey, SharedCounter};

/// A shared, type-erased factory, as stored by the registry.
pub type SharedFactory = Arc<dyn CounterFactory>;

/// Produces counters for the types it is interested in.
///
/// Implementations must not register or unregister factories from within
/// [`counter_for`](CounterFactory::counter_for).
///
/// # Examples
///
/// A closure is a factory:
///
/// ```rust
/// use counter_hooks::counters::{CounterKey, DefaultCounter, SharedCounter};
/// use counter_hooks::factories::{CounterFactory, SharedFactory};
/// use std::sync::Arc;
///
/// struct Pdf;
///
/// let pdf_only: SharedFactory = Arc::new(|key: &CounterKey| -> Option<SharedCounter> {
///     (*key == CounterKey::of::<Pdf>()).then(|| Arc::new(DefaultCounter::new()) as SharedCounter)
/// });
///
/// assert!(pdf_only.counter_for(&CounterKey::of::<Pdf>()).is_some());
/// assert!(pdf_only.counter_for(&CounterKey::of::<String>()).is_none());
/// ```
pub trait CounterFactory: Send + Sync {
    /// Returns a counter for `key`, or `None` when not interested.
    fn counter_for(&self, key: &CounterKey) -> Option<SharedCounter>;
}

impl<F> CounterFactory for F
where
    F: Fn(&CounterKey) -> Option<SharedCounter> + Send + Sync,
{
    fn counter_for(&self, key: &CounterKey) -> Option<SharedCounter> {
        self(key)
    }
}

/// Hands the same counter to every type.
///
/// # Examples
///
/// ```rust
/// use counter_hooks::counters::{CounterKey, DefaultCounter};
/// use counter_hooks::factories::{CounterFactory, SimpleCounterFactory};
/// use std::sync::Arc;
///
/// let factory = SimpleCounterFactory::new(Arc::new(DefaultCounter::new()));
/// assert!(factory.counter_for(&CounterKey::of::<u8>()).is_some());
/// ```
#[derive(Clone)]
pub struct SimpleCounterFactory {
    counter: SharedCounter,
}

impl SimpleCounterFactory {
    /// Creates a factory handing out `counter`.
    pub fn new(counter: SharedCounter) -> Self {
        Self { counter }
    }

    /// Returns the shared counter.
    pub fn counter(&self) -> &SharedCounter {
        &self.counter
    }
}

impl CounterFactory for SimpleCounterFactory {
    fn counter_for(&self, _key: &CounterKey) -> Option<SharedCounter> {
        Some(Arc::clone(&self.counter))
    }
}

impl fmt::Debug for SimpleCounterFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleCounterFactory").finish_non_exhaustive()
    }
}
