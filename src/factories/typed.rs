use std::collections::HashSet;
use std::fmt;

use crate::counters::{CounterKey, SharedCounter};
use crate::factories::CounterFactory;

/// Builds counters only for an explicit set of types.
///
/// # Examples
///
/// ```rust
/// use counter_hooks::counters::{CounterKey, LineCounter, SharedCounter};
/// use counter_hooks::factories::{CounterFactory, TypedCounterFactory};
/// use std::sync::Arc;
///
/// struct Pdf;
/// struct Xfa;
///
/// let factory = TypedCounterFactory::new(|key: &CounterKey| Arc::new(LineCounter::for_key(key)) as SharedCounter)
///     .with_type::<Pdf>();
///
/// assert!(factory.counter_for(&CounterKey::of::<Pdf>()).is_some());
/// assert!(factory.counter_for(&CounterKey::of::<Xfa>()).is_none());
/// ```
pub struct TypedCounterFactory<F> {
    make: F,
    keys: HashSet<CounterKey>,
}

impl<F> TypedCounterFactory<F>
where
    F: Fn(&CounterKey) -> SharedCounter + Send + Sync,
{
    /// Creates a factory with no types of interest yet.
    pub fn new(make: F) -> Self {
        Self {
            make,
            keys: HashSet::new(),
        }
    }

    /// Adds `T` to the types of interest.
    pub fn with_type<T: ?Sized + 'static>(self) -> Self {
        self.with_key(CounterKey::of::<T>())
    }

    /// Adds `key` to the types of interest.
    pub fn with_key(mut self, key: CounterKey) -> Self {
        self.keys.insert(key);
        self
    }

    /// Returns whether counters are built for `key`.
    pub fn is_interested(&self, key: &CounterKey) -> bool {
        self.keys.contains(key)
    }
}

impl<F> CounterFactory for TypedCounterFactory<F>
where
    F: Fn(&CounterKey) -> SharedCounter + Send + Sync,
{
    fn counter_for(&self, key: &CounterKey) -> Option<SharedCounter> {
        self.is_interested(key).then(|| (self.make)(key))
    }
}

impl<F> fmt::Debug for TypedCounterFactory<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedCounterFactory")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}
