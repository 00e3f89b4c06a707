//! The registry connecting document producers with counter factories.
//!
//! Producers ask the registry for the counters interested in a document type
//! and notify each of them when a document of that type is read or written.
//! Collectors register factories at start-up to receive those events.
//!
//! # Snapshot Semantics
//!
//! Factories are stored copy-on-write behind a `RwLock<Arc<Vec<_>>>`. A lookup
//! clones the `Arc` under a read lock and releases the lock before querying
//! any factory, so each lookup sees exactly one point-in-time list, and a
//! registration racing with it is either fully visible or not at all. Writers
//! only copy the list when a lookup is still holding the previous snapshot.
//!
//! # Examples
//!
//! ```rust
//! use counter_hooks::counters::{CounterKey, LineCounter};
//! use counter_hooks::factories::{SharedFactory, SimpleCounterFactory};
//! use counter_hooks::registry::CounterRegistry;
//! use std::sync::Arc;
//!
//! struct Pdf;
//!
//! let registry = CounterRegistry::with_default_factory();
//! let stdout: SharedFactory = Arc::new(SimpleCounterFactory::new(Arc::new(LineCounter::new("pdf"))));
//!
//! registry.register(stdout.clone());
//! assert_eq!(registry.counters_for::<Pdf>().len(), 2);
//!
//! assert!(registry.unregister(&stdout));
//! assert!(!registry.unregister(&stdout));
//! ```

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, LazyLock, RwLock};

use tracing::{debug, trace, warn};

use crate::counters::{CounterKey, DefaultCounter, SharedCounter};
use crate::factories::{SharedFactory, SimpleCounterFactory};

/// Process-wide registry, created on first access with the default factory.
static GLOBAL_REGISTRY: LazyLock<CounterRegistry> =
    LazyLock::new(CounterRegistry::with_default_factory);

/// Factories compare by the address of their shared allocation.
#[inline]
fn same_factory(a: &SharedFactory, b: &SharedFactory) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// A set of counter factories, unique by identity, in registration order.
pub struct CounterRegistry {
    factories: RwLock<Arc<Vec<SharedFactory>>>,
}

impl CounterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Creates a registry holding a [`SimpleCounterFactory`] over a
    /// [`DefaultCounter`].
    pub fn with_default_factory() -> Self {
        let registry = Self::new();
        registry.register(default_factory());
        registry
    }

    /// Returns the process-wide registry.
    ///
    /// The first call registers the default factory; every call returns the
    /// same instance.
    pub fn global() -> &'static CounterRegistry {
        &GLOBAL_REGISTRY
    }

    /// Registers `factory`.
    ///
    /// Registering a factory that is already present, or `None`, does nothing.
    /// Returns whether the factory was inserted.
    pub fn register(&self, factory: impl Into<Option<SharedFactory>>) -> bool {
        let Some(factory) = factory.into() else {
            return false;
        };

        let mut guard = self.factories.write().unwrap_or_else(|p| p.into_inner());
        if guard.iter().any(|f| same_factory(f, &factory)) {
            trace!("counter factory already registered");
            return false;
        }

        Arc::make_mut(&mut *guard).push(factory);
        debug!(registered = guard.len(), "counter factory registered");
        true
    }

    /// Unregisters `factory`.
    ///
    /// Returns `true` if the factory was registered; `None` and unknown
    /// factories return `false`.
    pub fn unregister<'a>(&self, factory: impl Into<Option<&'a SharedFactory>>) -> bool {
        let Some(factory) = factory.into() else {
            return false;
        };

        let mut guard = self.factories.write().unwrap_or_else(|p| p.into_inner());
        let Some(pos) = guard.iter().position(|f| same_factory(f, factory)) else {
            trace!("counter factory not registered");
            return false;
        };

        Arc::make_mut(&mut *guard).remove(pos);
        debug!(registered = guard.len(), "counter factory unregistered");
        true
    }

    /// Returns whether `factory` is registered.
    pub fn contains(&self, factory: &SharedFactory) -> bool {
        self.snapshot().iter().any(|f| same_factory(f, factory))
    }

    /// Returns the number of registered factories.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Returns `true` if no factory is registered.
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Returns the counters interested in documents of type `key`.
    ///
    /// Every factory of a single snapshot is asked once, in registration
    /// order. Factories answering `None` contribute nothing.
    pub fn get_counters(&self, key: &CounterKey) -> Vec<SharedCounter> {
        let factories = self.snapshot();
        let counters: Vec<_> = factories
            .iter()
            .filter_map(|factory| factory.counter_for(key))
            .collect();
        trace!(
            key = key.name(),
            factories = factories.len(),
            counters = counters.len(),
            "counters resolved"
        );
        counters
    }

    /// Returns the counters interested in documents of type `T`.
    pub fn counters_for<T: ?Sized + 'static>(&self) -> Vec<SharedCounter> {
        self.get_counters(&CounterKey::of::<T>())
    }

    /// Notifies every interested counter that a document was read.
    ///
    /// A panicking factory or counter is logged and skipped. Returns the number of
    /// counters that handled the event.
    pub fn notify_read(&self, key: &CounterKey, document: &dyn Any, length: u64) -> usize {
        self.dispatch(key, "read", |counter| {
            counter.on_document_read(document, length)
        })
    }

    /// Notifies every interested counter that a document was written.
    ///
    /// A panicking factory or counter is logged and skipped. Returns the number of
    /// counters that handled the event.
    pub fn notify_write(&self, key: &CounterKey, document: &dyn Any, length: u64) -> usize {
        self.dispatch(key, "write", |counter| {
            counter.on_document_write(document, length)
        })
    }

    fn dispatch(
        &self,
        key: &CounterKey,
        event: &'static str,
        deliver: impl Fn(&SharedCounter),
    ) -> usize {
        let factories = self.snapshot();
        let mut counters = Vec::with_capacity(factories.len());
        for factory in factories.iter() {
            match panic::catch_unwind(AssertUnwindSafe(|| factory.counter_for(key))) {
                Ok(Some(counter)) => counters.push(counter),
                Ok(None) => {}
                Err(_) => {
                    warn!(key = key.name(), event, "counter factory panicked during lookup");
                }
            }
        }

        let mut delivered = 0;
        for counter in &counters {
            match panic::catch_unwind(AssertUnwindSafe(|| deliver(counter))) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    warn!(key = key.name(), event, "counter panicked while handling event");
                }
            }
        }
        delivered
    }

    fn snapshot(&self) -> Arc<Vec<SharedFactory>> {
        let guard = self.factories.read().unwrap_or_else(|p| p.into_inner());
        Arc::clone(&*guard)
    }
}

fn default_factory() -> SharedFactory {
    Arc::new(SimpleCounterFactory::new(Arc::new(DefaultCounter::new())))
}

impl Default for CounterRegistry {
    fn default() -> Self {
        Self::with_default_factory()
    }
}

impl fmt::Debug for CounterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CounterRegistry")
            .field("factories", &self.len())
            .finish()
    }
}
