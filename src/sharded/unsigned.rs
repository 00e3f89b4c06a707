//! Unsigned sharded accumulator.

use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;

use crate::sharded::{Observable, NUM_COMPONENTS, THREAD_SLOT_INDEX};

/// An unsigned accumulator with one cache-padded slot per thread group.
///
/// Writers only touch the slot of their own thread; readers sum all slots.
///
/// # Examples
///
/// ```rust
/// use counter_hooks::sharded::unsigned::Unsigned;
/// use counter_hooks::sharded::Observable;
/// use std::sync::Arc;
/// use std::thread;
///
/// let bytes = Arc::new(Unsigned::new().with_name("bytes_read"));
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let bytes = Arc::clone(&bytes);
///         thread::spawn(move || bytes.add(1024))
///     })
///     .collect();
///
/// for h in handles {
///     h.join().unwrap();
/// }
///
/// assert_eq!(bytes.value(), 4096);
/// ```
pub struct Unsigned {
    name: &'static str,
    components: [CachePadded<AtomicUsize>; NUM_COMPONENTS],
}

impl Unsigned {
    /// Creates a new accumulator initialized to zero, with no name.
    pub const fn new() -> Self {
        const ZERO: CachePadded<AtomicUsize> = CachePadded::new(AtomicUsize::new(0));
        Unsigned {
            components: [ZERO; NUM_COMPONENTS],
            name: "",
        }
    }

    /// Sets the name, returning `self` for chaining.
    pub const fn with_name(self, name: &'static str) -> Self {
        Self { name, ..self }
    }

    #[inline]
    fn component(&self) -> &AtomicUsize {
        THREAD_SLOT_INDEX.with(|idx| &*self.components[*idx])
    }

    /// Adds a value to the current thread's slot.
    #[inline]
    pub fn add(&self, value: usize) {
        self.component().fetch_add(value, Ordering::Relaxed);
    }

    /// Adds a byte length, saturating on targets where `usize` is narrower
    /// than `u64`.
    #[inline]
    pub fn add_len(&self, length: u64) {
        self.add(usize::try_from(length).unwrap_or(usize::MAX));
    }

    /// Returns the value of the current thread's slot.
    #[inline]
    pub fn local_value(&self) -> usize {
        self.component().load(Ordering::Relaxed)
    }

    #[inline]
    fn total_value(&self) -> usize {
        self.components
            .iter()
            .map(|counter| counter.load(Ordering::Relaxed))
            .fold(0usize, usize::wrapping_add)
    }

    #[inline]
    fn total_value_and_reset(&self) -> usize {
        self.components
            .iter()
            .map(|counter| counter.swap(0, Ordering::Relaxed))
            .fold(0usize, usize::wrapping_add)
    }
}

impl Observable for Unsigned {
    #[inline]
    fn name(&self) -> &str {
        self.name
    }

    #[inline]
    fn value(&self) -> u64 {
        self.total_value() as u64
    }

    #[inline]
    fn value_and_reset(&self) -> u64 {
        self.total_value_and_reset() as u64
    }
}

impl Default for Unsigned {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Unsigned {
    /// Formats non-zero slots as `name{ [slot]:value ... }`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{{", self.name)?;
        for (i, counter) in self.components.iter().enumerate() {
            let val = counter.load(Ordering::Relaxed);
            if val != 0 {
                write!(f, " [{i}]:{val}")?;
            }
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let counter = Unsigned::new();
        assert_eq!(counter.value(), 0);
        assert_eq!(counter.name(), "");
    }

    #[test]
    fn test_add() {
        let counter = Unsigned::new();
        counter.add(1);
        assert_eq!(counter.value(), 1);
        counter.add(1);
        counter.add(1);
        assert_eq!(counter.value(), 3);
        assert_eq!(counter.local_value(), 3);
    }

    #[test]
    fn test_add_len() {
        let counter = Unsigned::new();
        counter.add_len(2048);
        counter.add_len(0);
        assert_eq!(counter.value(), 2048);
    }

    #[test]
    fn test_value_and_reset() {
        let counter = Unsigned::new().with_name("writes");
        counter.add(7);
        assert_eq!(counter.value_and_reset(), 7);
        assert_eq!(counter.value(), 0);
        assert_eq!(counter.name(), "writes");
    }

    #[test]
    fn test_debug() {
        let counter = Unsigned::new().with_name("reads");
        counter.add(5);
        let debug_str = format!("{:?}", counter);
        assert!(debug_str.starts_with("reads{"));
        assert!(debug_str.contains(":5"));
        assert!(debug_str.ends_with("}"));
    }

    #[test]
    fn test_dyn_format() {
        let named = Unsigned::new().with_name("bytes");
        named.add(1);
        assert_eq!(format!("{}", &named as &dyn Observable), "bytes:1");

        let unnamed = Unsigned::new();
        unnamed.add(2);
        assert_eq!(format!("{}", &unnamed as &dyn Observable), "2");
    }

    #[test]
    fn test_multiple_threads() {
        use std::sync::Arc;
        use std::thread;

        let counter = Arc::new(Unsigned::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..100 {
                        counter.add(1);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.value(), 400);
    }
}
