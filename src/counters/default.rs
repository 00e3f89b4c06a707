//! The counter installed when no collector has been configured.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::info;

use crate::counters::Counter;

const FIRST_NOTICE: u64 = 10_000;
const SECOND_NOTICE: u64 = 5_000;
const STEADY_NOTICE: u64 = 1_000;

/// A minimal counter that counts events and logs an occasional notice.
///
/// The notice is emitted at an escalating cadence: after the first
/// `10_000` events, then `5_000` events later, then every `1_000` events.
///
/// # Examples
///
/// ```rust
/// use counter_hooks::counters::{Counter, DefaultCounter};
///
/// let counter = DefaultCounter::new().with_intervals(2, 2, 1);
/// for _ in 0..5 {
///     counter.on_document_read(&(), 0);
/// }
///
/// assert_eq!(counter.events(), 5);
/// // notices at events 2, 4 and 5
/// assert_eq!(counter.notices(), 3);
/// ```
#[derive(Debug)]
pub struct DefaultCounter {
    events: AtomicU64,
    intervals: [u64; 3],
}

impl DefaultCounter {
    /// Creates a counter with the standard notice cadence.
    pub const fn new() -> Self {
        Self {
            events: AtomicU64::new(0),
            intervals: [FIRST_NOTICE, SECOND_NOTICE, STEADY_NOTICE],
        }
    }

    /// Overrides the notice cadence. Zero intervals are raised to one.
    pub const fn with_intervals(self, first: u64, second: u64, steady: u64) -> Self {
        const fn at_least_one(v: u64) -> u64 {
            if v == 0 {
                1
            } else {
                v
            }
        }
        Self {
            intervals: [at_least_one(first), at_least_one(second), at_least_one(steady)],
            ..self
        }
    }

    /// Returns the number of events observed so far.
    pub fn events(&self) -> u64 {
        self.events.load(Ordering::Relaxed)
    }

    /// Returns how many notices have been emitted so far.
    pub fn notices(&self) -> u64 {
        notices_up_to(self.events(), self.intervals)
    }

    fn record(&self, event: &'static str) {
        let n = self.events.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        if is_notice(n, self.intervals) {
            info!(
                events = n,
                last_event = event,
                "documents are observed by the default counter only; register a counter factory to collect metrics"
            );
        }
    }
}

/// Event `n` (1-based) triggers a notice when it lands on the cadence.
fn is_notice(n: u64, [first, second, steady]: [u64; 3]) -> bool {
    let second_at = first.saturating_add(second);
    n == first || n == second_at || (n > second_at && (n - second_at) % steady == 0)
}

fn notices_up_to(n: u64, [first, second, steady]: [u64; 3]) -> u64 {
    let second_at = first.saturating_add(second);
    if n < first {
        0
    } else if n < second_at {
        1
    } else {
        2 + (n - second_at) / steady
    }
}

impl Default for DefaultCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Counter for DefaultCounter {
    fn on_document_read(&self, _document: &dyn Any, _length: u64) {
        self.record("read");
    }

    fn on_document_write(&self, _document: &dyn Any, _length: u64) {
        self.record("write");
    }
}
