//! # Counter Hooks - Pluggable Document Event Counters
//!
//! A small hook subsystem for document-processing libraries: a registry of
//! **counter factories**, each of which may produce a per-type **counter**
//! that is notified whenever a document of that type is read or written.
//!
//! Host applications attach metrics or telemetry collectors by registering a
//! factory; the document library never needs to know about them, and any
//! number of independent collectors can observe the same events.
//!
//! ## Architecture
//!
//! ```text
//!   document read/write ──► CounterRegistry::get_counters(key)
//!                                    │
//!                    ┌───────────────┼───────────────┐
//!                    ▼               ▼               ▼
//!              factory A        factory B        factory C
//!             Some(counter)       None          Some(counter)
//!                    │                               │
//!                    ▼                               ▼
//!            on_document_read                on_document_read
//! ```
//!
//! - [`CounterRegistry`](registry::CounterRegistry) holds factories, unique by
//!   identity, and resolves the counters interested in a type. Lookups work
//!   on a copy-on-write snapshot, so they never observe a half-applied
//!   registration.
//! - [`CounterFactory`](factories::CounterFactory) decides per type whether to
//!   hand out a counter. Closures are factories too.
//! - [`Counter`](counters::Counter) receives the events. Counters are
//!   best-effort: they absorb their own failures.
//!
//! ## Quick Start
//!
//! ```rust
//! use counter_hooks::counters::CounterKey;
//! use counter_hooks::factories::{SharedFactory, TallyFactory};
//! use counter_hooks::registry::CounterRegistry;
//! use std::sync::Arc;
//!
//! struct PdfDocument;
//!
//! // Attach a collector at start-up.
//! let tallies = Arc::new(TallyFactory::new());
//! let registry = CounterRegistry::with_default_factory();
//! registry.register(Arc::clone(&tallies) as SharedFactory);
//!
//! // The document library reports events.
//! let key = CounterKey::of::<PdfDocument>();
//! registry.notify_write(&key, &PdfDocument, 2048);
//!
//! assert_eq!(tallies.snapshots()[0].bytes_written, 2048);
//! ```
//!
//! A process-wide registry is available through
//! [`CounterRegistry::global`](registry::CounterRegistry::global); it is
//! created on first use with the default factory already registered.
//!
//! ## Built-in Collectors
//!
//! | Type | Description |
//! |------|-------------|
//! | [`DefaultCounter`](counters::DefaultCounter) | Counts events, logs an occasional notice |
//! | [`LineCounter`](counters::LineCounter) | One line per event to stdout or a writer |
//! | [`TallyCounter`](counters::TallyCounter) | Sharded totals of events and bytes |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | `Serialize`/`Deserialize` for [`TallySnapshot`](counters::tally::TallySnapshot) |
//! | `json` | [`observers::json`] exporter |
//! | `full` | All of the above |
//!
//! ## Logging
//!
//! The crate logs through [`tracing`]; installing a subscriber is up to the
//! application.

pub mod counters;
pub mod error;
pub mod factories;
pub mod observers;
pub mod registry;
pub mod sharded;
pub mod text;

pub use error::{Error, Result};
