//! Exporters for the totals collected by
//! [`TallyCounter`](crate::counters::TallyCounter).
//!
//! Each observer is gated behind a feature flag to keep the default build
//! free of serialization dependencies:
//!
//! - `json` - Enables the [`json`] module
//! - `full` - Enables all observer modules
//!
//! Observers report failures through the crate-wide
//! [`Error`](crate::Error) type.

#[cfg(feature = "json")]
pub mod json;
