//! Crate-wide error type.
//!
//! Registry operations never fail: absence is a normal result there. The only
//! failures surfaced to callers come from the text helpers (malformed
//! patterns) and, with the `json` feature, from serializing tallies.

use thiserror::Error;

/// Unified error type for the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A regular expression failed to parse.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Error from the JSON observer.
    #[cfg(feature = "json")]
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;
