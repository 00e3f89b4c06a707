//! JSON observer for exporting tallies.
//!
//! This module provides [`JsonObserver`], which serializes the totals kept by
//! [`TallyCounter`]s to JSON using serde.
//!
//! # Feature Flag
//!
//! This module requires the `json` feature:
//!
//! ```toml
//! [dependencies]
//! counter-hooks = { version = "0.1", features = ["json"] }
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use counter_hooks::factories::TallyFactory;
//! use counter_hooks::observers::json::JsonObserver;
//!
//! let tallies = TallyFactory::new();
//! // ... register and process documents ...
//!
//! let json = JsonObserver::new().to_json(tallies.tallies().iter().map(|t| &**t))?;
//! // [{"type_name":"app::Pdf","reads":2,"writes":0,"bytes_read":5120,"bytes_written":0}]
//! ```

use serde::{Deserialize, Serialize};

use crate::counters::tally::{TallyCounter, TallySnapshot};
use crate::error::Result;

/// A collection of tally snapshots, typically a point-in-time capture of
/// every observed type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsSnapshot {
    /// Optional timestamp in milliseconds since Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
    /// The tally snapshots.
    pub tallies: Vec<TallySnapshot>,
}

impl MetricsSnapshot {
    /// Creates a new metrics snapshot with the given tallies.
    pub fn new(tallies: Vec<TallySnapshot>) -> Self {
        Self {
            timestamp_ms: None,
            tallies,
        }
    }

    /// Creates a new metrics snapshot with tallies and a timestamp.
    pub fn with_timestamp(tallies: Vec<TallySnapshot>, timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms: Some(timestamp_ms),
            tallies,
        }
    }

    /// Finds a tally by type name.
    pub fn get(&self, type_name: &str) -> Option<&TallySnapshot> {
        self.tallies.iter().find(|t| t.type_name == type_name)
    }
}

/// Configuration for the JSON observer.
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Whether to pretty-print the JSON output.
    pub pretty: bool,
    /// Whether to include a timestamp in the output.
    pub include_timestamp: bool,
    /// Whether to wrap tallies in a [`MetricsSnapshot`] object.
    pub wrap_in_snapshot: bool,
}

/// An observer that serializes tallies to JSON.
///
/// By default the output is a plain array of [`TallySnapshot`] objects.
/// With [`wrap_in_snapshot`](JsonObserver::wrap_in_snapshot) the array is
/// nested in a [`MetricsSnapshot`], optionally timestamped.
#[derive(Debug, Clone, Default)]
pub struct JsonObserver {
    config: JsonConfig,
}

impl JsonObserver {
    /// Creates a new JSON observer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new JSON observer with the specified configuration.
    pub fn with_config(config: JsonConfig) -> Self {
        Self { config }
    }

    /// Enables or disables pretty-printing.
    pub fn pretty(mut self, enabled: bool) -> Self {
        self.config.pretty = enabled;
        self
    }

    /// Enables or disables timestamp inclusion.
    ///
    /// Only has effect when `wrap_in_snapshot` is also enabled.
    pub fn include_timestamp(mut self, enabled: bool) -> Self {
        self.config.include_timestamp = enabled;
        self
    }

    /// Enables or disables wrapping the output in a [`MetricsSnapshot`].
    pub fn wrap_in_snapshot(mut self, enabled: bool) -> Self {
        self.config.wrap_in_snapshot = enabled;
        self
    }

    /// Serializes the current totals of `tallies`.
    pub fn to_json<'a>(&self, tallies: impl Iterator<Item = &'a TallyCounter>) -> Result<String> {
        self.render(tallies.map(TallyCounter::snapshot).collect())
    }

    /// Serializes the current totals of `tallies` and resets them.
    pub fn to_json_and_reset<'a>(
        &self,
        tallies: impl Iterator<Item = &'a TallyCounter>,
    ) -> Result<String> {
        self.render(tallies.map(TallyCounter::snapshot_and_reset).collect())
    }

    /// Serializes snapshots that were already captured.
    pub fn render(&self, snapshots: Vec<TallySnapshot>) -> Result<String> {
        let json = if self.config.wrap_in_snapshot {
            let snapshot = if self.config.include_timestamp {
                MetricsSnapshot::with_timestamp(snapshots, current_timestamp_ms())
            } else {
                MetricsSnapshot::new(snapshots)
            };

            if self.config.pretty {
                serde_json::to_string_pretty(&snapshot)?
            } else {
                serde_json::to_string(&snapshot)?
            }
        } else if self.config.pretty {
            serde_json::to_string_pretty(&snapshots)?
        } else {
            serde_json::to_string(&snapshots)?
        };
        Ok(json)
    }
}

/// Returns the current timestamp in milliseconds since Unix epoch.
fn current_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::{Counter, CounterKey};

    struct Pdf;
    struct Xfa;

    fn tally<T: 'static>() -> TallyCounter {
        TallyCounter::new(CounterKey::of::<T>())
    }

    #[test]
    fn test_to_json_empty() {
        let observer = JsonObserver::new();
        let json = observer.to_json(std::iter::empty()).unwrap();
        assert_eq!(json, "[]");
    }

    #[test]
    fn test_to_json_single_tally() {
        let pdf = tally::<Pdf>();
        pdf.on_document_read(&Pdf, 42);

        let json = JsonObserver::new().to_json([&pdf].into_iter()).unwrap();
        let expected = format!(
            r#"[{{"type_name":"{}","reads":1,"writes":0,"bytes_read":42,"bytes_written":0}}]"#,
            CounterKey::of::<Pdf>().name()
        );
        assert_eq!(json, expected);
    }

    #[test]
    fn test_to_json_multiple_tallies() {
        let pdf = tally::<Pdf>();
        let xfa = tally::<Xfa>();
        pdf.on_document_write(&Pdf, 1000);
        xfa.on_document_read(&Xfa, 5);

        let json = JsonObserver::new().to_json([&pdf, &xfa].into_iter()).unwrap();
        let parsed: Vec<TallySnapshot> = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].bytes_written, 1000);
        assert_eq!(parsed[1].bytes_read, 5);
    }

    #[test]
    fn test_to_json_pretty() {
        let pdf = tally::<Pdf>();
        let json = JsonObserver::new()
            .pretty(true)
            .to_json([&pdf].into_iter())
            .unwrap();
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_with_snapshot() {
        let pdf = tally::<Pdf>();
        pdf.on_document_read(&Pdf, 100);

        let json = JsonObserver::new()
            .wrap_in_snapshot(true)
            .to_json([&pdf].into_iter())
            .unwrap();

        assert!(json.starts_with(r#"{"tallies":["#));
        assert!(!json.contains("timestamp_ms"));
    }

    #[test]
    fn test_to_json_with_timestamp() {
        let pdf = tally::<Pdf>();
        let json = JsonObserver::new()
            .wrap_in_snapshot(true)
            .include_timestamp(true)
            .to_json([&pdf].into_iter())
            .unwrap();

        let parsed: MetricsSnapshot = serde_json::from_str(&json).unwrap();
        assert!(parsed.timestamp_ms.is_some());
        assert_eq!(parsed.tallies.len(), 1);
    }

    #[test]
    fn test_timestamp_ignored_without_wrapping() {
        let pdf = tally::<Pdf>();
        let json = JsonObserver::with_config(JsonConfig {
            include_timestamp: true,
            ..JsonConfig::default()
        })
        .to_json([&pdf].into_iter())
        .unwrap();
        assert!(!json.contains("timestamp_ms"));
    }

    #[test]
    fn test_to_json_and_reset() {
        let pdf = tally::<Pdf>();
        pdf.on_document_write(&Pdf, 75);

        let json = JsonObserver::new()
            .to_json_and_reset([&pdf].into_iter())
            .unwrap();

        assert!(json.contains(r#""bytes_written":75"#));
        assert_eq!(pdf.snapshot().bytes_written, 0);
    }

    #[test]
    fn test_deserialize_metrics_snapshot() {
        let json = r#"{"timestamp_ms":1234567890,"tallies":[{"type_name":"a","reads":1,"writes":2,"bytes_read":3,"bytes_written":4}]}"#;
        let snapshot: MetricsSnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot.timestamp_ms, Some(1234567890));
        assert_eq!(snapshot.get("a").map(|t| t.writes), Some(2));
        assert!(snapshot.get("b").is_none());
    }
}
