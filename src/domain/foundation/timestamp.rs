//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Formats the wall-clock time as `HH:MM` for chat bubbles.
    pub fn clock_label(&self) -> String {
        self.0.format("%H:%M").to_string()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn timestamp_now_is_monotonic_across_calls() {
        let ts1 = Timestamp::now();
        sleep(Duration::from_millis(10));
        let ts2 = Timestamp::now();

        assert!(ts1 < ts2);
    }

    #[test]
    fn clock_label_uses_hours_and_minutes() {
        let ts: Timestamp = serde_json::from_str("\"2025-07-04T09:45:30Z\"").unwrap();
        assert_eq!(ts.clock_label(), "09:45");
    }

    #[test]
    fn timestamp_round_trips_through_json() {
        let json = "\"2025-07-02T10:15:00Z\"";
        let ts: Timestamp = serde_json::from_str(json).unwrap();

        assert_eq!(serde_json::to_string(&ts).unwrap(), json);
    }
}
