//! Alert visibility window.
//!
//! A report counts as an "active alert" for a fixed period after its
//! creation instant. Past that instant it is excluded from alert views but
//! remains visible in plain report listings.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Hours after creation during which a report is surfaced as an active alert.
pub const ALERT_VISIBILITY_HOURS: i64 = 12;

/// The default visibility window.
#[must_use]
pub fn default_window() -> Duration {
    Duration::hours(ALERT_VISIBILITY_HOURS)
}

/// Remaining time until an alert expires, decomposed for display.
///
/// All fields are clamped to zero once the alert has expired, and the
/// decomposition satisfies
/// `hours * 3600 + minutes * 60 + seconds == total_ms / 1000` (integer
/// division).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Remaining {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub total_ms: i64,
}

impl Remaining {
    /// The zero duration shown for expired alerts.
    pub const EXPIRED: Self = Self {
        hours: 0,
        minutes: 0,
        seconds: 0,
        total_ms: 0,
    };

    /// Returns whether any time is left.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.total_ms <= 0
    }
}

/// Returns whether a report created at `created_at` is still visible as an
/// active alert at `now`, for the given window.
///
/// Visibility holds on `[created_at, created_at + window)`: the expiry
/// instant itself is already expired.
#[must_use]
pub fn is_visible_with_window(
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    window: Duration,
) -> bool {
    now < created_at + window
}

/// Returns whether a report is visible under the default 12-hour window.
#[must_use]
pub fn is_visible(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    is_visible_with_window(created_at, now, default_window())
}

/// Visibility for possibly-absent creation instants.
///
/// A report whose creation instant is missing or unparsable has unknown
/// age; it fails closed (treated as expired) instead of propagating
/// invalid-date arithmetic.
#[must_use]
pub fn is_visible_opt(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    created_at.is_some_and(|t| is_visible(t, now))
}

/// Computes the remaining visible duration, clamped to zero after expiry.
#[must_use]
pub fn remaining_with_window(
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    window: Duration,
) -> Remaining {
    let expiry = created_at + window;
    let left_ms = (expiry - now).num_milliseconds();
    if left_ms <= 0 {
        return Remaining::EXPIRED;
    }

    let total_secs = left_ms / 1000;
    Remaining {
        hours: total_secs / 3600,
        minutes: (total_secs % 3600) / 60,
        seconds: total_secs % 60,
        total_ms: left_ms,
    }
}

/// Computes the remaining visible duration under the default window.
#[must_use]
pub fn remaining(created_at: DateTime<Utc>, now: DateTime<Utc>) -> Remaining {
    remaining_with_window(created_at, now, default_window())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_visible_throughout_window() {
        let t0 = at("2024-01-01T00:00:00Z");

        assert!(is_visible(t0, t0));
        assert!(is_visible(t0, at("2024-01-01T06:00:00Z")));
        assert!(is_visible(t0, at("2024-01-01T11:59:59Z")));
    }

    #[test]
    fn test_expired_at_and_after_boundary() {
        let t0 = at("2024-01-01T00:00:00Z");

        // The expiry instant itself is excluded
        assert!(!is_visible(t0, at("2024-01-01T12:00:00Z")));
        assert!(!is_visible(t0, at("2024-01-01T12:00:01Z")));
        assert!(!is_visible(t0, at("2024-01-02T00:00:00Z")));
    }

    #[test]
    fn test_remaining_one_second_before_expiry() {
        let t0 = at("2024-01-01T00:00:00Z");
        let r = remaining(t0, at("2024-01-01T11:59:59Z"));

        assert_eq!(r.hours, 0);
        assert_eq!(r.minutes, 0);
        assert_eq!(r.seconds, 1);
        assert_eq!(r.total_ms, 1000);
        assert!(!r.is_expired());
    }

    #[test]
    fn test_remaining_clamped_after_expiry() {
        let t0 = at("2024-01-01T00:00:00Z");
        let r = remaining(t0, at("2024-01-01T12:00:01Z"));

        assert_eq!(r, Remaining::EXPIRED);
        assert!(r.is_expired());
    }

    #[test]
    fn test_remaining_decomposition_invariant() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        // Sweep a range of offsets, including sub-second ones
        for offset_ms in [0i64, 1, 999, 1000, 61_000, 3_599_999, 3_600_000, 39_599_123] {
            let now = t0 + Duration::milliseconds(offset_ms);
            let r = remaining(t0, now);

            assert_eq!(
                r.hours * 3600 + r.minutes * 60 + r.seconds,
                r.total_ms / 1000,
                "decomposition mismatch at offset {offset_ms}ms"
            );
            assert!(r.hours >= 0 && r.minutes >= 0 && r.seconds >= 0 && r.total_ms >= 0);
        }
    }

    #[test]
    fn test_fresh_report_has_full_window() {
        let t0 = at("2024-01-01T00:00:00Z");
        let r = remaining(t0, t0);

        assert_eq!(r.hours, 12);
        assert_eq!(r.minutes, 0);
        assert_eq!(r.seconds, 0);
    }

    #[test]
    fn test_missing_created_at_fails_closed() {
        assert!(!is_visible_opt(None, Utc::now()));
        assert!(is_visible_opt(Some(Utc::now()), Utc::now() + Duration::seconds(1)));
    }
}
