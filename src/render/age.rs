// src/render/age.rs
// =============================================================================
// Turns an absolute timestamp into a coarse age such as "3d ago".
//
// Every unit is derived from the previous one by integer division, and a
// "month" is a flat 30 days. There are no calendar-aware boundaries.
//
// Tiers, first match wins (all comparisons are strictly-less-than, so exactly
// 60 seconds is "1m ago" and exactly 7 days is "1w ago"):
//   < 60s  -> "{s}s ago"
//   < 60m  -> "{m}m ago"
//   < 24h  -> "{h}h ago"
//   < 7d   -> "{d}d ago"
//   < 5w   -> "{w}w ago"
//   else   -> "{mo}mo ago"
// =============================================================================

use chrono::{DateTime, Utc};

pub fn format_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    // A timestamp in the future (clock skew) counts as "just now".
    let seconds = (now - then).num_seconds().max(0);
    format_elapsed(seconds)
}

fn format_elapsed(seconds: i64) -> String {
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let weeks = days / 7;
    let months = days / 30;

    if seconds < 60 {
        format!("{seconds}s ago")
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else if weeks < 5 {
        format!("{weeks}w ago")
    } else {
        format!("{months}mo ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    const WEEK: i64 = 7 * DAY;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap()
    }

    fn age(seconds: i64) -> String {
        format_age(now() - Duration::seconds(seconds), now())
    }

    #[test]
    fn test_seconds_tier() {
        for s in 0..60 {
            assert_eq!(age(s), format!("{s}s ago"));
        }
    }

    #[test]
    fn test_tier_boundaries_roll_over() {
        assert_eq!(age(59), "59s ago");
        assert_eq!(age(MINUTE), "1m ago");
        assert_eq!(age(HOUR - 1), "59m ago");
        assert_eq!(age(HOUR), "1h ago");
        assert_eq!(age(DAY - 1), "23h ago");
        assert_eq!(age(DAY), "1d ago");
        assert_eq!(age(WEEK - 1), "6d ago");
        assert_eq!(age(WEEK), "1w ago");
        assert_eq!(age(5 * WEEK - 1), "4w ago");
        assert_eq!(age(5 * WEEK), "1mo ago");
    }

    #[test]
    fn test_months_use_thirty_day_approximation() {
        assert_eq!(age(59 * DAY), "1mo ago");
        assert_eq!(age(60 * DAY), "2mo ago");
        assert_eq!(age(365 * DAY), "12mo ago");
    }

    #[test]
    fn test_future_timestamp_is_clamped() {
        assert_eq!(age(-30), "0s ago");
    }
}
