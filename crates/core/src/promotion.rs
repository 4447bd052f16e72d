//! Time-window activation for hot deals and news banners.
//!
//! A promotion is live when its status is [`PromotionStatus::Active`] and the
//! current instant falls inside `[start, end]`, both ends inclusive. A window
//! whose end precedes its start is never live.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::types::PromotionStatus;

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// The `[start, end]` interval during which a promotion may be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl PromotionWindow {
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// `false` when the window ends before it starts.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.end >= self.start
    }

    /// Whether `now` falls inside the window, ignoring status.
    #[must_use]
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.is_well_formed() && self.start <= now && now <= self.end
    }

    #[must_use]
    pub fn is_live(&self, status: PromotionStatus, now: DateTime<Utc>) -> bool {
        status == PromotionStatus::Active && self.contains(now)
    }

    #[must_use]
    pub fn time_left(&self, now: DateTime<Utc>) -> TimeLeft {
        let remaining = (self.end - now).num_milliseconds();
        if remaining <= 0 {
            return TimeLeft::Expired;
        }
        TimeLeft::Remaining {
            days: remaining / MILLIS_PER_DAY,
            hours: (remaining % MILLIS_PER_DAY) / MILLIS_PER_HOUR,
        }
    }
}

/// Countdown label for a promotion, rendered as `"3d 4h"` or `"Expired"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLeft {
    Remaining { days: i64, hours: i64 },
    Expired,
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remaining { days, hours } => write!(f, "{days}d {hours}h"),
            Self::Expired => f.write_str("Expired"),
        }
    }
}

impl Serialize for TimeLeft {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_live_inside_window() {
        let window = PromotionWindow::new(at(1, 0), at(10, 0));
        assert!(window.is_live(PromotionStatus::Active, at(5, 12)));
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let window = PromotionWindow::new(at(1, 0), at(10, 0));
        assert!(window.is_live(PromotionStatus::Active, at(1, 0)));
        assert!(window.is_live(PromotionStatus::Active, at(10, 0)));
        assert!(!window.is_live(PromotionStatus::Active, at(10, 0) + Duration::seconds(1)));
        assert!(!window.is_live(PromotionStatus::Active, at(1, 0) - Duration::seconds(1)));
    }

    #[test]
    fn test_status_gates_liveness() {
        let window = PromotionWindow::new(at(1, 0), at(10, 0));
        assert!(!window.is_live(PromotionStatus::Scheduled, at(5, 0)));
        assert!(!window.is_live(PromotionStatus::Expired, at(5, 0)));
    }

    #[test]
    fn test_inverted_window_is_never_live() {
        let window = PromotionWindow::new(at(10, 0), at(1, 0));
        assert!(!window.is_well_formed());
        for day in 1..=10 {
            assert!(!window.is_live(PromotionStatus::Active, at(day, 0)));
        }
    }

    #[test]
    fn test_time_left_floors_days_and_hours() {
        let window = PromotionWindow::new(at(1, 0), at(4, 6));
        let now = at(1, 0) + Duration::minutes(59);
        assert_eq!(
            window.time_left(now),
            TimeLeft::Remaining { days: 3, hours: 5 }
        );
        assert_eq!(window.time_left(now).to_string(), "3d 5h");
    }

    #[test]
    fn test_time_left_expired_at_end() {
        let window = PromotionWindow::new(at(1, 0), at(4, 0));
        assert_eq!(window.time_left(at(4, 0)), TimeLeft::Expired);
        assert_eq!(window.time_left(at(9, 0)).to_string(), "Expired");
    }

    #[test]
    fn test_time_left_under_a_second_is_not_expired() {
        let window = PromotionWindow::new(at(1, 0), at(4, 0));
        let now = at(4, 0) - Duration::milliseconds(500);
        assert!(window.is_live(PromotionStatus::Active, now));
        assert_eq!(window.time_left(now).to_string(), "0d 0h");
        assert_eq!(
            window.time_left(at(4, 0) + Duration::milliseconds(1)),
            TimeLeft::Expired
        );
    }

    #[test]
    fn test_time_left_serializes_as_label() {
        let left = TimeLeft::Remaining { days: 0, hours: 7 };
        assert_eq!(serde_json::to_string(&left).unwrap(), "\"0d 7h\"");
    }
}
