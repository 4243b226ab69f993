use chrono::{DateTime, TimeZone, Timelike};
use serde::Serialize;
use std::fmt;

use crate::clock;
use crate::gate::session::SessionContext;

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_HOUR: i64 = 3_600 * MS_PER_SECOND;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Daily interval `[start_hour, end_hour)` in normalized local time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl AccessWindow {
    /// 3 PM to 5 PM
    pub const STANDARD: Self = Self {
        start_hour: 15,
        end_hour: 17,
    };

    /// Whether a normalized local hour falls inside the window
    pub fn contains_hour(&self, hour: u32) -> bool {
        hour >= self.start_hour && hour < self.end_hour
    }

    /// Access predicate: always true with the override set, otherwise the
    /// normalized hour of `now` must be inside the window
    pub fn is_open<Tz: TimeZone>(&self, now: &DateTime<Tz>, session: &SessionContext) -> bool {
        if session.override_enabled {
            return true;
        }
        self.contains_hour(clock::normalize(now).hour())
    }

    /// Time until the window next opens.
    ///
    /// Before `start_hour` the target is today's opening, from `start_hour`
    /// onward (inside the window or after it) it is tomorrow's. The result
    /// is only meaningful while the window is closed; callers go through
    /// [`AccessWindow::evaluate`], which never asks for a countdown while the
    /// predicate holds. The exact opening instant counts as "today", so the
    /// countdown is zero there rather than a full day.
    pub fn time_until_next_open<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Countdown {
        let local = clock::normalize(now);
        // Leap-second readings carry nanos >= 1e9
        let millis_into_second = i64::from(local.nanosecond() / 1_000_000).min(999);
        let now_ms = i64::from(local.num_seconds_from_midnight()) * MS_PER_SECOND + millis_into_second;

        let opening_ms = i64::from(self.start_hour) * MS_PER_HOUR;
        let target_ms = if now_ms <= opening_ms {
            opening_ms
        } else {
            opening_ms + MS_PER_DAY
        };

        Countdown::from_millis(target_ms - now_ms)
    }

    /// Evaluate the gate once, computing a countdown only when closed
    pub fn evaluate<Tz: TimeZone>(&self, now: &DateTime<Tz>, session: &SessionContext) -> Evaluation {
        if self.is_open(now, session) {
            Evaluation::Open
        } else {
            Evaluation::Waiting(self.time_until_next_open(now))
        }
    }
}

impl Default for AccessWindow {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl fmt::Display for AccessWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00-{:02}:00 (UTC+05:30)", self.start_hour, self.end_hour)
    }
}

/// Remaining time split into whole hours, minutes and seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Countdown {
    /// Split a millisecond span with floor division at every step.
    /// Negative spans clamp to zero.
    pub fn from_millis(millis: i64) -> Self {
        let total_seconds = millis.max(0) / MS_PER_SECOND;
        Self {
            hours: (total_seconds / 3_600) as u32,
            minutes: ((total_seconds % 3_600) / 60) as u32,
            seconds: (total_seconds % 60) as u32,
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Result of a single gate evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "countdown", rename_all = "lowercase")]
pub enum Evaluation {
    Open,
    Waiting(Countdown),
}

impl Evaluation {
    pub fn is_open(&self) -> bool {
        matches!(self, Evaluation::Open)
    }
}

/// Access predicate for the standard window
pub fn is_in_access_window<Tz: TimeZone>(now: &DateTime<Tz>, session: &SessionContext) -> bool {
    AccessWindow::STANDARD.is_open(now, session)
}

/// Countdown to the next opening of the standard window.
/// Only called when [`is_in_access_window`] is false.
pub fn time_until_next_window<Tz: TimeZone>(now: &DateTime<Tz>) -> Countdown {
    AccessWindow::STANDARD.time_until_next_open(now)
}

/// Evaluate the standard window
pub fn evaluate<Tz: TimeZone>(now: &DateTime<Tz>, session: &SessionContext) -> Evaluation {
    if is_in_access_window(now, session) {
        Evaluation::Open
    } else {
        Evaluation::Waiting(time_until_next_window(now))
    }
}
