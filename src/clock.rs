use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// Offset of the access window's timezone from UTC, in seconds (+05:30)
pub const NORMALIZED_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// The fixed +05:30 offset every clock reading is normalized to
pub fn normalized_offset() -> FixedOffset {
    FixedOffset::east_opt(NORMALIZED_OFFSET_SECS).expect("+05:30 is inside FixedOffset's range")
}

/// Express any instant in normalized local time, whatever zone it came from
pub fn normalize<Tz: TimeZone>(instant: &DateTime<Tz>) -> DateTime<FixedOffset> {
    instant.with_timezone(&normalized_offset())
}

/// Source of the current time.
///
/// The controller and the poller read time only through this trait so tests
/// can pin the clock to a known instant.
pub trait Clock: Send + Sync {
    /// Current instant in UTC
    fn now_utc(&self) -> DateTime<Utc>;

    /// Current instant in normalized local time
    fn now(&self) -> DateTime<FixedOffset> {
        normalize(&self.now_utc())
    }
}

/// Clock backed by the host system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub fn new<Tz: TimeZone>(instant: DateTime<Tz>) -> Self {
        Self {
            instant: instant.with_timezone(&Utc),
        }
    }

    /// Build a clock at the given normalized wall-clock time
    #[cfg(test)]
    pub fn at_local(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        normalized_offset()
            .with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(Self::new)
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.instant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn normalized_offset_is_five_thirty_east() {
        assert_eq!(normalized_offset().local_minus_utc(), 19_800);
    }

    #[test]
    fn normalize_ignores_source_timezone() {
        let utc = Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap();
        let new_york = utc.with_timezone(&FixedOffset::west_opt(4 * 3600).unwrap());

        let a = normalize(&utc);
        let b = normalize(&new_york);

        assert_eq!(a, b);
        assert_eq!(a.hour(), 15);
        assert_eq!(a.minute(), 0);
    }

    #[test]
    fn fixed_clock_returns_local_wall_time() {
        let clock = FixedClock::at_local(2026, 10, 19, 14, 59, 59).unwrap();
        let now = clock.now();
        assert_eq!((now.hour(), now.minute(), now.second()), (14, 59, 59));
        assert_eq!(clock.now_utc().hour(), 9);
    }

    #[test]
    fn system_clock_reads_normalized_offset() {
        let now = SystemClock.now();
        assert_eq!(now.offset().local_minus_utc(), NORMALIZED_OFFSET_SECS);
    }
}
