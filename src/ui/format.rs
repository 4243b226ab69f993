use chrono::{DateTime, FixedOffset, Timelike};

/// Wall-clock time on a 12-hour dial, e.g. `("03:05:09", "PM")`
pub fn time_12h(at: &DateTime<FixedOffset>) -> (String, &'static str) {
    let (is_pm, hour) = at.hour12();
    let period = if is_pm { "PM" } else { "AM" };
    let time = format!("{:02}:{:02}:{:02}", hour, at.minute(), at.second());
    (time, period)
}

/// Status bar time, e.g. `03:05:09 PM`
pub fn status_time(at: &DateTime<FixedOffset>) -> String {
    let (time, period) = time_12h(at);
    format!("{} {}", time, period)
}

/// Long date, e.g. `Monday, October 19, 2026`
pub fn long_date(at: &DateTime<FixedOffset>) -> String {
    at.format("%A, %B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::normalized_offset;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32, sec: u32) -> DateTime<FixedOffset> {
        normalized_offset()
            .with_ymd_and_hms(2026, 10, 5, hour, min, sec)
            .unwrap()
    }

    #[test]
    fn midnight_is_twelve_am() {
        assert_eq!(time_12h(&at(0, 0, 0)), ("12:00:00".to_string(), "AM"));
    }

    #[test]
    fn noon_is_twelve_pm() {
        assert_eq!(time_12h(&at(12, 30, 0)), ("12:30:00".to_string(), "PM"));
    }

    #[test]
    fn afternoon_hours_are_zero_padded() {
        assert_eq!(status_time(&at(15, 5, 9)), "03:05:09 PM");
        assert_eq!(status_time(&at(9, 59, 1)), "09:59:01 AM");
    }

    #[test]
    fn long_date_has_no_day_padding() {
        assert_eq!(long_date(&at(10, 0, 0)), "Monday, October 5, 2026");
    }
}
