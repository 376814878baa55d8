use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike};
use tracing::warn;

/// Day-of-week convention used by the availability tables: Monday=1 through
/// Saturday=6, Sunday=7.
pub fn booking_day_of_week(date: NaiveDate) -> i16 {
    date.weekday().number_from_monday() as i16
}

/// Normalize a client-supplied booking date to a date-only value. Accepts a
/// plain `YYYY-MM-DD` or a full RFC 3339 timestamp (the date part is kept).
pub fn parse_booking_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.date_naive());
    }

    None
}

/// Input to [`format_display_time`]: either the raw text form a TIME column
/// round-trips as, or an already-parsed wall-clock value.
pub enum TimeValue<'a> {
    Text(&'a str),
    Clock(NaiveTime),
}

impl<'a> From<&'a str> for TimeValue<'a> {
    fn from(value: &'a str) -> Self {
        TimeValue::Text(value)
    }
}

impl From<NaiveTime> for TimeValue<'_> {
    fn from(value: NaiveTime) -> Self {
        TimeValue::Clock(value)
    }
}

/// Render a wall-clock time for display, e.g. "9:00 AM". Unparsable input is
/// logged and yields `None`; callers serialize that as a null field.
pub fn format_display_time<'a>(value: impl Into<TimeValue<'a>>) -> Option<String> {
    let time = match value.into() {
        TimeValue::Clock(time) => time,
        TimeValue::Text(raw) => {
            let trimmed = raw.trim();
            match NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
            {
                Ok(time) => time,
                Err(_) => {
                    warn!("Invalid time format: {}", raw);
                    return None;
                }
            }
        }
    };

    let hours = time.hour();
    let period = if hours >= 12 { "PM" } else { "AM" };
    let display_hour = match hours % 12 {
        0 => 12,
        h => h,
    };

    Some(format!("{}:{:02} {}", display_hour, time.minute(), period))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monday_is_one_sunday_is_seven() {
        // 2024-01-01 was a Monday
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(booking_day_of_week(monday), 1);

        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(booking_day_of_week(sunday), 7);

        let saturday = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        assert_eq!(booking_day_of_week(saturday), 6);
    }

    #[test]
    fn parses_date_only_and_rfc3339() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();
        assert_eq!(parse_booking_date("2024-03-12"), Some(expected));
        assert_eq!(parse_booking_date("2024-03-12T09:30:00Z"), Some(expected));
        assert_eq!(parse_booking_date("2024-03-12T23:00:00+02:00"), Some(expected));
    }

    #[test]
    fn rejects_garbage_dates() {
        assert_eq!(parse_booking_date("12/03/2024"), None);
        assert_eq!(parse_booking_date("next tuesday"), None);
        assert_eq!(parse_booking_date(""), None);
    }

    #[test]
    fn formats_morning_and_afternoon() {
        assert_eq!(format_display_time("09:00:00").as_deref(), Some("9:00 AM"));
        assert_eq!(format_display_time("14:30:00").as_deref(), Some("2:30 PM"));
        assert_eq!(format_display_time("09:05").as_deref(), Some("9:05 AM"));
    }

    #[test]
    fn midnight_and_noon_are_twelve() {
        assert_eq!(format_display_time("00:00:00").as_deref(), Some("12:00 AM"));
        assert_eq!(format_display_time("12:00:00").as_deref(), Some("12:00 PM"));
    }

    #[test]
    fn structured_time_formats_identically() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(format_display_time(nine).as_deref(), Some("9:00 AM"));
    }

    #[test]
    fn unparsable_time_yields_none() {
        assert_eq!(format_display_time("not a time"), None);
        assert_eq!(format_display_time("25:61:00"), None);
    }
}
