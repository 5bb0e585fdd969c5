//! Minimal UTC date handling for page metadata and feeds.
//!
//! Front matter dates arrive either as TOML datetimes or as plain strings.
//! Both collapse into [`DateTimeUtc`], which orders chronologically and
//! formats itself for RSS (RFC 2822) and Atom (RFC 3339).

use anyhow::{Result, bail};
use serde::{Serialize, Serializer};
use std::{
    fmt,
    time::{SystemTime, UNIX_EPOCH},
};
use toml::value::Offset;

const MINUTES_PER_DAY: i32 = 24 * 60;
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// UTC datetime without timezone complexity.
///
/// Field order matters: the derived `Ord` compares year first, then month,
/// and so on down to the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTimeUtc {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeUtc {
    /// Earliest representable date. Undated pages sort as this value.
    pub const MIN: Self = Self::new(0, 1, 1, 0, 0, 0);

    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Parse `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DDTHH:MM:SSZ`.
    ///
    /// A space may stand in for the `T` separator.
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.trim().as_bytes();

        if bytes.len() < 10 {
            return None;
        }

        let year = parse_u16(&bytes[0..4])?;
        if bytes[4] != b'-' {
            return None;
        }
        let month = parse_u8(&bytes[5..7])?;
        if bytes[7] != b'-' {
            return None;
        }
        let day = parse_u8(&bytes[8..10])?;

        let (hour, minute, second) = match bytes.len() {
            10 => (0, 0, 0),
            19 | 20 => {
                if !matches!(bytes[10], b'T' | b' ') || bytes[13] != b':' || bytes[16] != b':' {
                    return None;
                }
                if bytes.len() == 20 && bytes[19] != b'Z' {
                    return None;
                }
                (
                    parse_u8(&bytes[11..13])?,
                    parse_u8(&bytes[14..16])?,
                    parse_u8(&bytes[17..19])?,
                )
            }
            _ => return None,
        };

        let dt = Self::new(year, month, day, hour, minute, second);
        dt.validate().ok()?;
        Some(dt)
    }

    /// Convert a TOML datetime to UTC.
    ///
    /// A numeric offset is applied, carrying into the date when the local
    /// time crosses midnight. Local datetimes are read as UTC and a bare
    /// time is rejected.
    pub fn from_toml(value: &toml::value::Datetime) -> Option<Self> {
        let date = value.date?;
        let (hour, minute, second) = value
            .time
            .map(|t| (t.hour, t.minute, t.second))
            .unwrap_or((0, 0, 0));

        let dt = Self::new(date.year, date.month, date.day, hour, minute, second);
        dt.validate().ok()?;
        match value.offset {
            Some(Offset::Custom { minutes }) => dt.shift_minutes(-i32::from(minutes)),
            _ => Some(dt),
        }
    }

    /// Current wall clock time.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        Self::from_unix(secs)
    }

    /// Seconds since the Unix epoch, converted with the proleptic Gregorian
    /// calendar.
    pub fn from_unix(secs: u64) -> Self {
        let days = (secs / SECONDS_PER_DAY) as i64;
        let rem = secs % SECONDS_PER_DAY;

        // days-from-civil inverted, eras of 400 years starting 0000-03-01
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z - era * 146_097;
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = doy - (153 * mp + 2) / 5 + 1;
        let month = if mp < 10 { mp + 3 } else { mp - 9 };
        let year = yoe + era * 400 + i64::from(month <= 2);

        Self::new(
            u16::try_from(year).unwrap_or(u16::MAX),
            month as u8,
            day as u8,
            (rem / 3600) as u8,
            (rem % 3600 / 60) as u8,
            (rem % 60) as u8,
        )
    }

    /// Move by `delta` minutes. Offsets stay within a day, so at most one
    /// date step is taken.
    fn shift_minutes(self, delta: i32) -> Option<Self> {
        let mut total = i32::from(self.hour) * 60 + i32::from(self.minute) + delta;
        let mut dt = self;
        if total < 0 {
            total += MINUTES_PER_DAY;
            dt = dt.prev_day()?;
        } else if total >= MINUTES_PER_DAY {
            total -= MINUTES_PER_DAY;
            dt = dt.next_day()?;
        }
        dt.hour = (total / 60) as u8;
        dt.minute = (total % 60) as u8;
        Some(dt)
    }

    fn next_day(self) -> Option<Self> {
        let mut dt = self;
        if dt.day < Self::days_in_month(dt.year, dt.month) {
            dt.day += 1;
        } else if dt.month < 12 {
            dt.month += 1;
            dt.day = 1;
        } else {
            dt.year = dt.year.checked_add(1)?;
            dt.month = 1;
            dt.day = 1;
        }
        Some(dt)
    }

    fn prev_day(self) -> Option<Self> {
        let mut dt = self;
        if dt.day > 1 {
            dt.day -= 1;
        } else if dt.month > 1 {
            dt.month -= 1;
            dt.day = Self::days_in_month(dt.year, dt.month);
        } else {
            dt.year = dt.year.checked_sub(1)?;
            dt.month = 12;
            dt.day = 31;
        }
        Some(dt)
    }

    pub fn validate(&self) -> Result<()> {
        let Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        } = *self;

        if !(1..=12).contains(&month) {
            bail!("month is invalid: {month}");
        }

        let max_days = Self::days_in_month(year, month);
        if day == 0 || day > max_days {
            bail!("day is invalid: {day}");
        }
        if hour > 23 {
            bail!("hour is invalid: {hour}");
        }
        if minute > 59 {
            bail!("minute is invalid: {minute}");
        }
        if second > 59 {
            bail!("second is invalid: {second}");
        }

        Ok(())
    }

    #[inline]
    fn is_leap_year(year: u16) -> bool {
        year.is_multiple_of(4) && (!year.is_multiple_of(100) || year.is_multiple_of(400))
    }

    #[inline]
    fn days_in_month(year: u16, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if Self::is_leap_year(year) => 29,
            2 => 28,
            _ => 0,
        }
    }

    pub fn to_rfc2822(self) -> String {
        const WEEKDAYS: [&str; 7] = ["Sat", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri"];
        const MONTHS: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];

        // Zeller's congruence for weekday calculation
        let weekday = self.weekday_index();

        format!(
            "{}, {:02} {} {:04} {:02}:{:02}:{:02} GMT",
            WEEKDAYS[weekday],
            self.day,
            MONTHS[(self.month - 1) as usize],
            self.year,
            self.hour,
            self.minute,
            self.second
        )
    }

    /// `YYYY-MM-DDTHH:MM:SSZ`, as required by Atom.
    pub fn to_rfc3339(self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }

    #[inline]
    fn weekday_index(&self) -> usize {
        let (y, m) = if self.month < 3 {
            (self.year as i32 - 1, self.month as i32 + 12)
        } else {
            (self.year as i32, self.month as i32)
        };
        let d = self.day as i32;
        ((d + (13 * (m + 1)) / 5 + y + y / 4 - y / 100 + y / 400) % 7) as usize
    }
}

/// Date-only values print as `YYYY-MM-DD`, everything else as RFC 3339.
impl fmt::Display for DateTimeUtc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if (self.hour, self.minute, self.second) == (0, 0, 0) {
            write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
        } else {
            f.write_str(&self.to_rfc3339())
        }
    }
}

impl Serialize for DateTimeUtc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse 2-digit ASCII number
#[inline]
fn parse_u8(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = bytes[0].wrapping_sub(b'0');
    let d2 = bytes[1].wrapping_sub(b'0');
    if d1 > 9 || d2 > 9 {
        return None;
    }
    Some(d1 * 10 + d2)
}

/// Parse 4-digit ASCII number
#[inline]
fn parse_u16(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 4 {
        return None;
    }
    let mut result = 0u16;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        result = result * 10 + d as u16;
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_only() {
        let dt = DateTimeUtc::parse("2024-01-01").unwrap();
        assert_eq!(dt, DateTimeUtc::from_ymd(2024, 1, 1));
    }

    #[test]
    fn test_parse_datetime_forms() {
        let expected = DateTimeUtc::new(2024, 6, 15, 14, 30, 45);
        assert_eq!(DateTimeUtc::parse("2024-06-15T14:30:45Z"), Some(expected));
        assert_eq!(DateTimeUtc::parse("2024-06-15T14:30:45"), Some(expected));
        assert_eq!(DateTimeUtc::parse("2024-06-15 14:30:45"), Some(expected));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(DateTimeUtc::parse("yesterday").is_none());
        assert!(DateTimeUtc::parse("2024/01/01").is_none());
        assert!(DateTimeUtc::parse("2024-13-01").is_none());
        assert!(DateTimeUtc::parse("2024-06-15T14:30:45+08:00").is_none());
    }

    #[test]
    fn test_from_toml_datetime() {
        let value: toml::Table = toml::from_str("a = 2024-02-29\nb = 1979-05-27T07:32:00Z").unwrap();

        let a = value["a"].as_datetime().unwrap();
        assert_eq!(
            DateTimeUtc::from_toml(a),
            Some(DateTimeUtc::from_ymd(2024, 2, 29))
        );

        let b = value["b"].as_datetime().unwrap();
        assert_eq!(
            DateTimeUtc::from_toml(b),
            Some(DateTimeUtc::new(1979, 5, 27, 7, 32, 0))
        );
    }

    #[test]
    fn test_from_toml_applies_offset() {
        let value: toml::Table = toml::from_str(
            "west = 2024-01-01T23:00:00-05:00\n\
             east = 2024-03-01T01:30:00+02:00\n\
             new_year = 2023-12-31T22:15:00-01:45\n\
             local = 2024-01-01T23:00:00",
        )
        .unwrap();
        let utc = |key: &str| DateTimeUtc::from_toml(value[key].as_datetime().unwrap());

        assert_eq!(utc("west"), Some(DateTimeUtc::new(2024, 1, 2, 4, 0, 0)));
        assert_eq!(utc("east"), Some(DateTimeUtc::new(2024, 2, 29, 23, 30, 0)));
        assert_eq!(utc("new_year"), Some(DateTimeUtc::new(2024, 1, 1, 0, 0, 0)));
        assert_eq!(utc("local"), Some(DateTimeUtc::new(2024, 1, 1, 23, 0, 0)));
    }

    #[test]
    fn test_from_unix() {
        assert_eq!(DateTimeUtc::from_unix(0), DateTimeUtc::from_ymd(1970, 1, 1));
        // 2000-02-29T12:34:56Z
        assert_eq!(
            DateTimeUtc::from_unix(951_827_696),
            DateTimeUtc::new(2000, 2, 29, 12, 34, 56)
        );
        assert_eq!(
            DateTimeUtc::from_unix(1_735_689_599),
            DateTimeUtc::new(2024, 12, 31, 23, 59, 59)
        );
    }

    #[test]
    fn test_from_toml_time_only_is_none() {
        let value: toml::Table = toml::from_str("t = 07:32:00").unwrap();
        assert!(DateTimeUtc::from_toml(value["t"].as_datetime().unwrap()).is_none());
    }

    #[test]
    fn test_ordering_is_chronological() {
        let early = DateTimeUtc::from_ymd(2023, 12, 31);
        let late = DateTimeUtc::new(2024, 1, 1, 0, 0, 1);
        assert!(DateTimeUtc::MIN < early);
        assert!(early < late);
    }

    #[test]
    fn test_validate_leap_year() {
        assert!(DateTimeUtc::new(2024, 2, 29, 12, 0, 0).validate().is_ok());
        assert!(DateTimeUtc::new(2000, 2, 29, 12, 0, 0).validate().is_ok());
        assert!(DateTimeUtc::new(2023, 2, 29, 12, 0, 0).validate().is_err());
        assert!(DateTimeUtc::new(1900, 2, 29, 12, 0, 0).validate().is_err());
    }

    #[test]
    fn test_validate_invalid_time() {
        assert!(DateTimeUtc::new(2024, 6, 15, 24, 0, 0).validate().is_err());
        assert!(DateTimeUtc::new(2024, 6, 15, 12, 60, 0).validate().is_err());
        assert!(DateTimeUtc::new(2024, 6, 15, 12, 30, 60).validate().is_err());
    }

    #[test]
    fn test_to_rfc2822() {
        // 2024-01-15 was a Monday
        let dt = DateTimeUtc::new(2024, 1, 15, 10, 30, 45);
        assert_eq!(dt.to_rfc2822(), "Mon, 15 Jan 2024 10:30:45 GMT");
    }

    #[test]
    fn test_to_rfc3339() {
        let dt = DateTimeUtc::new(2024, 1, 5, 9, 3, 0);
        assert_eq!(dt.to_rfc3339(), "2024-01-05T09:03:00Z");
    }

    #[test]
    fn test_display() {
        assert_eq!(DateTimeUtc::from_ymd(2024, 1, 1).to_string(), "2024-01-01");
        assert_eq!(
            DateTimeUtc::new(2024, 1, 1, 8, 0, 0).to_string(),
            "2024-01-01T08:00:00Z"
        );
    }
}
