use std::sync::LazyLock;

use chrono::{FixedOffset, Offset, Utc};
use regex::Regex;

use crate::error::Error;

// `+05:30`, `-0800`, `+5`, `GMT+5`, `UTC-03:00`.
static FIXED_OFFSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:utc|gmt)?\s*([+-])([0-9]{1,2})(?::?([0-9]{2}))?$")
        .expect("fixed offset pattern is valid")
});

/// Resolves an IANA timezone name, or a fixed offset string, to the UTC
/// offset in effect at `at`.
pub(crate) fn offset_by_name(
    name: &str,
    at: &chrono::DateTime<Utc>,
) -> Result<FixedOffset, Error> {
    let name = name.trim();
    if let Some(offset) = parse_fixed_offset(name) {
        trace!("{name:?} is a fixed offset of {offset}");
        return Ok(offset);
    }
    let zone: chrono_tz::Tz = name.parse().map_err(|_| {
        debug!("no timezone named {name:?}");
        Error::unknown_timezone(name)
    })?;
    let offset = at.with_timezone(&zone).offset().fix();
    trace!("resolved {name} to {offset} at {at}");
    Ok(offset)
}

/// Parses a fixed offset such as `+05:30` or `GMT-3`. `UTC`, `GMT` and `Z`
/// on their own mean a zero offset.
pub(crate) fn parse_fixed_offset(text: &str) -> Option<FixedOffset> {
    if ["utc", "gmt", "z"]
        .iter()
        .any(|zero| text.eq_ignore_ascii_case(zero))
    {
        return FixedOffset::east_opt(0);
    }
    let caps = FIXED_OFFSET.captures(text)?;
    let hours: i32 = caps[2].parse().ok()?;
    let minutes: i32 = match caps.get(3) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    let sign = if &caps[1] == "-" { -1 } else { 1 };
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

pub(crate) fn offset_hours(offset: FixedOffset) -> f64 {
    f64::from(offset.local_minus_utc()) / 3600.0
}

/// Renders signed hours as `+HHMM` (or `+HH:MM` with a `:` separator),
/// rounded to the minute. Zero renders with a `+`.
pub(crate) fn format_offset(hours: f64, separator: &str) -> String {
    let sign = if hours >= 0.0 { '+' } else { '-' };
    let minutes = (hours.abs() * 60.0).round() as i64;
    format!("{sign}{:02}{separator}{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(year: i32, month: u32, day: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    fn hours(name: &str, when: chrono::DateTime<Utc>) -> f64 {
        offset_hours(offset_by_name(name, &when).unwrap())
    }

    #[test]
    fn iana_names() {
        assert_eq!(hours("Asia/Kolkata", at(2024, 1, 15)), 5.5);
        assert_eq!(hours("Asia/Kathmandu", at(2024, 1, 15)), 5.75);
        assert_eq!(hours("Europe/London", at(2024, 1, 15)), 0.0);
        assert_eq!(hours("Etc/UTC", at(2024, 1, 15)), 0.0);
    }

    #[test]
    fn iana_names_follow_daylight_saving() {
        assert_eq!(hours("America/New_York", at(2024, 1, 15)), -5.0);
        assert_eq!(hours("America/New_York", at(2024, 7, 15)), -4.0);
        assert_eq!(hours("Europe/Berlin", at(2024, 1, 15)), 1.0);
        assert_eq!(hours("Europe/Berlin", at(2024, 7, 15)), 2.0);
    }

    #[test]
    fn fixed_offsets() {
        let when = at(2024, 1, 15);
        assert_eq!(hours("UTC", when), 0.0);
        assert_eq!(hours("gmt", when), 0.0);
        assert_eq!(hours("Z", when), 0.0);
        assert_eq!(hours("+05:30", when), 5.5);
        assert_eq!(hours("-0800", when), -8.0);
        assert_eq!(hours("+5", when), 5.0);
        assert_eq!(hours("GMT-3", when), -3.0);
        assert_eq!(hours("UTC+09:45", when), 9.75);
        assert_eq!(hours("  +01:00 ", when), 1.0);
    }

    #[test]
    fn unknown_names() {
        let when = at(2024, 1, 15);
        assert_eq!(
            offset_by_name("Mars/Olympus_Mons", &when),
            Err(Error::unknown_timezone("Mars/Olympus_Mons"))
        );
        assert!(offset_by_name("", &when).is_err());
        assert!(offset_by_name("+24:00", &when).is_err());
        assert!(offset_by_name("+05:60", &when).is_err());
        assert!(offset_by_name("+\u{0660}5:30", &when).is_err());
    }

    #[test]
    fn format() {
        assert_eq!(format_offset(0.0, ""), "+0000");
        assert_eq!(format_offset(5.5, ""), "+0530");
        assert_eq!(format_offset(-8.0, ":"), "-08:00");
        assert_eq!(format_offset(5.75, ":"), "+05:45");
        assert_eq!(format_offset(-0.5, ""), "-0030");
    }
}
