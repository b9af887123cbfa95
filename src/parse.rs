// Date string interpretation backing `Platform::parse`.
//
// The accepted shapes follow what a host `Date.parse` understands:
//
// * ISO 8601: `2024-01-15`, `2024-01`, `2024`, `+002024-01-15`, with an
//   optional `T10:30`, `T10:30:15` or `T10:30:15.250` time and an optional
//   `Z`, `+05:30` or `+0530` zone. Date-only forms are UTC, date-times
//   without a zone are local.
// * RFC 2822: `Mon, 15 Jan 2024 10:30:00 +0000`.
// * The display format: `Mon Jan 15 2024 10:30:00 GMT+0100 (CET)`, where
//   the weekday, time, zone and trailing name are all optional.

use std::sync::LazyLock;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::calendar::{self, Civil};
use crate::tz;

static ISO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)^
        (?P<year>[+-][0-9]{6}|[0-9]{4})
        (?:-(?P<month>[0-9]{2})(?:-(?P<day>[0-9]{2}))?)?
        (?:[Tt\x20]
            (?P<hour>[0-9]{2}):(?P<minute>[0-9]{2})
            (?::(?P<second>[0-9]{2})(?:[.,](?P<fraction>[0-9]{1,9}))?)?
            (?P<zone>[Zz]|[+-][0-9]{2}(?::?[0-9]{2})?)?
        )?$",
    )
    .expect("ISO 8601 pattern is valid")
});

static DISPLAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)^
        (?:[A-Za-z]{3},?\s+)?
        (?P<month>[A-Za-z]{3})\s+(?P<day>[0-9]{1,2}),?\s+(?P<year>-?[0-9]{1,6})
        (?:\s+(?P<hour>[0-9]{1,2}):(?P<minute>[0-9]{2})(?::(?P<second>[0-9]{2}))?)?
        (?:\s+(?P<utc>GMT|UTC|Z)(?P<zone>[+-][0-9]{2}:?[0-9]{2})?)?
        (?:\s+\([^)]*\))?$",
    )
    .expect("display pattern is valid")
});

const MONTH_NAMES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Interprets `text` as an instant in epoch milliseconds.
///
/// `local_offset` supplies the host offset for civil times that carry no
/// zone of their own.
pub(crate) fn parse_epoch_ms<F>(text: &str, local_offset: F) -> Option<i64>
where
    F: Fn(&NaiveDateTime) -> FixedOffset,
{
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(ms) = parse_iso(text, &local_offset) {
        return Some(ms);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc2822(text) {
        trace!("{text:?} parsed as RFC 2822");
        return calendar::time_clip(dt.timestamp_millis());
    }
    let ms = parse_display(text, &local_offset);
    if ms.is_none() {
        debug!("{text:?} matched no known date format");
    }
    ms
}

fn parse_iso<F>(text: &str, local_offset: &F) -> Option<i64>
where
    F: Fn(&NaiveDateTime) -> FixedOffset,
{
    let caps = ISO.captures(text)?;
    let year: i64 = caps["year"].parse().ok()?;
    // -000000 is not a valid extended year.
    if &caps["year"] == "-000000" {
        return None;
    }
    let month = number(caps.name("month"), 1)?;
    let day = number(caps.name("day"), 1)?;
    if !(1..=12).contains(&month) || !(1..=calendar::days_in_month(year, month)).contains(&day) {
        return None;
    }
    let civil = Civil {
        year,
        month,
        day,
        hour: number(caps.name("hour"), 0)?,
        minute: number(caps.name("minute"), 0)?,
        second: number(caps.name("second"), 0)?,
        millisecond: caps.name("fraction").map_or(0, |m| fraction_millis(m.as_str())),
    };
    if civil.hour > 23 || civil.minute > 59 || civil.second > 59 {
        return None;
    }
    let ms = civil.to_epoch_ms()?;
    if caps.name("hour").is_none() {
        return Some(ms);
    }
    let offset = match caps.name("zone") {
        Some(zone) => tz::parse_fixed_offset(zone.as_str())?,
        None => local_offset(&naive(&civil)?),
    };
    shift_to_utc(ms, offset)
}

fn parse_display<F>(text: &str, local_offset: &F) -> Option<i64>
where
    F: Fn(&NaiveDateTime) -> FixedOffset,
{
    let caps = DISPLAY.captures(text)?;
    let month_name = caps["month"].to_ascii_lowercase();
    let month = MONTH_NAMES.iter().position(|&name| name == month_name)?;
    let civil = Civil {
        year: caps["year"].parse().ok()?,
        month: month as i64 + 1,
        day: caps["day"].parse().ok()?,
        hour: number(caps.name("hour"), 0)?,
        minute: number(caps.name("minute"), 0)?,
        second: number(caps.name("second"), 0)?,
        millisecond: 0,
    };
    if !(1..=31).contains(&civil.day) || civil.hour > 23 || civil.minute > 59 || civil.second > 59
    {
        return None;
    }
    let ms = civil.to_epoch_ms()?;
    let offset = match (caps.name("utc"), caps.name("zone")) {
        (Some(_), Some(zone)) => tz::parse_fixed_offset(zone.as_str())?,
        (Some(_), None) => FixedOffset::east_opt(0)?,
        (None, _) => local_offset(&naive(&civil)?),
    };
    trace!("{text:?} parsed as display format");
    shift_to_utc(ms, offset)
}

/// The value of an optional group, `default` when the group is absent.
fn number(m: Option<regex::Match<'_>>, default: i64) -> Option<i64> {
    match m {
        Some(m) => m.as_str().parse().ok(),
        None => Some(default),
    }
}

/// Milliseconds of a fractional second, truncating past three digits.
fn fraction_millis(digits: &str) -> i64 {
    let mut millis = 0;
    for (i, b) in digits.bytes().take(3).enumerate() {
        millis += i64::from(b - b'0') * [100, 10, 1][i];
    }
    millis
}

fn naive(civil: &Civil) -> Option<NaiveDateTime> {
    let ms = civil.to_epoch_ms()?;
    let Civil {
        year,
        month,
        day,
        hour,
        minute,
        second,
        millisecond,
    } = Civil::from_epoch_ms(ms);
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month as u32, day as u32)?.and_hms_milli_opt(
        hour as u32,
        minute as u32,
        second as u32,
        millisecond as u32,
    )
}

fn shift_to_utc(ms: i64, offset: FixedOffset) -> Option<i64> {
    let shifted = ms.checked_sub(i64::from(offset.local_minus_utc()) * calendar::MS_PER_SECOND)?;
    calendar::time_clip(shifted)
}
