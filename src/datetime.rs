use std::{cmp::Ordering, fmt, str::FromStr};

use chrono::{Datelike, Offset, TimeZone, Timelike, Utc};

use crate::{
    calendar::Civil,
    duration::{Duration, DurationData},
    error::Error,
    platform::{Platform, SystemPlatform},
    tz,
};

/// A civil timestamp tagged with the timezone offset it is displayed in.
///
/// A `DateTime` is a set of calendar and clock fields plus an offset in
/// (possibly fractional) hours. It is a reading of a clock, not solely an
/// instant: the same instant displayed at two offsets has two different sets
/// of fields. [`DateTime::convert_timezone`] moves between those readings.
///
/// Values are immutable. Every operation returns a new value.
///
/// # Field interpretation
///
/// The "UTC" conversions ([`DateTime::to_utc_date`],
/// [`DateTime::to_utc_unix_time`], [`DateTime::to_utc_iso_string`]) read the
/// stored fields as if they were UTC and ignore the offset tag. The "local"
/// conversions first move the fields to offset zero. Comparisons use the UTC
/// reading.
///
/// Fields are stored as given. Out-of-range values such as month 14 or day 0
/// are carried into neighboring units whenever an instant is built from them.
///
/// # Example
///
/// ```
/// use civiltime::{DateTime, Duration, DurationData};
///
/// let dt = DateTime::utc(2024, DateTime::JANUARY, 31, 0, 0, 0, 0);
/// let next = dt.add(Duration::new(DurationData { days: 1, ..Default::default() }));
/// assert_eq!((next.month(), next.day()), (2, 1));
/// assert_eq!(next.to_utc_iso_string(), "2024-02-01T00:00:00.000+0000");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DateTime {
    year: i32,
    month: i32,
    day: i32,
    hour: i32,
    minute: i32,
    seconds: i32,
    milliseconds: i32,
    timezone_offset: f64,
}

/// A partial set of [`DateTime`] fields.
///
/// Used to construct a value with [`DateTime::new`], where missing fields
/// come from the Unix epoch, and to override fields with
/// [`DateTime::copy_with`], where missing fields are kept.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DateTimeData {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub day: Option<i32>,
    pub hour: Option<i32>,
    pub minute: Option<i32>,
    pub seconds: Option<i32>,
    pub milliseconds: Option<i32>,
    pub timezone_offset: Option<f64>,
}

/// How the trailing offset of an ISO 8601 string is rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IsoOffsetStyle {
    /// The offset the value is tagged with, e.g. `+0530`.
    #[default]
    Actual,
    /// The sign of the offset followed by a constant `0130`.
    ///
    /// Earlier releases rendered every offset this way. Kept for callers
    /// that compare against strings produced by them.
    Legacy,
}

const UNIX_EPOCH: DateTime = DateTime {
    year: 1970,
    month: 1,
    day: 1,
    hour: 0,
    minute: 0,
    seconds: 0,
    milliseconds: 0,
    timezone_offset: 0.0,
};

impl DateTime {
    pub const JANUARY: i32 = 1;
    pub const FEBRUARY: i32 = 2;
    pub const MARCH: i32 = 3;
    pub const APRIL: i32 = 4;
    pub const MAY: i32 = 5;
    pub const JUNE: i32 = 6;
    pub const JULY: i32 = 7;
    pub const AUGUST: i32 = 8;
    pub const SEPTEMBER: i32 = 9;
    pub const OCTOBER: i32 = 10;
    pub const NOVEMBER: i32 = 11;
    pub const DECEMBER: i32 = 12;

    /// Creates a value from `data`, filling missing fields from
    /// `1970-01-01T00:00:00.000` at offset zero.
    pub fn new(data: DateTimeData) -> DateTime {
        UNIX_EPOCH.copy_with(data)
    }

    // region: construction

    /// The current instant as displayed by the host.
    pub fn now() -> DateTime {
        DateTime::now_in(&SystemPlatform)
    }

    pub fn now_in<P: Platform + ?Sized>(platform: &P) -> DateTime {
        DateTime::from_date_in(platform, platform.now())
    }

    /// Interprets `text` with the host's date parser.
    pub fn parse(text: &str) -> Result<DateTime, Error> {
        DateTime::parse_in(&SystemPlatform, text)
    }

    pub fn parse_in<P: Platform + ?Sized>(platform: &P, text: &str) -> Result<DateTime, Error> {
        let instant = platform.parse(text)?;
        Ok(DateTime::from_date_in(platform, instant))
    }

    /// The fields of `instant` as displayed in the host's local timezone,
    /// tagged with the host's offset at that instant.
    pub fn from_date(instant: chrono::DateTime<Utc>) -> DateTime {
        DateTime::from_date_in(&SystemPlatform, instant)
    }

    pub fn from_date_in<P: Platform + ?Sized>(
        platform: &P,
        instant: chrono::DateTime<Utc>,
    ) -> DateTime {
        let offset = platform.local_offset(&instant);
        DateTime::from(instant.with_timezone(&offset))
    }

    /// The UTC fields of an epoch instant, tagged with `timezone_offset`.
    ///
    /// The fields are not moved to `timezone_offset`; only the tag changes.
    /// Follow up with [`DateTime::convert_timezone`] for a real conversion.
    pub fn from_unix_time(milliseconds_since_epoch: i64, timezone_offset: f64) -> DateTime {
        DateTime::from_civil(
            Civil::from_epoch_ms(milliseconds_since_epoch),
            timezone_offset,
        )
    }

    pub fn utc(
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        seconds: i32,
        milliseconds: i32,
    ) -> DateTime {
        DateTime::local(year, month, day, hour, minute, seconds, milliseconds, 0.0)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn local(
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        seconds: i32,
        milliseconds: i32,
        timezone_offset: f64,
    ) -> DateTime {
        DateTime {
            year,
            month,
            day,
            hour,
            minute,
            seconds,
            milliseconds,
            timezone_offset,
        }
    }

    /// The current UTC offset, in hours, of the timezone called `name`.
    pub fn get_timezone_offset_by_name(name: &str) -> Result<f64, Error> {
        DateTime::get_timezone_offset_by_name_in(&SystemPlatform, name)
    }

    pub fn get_timezone_offset_by_name_in<P: Platform + ?Sized>(
        platform: &P,
        name: &str,
    ) -> Result<f64, Error> {
        let offset = platform.timezone_offset(name, &platform.now())?;
        Ok(tz::offset_hours(offset))
    }

    fn from_civil(civil: Civil, timezone_offset: f64) -> DateTime {
        // Normalized components of an in-range instant always fit.
        DateTime {
            year: civil.year as i32,
            month: civil.month as i32,
            day: civil.day as i32,
            hour: civil.hour as i32,
            minute: civil.minute as i32,
            seconds: civil.second as i32,
            milliseconds: civil.millisecond as i32,
            timezone_offset,
        }
    }

    fn civil(&self) -> Civil {
        Civil {
            year: i64::from(self.year),
            month: i64::from(self.month),
            day: i64::from(self.day),
            hour: i64::from(self.hour),
            minute: i64::from(self.minute),
            second: i64::from(self.seconds),
            millisecond: i64::from(self.milliseconds),
        }
    }

    // endregion

    // region: conversion

    /// The instant whose UTC fields are this value's fields.
    pub fn to_utc_date(&self) -> Result<chrono::DateTime<Utc>, Error> {
        self.epoch_ms()
            .and_then(chrono::DateTime::from_timestamp_millis)
            .ok_or(Error::OutOfRange)
    }

    /// The instant this value denotes once its fields are moved to offset
    /// zero.
    pub fn to_local_date(&self) -> Result<chrono::DateTime<Utc>, Error> {
        self.checked_convert_timezone(0.0)?.to_utc_date()
    }

    /// Epoch milliseconds of [`DateTime::to_utc_date`].
    ///
    /// Saturates at `i64::MIN` or `i64::MAX` for fields outside of the
    /// supported range.
    pub fn to_utc_unix_time(&self) -> i64 {
        self.epoch_ms().unwrap_or_else(|| self.saturated_epoch_ms())
    }

    /// Epoch milliseconds of [`DateTime::to_local_date`], saturating like
    /// [`DateTime::to_utc_unix_time`].
    pub fn to_local_unix_time(&self) -> i64 {
        match self.checked_convert_timezone(0.0) {
            Ok(dt) => dt.to_utc_unix_time(),
            Err(_) => self.saturated_epoch_ms(),
        }
    }

    /// Renders the fields with the offset this value is tagged with.
    pub fn to_local_iso_string(&self) -> String {
        self.to_iso_string_with(IsoOffsetStyle::Actual)
    }

    /// Renders the fields tagged with offset zero.
    ///
    /// The fields are not converted. This is the ISO rendering of
    /// [`DateTime::to_utc_date`].
    pub fn to_utc_iso_string(&self) -> String {
        self.copy_with(DateTimeData {
            timezone_offset: Some(0.0),
            ..Default::default()
        })
        .to_iso_string_with(IsoOffsetStyle::Actual)
    }

    /// Renders `YYYY-MM-DDTHH:mm:ss.sss±HHMM` with the fields as stored.
    pub fn to_iso_string_with(&self, style: IsoOffsetStyle) -> String {
        let offset = match style {
            IsoOffsetStyle::Actual => tz::format_offset(self.timezone_offset, ""),
            IsoOffsetStyle::Legacy => {
                let sign = if self.timezone_offset >= 0.0 { '+' } else { '-' };
                format!("{sign}0130")
            }
        };
        // Years outside of 0..=9999 take the expanded `±YYYYYY` form.
        let year = if (0..=9999).contains(&self.year) {
            format!("{:04}", self.year)
        } else {
            let sign = if self.year < 0 { '-' } else { '+' };
            format!("{sign}{:06}", self.year.unsigned_abs())
        };
        format!(
            "{year}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}{offset}",
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.seconds,
            self.milliseconds,
        )
    }

    fn epoch_ms(&self) -> Option<i64> {
        self.civil().to_epoch_ms()
    }

    fn saturated_epoch_ms(&self) -> i64 {
        if self.civil().to_epoch_ms_wide() < 0 { i64::MIN } else { i64::MAX }
    }

    // endregion

    // region: accessors

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> i32 {
        self.month
    }

    pub fn day(&self) -> i32 {
        self.day
    }

    pub fn hour(&self) -> i32 {
        self.hour
    }

    pub fn minute(&self) -> i32 {
        self.minute
    }

    pub fn seconds(&self) -> i32 {
        self.seconds
    }

    pub fn milliseconds(&self) -> i32 {
        self.milliseconds
    }

    /// The signed offset, in hours, the fields are displayed in.
    pub fn timezone_offset(&self) -> f64 {
        self.timezone_offset
    }

    /// All fields, each one set.
    pub fn data(&self) -> DateTimeData {
        DateTimeData {
            year: Some(self.year),
            month: Some(self.month),
            day: Some(self.day),
            hour: Some(self.hour),
            minute: Some(self.minute),
            seconds: Some(self.seconds),
            milliseconds: Some(self.milliseconds),
            timezone_offset: Some(self.timezone_offset),
        }
    }

    // endregion

    // region: calculation

    /// Returns a copy with the fields present in `data` replaced.
    ///
    /// Nothing is recalculated, so overriding only `timezone_offset` re-tags
    /// the same fields.
    pub fn copy_with(&self, data: DateTimeData) -> DateTime {
        DateTime {
            year: data.year.unwrap_or(self.year),
            month: data.month.unwrap_or(self.month),
            day: data.day.unwrap_or(self.day),
            hour: data.hour.unwrap_or(self.hour),
            minute: data.minute.unwrap_or(self.minute),
            seconds: data.seconds.unwrap_or(self.seconds),
            milliseconds: data.milliseconds.unwrap_or(self.milliseconds),
            timezone_offset: data.timezone_offset.unwrap_or(self.timezone_offset),
        }
    }

    /// Moves the fields to the reading at `timezone_offset`.
    ///
    /// # Panics
    ///
    /// When the result leaves the supported range. See
    /// [`DateTime::checked_convert_timezone`].
    pub fn convert_timezone(&self, timezone_offset: f64) -> DateTime {
        self.checked_convert_timezone(timezone_offset)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    pub fn checked_convert_timezone(&self, timezone_offset: f64) -> Result<DateTime, Error> {
        let diff = timezone_offset - self.timezone_offset;
        let magnitude = diff.abs();
        let hours = magnitude.trunc();
        let shift = Duration::new(DurationData {
            hours: hours as i64,
            minutes: ((magnitude - hours) * 60.0).round() as i64,
            ..Default::default()
        });
        let shifted = if diff > 0.0 {
            self.checked_add(shift)?
        } else {
            self.checked_substract(shift)?
        };
        Ok(shifted.copy_with(DateTimeData {
            timezone_offset: Some(timezone_offset),
            ..Default::default()
        }))
    }

    /// Adds every unit of `duration` to the matching field, carrying
    /// overflow the way a calendar does.
    ///
    /// Units are applied independently: one month after January 31 is
    /// "February 31", which is March 2 (or 3 outside of leap years). The
    /// result keeps this value's offset tag.
    ///
    /// # Panics
    ///
    /// When `duration` is negative (use [`DateTime::substract`] instead) or
    /// the result leaves the supported range. See [`DateTime::checked_add`].
    pub fn add(&self, duration: Duration) -> DateTime {
        self.checked_add(duration)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Subtracts every unit of `duration`, mirroring [`DateTime::add`].
    ///
    /// # Panics
    ///
    /// When `duration` is negative (use [`DateTime::add`] instead) or the
    /// result leaves the supported range.
    #[doc(alias = "subtract")]
    pub fn substract(&self, duration: Duration) -> DateTime {
        self.checked_substract(duration)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    pub fn checked_add(&self, duration: Duration) -> Result<DateTime, Error> {
        if !duration.is_positive() {
            return Err(Error::WrongMethod {
                attempted: "add",
                use_instead: "substract",
            });
        }
        self.shift(&duration, 1)
    }

    #[doc(alias = "checked_subtract")]
    pub fn checked_substract(&self, duration: Duration) -> Result<DateTime, Error> {
        if !duration.is_positive() {
            return Err(Error::WrongMethod {
                attempted: "substract",
                use_instead: "add",
            });
        }
        self.shift(&duration, -1)
    }

    fn shift(&self, duration: &Duration, sign: i64) -> Result<DateTime, Error> {
        // Normalize first so the offset tag never takes part in the sum.
        let base = Civil::from_epoch_ms(self.epoch_ms().ok_or(Error::OutOfRange)?);
        let step = |field: i64, amount: i64| {
            amount
                .checked_mul(sign)
                .and_then(|amount| field.checked_add(amount))
        };
        let target = (|| {
            Some(Civil {
                year: step(base.year, duration.years())?,
                month: step(base.month, duration.months())?,
                day: step(base.day, duration.days())?,
                hour: step(base.hour, duration.hours())?,
                minute: step(base.minute, duration.minutes())?,
                second: step(base.second, duration.seconds())?,
                millisecond: step(base.millisecond, duration.milliseconds())?,
            })
        })();
        let Some(ms) = target.and_then(|target| target.to_epoch_ms()) else {
            debug!("{self} shifted by {sign} * {duration} is out of range");
            return Err(Error::OutOfRange);
        };
        Ok(DateTime::from_civil(
            Civil::from_epoch_ms(ms),
            self.timezone_offset,
        ))
    }

    // endregion

    // region: comparison

    pub fn is_same_as(&self, other: &DateTime) -> bool {
        self.to_utc_unix_time() == other.to_utc_unix_time()
    }

    pub fn is_after(&self, other: &DateTime) -> bool {
        self.to_utc_unix_time() > other.to_utc_unix_time()
    }

    pub fn is_before(&self, other: &DateTime) -> bool {
        self.to_utc_unix_time() < other.to_utc_unix_time()
    }

    /// Orders by [`DateTime::to_utc_unix_time`].
    pub fn compare(&self, other: &DateTime) -> Ordering {
        self.to_utc_unix_time().cmp(&other.to_utc_unix_time())
    }

    /// The field-by-field distance between two values.
    ///
    /// Each unit is the absolute difference of the matching fields, without
    /// any carrying: January 31 and February 1 are one month and thirty days
    /// apart. The result is positive when `self` is after `other`.
    pub fn diff(&self, other: &DateTime) -> Duration {
        let apart = |a: i32, b: i32| (i64::from(a) - i64::from(b)).abs();
        Duration::new(DurationData {
            years: apart(self.year, other.year),
            months: apart(self.month, other.month),
            days: apart(self.day, other.day),
            hours: apart(self.hour, other.hour),
            minutes: apart(self.minute, other.minute),
            seconds: apart(self.seconds, other.seconds),
            milliseconds: apart(self.milliseconds, other.milliseconds),
            is_positive: self.is_after(other),
        })
    }

    // endregion
}

impl Default for DateTime {
    fn default() -> DateTime {
        UNIX_EPOCH
    }
}

impl From<DateTimeData> for DateTime {
    fn from(data: DateTimeData) -> DateTime {
        DateTime::new(data)
    }
}

/// Takes the fields and offset of `dt` as they are, without consulting the
/// host.
impl<Tz: TimeZone> From<chrono::DateTime<Tz>> for DateTime {
    fn from(dt: chrono::DateTime<Tz>) -> DateTime {
        let offset = dt.offset().fix();
        let local = dt.naive_local();
        DateTime {
            year: local.year(),
            month: local.month() as i32,
            day: local.day() as i32,
            hour: local.hour() as i32,
            minute: local.minute() as i32,
            seconds: local.second() as i32,
            // A leap second shows up as a nanosecond count past one second.
            milliseconds: (local.nanosecond() % 1_000_000_000 / 1_000_000) as i32,
            timezone_offset: tz::offset_hours(offset),
        }
    }
}

impl FromStr for DateTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<DateTime, Error> {
        DateTime::parse(s)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_local_iso_string())
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for DateTime {
    fn arbitrary(g: &mut quickcheck::Gen) -> DateTime {
        let mut pick = |range: i32| {
            <u32 as quickcheck::Arbitrary>::arbitrary(g).rem_euclid(range as u32) as i32
        };
        let year = pick(4000) + 1;
        let month = pick(12) + 1;
        let day = pick(31) + 1;
        let hour = pick(24);
        let minute = pick(60);
        let seconds = pick(60);
        let milliseconds = pick(1000);
        // Quarter hours between -12:00 and +14:00.
        let timezone_offset = f64::from(pick(105) - 48) * 0.25;
        DateTime::local(
            year,
            month,
            day,
            hour,
            minute,
            seconds,
            milliseconds,
            timezone_offset,
        )
    }
}
