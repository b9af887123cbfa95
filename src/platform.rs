/*!
The host collaborators a [`DateTime`](crate::DateTime) may consult.

Values in this crate never read ambient state on their own. The handful of
constructors that need the current instant, the host's local offset, a date
parser or a timezone database take a [`Platform`] explicitly (the `*_in`
variants), and the convenience constructors without the suffix use
[`SystemPlatform`].

[`FixedPlatform`] pins the clock and the local offset, which makes code that
calls [`DateTime::now_in`](crate::DateTime::now_in) deterministic.
*/

use chrono::{FixedOffset, Local, NaiveDateTime, Offset, TimeZone, Utc};

use crate::{error::Error, parse, tz};

/// The clock, locale and parsing services of a host.
pub trait Platform: Send + Sync {
    /// The current instant.
    fn now(&self) -> chrono::DateTime<Utc>;

    /// The host's UTC offset at `instant`.
    fn local_offset(&self, instant: &chrono::DateTime<Utc>) -> FixedOffset;

    /// The IANA name of the host's timezone.
    fn timezone_name(&self) -> String;

    /// The host's UTC offset for a wall-clock reading.
    ///
    /// The default guesses with the offset at `civil` read as UTC, then
    /// corrects once with the offset at the resulting instant.
    fn local_offset_for_civil(&self, civil: &NaiveDateTime) -> FixedOffset {
        let as_utc = civil.and_utc();
        let guess = self.local_offset(&as_utc);
        as_utc
            .checked_sub_signed(chrono::TimeDelta::seconds(i64::from(
                guess.local_minus_utc(),
            )))
            .map_or(guess, |instant| self.local_offset(&instant))
    }

    /// Interprets `text` as an instant. See the crate documentation for the
    /// accepted formats.
    fn parse(&self, text: &str) -> Result<chrono::DateTime<Utc>, Error> {
        let ms = parse::parse_epoch_ms(text, |civil| self.local_offset_for_civil(civil))
            .ok_or_else(|| Error::parse(text))?;
        chrono::DateTime::from_timestamp_millis(ms).ok_or(Error::OutOfRange)
    }

    /// The UTC offset of the timezone `name` at `at`.
    ///
    /// `name` is an IANA name such as `Asia/Kolkata` or a fixed offset such
    /// as `+05:30`.
    fn timezone_offset(
        &self,
        name: &str,
        at: &chrono::DateTime<Utc>,
    ) -> Result<FixedOffset, Error> {
        tz::offset_by_name(name, at)
    }
}

/// The host's own clock and timezone.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemPlatform;

impl Platform for SystemPlatform {
    fn now(&self) -> chrono::DateTime<Utc> {
        Utc::now()
    }

    fn local_offset(&self, instant: &chrono::DateTime<Utc>) -> FixedOffset {
        instant.with_timezone(&Local).offset().fix()
    }

    fn timezone_name(&self) -> String {
        iana_time_zone::get_timezone().unwrap_or_else(|_err| {
            warn!("could not determine the host timezone, assuming UTC: {_err}");
            "UTC".to_string()
        })
    }

    fn local_offset_for_civil(&self, civil: &NaiveDateTime) -> FixedOffset {
        // Readings inside a daylight saving gap have no local offset at all;
        // fall back to the instant-based guess for those.
        match Local.from_local_datetime(civil).earliest() {
            Some(dt) => dt.offset().fix(),
            None => {
                let instant = civil.and_utc();
                self.local_offset(&instant)
            }
        }
    }
}

/// A platform with a frozen clock and a fixed local offset.
#[derive(Clone, Copy, Debug)]
pub struct FixedPlatform {
    now: chrono::DateTime<Utc>,
    offset: FixedOffset,
}

impl FixedPlatform {
    pub fn new(now: chrono::DateTime<Utc>, offset: FixedOffset) -> FixedPlatform {
        FixedPlatform { now, offset }
    }

    /// A frozen clock on a host running in UTC.
    pub fn utc(now: chrono::DateTime<Utc>) -> FixedPlatform {
        FixedPlatform::new(now, Utc.fix())
    }

    /// Returns the same clock with a different local offset.
    pub fn with_offset(self, offset: FixedOffset) -> FixedPlatform {
        FixedPlatform { offset, ..self }
    }
}

impl Platform for FixedPlatform {
    fn now(&self) -> chrono::DateTime<Utc> {
        self.now
    }

    fn local_offset(&self, _instant: &chrono::DateTime<Utc>) -> FixedOffset {
        self.offset
    }

    fn timezone_name(&self) -> String {
        if self.offset.local_minus_utc() == 0 {
            "UTC".to_string()
        } else {
            tz::format_offset(tz::offset_hours(self.offset), ":")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: i64) -> chrono::DateTime<Utc> {
        chrono::DateTime::from_timestamp_millis(ms).unwrap()
    }

    fn east(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    #[test]
    fn fixed_platform_is_frozen() {
        let platform = FixedPlatform::new(at(1_700_000_000_000), east(2));
        assert_eq!(platform.now(), at(1_700_000_000_000));
        assert_eq!(platform.now(), platform.now());
        assert_eq!(platform.local_offset(&at(0)), east(2));
        assert_eq!(platform.with_offset(east(-7)).local_offset(&at(0)), east(-7));
    }

    #[test]
    fn fixed_platform_names() {
        assert_eq!(FixedPlatform::utc(at(0)).timezone_name(), "UTC");
        let platform = FixedPlatform::new(at(0), FixedOffset::east_opt(19_800).unwrap());
        assert_eq!(platform.timezone_name(), "+05:30");
        assert_eq!(platform.with_offset(east(-8)).timezone_name(), "-08:00");
    }

    #[test]
    fn parse_uses_local_offset_for_unzoned_text() {
        let platform = FixedPlatform::new(at(0), east(3));
        assert_eq!(
            platform.parse("1970-01-01T03:00:00").unwrap(),
            at(0)
        );
        assert_eq!(platform.parse("1970-01-01T00:00:00Z").unwrap(), at(0));
        assert_eq!(platform.parse("1970-01-01").unwrap(), at(0));
    }

    #[test]
    fn parse_failures() {
        let platform = FixedPlatform::utc(at(0));
        assert_eq!(platform.parse("not a date"), Err(Error::parse("not a date")));
        assert_eq!(
            platform.parse("+275761-01-01"),
            Err(Error::parse("+275761-01-01"))
        );
    }

    #[test]
    fn timezone_offsets_come_from_the_database() {
        let platform = FixedPlatform::utc(at(0));
        let winter = chrono::DateTime::from_timestamp(1_705_320_000, 0).unwrap();
        assert_eq!(
            platform.timezone_offset("America/New_York", &winter).unwrap(),
            east(-5)
        );
        assert!(platform.timezone_offset("Nowhere/Special", &winter).is_err());
    }

    #[test]
    fn default_civil_offset_uses_instant_offset() {
        let platform = FixedPlatform::new(at(0), east(-4));
        let civil = at(0).naive_utc();
        assert_eq!(platform.local_offset_for_civil(&civil), east(-4));
    }

    #[test]
    fn system_platform_reports_something() {
        let platform = SystemPlatform;
        assert!(!platform.timezone_name().is_empty());
        let offset = platform.local_offset(&platform.now());
        assert!(offset.local_minus_utc().abs() < 86_400);
    }
}
