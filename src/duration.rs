use std::fmt;

/// A signed calendar offset.
///
/// A `Duration` is a bag of calendar units plus a sign. It is *not* a fixed
/// amount of elapsed time: one month added to January 31 and one month added
/// to February 1 move the clock by different amounts. The magnitudes are
/// expected to be non-negative, with the sign carried by
/// [`Duration::is_positive`], but nothing is validated.
///
/// # Example
///
/// ```
/// use civiltime::{Duration, DurationData};
///
/// let d = Duration::new(DurationData { days: 1, hours: 12, ..Default::default() });
/// assert_eq!(d.days(), 1);
/// assert_eq!(d.hours(), 12);
/// assert!(d.is_positive());
/// assert_eq!(d.to_string(), "P1DT12H");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Duration {
    years: i64,
    months: i64,
    days: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
    milliseconds: i64,
    is_positive: bool,
}

/// The configuration a [`Duration`] is built from.
///
/// Every unit defaults to zero and the sign defaults to positive, so only
/// the units of interest need to be spelled out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DurationData {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub milliseconds: i64,
    pub is_positive: bool,
}

impl Default for DurationData {
    fn default() -> DurationData {
        DurationData {
            years: 0,
            months: 0,
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
            milliseconds: 0,
            is_positive: true,
        }
    }
}

impl Duration {
    pub fn new(data: DurationData) -> Duration {
        Duration {
            years: data.years,
            months: data.months,
            days: data.days,
            hours: data.hours,
            minutes: data.minutes,
            seconds: data.seconds,
            milliseconds: data.milliseconds,
            is_positive: data.is_positive,
        }
    }

    pub fn years(&self) -> i64 {
        self.years
    }

    pub fn months(&self) -> i64 {
        self.months
    }

    pub fn days(&self) -> i64 {
        self.days
    }

    pub fn hours(&self) -> i64 {
        self.hours
    }

    pub fn minutes(&self) -> i64 {
        self.minutes
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn milliseconds(&self) -> i64 {
        self.milliseconds
    }

    pub fn is_positive(&self) -> bool {
        self.is_positive
    }

    /// Returns true when every unit is zero, regardless of sign.
    pub fn is_zero(&self) -> bool {
        self.units().iter().all(|&unit| unit == 0)
    }

    /// Returns the same units with the sign flipped.
    ///
    /// This is the way to turn a duration rejected by
    /// [`DateTime::add`](crate::DateTime::add) into one accepted by it.
    pub fn negate(self) -> Duration {
        Duration {
            is_positive: !self.is_positive,
            ..self
        }
    }

    /// Returns the same units with a positive sign.
    pub fn abs(self) -> Duration {
        Duration {
            is_positive: true,
            ..self
        }
    }

    fn units(&self) -> [i64; 7] {
        [
            self.years,
            self.months,
            self.days,
            self.hours,
            self.minutes,
            self.seconds,
            self.milliseconds,
        ]
    }
}

impl Default for Duration {
    fn default() -> Duration {
        Duration::new(DurationData::default())
    }
}

impl From<DurationData> for Duration {
    fn from(data: DurationData) -> Duration {
        Duration::new(data)
    }
}

/// Renders the ISO 8601 duration format, e.g. `P1Y2M3DT4H5M6.007S`.
///
/// Negative durations get a leading `-`. Units are printed as stored, so a
/// duration of 90 minutes renders as `PT90M`.
impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_positive {
            f.write_str("-")?;
        }
        if self.is_zero() {
            return f.write_str("PT0S");
        }
        f.write_str("P")?;
        for (value, designator) in [(self.years, 'Y'), (self.months, 'M'), (self.days, 'D')] {
            if value != 0 {
                write!(f, "{value}{designator}")?;
            }
        }
        let millis = self
            .seconds
            .saturating_mul(1000)
            .saturating_add(self.milliseconds);
        if self.hours == 0 && self.minutes == 0 && millis == 0 {
            return Ok(());
        }
        f.write_str("T")?;
        if self.hours != 0 {
            write!(f, "{}H", self.hours)?;
        }
        if self.minutes != 0 {
            write!(f, "{}M", self.minutes)?;
        }
        if millis != 0 {
            let sign = if millis < 0 { "-" } else { "" };
            let (whole, frac) = (millis.unsigned_abs() / 1000, millis.unsigned_abs() % 1000);
            if frac == 0 {
                write!(f, "{sign}{whole}S")?;
            } else {
                write!(f, "{sign}{whole}.{frac:03}S")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Duration {
    fn arbitrary(g: &mut quickcheck::Gen) -> Duration {
        let mut unit = || i64::from(<u16 as quickcheck::Arbitrary>::arbitrary(g) % 1000);
        Duration::new(DurationData {
            years: unit(),
            months: unit(),
            days: unit(),
            hours: unit(),
            minutes: unit(),
            seconds: unit(),
            milliseconds: unit(),
            is_positive: <bool as quickcheck::Arbitrary>::arbitrary(g),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let d = Duration::default();
        assert_eq!(d.years(), 0);
        assert_eq!(d.months(), 0);
        assert_eq!(d.days(), 0);
        assert_eq!(d.hours(), 0);
        assert_eq!(d.minutes(), 0);
        assert_eq!(d.seconds(), 0);
        assert_eq!(d.milliseconds(), 0);
        assert!(d.is_positive());
        assert!(d.is_zero());
    }

    #[test]
    fn unspecified_units_default_to_zero() {
        let d = Duration::new(DurationData {
            months: 3,
            is_positive: false,
            ..Default::default()
        });
        assert_eq!(d.months(), 3);
        assert_eq!(d.years(), 0);
        assert_eq!(d.days(), 0);
        assert!(!d.is_positive());
        assert!(!d.is_zero());
    }

    #[test]
    fn negative_magnitudes_are_accepted() {
        let d = Duration::new(DurationData {
            minutes: -15,
            ..Default::default()
        });
        assert_eq!(d.minutes(), -15);
        assert!(d.is_positive());
    }

    #[test]
    fn negate_and_abs() {
        let d = Duration::new(DurationData {
            hours: 2,
            ..Default::default()
        });
        assert!(!d.negate().is_positive());
        assert_eq!(d.negate().hours(), 2);
        assert_eq!(d.negate().negate(), d);
        assert_eq!(d.negate().abs(), d);
    }

    #[test]
    fn display_iso() {
        let d = Duration::new(DurationData {
            years: 1,
            months: 2,
            days: 3,
            hours: 4,
            minutes: 5,
            seconds: 6,
            milliseconds: 7,
            ..Default::default()
        });
        assert_eq!(d.to_string(), "P1Y2M3DT4H5M6.007S");
        assert_eq!(d.negate().to_string(), "-P1Y2M3DT4H5M6.007S");
        assert_eq!(Duration::default().to_string(), "PT0S");

        let d = Duration::new(DurationData {
            minutes: 90,
            milliseconds: 2500,
            ..Default::default()
        });
        assert_eq!(d.to_string(), "PT90M2.500S");

        let d = Duration::new(DurationData {
            months: 1,
            ..Default::default()
        });
        assert_eq!(d.to_string(), "P1M");
    }

    quickcheck::quickcheck! {
        fn prop_negate_is_involution(d: Duration) -> bool {
            d.negate().negate() == d && d.negate().is_positive() != d.is_positive()
        }
    }
}
