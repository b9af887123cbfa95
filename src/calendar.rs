// Proleptic Gregorian arithmetic over epoch milliseconds.
//
// Every constructor here accepts out-of-range components and carries them
// into the neighboring units, the same way `Date.UTC` does: month 13 is
// January of the next year, day 0 is the last day of the previous month.

pub(crate) const MS_PER_SECOND: i64 = 1_000;
pub(crate) const MS_PER_MINUTE: i64 = 60_000;
pub(crate) const MS_PER_HOUR: i64 = 3_600_000;
pub(crate) const MS_PER_DAY: i64 = 86_400_000;

/// Largest distance from the epoch, in milliseconds, that an instant may have.
pub(crate) const MAX_EPOCH_MS: i64 = 8_640_000_000_000_000;

// Keeps the era arithmetic in `days_from_civil` clear of overflow.
const MAX_YEAR_MAGNITUDE: i64 = 1_000_000_000;

/// Calendar and clock components, not necessarily normalized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Civil {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
    pub millisecond: i64,
}

impl Civil {
    /// Returns the normalized UTC components of an instant.
    pub(crate) fn from_epoch_ms(ms: i64) -> Civil {
        let days = ms.div_euclid(MS_PER_DAY);
        let time = ms.rem_euclid(MS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        Civil {
            year,
            month,
            day,
            hour: time / MS_PER_HOUR,
            minute: time % MS_PER_HOUR / MS_PER_MINUTE,
            second: time % MS_PER_MINUTE / MS_PER_SECOND,
            millisecond: time % MS_PER_SECOND,
        }
    }

    /// Interprets the components as UTC, carrying any overflow.
    ///
    /// Returns `None` when the arithmetic overflows or the instant falls
    /// outside of `MAX_EPOCH_MS`.
    pub(crate) fn to_epoch_ms(&self) -> Option<i64> {
        let day = make_day(self.year, self.month, self.day)?;
        let time = make_time(self.hour, self.minute, self.second, self.millisecond)?;
        make_date(day, time).and_then(time_clip)
    }

    /// Interprets the components as UTC without any range limit.
    ///
    /// Wide enough for any components that start out as `i32`.
    pub(crate) fn to_epoch_ms_wide(&self) -> i128 {
        let month0 = i128::from(self.month) - 1;
        let year = i128::from(self.year) + month0.div_euclid(12);
        let day = wide_days_from_civil(year, month0.rem_euclid(12) + 1, 1)
            + i128::from(self.day)
            - 1;
        day * i128::from(MS_PER_DAY)
            + i128::from(self.hour) * i128::from(MS_PER_HOUR)
            + i128::from(self.minute) * i128::from(MS_PER_MINUTE)
            + i128::from(self.second) * i128::from(MS_PER_SECOND)
            + i128::from(self.millisecond)
    }
}

pub(crate) fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub(crate) fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Days since 1970-01-01 for a normalized date (`month` in 1..=12).
pub(crate) fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    wide_days_from_civil(year.into(), month.into(), day.into()) as i64
}

fn wide_days_from_civil(year: i128, month: i128, day: i128) -> i128 {
    // Howard Hinnant's algorithm; the year is shifted to start in March so
    // that the leap day is the last day of the year.
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = if month > 2 { month - 3 } else { month + 9 };
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Inverse of `days_from_civil`.
pub(crate) fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Day number of `year`/`month`/`day` with months and days carried.
pub(crate) fn make_day(year: i64, month: i64, day: i64) -> Option<i64> {
    let month0 = month.checked_sub(1)?;
    let year = year.checked_add(month0.div_euclid(12))?;
    if year.unsigned_abs() > MAX_YEAR_MAGNITUDE as u64 {
        return None;
    }
    let month = month0.rem_euclid(12) + 1;
    days_from_civil(year, month, 1).checked_add(day.checked_sub(1)?)
}

pub(crate) fn make_time(hour: i64, minute: i64, second: i64, millisecond: i64) -> Option<i64> {
    hour.checked_mul(MS_PER_HOUR)?
        .checked_add(minute.checked_mul(MS_PER_MINUTE)?)?
        .checked_add(second.checked_mul(MS_PER_SECOND)?)?
        .checked_add(millisecond)
}

pub(crate) fn make_date(day: i64, time: i64) -> Option<i64> {
    day.checked_mul(MS_PER_DAY)?.checked_add(time)
}

pub(crate) fn time_clip(ms: i64) -> Option<i64> {
    (ms.unsigned_abs() <= MAX_EPOCH_MS as u64).then_some(ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn civil(year: i64, month: i64, day: i64) -> Civil {
        Civil {
            year,
            month,
            day,
            ..Civil::default()
        }
    }

    #[test]
    fn epoch_is_day_zero() {
        assert_eq!(days_from_civil(1970, 1, 1), 0);
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        assert_eq!(days_from_civil(1969, 12, 31), -1);
        assert_eq!(days_from_civil(2000, 3, 1), 11_017);
        assert_eq!(civil_from_days(11_016), (2000, 2, 29));
    }

    #[test]
    fn wide_epoch_ms_keeps_the_sign_of_carried_fields() {
        assert_eq!(civil(1970, 1, 1).to_epoch_ms_wide(), 0);
        assert_eq!(
            civil(2024, 3, 1).to_epoch_ms_wide(),
            i128::from(civil(2024, 3, 1).to_epoch_ms().unwrap())
        );
        assert!(civil(1970, i64::from(i32::MIN), 1).to_epoch_ms_wide() < 0);
        assert!(civil(1970, i64::from(i32::MAX), 1).to_epoch_ms_wide() > 0);
        assert!(civil(i64::from(i32::MAX), i64::from(i32::MIN), 1).to_epoch_ms_wide() > 0);
        assert!(civil(1970, 1, i64::from(i32::MIN)).to_epoch_ms_wide() < 0);
    }

    #[test]
    fn leap_years() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 4), 30);
    }

    #[test]
    fn month_overflow_carries_into_year() {
        assert_eq!(make_day(2023, 13, 1), make_day(2024, 1, 1));
        assert_eq!(make_day(2024, 0, 1), make_day(2023, 12, 1));
        assert_eq!(make_day(2024, -11, 1), make_day(2023, 1, 1));
        assert_eq!(make_day(2024, 25, 1), make_day(2026, 1, 1));
    }

    #[test]
    fn day_overflow_carries_into_month() {
        assert_eq!(make_day(2023, 12, 32), make_day(2024, 1, 1));
        assert_eq!(make_day(2024, 1, 0), make_day(2023, 12, 31));
        assert_eq!(make_day(2024, 2, 30), make_day(2024, 3, 1));
        assert_eq!(make_day(2023, 2, 29), make_day(2023, 3, 1));
    }

    #[test]
    fn time_overflow_carries_into_days() {
        let ms = Civil {
            hour: 25,
            ..civil(2024, 1, 31)
        }
        .to_epoch_ms()
        .unwrap();
        assert_eq!(
            Civil::from_epoch_ms(ms),
            Civil {
                hour: 1,
                ..civil(2024, 2, 1)
            }
        );

        let ms = Civil {
            millisecond: -1,
            ..civil(2024, 1, 1)
        }
        .to_epoch_ms()
        .unwrap();
        assert_eq!(
            Civil::from_epoch_ms(ms),
            Civil {
                hour: 23,
                minute: 59,
                second: 59,
                millisecond: 999,
                ..civil(2023, 12, 31)
            }
        );
    }

    #[test]
    fn negative_epoch_ms() {
        assert_eq!(
            Civil::from_epoch_ms(-1),
            Civil {
                hour: 23,
                minute: 59,
                second: 59,
                millisecond: 999,
                ..civil(1969, 12, 31)
            }
        );
    }

    #[test]
    fn range_limits() {
        assert_eq!(time_clip(MAX_EPOCH_MS), Some(MAX_EPOCH_MS));
        assert_eq!(time_clip(-MAX_EPOCH_MS), Some(-MAX_EPOCH_MS));
        assert_eq!(time_clip(MAX_EPOCH_MS + 1), None);
        assert_eq!(time_clip(i64::MIN), None);
        assert_eq!(civil(275_761, 1, 1).to_epoch_ms(), None);
        assert_eq!(make_day(i64::MAX, 1, 1), None);
        assert_eq!(make_day(2024, i64::MIN, 1), None);
        assert_eq!(make_time(i64::MAX, 0, 0, 0), None);
    }

    quickcheck::quickcheck! {
        fn prop_days_roundtrip(days: i32) -> bool {
            let days = i64::from(days);
            let (year, month, day) = civil_from_days(days);
            days_from_civil(year, month, day) == days
        }

        fn prop_epoch_ms_roundtrip(ms: i64) -> bool {
            let ms = ms % MAX_EPOCH_MS;
            Civil::from_epoch_ms(ms).to_epoch_ms() == Some(ms)
        }
    }
}
