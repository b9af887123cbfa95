/*!
Civil timestamps with an explicit timezone offset.

This crate provides two immutable value types:

* [`DateTime`] is a set of calendar and clock fields (year through
millisecond) tagged with the UTC offset, in hours, they are displayed in.
* [`Duration`] is a signed bag of calendar units, consumed by
[`DateTime::add`] and [`DateTime::substract`] and produced by
[`DateTime::diff`].

Arithmetic is calendar arithmetic: each unit of a duration is added to the
matching field and the result is normalized the way a calendar carries, so
January 31 plus one day is February 1 and month 13 is January of the next
year. Timezone handling is explicit. A value never changes its offset tag
unless asked to with [`DateTime::convert_timezone`] or
[`DateTime::copy_with`].

# Host state

Nothing here reads the host clock or timezone implicitly. The few
constructors that need host services ([`DateTime::now`],
[`DateTime::from_date`], [`DateTime::parse`] and
[`DateTime::get_timezone_offset_by_name`]) use [`SystemPlatform`], and each
has an `_in` variant taking any [`Platform`]. [`FixedPlatform`] freezes the
clock and the local offset.

# Parsing

[`DateTime::parse`] understands what a host `Date.parse` does:

* ISO 8601 dates (`2024-01-15`, `2024-01`, `2024`, `+002024-01-15`), which
are read as UTC.
* ISO 8601 date-times (`2024-01-15T10:30`, `2024-01-15T10:30:15.250Z`,
`2024-01-15T10:30:15+05:30`). Without a zone they are read as local time.
* RFC 2822 (`Mon, 15 Jan 2024 10:30:00 +0000`).
* The display format `Mon Jan 15 2024 10:30:00 GMT+0100 (CET)`.

# Example

```
use civiltime::{DateTime, Duration, DurationData, FixedPlatform};

let platform = FixedPlatform::utc("2024-03-10T08:00:00Z".parse().unwrap());
let start = DateTime::now_in(&platform);
let kolkata = DateTime::get_timezone_offset_by_name_in(&platform, "Asia/Kolkata").unwrap();

let there = start.convert_timezone(kolkata);
assert_eq!(there.to_local_iso_string(), "2024-03-10T13:30:00.000+0530");
assert!(there.is_same_as(&start.convert_timezone(kolkata)));

let later = there.add(Duration::new(DurationData { months: 1, ..Default::default() }));
assert_eq!((later.month(), later.day()), (4, 10));
assert!(later.diff(&there).is_positive());
```

# Crate features

* **logging** (enabled by default) - Emits `log` records for parse
fallbacks, timezone lookups and out-of-range arithmetic. No logger is
installed by this crate.
*/

#![deny(missing_debug_implementations)]

#[macro_use]
mod logging;

mod calendar;
mod datetime;
mod duration;
mod error;
mod parse;
mod platform;
mod tz;

pub use crate::{
    datetime::{DateTime, DateTimeData, IsoOffsetStyle},
    duration::{Duration, DurationData},
    error::Error,
    platform::{FixedPlatform, Platform, SystemPlatform},
};
