/// An error that can occur in this crate.
///
/// Calendar fields are never rejected: out-of-range components are normalized
/// by calendar overflow. Errors only arise from the sign guard on
/// [`DateTime::checked_add`](crate::DateTime::checked_add) and
/// [`DateTime::checked_substract`](crate::DateTime::checked_substract), from
/// leaving the representable instant range, or from the platform collaborators
/// (date parsing and timezone lookup).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A negative duration was handed to `add` or `substract`.
    #[error("cannot {attempted} a negative duration; use {use_instead} instead")]
    WrongMethod {
        attempted: &'static str,
        use_instead: &'static str,
    },
    /// The result lies outside of +/-8.64e15 milliseconds from the epoch.
    #[error("datetime is outside of the supported range")]
    OutOfRange,
    #[error("could not interpret {input:?} as a date")]
    Parse { input: String },
    #[error("unknown timezone {name:?}")]
    UnknownTimezone { name: String },
}

impl Error {
    pub(crate) fn parse(input: &str) -> Error {
        Error::Parse {
            input: input.to_string(),
        }
    }

    pub(crate) fn unknown_timezone(name: &str) -> Error {
        Error::UnknownTimezone {
            name: name.to_string(),
        }
    }

    /// Returns true if this error was caused by leaving the supported range.
    pub fn is_range(&self) -> bool {
        matches!(self, Error::OutOfRange)
    }
}
