//! Ready-made conversion rules for [`PropertyBinding`](super::PropertyBinding).
//!
//! A conversion rule turns operator text into a property's native type and
//! explains itself on failure. Surrounding whitespace is ignored.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Parses any [`FromStr`] type.
///
/// # Errors
///
/// Returns the parser's error message.
pub fn parse<T>(raw: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse::<T>().map_err(|error| error.to_string())
}

/// Parses a number and requires it to be strictly positive.
///
/// # Errors
///
/// Returns a message when the text does not parse or the value is zero or
/// negative.
pub fn positive<T>(raw: &str) -> Result<T, String>
where
    T: FromStr + PartialOrd + Default,
    T::Err: fmt::Display,
{
    let value = parse::<T>(raw)?;
    if value > T::default() {
        Ok(value)
    } else {
        Err(String::from("value must be greater than zero"))
    }
}

/// Parses a non-negative number of seconds, fractions allowed.
///
/// # Errors
///
/// Returns a message when the text is not a number, is negative, is not
/// finite, or overflows [`Duration`].
pub fn seconds(raw: &str) -> Result<Seconds, String> {
    let value = parse::<f64>(raw)?;
    Duration::try_from_secs_f64(value)
        .map(Seconds)
        .map_err(|error| error.to_string())
}

/// A [`Duration`] printed as a plain number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Seconds(pub Duration);

impl From<Duration> for Seconds {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

impl From<Seconds> for Duration {
    fn from(seconds: Seconds) -> Self {
        seconds.0
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::integer("5", 5.0)]
    #[case::fraction(" 0.25 ", 0.25)]
    fn seconds_accepts_non_negative_numbers(#[case] raw: &str, #[case] expected: f64) {
        let parsed = seconds(raw).expect("parse seconds");
        assert_eq!(parsed.0, Duration::from_secs_f64(expected));
    }

    #[rstest]
    #[case::negative("-1")]
    #[case::text("soon")]
    #[case::not_a_number("NaN")]
    #[case::empty("")]
    fn seconds_rejects_invalid_text(#[case] raw: &str) {
        assert!(seconds(raw).is_err(), "{raw:?} should be rejected");
    }

    #[test]
    fn seconds_display_as_plain_number() {
        assert_eq!(Seconds(Duration::from_millis(1500)).to_string(), "1.5");
        assert_eq!(Seconds(Duration::from_secs(10)).to_string(), "10");
    }

    #[rstest]
    #[case::one("1", true)]
    #[case::zero("0", false)]
    #[case::negative("-3", false)]
    fn positive_rejects_zero_and_negative(#[case] raw: &str, #[case] accepted: bool) {
        assert_eq!(positive::<i32>(raw).is_ok(), accepted);
    }

    #[test]
    fn parse_reports_parser_message() {
        let error = parse::<u8>("300").expect_err("overflow");
        assert!(error.contains("too large"), "unexpected message: {error}");
    }
}
