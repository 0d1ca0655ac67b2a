//! Human-readable durations
//!
//! Accepts `<number><unit>` where the number may carry a fractional part and
//! the unit is one of `s`, `m`, `h`, `d` (case-insensitive): `30s`, `15m`,
//! `1.5h`, `7d`. Surrounding whitespace is ignored.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid time format: {input:?} (expected e.g. 30s, 15m, 1.5h, 7d)")]
pub struct DurationParseError {
    pub input: String,
}

/// Parse a duration string
///
/// ```rust
/// use std::time::Duration;
/// use platform::duration::parse_duration;
///
/// assert_eq!(parse_duration("15m").unwrap(), Duration::from_secs(900));
/// assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
/// assert!(parse_duration("15 minutes").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let err = || DurationParseError {
        input: input.to_string(),
    };

    let trimmed = input.trim();
    let unit = trimmed.chars().last().ok_or_else(err)?;
    let multiplier: f64 = match unit.to_ascii_lowercase() {
        's' => 1.0,
        'm' => 60.0,
        'h' => 60.0 * 60.0,
        'd' => 24.0 * 60.0 * 60.0,
        _ => return Err(err()),
    };

    let number = &trimmed[..trimmed.len() - unit.len_utf8()];
    if !is_decimal(number) {
        return Err(err());
    }
    let value: f64 = number.parse().map_err(|_| err())?;

    Duration::try_from_secs_f64(value * multiplier).map_err(|_| err())
}

/// `\d+(\.\d+)?`
fn is_decimal(s: &str) -> bool {
    let (int, frac) = match s.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (s, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    all_digits(int) && frac.is_none_or(all_digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_unit() {
        assert_eq!(parse_duration("45s").unwrap(), Duration::from_secs(45));
        assert_eq!(parse_duration("15m").unwrap(), Duration::from_secs(15 * 60));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(2 * 3600));
        assert_eq!(parse_duration("7d").unwrap(), Duration::from_secs(7 * 86400));
    }

    #[test]
    fn unit_is_case_insensitive_and_input_trimmed() {
        assert_eq!(parse_duration(" 10M ").unwrap(), Duration::from_secs(600));
        assert_eq!(parse_duration("1D").unwrap(), Duration::from_secs(86400));
    }

    #[test]
    fn fractional_values() {
        assert_eq!(parse_duration("0.5s").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", "m", "15", "15x", "-5m", "1.m", ".5m", "1.2.3s", "15 m", "1e3s", "５m"] {
            assert!(parse_duration(bad).is_err(), "accepted {bad:?}");
        }
    }
}
