//! Go-style duration strings: a possibly signed sequence of decimal numbers,
//! each with an optional fraction and a required unit suffix, such as `300ms`,
//! `-1.5h` or `2h45m`. Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m`
//! and `h`.
//!
//! Negative durations cannot be represented by [`Duration`] and are clamped to
//! zero. [`format_duration`] renders the same notation back.

use anyhow::{Context, bail};
use core::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Unit suffixes and their length in nanoseconds.
const UNITS: [(&str, u128); 8] = [
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("μs", 1_000),
    ("ms", 1_000_000),
    ("s", NANOS_PER_SEC),
    ("m", 60 * NANOS_PER_SEC),
    ("h", 3_600 * NANOS_PER_SEC),
];

/// Parses a Go-style duration string.
///
/// # Errors
///
/// Fails on empty input, a number without a unit, an unknown unit, or a value
/// that overflows [`Duration`].
pub fn parse_duration(input: &str) -> anyhow::Result<Duration> {
    let original = input;
    let mut rest = input.trim();

    let negative = match rest.as_bytes().first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        bail!("invalid duration `{original}`: empty");
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, frac, after_number) = split_number(rest);
        if whole.is_empty() && frac.is_empty() {
            bail!("invalid duration `{original}`: expected a number at `{rest}`");
        }

        let unit_len = after_number
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_number.len());
        let (unit, remainder) = after_number.split_at(unit_len);
        if unit.is_empty() {
            bail!("invalid duration `{original}`: missing unit");
        }
        let scale = UNITS
            .iter()
            .find_map(|&(name, scale)| (name == unit).then_some(scale))
            .with_context(|| format!("invalid duration `{original}`: unknown unit `{unit}`"))?;

        let nanos = component_nanos(whole, frac, scale)
            .with_context(|| format!("invalid duration `{original}`: overflow"))?;
        total = total
            .checked_add(nanos)
            .with_context(|| format!("invalid duration `{original}`: overflow"))?;
        rest = remainder;
    }

    if negative {
        return Ok(Duration::ZERO);
    }

    let secs = u64::try_from(total / NANOS_PER_SEC)
        .with_context(|| format!("invalid duration `{original}`: overflow"))?;
    // Always < 1e9, so the cast is lossless.
    let nanos = (total % NANOS_PER_SEC) as u32;
    Ok(Duration::new(secs, nanos))
}

/// Renders `duration` the way Go prints a `time.Duration`: `0s`, `42ns`,
/// `1.5µs`, `250ms`, `10s`, `1m30s`, `1h0m0s`.
///
/// The output parses back to the same value with [`parse_duration`].
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    match nanos {
        0 => "0s".to_string(),
        1..1_000 => format!("{nanos}ns"),
        1_000..1_000_000 => format!("{}µs", decimal(nanos, 1_000)),
        1_000_000..NANOS_PER_SEC => format!("{}ms", decimal(nanos, 1_000_000)),
        _ => {
            let whole_secs = nanos / NANOS_PER_SEC;
            let hours = whole_secs / 3_600;
            let minutes = whole_secs / 60 % 60;
            let secs = nanos % (60 * NANOS_PER_SEC);

            let mut out = String::new();
            if hours > 0 {
                out.push_str(&format!("{hours}h"));
            }
            if hours > 0 || minutes > 0 {
                out.push_str(&format!("{minutes}m"));
            }
            out.push_str(&format!("{}s", decimal(secs, NANOS_PER_SEC)));
            out
        }
    }
}

/// `value / unit` as a decimal without trailing zeros. `unit` is a power of
/// ten.
fn decimal(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let width = unit.ilog10() as usize;
    let digits = format!("{frac:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Splits `input` into its leading integer digits, the fraction digits after an
/// optional `.`, and whatever follows.
fn split_number(input: &str) -> (&str, &str, &str) {
    let whole_len = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (whole, rest) = input.split_at(whole_len);

    let Some(after_dot) = rest.strip_prefix('.') else {
        return (whole, "", rest);
    };
    let frac_len = after_dot
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(after_dot.len());
    let (frac, rest) = after_dot.split_at(frac_len);
    (whole, frac, rest)
}

/// `whole.frac * scale` in nanoseconds. Fraction digits beyond what `scale`
/// can resolve are truncated.
fn component_nanos(whole: &str, frac: &str, scale: u128) -> Option<u128> {
    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().ok()?
    };
    let mut nanos = whole.checked_mul(scale)?;

    let mut divisor: u128 = 1;
    let mut fraction: u128 = 0;
    for digit in frac.bytes() {
        if divisor >= scale {
            break;
        }
        fraction = fraction * 10 + u128::from(digit - b'0');
        divisor *= 10;
    }
    nanos = nanos.checked_add(fraction * scale / divisor)?;
    Some(nanos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(input: &str) -> Duration {
        parse_duration(input).unwrap_or_else(|e| panic!("{input:?}: {e:#}"))
    }

    #[test]
    fn parses_single_units() {
        assert_eq!(ok("10s"), Duration::from_secs(10));
        assert_eq!(ok("250ms"), Duration::from_millis(250));
        assert_eq!(ok("7us"), Duration::from_micros(7));
        assert_eq!(ok("7µs"), Duration::from_micros(7));
        assert_eq!(ok("42ns"), Duration::from_nanos(42));
        assert_eq!(ok("2m"), Duration::from_secs(120));
        assert_eq!(ok("1h"), Duration::from_secs(3_600));
    }

    #[test]
    fn parses_fractions_and_sequences() {
        assert_eq!(ok("1.5s"), Duration::from_millis(1_500));
        assert_eq!(ok(".5s"), Duration::from_millis(500));
        assert_eq!(ok("1.s"), Duration::from_secs(1));
        assert_eq!(ok("1h2m3.5s"), Duration::from_millis(3_723_500));
        assert_eq!(ok("0.000000001s"), Duration::from_nanos(1));
        assert_eq!(ok("1.0000000019s"), Duration::from_nanos(1_000_000_001));
    }

    #[test]
    fn zero_and_signs() {
        assert_eq!(ok("0"), Duration::ZERO);
        assert_eq!(ok("0s"), Duration::ZERO);
        assert_eq!(ok("+3s"), Duration::from_secs(3));
        assert_eq!(ok("-3s"), Duration::ZERO);
        assert_eq!(ok("-0"), Duration::ZERO);
    }

    #[test]
    fn rejects_malformed_input() {
        for input in ["", "-", "s", "10", "1x", "1.5", "..5s", "1s2", "ms1"] {
            assert!(parse_duration(input).is_err(), "{input:?} should fail");
        }
    }

    #[test]
    fn formats_like_go() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_nanos(42)), "42ns");
        assert_eq!(format_duration(Duration::from_nanos(1_500)), "1.5µs");
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_micros(1_500)), "1.5ms");
        assert_eq!(format_duration(Duration::from_secs(10)), "10s");
        assert_eq!(format_duration(Duration::from_millis(1_500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_duration(Duration::from_secs(3_600)), "1h0m0s");
        assert_eq!(format_duration(Duration::from_millis(3_723_500)), "1h2m3.5s");
        assert_eq!(
            format_duration(Duration::from_nanos(1_000_000_001)),
            "1.000000001s"
        );
    }

    #[test]
    fn formatted_durations_parse_back() {
        for d in [
            Duration::from_nanos(7),
            Duration::from_nanos(123_456),
            Duration::from_millis(250),
            Duration::from_secs(90),
            Duration::from_millis(3_723_500),
            Duration::new(86_400 * 3 + 1, 999_999_999),
        ] {
            assert_eq!(ok(&format_duration(d)), d);
        }
    }

    #[test]
    fn rejects_overflow() {
        assert!(parse_duration("99999999999999999999999999999999999999999h").is_err());
        assert!(parse_duration(&format!("{}s", u128::from(u64::MAX) + 1)).is_err());
    }
}
