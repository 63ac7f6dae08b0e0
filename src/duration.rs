//! Composite human-readable duration parsing
//!
//! Accepts any sequence of `<digits><unit>` pairs, optionally separated by
//! spaces or commas: `"2d"`, `"1h30m"`, `"1 hour 30 mins"`, `"1s,1h"`.
//! Parsing never fails; fragments it cannot make sense of contribute zero.

use std::time::Duration;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Number,
    Descriptor,
}

/// Parse a composite duration string into a single [`Duration`]
///
/// A digit run that is not a positive integer, or a unit that is not
/// recognised, contributes nothing. A trailing number without a unit is
/// ignored. The sum saturates at [`Duration::MAX`].
pub fn parse(text: &str) -> Duration {
    let mut total = Duration::ZERO;
    let mut mode = Mode::Number;
    let mut digits = String::new();
    let mut descriptor = String::new();
    let mut quantity = 0u64;

    for ch in text.chars() {
        if ch.is_ascii_digit() {
            if mode == Mode::Descriptor {
                total = total.saturating_add(section(quantity, &descriptor));
                descriptor.clear();
                digits.clear();
                mode = Mode::Number;
            }
            digits.push(ch);
            continue;
        }

        match mode {
            Mode::Number => {
                if digits.is_empty() {
                    continue;
                }
                match digits.parse::<u64>() {
                    Ok(n) if n > 0 => {
                        quantity = n;
                        descriptor.push(ch);
                        mode = Mode::Descriptor;
                    }
                    _ => digits.clear(),
                }
            }
            Mode::Descriptor => descriptor.push(ch),
        }
    }

    if mode == Mode::Descriptor {
        total = total.saturating_add(section(quantity, &descriptor));
    }
    total
}

/// Seconds per unit for a recognised unit alias
///
/// Matching is case-sensitive after trimming whitespace and removing commas.
pub fn unit_seconds(descriptor: &str) -> Option<u64> {
    let unit = descriptor.replace(',', "");
    match unit.trim() {
        "w" | "week" | "weeks" => Some(WEEK),
        "d" | "day" | "days" => Some(DAY),
        "h" | "hr" | "hrs" | "hour" | "hours" => Some(HOUR),
        "m" | "min" | "mins" | "minute" | "minutes" => Some(MINUTE),
        "s" | "sec" | "secs" | "second" | "seconds" => Some(1),
        _ => None,
    }
}

fn section(quantity: u64, descriptor: &str) -> Duration {
    if quantity == 0 {
        return Duration::ZERO;
    }
    unit_seconds(descriptor)
        .map(|unit| Duration::from_secs(quantity.saturating_mul(unit)))
        .unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NANOS: &[(&str, u64)] = &[
        ("1s", 1_000_000_000),
        ("1 sec", 1_000_000_000),
        ("1sec", 1_000_000_000),
        ("1 second", 1_000_000_000),
        ("1second", 1_000_000_000),
        ("1m", 60_000_000_000),
        ("1 min", 60_000_000_000),
        ("1min", 60_000_000_000),
        ("1 minute", 60_000_000_000),
        ("1minute", 60_000_000_000),
        ("1h", 3_600_000_000_000),
        ("1 hour", 3_600_000_000_000),
        ("1d", 86_400_000_000_000),
        ("1 day", 86_400_000_000_000),
        ("1s1h", 3_601_000_000_000),
        ("1s,1h", 3_601_000_000_000),
        ("1sec,1hour", 3_601_000_000_000),
        ("1 sec, 1 hour", 3_601_000_000_000),
        ("1 hour 1 day", 90_000_000_000_000),
        ("2 hours 1 day", 93_600_000_000_000),
        ("1 week", 604_800_000_000_000),
        ("2 weeks", 1_209_600_000_000_000),
    ];

    #[test]
    fn test_sample_strings() {
        for (text, nanos) in NANOS {
            assert_eq!(parse(text).as_nanos(), u128::from(*nanos), "parsing {text:?}");
        }
    }

    #[test]
    fn test_unrecognised_unit_contributes_zero() {
        assert_eq!(parse("5xyz"), Duration::ZERO);
        assert_eq!(parse("5 fortnights 2s"), Duration::from_secs(2));
    }

    #[test]
    fn test_units_are_case_sensitive() {
        assert_eq!(parse("1H"), Duration::ZERO);
        assert_eq!(parse("1 Hour"), Duration::ZERO);
    }

    #[test]
    fn test_dangling_number_is_ignored() {
        assert_eq!(parse("1h 30"), Duration::from_secs(HOUR));
        assert_eq!(parse("30"), Duration::ZERO);
        assert_eq!(parse(""), Duration::ZERO);
    }

    #[test]
    fn test_zero_quantity_is_discarded() {
        assert_eq!(parse("0h"), Duration::ZERO);
        assert_eq!(parse("0h 1s"), Duration::from_secs(1));
    }

    #[test]
    fn test_leading_noise_is_skipped() {
        assert_eq!(parse("  1h30m"), Duration::from_secs(HOUR + 30 * MINUTE));
        assert_eq!(parse("about 2d"), Duration::from_secs(2 * DAY));
    }

    #[test]
    fn test_huge_quantity_saturates() {
        let huge = format!("{}d 1d", u64::MAX);
        assert_eq!(parse(&huge), Duration::MAX);
    }

    fn arb_fragment() -> impl Strategy<Value = String> {
        (
            1u64..1000,
            prop::sample::select(vec!["s", "sec", "m", "mins", "h", "hours", "d", "day", "w"]),
        )
            .prop_map(|(n, unit)| format!("{n}{unit}"))
    }

    proptest! {
        #[test]
        fn prop_concatenation_sums(a in arb_fragment(), b in arb_fragment()) {
            let sum = parse(&a) + parse(&b);
            prop_assert_eq!(parse(&format!("{a}{b}")), sum);
            prop_assert_eq!(parse(&format!("{b}{a}")), sum);
            prop_assert_eq!(parse(&format!("{a}, {b}")), sum);
        }

        #[test]
        fn prop_never_panics(text in ".{0,40}") {
            let _ = parse(&text);
        }
    }
}
