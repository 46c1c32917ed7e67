//! Best-effort conversions between stored and requested value kinds
//!
//! Every conversion is total: a pairing with no rule produces the zero value
//! of the requested kind (empty string, `0.0`, `false`, empty array or a zero
//! duration).
//!
//! | stored        | string            | float              | bool               |
//! |---------------|-------------------|--------------------|--------------------|
//! | `String`      | identity          | `0.0`              | `false`            |
//! | `Number`      | shortest decimal  | identity           | `!= 0`             |
//! | `Bool`        | `"true"/"false"`  | `1.0` / `0.0`      | identity           |
//! | `StringArray` | joined with `,`   | `0.0`              | `false`            |
//! | `NumberArray` | joined with `,`   | first element      | first `!= 0`       |
//! | `BoolArray`   | joined with `,`   | first as `1`/`0`   | first element      |
//!
//! Integers truncate the float conversion toward zero. Durations parse the
//! string conversion.

use std::fmt;
use std::time::Duration;

use crate::value::ConfigValue;

const DURATION_UNITS: &[&str] = &["ns", "us", "\u{b5}s", "\u{3bc}s", "ms", "s", "m", "h"];

/// Parse a compound duration such as `10h10m`, `1.5h`, `42ns` or `5m`
///
/// The input must be a run of decimal-and-unit pairs with no spaces, using
/// only `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`, optionally led by `+`.
/// Anything else, negative durations included, yields [`Duration::ZERO`].
pub fn parse_duration(s: &str) -> Duration {
    let s = s.strip_prefix('+').unwrap_or(s);
    if !is_duration_syntax(s) {
        return Duration::ZERO;
    }
    let normalized = s.replace(['\u{b5}', '\u{3bc}'], "u");
    humantime::parse_duration(&normalized).unwrap_or(Duration::ZERO)
}

fn is_duration_syntax(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    let is_number = |c: char| c.is_ascii_digit() || c == '.';
    let mut rest = s;
    while !rest.is_empty() {
        let split = rest.find(|c: char| !is_number(c)).unwrap_or(rest.len());
        let (number, tail) = rest.split_at(split);
        if !number.bytes().any(|b| b.is_ascii_digit()) || number.matches('.').count() > 1 {
            return false;
        }
        let split = tail.find(is_number).unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(split);
        if !DURATION_UNITS.contains(&unit) {
            return false;
        }
        rest = tail;
    }
    true
}

fn format_number(n: f64) -> String {
    n.to_string()
}

fn bool_to_float(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders the string conversion
impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::String(s) => f.write_str(s),
            ConfigValue::Number(n) => write!(f, "{}", n),
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::StringArray(v) => f.write_str(&v.join(",")),
            ConfigValue::NumberArray(v) => f.write_str(&join(v)),
            ConfigValue::BoolArray(v) => f.write_str(&join(v)),
        }
    }
}

impl ConfigValue {
    /// Convert to a string
    pub fn coerce_string(&self) -> String {
        self.to_string()
    }

    /// Convert to a float
    pub fn coerce_float(&self) -> f64 {
        match self {
            ConfigValue::Number(n) => *n,
            ConfigValue::Bool(b) => bool_to_float(*b),
            ConfigValue::NumberArray(v) => v.first().copied().unwrap_or_default(),
            ConfigValue::BoolArray(v) => v.first().copied().map(bool_to_float).unwrap_or_default(),
            ConfigValue::String(_) | ConfigValue::StringArray(_) => 0.0,
        }
    }

    /// Convert to an integer, truncating toward zero
    pub fn coerce_int(&self) -> i64 {
        self.coerce_float() as i64
    }

    /// Convert to a boolean
    pub fn coerce_bool(&self) -> bool {
        match self {
            ConfigValue::Bool(b) => *b,
            ConfigValue::Number(n) => *n != 0.0,
            ConfigValue::BoolArray(v) => v.first().copied().unwrap_or_default(),
            ConfigValue::NumberArray(v) => v.first().is_some_and(|n| *n != 0.0),
            ConfigValue::String(_) | ConfigValue::StringArray(_) => false,
        }
    }

    /// Convert to a duration by parsing the string conversion
    pub fn coerce_duration(&self) -> Duration {
        parse_duration(&self.coerce_string())
    }

    /// Convert to a list of strings
    ///
    /// Scalars become a single-element list.
    pub fn coerce_string_array(&self) -> Vec<String> {
        match self {
            ConfigValue::StringArray(v) => v.clone(),
            ConfigValue::NumberArray(v) => v.iter().copied().map(format_number).collect(),
            ConfigValue::BoolArray(v) => v.iter().map(ToString::to_string).collect(),
            ConfigValue::String(s) => vec![s.clone()],
            ConfigValue::Number(n) => vec![format_number(*n)],
            ConfigValue::Bool(b) => vec![b.to_string()],
        }
    }

    /// Convert to a list of floats
    ///
    /// Numeric and boolean scalars become a single-element list; strings have
    /// no numeric reading and give an empty list.
    pub fn coerce_float_array(&self) -> Vec<f64> {
        match self {
            ConfigValue::NumberArray(v) => v.clone(),
            ConfigValue::BoolArray(v) => v.iter().copied().map(bool_to_float).collect(),
            ConfigValue::Number(n) => vec![*n],
            ConfigValue::Bool(b) => vec![bool_to_float(*b)],
            ConfigValue::String(_) | ConfigValue::StringArray(_) => Vec::new(),
        }
    }

    /// Convert to a list of integers, truncating each float toward zero
    pub fn coerce_int_array(&self) -> Vec<i64> {
        self.coerce_float_array()
            .into_iter()
            .map(|n| n as i64)
            .collect()
    }

    /// Convert to a list of booleans
    pub fn coerce_bool_array(&self) -> Vec<bool> {
        match self {
            ConfigValue::BoolArray(v) => v.clone(),
            ConfigValue::NumberArray(v) => v.iter().map(|n| *n != 0.0).collect(),
            ConfigValue::Bool(b) => vec![*b],
            ConfigValue::Number(n) => vec![*n != 0.0],
            ConfigValue::String(_) | ConfigValue::StringArray(_) => Vec::new(),
        }
    }

    /// Convert to a list of durations
    ///
    /// Each element of the string-list conversion is parsed on its own; an
    /// unparsable element becomes a zero duration without affecting the rest.
    pub fn coerce_duration_array(&self) -> Vec<Duration> {
        self.coerce_string_array()
            .iter()
            .map(|s| parse_duration(s))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_string_from_every_kind() {
        assert_eq!(ConfigValue::from("foo").coerce_string(), "foo");
        assert_eq!(ConfigValue::Number(42.0).coerce_string(), "42");
        assert_eq!(ConfigValue::Number(42.1).coerce_string(), "42.1");
        assert_eq!(ConfigValue::Number(-0.5).coerce_string(), "-0.5");
        assert_eq!(ConfigValue::Number(1e21).coerce_string(), "1000000000000000000000");
        assert_eq!(ConfigValue::Bool(true).coerce_string(), "true");
        assert_eq!(
            ConfigValue::from(vec!["foo", "bar", "baz"]).coerce_string(),
            "foo,bar,baz"
        );
        assert_eq!(
            ConfigValue::from(vec![0.1, 1.1, 2.1]).coerce_string(),
            "0.1,1.1,2.1"
        );
        assert_eq!(
            ConfigValue::from(vec![true, false, true]).coerce_string(),
            "true,false,true"
        );
    }

    #[test]
    fn test_number_string_round_trip() {
        for n in [42.1, 0.1, 1.0 / 3.0, 123456789.125, -7.0] {
            let s = ConfigValue::Number(n).coerce_string();
            assert_eq!(s.parse::<f64>().unwrap(), n);
        }
    }

    #[test]
    fn test_float_from_every_kind() {
        assert_eq!(ConfigValue::Number(42.1).coerce_float(), 42.1);
        assert_eq!(ConfigValue::Bool(true).coerce_float(), 1.0);
        assert_eq!(ConfigValue::Bool(false).coerce_float(), 0.0);
        assert_eq!(ConfigValue::from(vec![0.1, 1.1]).coerce_float(), 0.1);
        assert_eq!(ConfigValue::from(vec![true, false]).coerce_float(), 1.0);
        assert_eq!(ConfigValue::NumberArray(vec![]).coerce_float(), 0.0);
        assert_eq!(ConfigValue::BoolArray(vec![]).coerce_float(), 0.0);
        // Strings are never parsed
        assert_eq!(ConfigValue::from("42").coerce_float(), 0.0);
        assert_eq!(ConfigValue::from(vec!["1"]).coerce_float(), 0.0);
    }

    #[test]
    fn test_int_truncates_toward_zero() {
        assert_eq!(ConfigValue::Number(42.9).coerce_int(), 42);
        assert_eq!(ConfigValue::Number(-42.9).coerce_int(), -42);
        assert_eq!(ConfigValue::Bool(true).coerce_int(), 1);
        assert_eq!(ConfigValue::Bool(false).coerce_int(), 0);
    }

    #[test]
    fn test_bool_from_every_kind() {
        assert!(ConfigValue::Bool(true).coerce_bool());
        assert!(!ConfigValue::Number(0.0).coerce_bool());
        assert!(ConfigValue::Number(-1.0).coerce_bool());
        assert!(ConfigValue::from(vec![true, false]).coerce_bool());
        assert!(!ConfigValue::from(vec![0.0, 1.0]).coerce_bool());
        assert!(ConfigValue::from(vec![0.1]).coerce_bool());
        assert!(!ConfigValue::BoolArray(vec![]).coerce_bool());
        assert!(!ConfigValue::NumberArray(vec![]).coerce_bool());
        assert!(!ConfigValue::from("true").coerce_bool());
    }

    #[test]
    fn test_duration() {
        assert_eq!(
            ConfigValue::from("10h10m").coerce_duration(),
            Duration::from_secs(10 * 3600 + 10 * 60)
        );
        assert_eq!(ConfigValue::from("42ns").coerce_duration(), Duration::from_nanos(42));
        assert_eq!(ConfigValue::from("nope").coerce_duration(), Duration::ZERO);
        assert_eq!(ConfigValue::Number(5.0).coerce_duration(), Duration::ZERO);
    }

    #[test]
    fn test_duration_fractional_and_signed() {
        assert_eq!(parse_duration("1.5h"), Duration::from_secs(5400));
        assert_eq!(parse_duration("+5m"), Duration::from_secs(300));
        assert_eq!(parse_duration("1h30m15s"), Duration::from_secs(5415));
        assert_eq!(parse_duration("250ms"), Duration::from_millis(250));
        assert_eq!(parse_duration("3us"), Duration::from_micros(3));
        assert_eq!(parse_duration("3\u{b5}s"), Duration::from_micros(3));
        assert_eq!(parse_duration("-5m"), Duration::ZERO);
    }

    #[test]
    fn test_duration_rejects_other_syntax() {
        for input in ["1d", "1h 30m", "5 minutes", "5", "h", "1..5h", "1w", " 5m", "5m ", ""] {
            assert_eq!(parse_duration(input), Duration::ZERO, "input {:?}", input);
        }
    }

    #[test]
    fn test_string_array_promotion() {
        assert_eq!(ConfigValue::from("foo").coerce_string_array(), vec!["foo"]);
        assert_eq!(ConfigValue::Number(0.1).coerce_string_array(), vec!["0.1"]);
        assert_eq!(ConfigValue::Bool(true).coerce_string_array(), vec!["true"]);
        assert_eq!(
            ConfigValue::from(vec![0.1, 1.1, 2.1]).coerce_string_array(),
            vec!["0.1", "1.1", "2.1"]
        );
        assert_eq!(
            ConfigValue::from(vec![true, false]).coerce_string_array(),
            vec!["true", "false"]
        );
    }

    #[test]
    fn test_float_array_promotion() {
        assert_eq!(
            ConfigValue::from(vec![true, false, true]).coerce_float_array(),
            vec![1.0, 0.0, 1.0]
        );
        assert_eq!(ConfigValue::Number(42.1).coerce_float_array(), vec![42.1]);
        assert_eq!(ConfigValue::Bool(true).coerce_float_array(), vec![1.0]);
        assert_eq!(ConfigValue::Bool(false).coerce_float_array(), vec![0.0]);
        assert!(ConfigValue::from("1").coerce_float_array().is_empty());
        assert!(ConfigValue::from(vec!["1"]).coerce_float_array().is_empty());
    }

    #[test]
    fn test_int_array() {
        assert_eq!(
            ConfigValue::from(vec![0.2, 1.4, 2.6]).coerce_int_array(),
            vec![0, 1, 2]
        );
        assert_eq!(
            ConfigValue::from(vec![true, false, true]).coerce_int_array(),
            vec![1, 0, 1]
        );
        assert_eq!(ConfigValue::Number(42.1).coerce_int_array(), vec![42]);
    }

    #[test]
    fn test_bool_array_promotion() {
        assert_eq!(
            ConfigValue::from(vec![0.0, 1.1, 2.1]).coerce_bool_array(),
            vec![false, true, true]
        );
        assert_eq!(ConfigValue::Bool(true).coerce_bool_array(), vec![true]);
        assert_eq!(ConfigValue::Number(42.1).coerce_bool_array(), vec![true]);
        assert_eq!(ConfigValue::Number(0.0).coerce_bool_array(), vec![false]);
        assert!(ConfigValue::from("true").coerce_bool_array().is_empty());
    }

    #[test]
    fn test_duration_array_zeroes_bad_elements_only() {
        assert_eq!(
            ConfigValue::from(vec!["42ns", "5m", "10h10m"]).coerce_duration_array(),
            vec![
                Duration::from_nanos(42),
                Duration::from_secs(300),
                Duration::from_secs(36600),
            ]
        );
        assert_eq!(
            ConfigValue::from(vec!["1s", "garbage"]).coerce_duration_array(),
            vec![Duration::from_secs(1), Duration::ZERO]
        );
        assert_eq!(
            ConfigValue::from("5m").coerce_duration_array(),
            vec![Duration::from_secs(300)]
        );
    }
}
