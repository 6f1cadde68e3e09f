//! # Parser Context
//!
//! [`ParserContext`] carries the locale dependent symbols used by the numeric
//! and date/time parsers. It is immutable and passed to every parse call.
//! Contexts can be loaded from JSON; every field is optional and falls back
//! to the English defaults.

use std::{fs::File, io::BufReader, num::NonZeroU64, path::Path};

use bigdecimal::{BigDecimal, RoundingMode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to open context file: {0}")]
    Open(#[from] std::io::Error),
    #[error("Failed to parse context: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParserContext {
    #[serde(default)]
    pub decimal: DecimalNumberContext,

    #[serde(default)]
    pub date_time: DateTimeContext,
}

impl ParserContext {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        from_file(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecimalNumberContext {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,

    /// Matched ignoring ASCII case.
    #[serde(default = "default_exponent_symbol")]
    pub exponent_symbol: String,

    #[serde(default = "default_grouping_separator")]
    pub grouping_separator: char,

    #[serde(default = "default_negative_sign")]
    pub negative_sign: char,

    #[serde(default = "default_positive_sign")]
    pub positive_sign: char,

    #[serde(default)]
    pub math_context: MathContext,
}

impl Default for DecimalNumberContext {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            decimal_separator: default_decimal_separator(),
            exponent_symbol: default_exponent_symbol(),
            grouping_separator: default_grouping_separator(),
            negative_sign: default_negative_sign(),
            positive_sign: default_positive_sign(),
            math_context: MathContext::default(),
        }
    }
}

/// Rounding applied when a decimal exceeds the precision of a [`MathContext`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Rounding {
    Up,
    Down,
    Ceiling,
    Floor,
    HalfUp,
    HalfDown,
    #[default]
    HalfEven,
}

impl From<Rounding> for RoundingMode {
    fn from(rounding: Rounding) -> Self {
        match rounding {
            Rounding::Up => RoundingMode::Up,
            Rounding::Down => RoundingMode::Down,
            Rounding::Ceiling => RoundingMode::Ceiling,
            Rounding::Floor => RoundingMode::Floor,
            Rounding::HalfUp => RoundingMode::HalfUp,
            Rounding::HalfDown => RoundingMode::HalfDown,
            Rounding::HalfEven => RoundingMode::HalfEven,
        }
    }
}

/// Number of significant digits kept by big decimal parsing.
///
/// `precision: None` keeps every digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MathContext {
    #[serde(default)]
    pub precision: Option<NonZeroU64>,

    #[serde(default)]
    pub rounding: Rounding,
}

impl MathContext {
    pub const UNLIMITED: MathContext = MathContext {
        precision: None,
        rounding: Rounding::HalfUp,
    };

    pub fn new(precision: NonZeroU64, rounding: Rounding) -> Self {
        Self {
            precision: Some(precision),
            rounding,
        }
    }

    /// 7 digits, half even.
    pub fn decimal32() -> Self {
        Self::with_digits(7)
    }

    /// 16 digits, half even.
    pub fn decimal64() -> Self {
        Self::with_digits(16)
    }

    /// 34 digits, half even.
    pub fn decimal128() -> Self {
        Self::with_digits(34)
    }

    fn with_digits(digits: u64) -> Self {
        Self {
            precision: NonZeroU64::new(digits),
            rounding: Rounding::HalfEven,
        }
    }

    pub fn round(&self, value: BigDecimal) -> BigDecimal {
        match self.precision {
            Some(precision) => value.with_precision_round(precision, self.rounding.into()),
            None => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeContext {
    /// January first.
    #[serde(default = "default_month_names")]
    pub month_names: Vec<String>,

    #[serde(default = "default_month_abbreviations")]
    pub month_abbreviations: Vec<String>,

    /// Monday first.
    #[serde(default = "default_weekday_names")]
    pub weekday_names: Vec<String>,

    #[serde(default = "default_weekday_abbreviations")]
    pub weekday_abbreviations: Vec<String>,

    /// Before and after noon.
    #[serde(default = "default_am_pm")]
    pub am_pm: Vec<String>,

    /// Year used when a pattern has no year field.
    #[serde(default = "default_year")]
    pub default_year: i32,

    /// Two digit years resolve to `[two_digit_year_start, two_digit_year_start + 99]`.
    #[serde(default = "default_two_digit_year_start")]
    pub two_digit_year_start: i32,
}

impl Default for DateTimeContext {
    fn default() -> Self {
        Self {
            month_names: default_month_names(),
            month_abbreviations: default_month_abbreviations(),
            weekday_names: default_weekday_names(),
            weekday_abbreviations: default_weekday_abbreviations(),
            am_pm: default_am_pm(),
            default_year: default_year(),
            two_digit_year_start: default_two_digit_year_start(),
        }
    }
}

impl DateTimeContext {
    /// Resolves a two digit year through the pivot.
    pub fn two_digit_year(&self, yy: i32) -> i32 {
        let base = self.two_digit_year_start;
        let century = base - base.rem_euclid(100);
        let year = century + yy;
        if year < base {
            year + 100
        } else {
            year
        }
    }
}

pub fn from_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

pub fn from_str<T: DeserializeOwned>(s: &str) -> Result<T, ConfigError> {
    Ok(serde_json::from_str(s)?)
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_decimal_separator() -> char {
    '.'
}

fn default_exponent_symbol() -> String {
    "E".to_string()
}

fn default_grouping_separator() -> char {
    ','
}

fn default_negative_sign() -> char {
    '-'
}

fn default_positive_sign() -> char {
    '+'
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn default_month_names() -> Vec<String> {
    strings(&[
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ])
}

fn default_month_abbreviations() -> Vec<String> {
    strings(&[
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ])
}

fn default_weekday_names() -> Vec<String> {
    strings(&[
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ])
}

fn default_weekday_abbreviations() -> Vec<String> {
    strings(&["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"])
}

fn default_am_pm() -> Vec<String> {
    strings(&["AM", "PM"])
}

fn default_year() -> i32 {
    2000
}

fn default_two_digit_year_start() -> i32 {
    2000
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_defaults_from_empty_json() {
        let context: ParserContext = from_str("{}").unwrap();
        assert_eq!(context, ParserContext::default());
        assert_eq!(context.decimal.decimal_separator, '.');
        assert_eq!(context.decimal.math_context.precision, None);
        assert_eq!(context.date_time.month_names.len(), 12);
    }

    #[test]
    fn test_partial_override() {
        let context: ParserContext = from_str(
            r#"{
                "decimal": {
                    "decimal_separator": ",",
                    "grouping_separator": ".",
                    "currency_symbol": "€",
                    "math_context": { "precision": 5, "rounding": "half_up" }
                },
                "date_time": { "default_year": 1999 }
            }"#,
        )
        .unwrap();

        assert_eq!(context.decimal.decimal_separator, ',');
        assert_eq!(context.decimal.grouping_separator, '.');
        assert_eq!(context.decimal.currency_symbol, "€");
        assert_eq!(context.decimal.negative_sign, '-');
        assert_eq!(
            context.decimal.math_context,
            MathContext::new(NonZeroU64::new(5).unwrap(), Rounding::HalfUp)
        );
        assert_eq!(context.date_time.default_year, 1999);
        assert_eq!(context.date_time.am_pm, vec!["AM", "PM"]);
    }

    #[test]
    fn test_round_trip() {
        let context = ParserContext::default();
        let json = serde_json::to_string(&context).unwrap();
        let parsed: ParserContext = from_str(&json).unwrap();
        assert_eq!(parsed, context);
    }

    #[test]
    fn test_invalid_json() {
        let result: Result<ParserContext, _> = from_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
        assert!(matches!(
            ParserContext::from_file("/nonexistent/kumi.json"),
            Err(ConfigError::Open(_))
        ));
    }

    #[test]
    fn test_math_context_round() {
        let value = BigDecimal::from_str("123.456").unwrap();
        assert_eq!(
            MathContext::new(NonZeroU64::new(4).unwrap(), Rounding::HalfUp).round(value.clone()),
            BigDecimal::from_str("123.5").unwrap()
        );
        assert_eq!(MathContext::UNLIMITED.round(value.clone()), value);
        assert_eq!(
            MathContext::decimal32().round(BigDecimal::from_str("1.23456789").unwrap()),
            BigDecimal::from_str("1.234568").unwrap()
        );
    }

    #[test]
    fn test_rounding_names() {
        assert_eq!(Rounding::HalfEven.to_string(), "half_even");
        assert_eq!(Rounding::from_str("half_up"), Ok(Rounding::HalfUp));
        assert!(Rounding::from_str("sideways").is_err());
    }

    #[test]
    fn test_two_digit_year() {
        let context = DateTimeContext::default();
        assert_eq!(context.two_digit_year(26), 2026);
        assert_eq!(context.two_digit_year(99), 2099);

        let context = DateTimeContext {
            two_digit_year_start: 1950,
            ..Default::default()
        };
        assert_eq!(context.two_digit_year(49), 2049);
        assert_eq!(context.two_digit_year(50), 1950);
    }
}
