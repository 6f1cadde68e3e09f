//! Numeric leaf parsers.
//!
//! Every parser accepts an optional leading sign taken from the
//! [`DecimalNumberContext`]. A sign that is not followed by a digit is a
//! no-match, so `++1`, `--1`, `+-1` and `-+1` never consume anything.
//! The radix of the integer parsers is fixed at construction; prefixes such
//! as `0x` are not recognised.

use std::any::Any;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::Num;

use crate::config::{DecimalNumberContext, MathContext, ParserContext};
use crate::cursor::{Mark, TextCursor};
use crate::error::BuildError;
use crate::parser::core::{same, ParseError, ParseResult, Parser, ParserRef};
use crate::token::ParserToken;

/// Consumes a context sign, returning `true` for negative.
fn sign(cursor: &mut TextCursor<'_>, context: &DecimalNumberContext) -> Result<bool, ParseError> {
    match cursor.peek() {
        Some(c) if c == context.negative_sign => {
            cursor.next()?;
            Ok(true)
        }
        Some(c) if c == context.positive_sign => {
            cursor.next()?;
            Ok(false)
        }
        _ => Ok(false),
    }
}

/// Consumes digits in `radix`, returning them as text.
fn digits<'a>(cursor: &mut TextCursor<'a>, radix: u32) -> Result<&'a str, ParseError> {
    let start = cursor.save();
    while cursor.peek().is_some_and(|c| c.is_digit(radix)) {
        cursor.next()?;
    }
    Ok(cursor.text_since(start))
}

fn is_digit(cursor: &TextCursor<'_>, radix: u32) -> bool {
    cursor.peek().is_some_and(|c| c.is_digit(radix))
}

fn check_radix(radix: u32) -> Result<u32, BuildError> {
    if (2..=36).contains(&radix) {
        Ok(radix)
    } else {
        Err(BuildError::InvalidRadix(radix))
    }
}

fn overflow(cursor: &mut TextCursor<'_>, start: Mark) -> ParseError {
    let text = cursor.text_since(start).to_string();
    cursor.restore(start);
    ParseError::Overflow {
        text,
        position: cursor.line_info(),
    }
}

fn exponent_out_of_range(cursor: &mut TextCursor<'_>, start: Mark) -> ParseError {
    let text = cursor.text_since(start).to_string();
    cursor.restore(start);
    ParseError::ExponentOutOfRange {
        text,
        position: cursor.line_info(),
    }
}

fn write_radix(f: &mut fmt::Formatter<'_>, name: &str, radix: u32) -> fmt::Result {
    if radix == 10 {
        f.write_str(name)
    } else {
        write!(f, "{}({})", name, radix)
    }
}

/// Parses an `i64` in a fixed radix.
///
/// A value outside the `i64` range is a hard [`ParseError::Overflow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongParser {
    radix: u32,
}

impl LongParser {
    pub fn with(radix: u32) -> Result<ParserRef, BuildError> {
        Ok(LongParser {
            radix: check_radix(radix)?,
        }
        .into())
    }
}

impl Parser for LongParser {
    fn parse(&self, cursor: &mut TextCursor<'_>, context: &ParserContext) -> ParseResult {
        let start = cursor.save();
        let negative = sign(cursor, &context.decimal)?;
        if !is_digit(cursor, self.radix) {
            cursor.restore(start);
            return Ok(None);
        }

        // accumulate towards the sign so that i64::MIN fits
        let radix = i64::from(self.radix);
        let mut value: i64 = 0;
        let mut overflowed = false;
        while let Some(digit) = cursor.peek().and_then(|c| c.to_digit(self.radix)) {
            let digit = i64::from(digit);
            let next = value.checked_mul(radix).and_then(|v| {
                if negative {
                    v.checked_sub(digit)
                } else {
                    v.checked_add(digit)
                }
            });
            match next {
                Some(next) => value = next,
                None => overflowed = true,
            }
            cursor.next()?;
        }

        if overflowed {
            return Err(overflow(cursor, start));
        }
        Ok(Some(ParserToken::long(value, cursor.text_since(start))))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Parser) -> bool {
        same(self, other)
    }
}

impl fmt::Display for LongParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_radix(f, "Long", self.radix)
    }
}

/// Parses an arbitrarily large integer in a fixed radix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BigIntegerParser {
    radix: u32,
}

impl BigIntegerParser {
    pub fn with(radix: u32) -> Result<ParserRef, BuildError> {
        Ok(BigIntegerParser {
            radix: check_radix(radix)?,
        }
        .into())
    }
}

impl Parser for BigIntegerParser {
    fn parse(&self, cursor: &mut TextCursor<'_>, context: &ParserContext) -> ParseResult {
        let start = cursor.save();
        let negative = sign(cursor, &context.decimal)?;
        let digits = digits(cursor, self.radix)?;
        if digits.is_empty() {
            cursor.restore(start);
            return Ok(None);
        }

        let magnitude = BigInt::from_str_radix(digits, self.radix)
            .map_err(|e| ParseError::failure(e.to_string(), cursor))?;
        let value = if negative { -magnitude } else { magnitude };
        Ok(Some(ParserToken::big_integer(value, cursor.text_since(start))))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Parser) -> bool {
        same(self, other)
    }
}

impl fmt::Display for BigIntegerParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_radix(f, "BigInteger", self.radix)
    }
}

/// Scientific notation split into ASCII parts, ready for `FromStr`.
struct Scientific {
    negative: bool,
    integer: String,
    fraction: String,
    exponent: Option<String>,
}

impl Scientific {
    fn ascii(&self) -> String {
        let mut s = String::with_capacity(self.integer.len() + self.fraction.len() + 8);
        if self.negative {
            s.push('-');
        }
        if self.integer.is_empty() {
            s.push('0');
        }
        s.push_str(&self.integer);
        if !self.fraction.is_empty() {
            s.push('.');
            s.push_str(&self.fraction);
        }
        if let Some(exponent) = &self.exponent {
            s.push('E');
            s.push_str(exponent);
        }
        s
    }
}

/// Reads `digits [point digits] [exponent [sign] digits]` after the sign.
///
/// Returns `None`, without restoring, when there is no mantissa digit. An
/// exponent marker not followed by digits is left unconsumed.
fn scientific(
    cursor: &mut TextCursor<'_>,
    context: &DecimalNumberContext,
    negative: bool,
) -> Result<Option<Scientific>, ParseError> {
    let integer = digits(cursor, 10)?.to_string();

    let mut fraction = String::new();
    let before_point = cursor.save();
    if cursor.peek() == Some(context.decimal_separator) {
        cursor.next()?;
        fraction = digits(cursor, 10)?.to_string();
    }
    if integer.is_empty() && fraction.is_empty() {
        cursor.restore(before_point);
        return Ok(None);
    }

    let before_exponent = cursor.save();
    let mut exponent = None;
    if cursor.eat_ignore_ascii_case(&context.exponent_symbol) {
        let exponent_negative = sign(cursor, context)?;
        let exponent_digits = digits(cursor, 10)?;
        if exponent_digits.is_empty() {
            cursor.restore(before_exponent);
        } else {
            let mut e = String::with_capacity(exponent_digits.len() + 1);
            if exponent_negative {
                e.push('-');
            }
            e.push_str(exponent_digits);
            exponent = Some(e);
        }
    }

    Ok(Some(Scientific {
        negative,
        integer,
        fraction,
        exponent,
    }))
}

/// Parses a [`BigDecimal`], rounded to its [`MathContext`].
///
/// Digits are unbounded but the scale is an `i64`, so an exponent that moves
/// it outside that range is a [`ParseError::ExponentOutOfRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BigDecimalParser {
    math_context: MathContext,
}

impl BigDecimalParser {
    pub fn with(math_context: MathContext) -> ParserRef {
        BigDecimalParser { math_context }.into()
    }
}

impl Parser for BigDecimalParser {
    fn parse(&self, cursor: &mut TextCursor<'_>, context: &ParserContext) -> ParseResult {
        let start = cursor.save();
        let negative = sign(cursor, &context.decimal)?;
        let Some(number) = scientific(cursor, &context.decimal, negative)? else {
            cursor.restore(start);
            return Ok(None);
        };

        let value = match BigDecimal::from_str(&number.ascii()) {
            Ok(value) => value,
            Err(_) => return Err(exponent_out_of_range(cursor, start)),
        };
        Ok(Some(ParserToken::big_decimal(
            self.math_context.round(value),
            cursor.text_since(start),
        )))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Parser) -> bool {
        same(self, other)
    }
}

impl fmt::Display for BigDecimalParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BigDecimal")
    }
}

const NAN: &str = "NaN";
const INFINITY: &str = "Infinity";

/// Parses an `f64`, including `NaN` and `Infinity` with an optional sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DoubleParser;

impl DoubleParser {
    pub fn with() -> ParserRef {
        DoubleParser.into()
    }
}

impl Parser for DoubleParser {
    fn parse(&self, cursor: &mut TextCursor<'_>, context: &ParserContext) -> ParseResult {
        let start = cursor.save();
        let negative = sign(cursor, &context.decimal)?;

        let value = if cursor.eat(NAN) {
            f64::NAN
        } else if cursor.eat(INFINITY) {
            if negative {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }
        } else {
            let Some(number) = scientific(cursor, &context.decimal, negative)? else {
                cursor.restore(start);
                return Ok(None);
            };
            f64::from_str(&number.ascii())
                .map_err(|e| ParseError::failure(e.to_string(), cursor))?
        };

        Ok(Some(ParserToken::double(value, cursor.text_since(start))))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Parser) -> bool {
        same(self, other)
    }
}

impl fmt::Display for DoubleParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Double")
    }
}

/// Parses a locale formatted decimal such as `-$1,234.50`.
///
/// Accepts an optional sign, an optional currency symbol, integer digits with
/// grouping separators and an optional fraction. There is no exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecimalParser;

impl DecimalParser {
    pub fn with() -> ParserRef {
        DecimalParser.into()
    }

    fn grouped_digits(
        cursor: &mut TextCursor<'_>,
        grouping: char,
        out: &mut String,
    ) -> Result<(), ParseError> {
        loop {
            out.push_str(digits(cursor, 10)?);
            if out.is_empty() || cursor.peek() != Some(grouping) {
                return Ok(());
            }
            // a separator must be followed by a digit
            let before = cursor.save();
            cursor.next()?;
            if !is_digit(cursor, 10) {
                cursor.restore(before);
                return Ok(());
            }
        }
    }
}

impl Parser for DecimalParser {
    fn parse(&self, cursor: &mut TextCursor<'_>, context: &ParserContext) -> ParseResult {
        let decimal = &context.decimal;
        let start = cursor.save();
        let negative = sign(cursor, decimal)?;
        cursor.eat(&decimal.currency_symbol);

        let mut ascii = String::new();
        if negative {
            ascii.push('-');
        }
        let mut integer = String::new();
        Self::grouped_digits(cursor, decimal.grouping_separator, &mut integer)?;

        let mut fraction = "";
        if cursor.peek() == Some(decimal.decimal_separator) {
            cursor.next()?;
            fraction = digits(cursor, 10)?;
        }
        if integer.is_empty() && fraction.is_empty() {
            cursor.restore(start);
            return Ok(None);
        }

        ascii.push_str(if integer.is_empty() { "0" } else { &integer });
        if !fraction.is_empty() {
            ascii.push('.');
            ascii.push_str(fraction);
        }

        let value = BigDecimal::from_str(&ascii)
            .map_err(|e| ParseError::failure(e.to_string(), cursor))?;
        Ok(Some(ParserToken::big_decimal(
            decimal.math_context.round(value),
            cursor.text_since(start),
        )))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Parser) -> bool {
        same(self, other)
    }
}

impl fmt::Display for DecimalParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Decimal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU64;

    use crate::config::Rounding;

    /// Token and remaining text.
    fn parse(parser: &ParserRef, text: &str) -> Result<Option<(ParserToken, String)>, ParseError> {
        parse_with(parser, text, &ParserContext::default())
    }

    fn parse_with(
        parser: &ParserRef,
        text: &str,
        context: &ParserContext,
    ) -> Result<Option<(ParserToken, String)>, ParseError> {
        Ok(parser
            .parse_text(text, context)?
            .map(|(token, rest)| (token, rest.to_string())))
    }

    fn decimal(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_long_radix_16_max() {
        let parser = LongParser::with(16).unwrap();
        let (token, rest) = parse(&parser, "7fffffffffffffff///").unwrap().unwrap();
        assert_eq!(token.as_long(), Some(i64::MAX));
        assert_eq!(token.text(), "7fffffffffffffff");
        assert_eq!(rest, "///");
    }

    #[test]
    fn test_long_min_and_overflow() {
        let parser = LongParser::with(10).unwrap();
        let (token, _) = parse(&parser, "-9223372036854775808").unwrap().unwrap();
        assert_eq!(token.as_long(), Some(i64::MIN));

        let error = parse(&parser, "9223372036854775808").unwrap_err();
        assert!(matches!(error, ParseError::Overflow { ref text, .. } if text == "9223372036854775808"));

        let error = parse(&parser, "-9223372036854775809").unwrap_err();
        assert!(matches!(error, ParseError::Overflow { .. }));
    }

    #[test]
    fn test_long_signs() {
        let parser = LongParser::with(10).unwrap();
        let (token, rest) = parse(&parser, "+12a").unwrap().unwrap();
        assert_eq!(token, ParserToken::long(12, "+12"));
        assert_eq!(rest, "a");

        for bad in ["++1", "--1", "+-1", "-+1", "-", "x"] {
            assert_eq!(parse(&parser, bad), Ok(None), "{}", bad);
        }
    }

    #[test]
    fn test_invalid_radix() {
        assert_eq!(LongParser::with(1), Err(BuildError::InvalidRadix(1)));
        assert_eq!(BigIntegerParser::with(37), Err(BuildError::InvalidRadix(37)));
    }

    #[test]
    fn test_big_integer() {
        let parser = BigIntegerParser::with(10).unwrap();
        let text = "-123456789012345678901234567890";
        let (token, _) = parse(&parser, text).unwrap().unwrap();
        assert_eq!(
            token.as_big_integer(),
            Some(&BigInt::from_str(text).unwrap())
        );

        let binary = BigIntegerParser::with(2).unwrap();
        let (token, rest) = parse(&binary, "1012").unwrap().unwrap();
        assert_eq!(token.as_big_integer(), Some(&BigInt::from(5)));
        assert_eq!(rest, "2");
    }

    #[test]
    fn test_big_decimal() {
        let parser = BigDecimalParser::with(MathContext::UNLIMITED);
        let (token, rest) = parse(&parser, "123.5E-67").unwrap().unwrap();
        assert_eq!(token.as_big_decimal(), Some(&decimal("123.5E-67")));
        assert_eq!(token.text(), "123.5E-67");
        assert_eq!(rest, "");

        // lower case exponent
        let (token, _) = parse(&parser, "1e3").unwrap().unwrap();
        assert_eq!(token.as_big_decimal(), Some(&decimal("1000")));

        // dangling exponent is not consumed
        let (token, rest) = parse(&parser, "12Ex").unwrap().unwrap();
        assert_eq!(token.text(), "12");
        assert_eq!(rest, "Ex");

        assert_eq!(parse(&parser, ".x"), Ok(None));
        assert_eq!(parse(&parser, "-+1"), Ok(None));
    }

    #[test]
    fn test_big_decimal_exponent_out_of_range() {
        let parser = BigDecimalParser::with(MathContext::UNLIMITED);
        let error = parse(&parser, "1E99999999999999999999").unwrap_err();
        assert!(matches!(
            error,
            ParseError::ExponentOutOfRange { ref text, .. } if text == "1E99999999999999999999"
        ));
        assert_eq!(error.get_position().column, 1);

        // many digits are fine
        let digits = "9".repeat(400);
        let (token, _) = parse(&parser, &digits).unwrap().unwrap();
        assert_eq!(token.as_big_decimal(), Some(&decimal(&digits)));
    }

    #[test]
    fn test_big_decimal_math_context() {
        let parser = BigDecimalParser::with(MathContext::new(
            NonZeroU64::new(3).unwrap(),
            Rounding::HalfUp,
        ));
        let (token, _) = parse(&parser, "1.2345").unwrap().unwrap();
        assert_eq!(token.as_big_decimal(), Some(&decimal("1.23")));
        assert_eq!(token.text(), "1.2345");
    }

    #[test]
    fn test_big_decimal_context_symbols() {
        let mut context = ParserContext::default();
        context.decimal.decimal_separator = ',';
        context.decimal.exponent_symbol = "x10^".to_string();

        let parser = BigDecimalParser::with(MathContext::UNLIMITED);
        let (token, _) = parse_with(&parser, "1,5X10^2", &context).unwrap().unwrap();
        assert_eq!(token.as_big_decimal(), Some(&decimal("150")));
    }

    #[test]
    fn test_double() {
        let parser = DoubleParser::with();
        let (token, _) = parse(&parser, "-1.5e2").unwrap().unwrap();
        assert_eq!(token.as_double(), Some(-150.0));

        let (token, _) = parse(&parser, "NaN").unwrap().unwrap();
        assert!(token.as_double().unwrap().is_nan());

        let (token, _) = parse(&parser, "-Infinity").unwrap().unwrap();
        assert_eq!(token.as_double(), Some(f64::NEG_INFINITY));
        assert_eq!(token.text(), "-Infinity");

        assert_eq!(parse(&parser, "--1"), Ok(None));
    }

    #[test]
    fn test_decimal_grouping_and_currency() {
        let parser = DecimalParser::with();
        let (token, rest) = parse(&parser, "-$1,234,567.50 USD").unwrap().unwrap();
        assert_eq!(token.as_big_decimal(), Some(&decimal("-1234567.50")));
        assert_eq!(token.text(), "-$1,234,567.50");
        assert_eq!(rest, " USD");

        // trailing separator is left behind
        let (token, rest) = parse(&parser, "12,").unwrap().unwrap();
        assert_eq!(token.text(), "12");
        assert_eq!(rest, ",");

        // no exponent
        let (token, rest) = parse(&parser, "1E5").unwrap().unwrap();
        assert_eq!(token.text(), "1");
        assert_eq!(rest, "E5");

        assert_eq!(parse(&parser, "$x"), Ok(None));
    }

    #[test]
    fn test_display() {
        assert_eq!(LongParser::with(10).unwrap().to_string(), "Long");
        assert_eq!(LongParser::with(16).unwrap().to_string(), "Long(16)");
        assert_eq!(DoubleParser::with().to_string(), "Double");
    }
}
