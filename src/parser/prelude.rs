//! Free constructor functions for assembling grammars.
//!
//! ```
//! use kumi::parser::prelude::*;
//! use kumi::predicate::CharPredicate;
//!
//! let number = chars(CharPredicate::ascii_digit(), 1, usize::MAX).unwrap();
//! let list = sequence()
//!     .required(number.clone())
//!     .optional(string(",").unwrap().and_then(number))
//!     .build()
//!     .unwrap();
//! assert!(list.parse_text("1,2", &Default::default()).unwrap().is_some());
//! ```

use super::combinators::{
    AlternativesParser, EndOfTextParser, FixedParser, LazyParser, SequenceParser,
    SequenceParserBuilder,
};
use super::core::ParserRef;
use super::leaf::{
    BigDecimalParser, BigIntegerParser, CaseSensitivity, CharacterParser, DateTimeParser,
    DecimalParser, DoubleParser, LongParser, QuotedParser, StringCharPredicateParser,
    StringInitialAndPartCharPredicateParser, StringParser,
};
use crate::config::MathContext;
use crate::error::BuildError;
use crate::predicate::CharPredicate;
use crate::token::ParserToken;

pub use super::leaf::whitespace;

pub fn string(literal: impl Into<String>) -> Result<ParserRef, BuildError> {
    StringParser::with(literal, CaseSensitivity::Sensitive)
}

pub fn string_ignore_case(literal: impl Into<String>) -> Result<ParserRef, BuildError> {
    StringParser::with(literal, CaseSensitivity::Insensitive)
}

pub fn character(predicate: CharPredicate) -> ParserRef {
    CharacterParser::with(predicate)
}

/// `min..=max` characters matching `predicate`.
pub fn chars(predicate: CharPredicate, min: usize, max: usize) -> Result<ParserRef, BuildError> {
    StringCharPredicateParser::with(predicate, min, max)
}

/// One `initial` character followed by `part` characters, `min..=max` in total.
pub fn initial_and_part(
    initial: CharPredicate,
    part: CharPredicate,
    min: usize,
    max: usize,
) -> Result<ParserRef, BuildError> {
    StringInitialAndPartCharPredicateParser::with(initial, part, min, max)
}

pub fn sequence() -> SequenceParserBuilder {
    SequenceParser::builder()
}

pub fn alternatives(parsers: Vec<ParserRef>) -> Result<ParserRef, BuildError> {
    AlternativesParser::with(parsers)
}

/// Matches without consuming, producing `token`.
pub fn fixed(token: ParserToken) -> ParserRef {
    FixedParser::new(Some(token)).into()
}

/// Never matches.
pub fn never() -> ParserRef {
    FixedParser::new(None).into()
}

pub fn end_of_text() -> ParserRef {
    EndOfTextParser.into()
}

/// A parser built on first use, for recursive grammars.
pub fn lazy<F>(name: impl Into<String>, factory: F) -> ParserRef
where
    F: Fn() -> ParserRef + Send + Sync + 'static,
{
    LazyParser::new(name, factory).into()
}

pub fn single_quoted() -> ParserRef {
    QuotedParser::single_quoted()
}

pub fn double_quoted() -> ParserRef {
    QuotedParser::double_quoted()
}

pub fn surround(open: impl Into<String>, close: impl Into<String>) -> Result<ParserRef, BuildError> {
    QuotedParser::surround(open, close)
}

pub fn long(radix: u32) -> Result<ParserRef, BuildError> {
    LongParser::with(radix)
}

pub fn big_integer(radix: u32) -> Result<ParserRef, BuildError> {
    BigIntegerParser::with(radix)
}

pub fn big_decimal(math_context: MathContext) -> ParserRef {
    BigDecimalParser::with(math_context)
}

pub fn double() -> ParserRef {
    DoubleParser::with()
}

/// A locale formatted decimal, e.g. `-$1,234.50`.
pub fn decimal() -> ParserRef {
    DecimalParser::with()
}

pub fn local_date(pattern: &str) -> Result<ParserRef, BuildError> {
    DateTimeParser::local_date(pattern)
}

pub fn local_time(pattern: &str) -> Result<ParserRef, BuildError> {
    DateTimeParser::local_time(pattern)
}

pub fn local_date_time(pattern: &str) -> Result<ParserRef, BuildError> {
    DateTimeParser::local_date_time(pattern)
}

pub fn offset_time(pattern: &str) -> Result<ParserRef, BuildError> {
    DateTimeParser::offset_time(pattern)
}

pub fn offset_date_time(pattern: &str) -> Result<ParserRef, BuildError> {
    DateTimeParser::offset_date_time(pattern)
}

pub fn zoned_date_time(pattern: &str) -> Result<ParserRef, BuildError> {
    DateTimeParser::zoned_date_time(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserContext;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_comma_separated_longs() {
        let number = long(10).unwrap();
        let list = sequence()
            .required(number.clone())
            .required(
                sequence()
                    .required(string(",").unwrap())
                    .required(number)
                    .build()
                    .unwrap()
                    .repeated()
                    .optional_named("rest"),
            )
            .required(end_of_text())
            .build()
            .unwrap();

        let context = ParserContext::default();
        let (token, rest) = list.parse_text("1,-2,3", &context).unwrap().unwrap();
        assert_eq!(rest, "");
        assert_eq!(token.text(), "1,-2,3");

        let (token, _) = list.parse_text("7", &context).unwrap().unwrap();
        assert!(token.children()[1].is_missing());
        assert_eq!(list.parse_text("1,", &context), Ok(None));
    }

    #[test]
    fn test_fixed_and_never() {
        let context = ParserContext::default();
        let token = ParserToken::string("x", "");
        assert_eq!(
            fixed(token.clone()).parse_text("abc", &context),
            Ok(Some((token, "abc")))
        );
        assert_eq!(never().parse_text("abc", &context), Ok(None));
    }

    #[test]
    fn test_ignore_case_keyword() {
        let context = ParserContext::default();
        let select = string_ignore_case("select").unwrap();
        let (token, rest) = select.parse_text("SeLeCt *", &context).unwrap().unwrap();
        assert_eq!(token, ParserToken::string("select", "SeLeCt"));
        assert_eq!(rest, " *");
    }
}
