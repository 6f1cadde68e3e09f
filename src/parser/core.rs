//! # Core Parser Definitions
//!
//! This module defines the fundamental parser interface and error types
//! that form the foundation of kumi's parser combinator system.

use std::any::Any;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::config::ParserContext;
use crate::cursor::{CursorError, LineInfo, TextCursor};
use crate::error::KumiResult;
use crate::token::ParserToken;

/// Parser trait defines the core parsing interface.
///
/// A parser reads from the cursor and either
///
/// * returns `Ok(Some(token))` with the cursor advanced exactly past the
///   consumed text,
/// * returns `Ok(None)` (no-match) with the cursor left where it was, or
/// * returns `Err(ParseError)` when the input matched lexically but cannot be
///   accepted, or when a reporting parser escalates a no-match.
///
/// Implementations are stateless and shared through [`ParserRef`].
pub trait Parser: fmt::Debug + fmt::Display + Send + Sync + 'static {
    fn parse(&self, cursor: &mut TextCursor<'_>, context: &ParserContext) -> ParseResult;

    fn as_any(&self) -> &dyn Any;

    /// Structural equality against another parser of any type.
    fn equals(&self, other: &dyn Parser) -> bool;
}

/// Result type for parsing operations.
///
/// `Ok(None)` is a quiet no-match, `Err` a hard parse error.
pub type ParseResult = Result<Option<ParserToken>, ParseError>;

/// Hard parse errors.
///
/// These are never produced for an ordinary no-match and are not caught by
/// any combinator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Reported when a grammar that must match finds an unexpected character
    #[error("Unrecognized character {found:?} at {position} expected {expected}")]
    Unrecognized {
        found: char,
        position: LineInfo,
        expected: String,
    },
    /// Reported when a grammar that must match reaches the end of text
    #[error("End of text at {position} expected {expected}")]
    EndOfText { position: LineInfo, expected: String },
    #[error("missing terminating {close} at {position}")]
    MissingTerminator { close: String, position: LineInfo },
    #[error("invalid backslash escape char {found:?} at {position}")]
    InvalidEscape { found: char, position: LineInfo },
    #[error("invalid unicode escape char {found:?} at {position}")]
    InvalidUnicodeEscape { found: char, position: LineInfo },
    #[error("Number overflow {text:?} at {position}")]
    Overflow { text: String, position: LineInfo },
    #[error("Exponent out of range {text:?} at {position}")]
    ExponentOutOfRange { text: String, position: LineInfo },
    #[error("Invalid date/time {text:?} at {position}: {message}")]
    InvalidDateTime {
        text: String,
        message: String,
        position: LineInfo,
    },
    /// Explicit failure
    #[error("{message} at {position}")]
    Failure { message: String, position: LineInfo },
    #[error("Cursor error: {0}")]
    Cursor(#[from] CursorError),
}

impl ParseError {
    pub fn failure(message: impl Into<String>, cursor: &TextCursor<'_>) -> Self {
        ParseError::Failure {
            message: message.into(),
            position: cursor.line_info(),
        }
    }

    pub fn get_position(&self) -> &LineInfo {
        match self {
            ParseError::Unrecognized { position, .. } => position,
            ParseError::EndOfText { position, .. } => position,
            ParseError::MissingTerminator { position, .. } => position,
            ParseError::InvalidEscape { position, .. } => position,
            ParseError::InvalidUnicodeEscape { position, .. } => position,
            ParseError::Overflow { position, .. } => position,
            ParseError::ExponentOutOfRange { position, .. } => position,
            ParseError::InvalidDateTime { position, .. } => position,
            ParseError::Failure { position, .. } => position,
            ParseError::Cursor(CursorError::EndOfText(position)) => position,
        }
    }
}

/// Structural equality helper for [`Parser::equals`] implementations.
pub(crate) fn same<T: PartialEq + 'static>(this: &T, other: &dyn Parser) -> bool {
    other
        .as_any()
        .downcast_ref::<T>()
        .is_some_and(|other| this == other)
}

/// A cheap to clone, shareable handle to a parser.
///
/// Two handles are equal when they point at the same parser instance or the
/// parsers are structurally equal.
#[derive(Clone)]
pub struct ParserRef(Arc<dyn Parser>);

impl ParserRef {
    pub fn new<P: Parser>(parser: P) -> Self {
        Self(Arc::new(parser))
    }

    pub fn parse(&self, cursor: &mut TextCursor<'_>, context: &ParserContext) -> ParseResult {
        let start = cursor.save();
        let result = self.0.parse(cursor, context);

        match &result {
            Ok(Some(token)) => {
                tracing::trace!(
                    target: "kumi::parser",
                    parser = %self.0,
                    offset = start.offset(),
                    text = token.text(),
                    "matched"
                );
            }
            Ok(None) => {
                debug_assert_eq!(cursor.save(), start, "{} consumed input on no-match", self.0);
                tracing::trace!(
                    target: "kumi::parser",
                    parser = %self.0,
                    offset = start.offset(),
                    "no match"
                );
            }
            Err(e) => {
                tracing::debug!(
                    target: "kumi::parser",
                    parser = %self.0,
                    error = %e,
                    "parse error"
                );
            }
        }

        result
    }

    /// Parses `text` from its beginning with a fresh cursor.
    ///
    /// Returns the token and the unconsumed remainder.
    #[tracing::instrument(level = "debug", skip(self, context), fields(parser = %self.0))]
    pub fn parse_text<'a>(
        &self,
        text: &'a str,
        context: &ParserContext,
    ) -> Result<Option<(ParserToken, &'a str)>, ParseError> {
        let mut cursor = TextCursor::new(text);
        Ok(self
            .parse(&mut cursor, context)?
            .map(|token| (token, cursor.remaining())))
    }

    /// Like [`ParserRef::parse_text`], with the context loaded from a JSON
    /// file.
    pub fn parse_text_with_context_file<'a, P: AsRef<Path>>(
        &self,
        text: &'a str,
        path: P,
    ) -> KumiResult<Option<(ParserToken, &'a str)>> {
        let context = ParserContext::from_file(path)?;
        Ok(self.parse_text(text, &context)?)
    }

    pub fn ptr_eq(&self, other: &ParserRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn downcast_ref<T: Parser>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn as_parser(&self) -> &dyn Parser {
        self.0.as_ref()
    }
}

impl PartialEq for ParserRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0.equals(other.0.as_ref())
    }
}

impl fmt::Display for ParserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for ParserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl<P: Parser> From<P> for ParserRef {
    fn from(parser: P) -> Self {
        ParserRef::new(parser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct AnyChar;

    impl fmt::Display for AnyChar {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("ANY")
        }
    }

    impl Parser for AnyChar {
        fn parse(&self, cursor: &mut TextCursor<'_>, _context: &ParserContext) -> ParseResult {
            let start = cursor.save();
            match cursor.peek() {
                Some(c) => {
                    cursor.next()?;
                    Ok(Some(ParserToken::character(c, cursor.text_since(start))))
                }
                None => Ok(None),
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn equals(&self, other: &dyn Parser) -> bool {
            same(self, other)
        }
    }

    #[test]
    fn test_parse_text() {
        let parser = ParserRef::new(AnyChar);
        let context = ParserContext::default();

        let (token, rest) = parser.parse_text("xyz", &context).unwrap().unwrap();
        assert_eq!(token, ParserToken::character('x', "x"));
        assert_eq!(rest, "yz");

        assert_eq!(parser.parse_text("", &context), Ok(None));
    }

    #[test]
    fn test_equality() {
        let a = ParserRef::new(AnyChar);
        let b = ParserRef::new(AnyChar);
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);
        assert!(a.downcast_ref::<AnyChar>().is_some());
    }

    #[test]
    fn test_error_position() {
        let mut cursor = TextCursor::new("ab");
        cursor.next().unwrap();
        let error = ParseError::failure("boom", &cursor);
        assert_eq!(error.get_position().column, 2);
        assert_eq!(error.to_string(), "boom at (1,2) \"ab\"");
    }
}
