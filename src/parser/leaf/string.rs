//! Literal string matching.

use std::any::Any;
use std::fmt;

use strum::{AsRefStr, Display, EnumString};

use crate::config::ParserContext;
use crate::cursor::TextCursor;
use crate::error::BuildError;
use crate::parser::core::{same, ParseResult, Parser, ParserRef};
use crate::token::ParserToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum CaseSensitivity {
    #[default]
    Sensitive,
    Insensitive,
}

impl CaseSensitivity {
    pub fn equals(&self, a: char, b: char) -> bool {
        match self {
            CaseSensitivity::Sensitive => a == b,
            CaseSensitivity::Insensitive => a == b || a.to_lowercase().eq(b.to_lowercase()),
        }
    }
}

/// Matches a literal string.
///
/// The token value is the literal itself, the token text is the input that
/// was consumed (which differs from the literal only in case when matching
/// case insensitively).
#[derive(Debug, Clone, PartialEq)]
pub struct StringParser {
    literal: String,
    case: CaseSensitivity,
}

impl StringParser {
    pub fn with(literal: impl Into<String>, case: CaseSensitivity) -> Result<ParserRef, BuildError> {
        let literal = literal.into();
        if literal.is_empty() {
            return Err(BuildError::Empty("string literal"));
        }
        Ok(StringParser { literal, case }.into())
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }
}

impl Parser for StringParser {
    fn parse(&self, cursor: &mut TextCursor<'_>, _context: &ParserContext) -> ParseResult {
        let start = cursor.save();

        for expected in self.literal.chars() {
            match cursor.peek() {
                Some(c) if self.case.equals(expected, c) => cursor.next()?,
                _ => {
                    cursor.restore(start);
                    return Ok(None);
                }
            }
        }

        Ok(Some(ParserToken::string(
            self.literal.as_str(),
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

impl fmt::Display for StringParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.literal)
    }
}
