//! Parsers driven by a [`CharPredicate`].

use std::any::Any;
use std::fmt;

use crate::config::ParserContext;
use crate::cursor::TextCursor;
use crate::error::BuildError;
use crate::parser::core::{same, ParseResult, Parser, ParserRef};
use crate::predicate::CharPredicate;
use crate::token::ParserToken;

/// Matches a single character satisfying the predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterParser {
    predicate: CharPredicate,
}

impl CharacterParser {
    pub fn with(predicate: CharPredicate) -> ParserRef {
        CharacterParser { predicate }.into()
    }
}

impl Parser for CharacterParser {
    fn parse(&self, cursor: &mut TextCursor<'_>, _context: &ParserContext) -> ParseResult {
        match cursor.peek() {
            Some(c) if self.predicate.test(c) => {
                let start = cursor.save();
                cursor.next()?;
                Ok(Some(ParserToken::character(c, cursor.text_since(start))))
            }
            _ => Ok(None),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Parser) -> bool {
        same(self, other)
    }
}

impl fmt::Display for CharacterParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.predicate)
    }
}

/// What kind of leaf token a predicate string parser produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringKind {
    String,
    Whitespace,
}

/// Matches between `min` and `max` characters, the first satisfying
/// `initial` and the rest satisfying `part`.
///
/// Matching is greedy up to `max`. Fewer than `min` characters is a no-match.
#[derive(Debug, Clone, PartialEq)]
pub struct StringInitialAndPartCharPredicateParser {
    initial: CharPredicate,
    part: CharPredicate,
    min: usize,
    max: usize,
    kind: StringKind,
}

impl StringInitialAndPartCharPredicateParser {
    pub fn with(
        initial: CharPredicate,
        part: CharPredicate,
        min: usize,
        max: usize,
    ) -> Result<ParserRef, BuildError> {
        Ok(Self::new(initial, part, min, max, StringKind::String)?.into())
    }

    fn new(
        initial: CharPredicate,
        part: CharPredicate,
        min: usize,
        max: usize,
        kind: StringKind,
    ) -> Result<Self, BuildError> {
        if min == 0 || max < min {
            return Err(BuildError::InvalidLength { min, max });
        }
        Ok(Self {
            initial,
            part,
            min,
            max,
            kind,
        })
    }
}

impl Parser for StringInitialAndPartCharPredicateParser {
    fn parse(&self, cursor: &mut TextCursor<'_>, _context: &ParserContext) -> ParseResult {
        let start = cursor.save();
        let mut count = 0;

        while count < self.max {
            let predicate = if count == 0 {
                &self.initial
            } else {
                &self.part
            };
            match cursor.peek() {
                Some(c) if predicate.test(c) => {
                    cursor.next()?;
                    count += 1;
                }
                _ => break,
            }
        }

        if count < self.min {
            cursor.restore(start);
            return Ok(None);
        }

        let text = cursor.text_since(start);
        Ok(Some(match self.kind {
            StringKind::String => ParserToken::string(text, text),
            StringKind::Whitespace => ParserToken::whitespace(text),
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Parser) -> bool {
        same(self, other)
    }
}

impl fmt::Display for StringInitialAndPartCharPredicateParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.initial == self.part {
            write!(f, "{}", self.initial)?;
        } else {
            write!(f, "{}{}", self.initial, self.part)?;
        }
        if self.min != 1 || self.max != usize::MAX {
            if self.max == usize::MAX {
                write!(f, "{{{},}}", self.min)?;
            } else {
                write!(f, "{{{},{}}}", self.min, self.max)?;
            }
        }
        Ok(())
    }
}

/// Matches between `min` and `max` characters satisfying one predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct StringCharPredicateParser(StringInitialAndPartCharPredicateParser);

impl StringCharPredicateParser {
    pub fn with(predicate: CharPredicate, min: usize, max: usize) -> Result<ParserRef, BuildError> {
        let inner = StringInitialAndPartCharPredicateParser::new(
            predicate.clone(),
            predicate,
            min,
            max,
            StringKind::String,
        )?;
        Ok(StringCharPredicateParser(inner).into())
    }
}

impl Parser for StringCharPredicateParser {
    fn parse(&self, cursor: &mut TextCursor<'_>, context: &ParserContext) -> ParseResult {
        self.0.parse(cursor, context)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Parser) -> bool {
        same(self, other)
    }
}

impl fmt::Display for StringCharPredicateParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Matches one or more whitespace characters as a `Whitespace` token.
pub fn whitespace() -> ParserRef {
    let predicate = CharPredicate::whitespace();
    StringInitialAndPartCharPredicateParser {
        initial: predicate.clone(),
        part: predicate,
        min: 1,
        max: usize::MAX,
        kind: StringKind::Whitespace,
    }
    .into()
}
