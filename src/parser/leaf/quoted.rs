//! Quoted string literals with backslash escapes.
//!
//! Supported escapes are `\0 \t \n \r \f \' \" \\` and `\uXXXX`. A high
//! surrogate escape must be followed by a low surrogate escape; the pair
//! decodes to one character.

use std::any::Any;
use std::fmt;

use crate::config::ParserContext;
use crate::cursor::TextCursor;
use crate::error::BuildError;
use crate::parser::core::{same, ParseError, ParseResult, Parser, ParserRef};
use crate::token::ParserToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteKind {
    Single,
    Double,
    Surround,
}

/// Matches `open`, then content up to the first unescaped `close`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotedParser {
    open: String,
    close: String,
    kind: QuoteKind,
}

impl QuotedParser {
    /// `'...'` producing a `SingleQuoted` token.
    pub fn single_quoted() -> ParserRef {
        QuotedParser {
            open: "'".to_string(),
            close: "'".to_string(),
            kind: QuoteKind::Single,
        }
        .into()
    }

    /// `"..."` producing a `DoubleQuoted` token.
    pub fn double_quoted() -> ParserRef {
        QuotedParser {
            open: "\"".to_string(),
            close: "\"".to_string(),
            kind: QuoteKind::Double,
        }
        .into()
    }

    /// Arbitrary, possibly multi-character delimiters producing a `String`
    /// token.
    pub fn surround(open: impl Into<String>, close: impl Into<String>) -> Result<ParserRef, BuildError> {
        let (open, close) = (open.into(), close.into());
        if open.is_empty() {
            return Err(BuildError::Empty("open delimiter"));
        }
        if close.is_empty() {
            return Err(BuildError::Empty("close delimiter"));
        }
        Ok(QuotedParser {
            open,
            close,
            kind: QuoteKind::Surround,
        }
        .into())
    }

    fn missing_terminator(&self, cursor: &TextCursor<'_>) -> ParseError {
        ParseError::MissingTerminator {
            close: self.close.clone(),
            position: cursor.line_info(),
        }
    }

    /// Reads the escape after a backslash, leaving the cursor after it.
    fn escape(&self, cursor: &mut TextCursor<'_>) -> Result<char, ParseError> {
        let c = cursor.peek().ok_or_else(|| self.missing_terminator(cursor))?;
        let unescaped = match c {
            '0' => '\0',
            't' => '\t',
            'n' => '\n',
            'r' => '\r',
            'f' => '\u{c}',
            '\'' => '\'',
            '"' => '"',
            '\\' => '\\',
            'u' => {
                cursor.next()?;
                return self.unicode_escape(cursor);
            }
            found => {
                return Err(ParseError::InvalidEscape {
                    found,
                    position: cursor.line_info(),
                })
            }
        };
        cursor.next()?;
        Ok(unescaped)
    }

    fn unicode_escape(&self, cursor: &mut TextCursor<'_>) -> Result<char, ParseError> {
        let high = self.hex4(cursor)?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high).ok_or_else(|| self.invalid_unicode(cursor));
        }

        if !cursor.eat("\\u") {
            return Err(self.invalid_unicode(cursor));
        }
        let low = self.hex4(cursor)?;
        char::decode_utf16([high as u16, low as u16])
            .next()
            .and_then(Result::ok)
            .ok_or_else(|| self.invalid_unicode(cursor))
    }

    fn hex4(&self, cursor: &mut TextCursor<'_>) -> Result<u32, ParseError> {
        let mut value = 0;
        for _ in 0..4 {
            let c = cursor.peek().ok_or_else(|| self.missing_terminator(cursor))?;
            let digit = c.to_digit(16).ok_or_else(|| ParseError::InvalidUnicodeEscape {
                found: c,
                position: cursor.line_info(),
            })?;
            value = value * 16 + digit;
            cursor.next()?;
        }
        Ok(value)
    }

    fn invalid_unicode(&self, cursor: &TextCursor<'_>) -> ParseError {
        match cursor.peek() {
            Some(found) => ParseError::InvalidUnicodeEscape {
                found,
                position: cursor.line_info(),
            },
            None => self.missing_terminator(cursor),
        }
    }
}

impl Parser for QuotedParser {
    fn parse(&self, cursor: &mut TextCursor<'_>, _context: &ParserContext) -> ParseResult {
        let start = cursor.save();
        if !cursor.eat(&self.open) {
            return Ok(None);
        }

        let mut value = String::new();
        loop {
            if cursor.eat(&self.close) {
                break;
            }
            match cursor.peek() {
                None => return Err(self.missing_terminator(cursor)),
                Some('\\') => {
                    cursor.next()?;
                    value.push(self.escape(cursor)?);
                }
                Some(c) => {
                    value.push(c);
                    cursor.next()?;
                }
            }
        }

        let text = cursor.text_since(start);
        Ok(Some(match self.kind {
            QuoteKind::Single => ParserToken::single_quoted(value, text),
            QuoteKind::Double => ParserToken::double_quoted(value, text),
            QuoteKind::Surround => ParserToken::string(value, text),
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Parser) -> bool {
        same(self, other)
    }
}

impl fmt::Display for QuotedParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            QuoteKind::Single => f.write_str("SINGLE_QUOTED"),
            QuoteKind::Double => f.write_str("DOUBLE_QUOTED"),
            QuoteKind::Surround => write!(f, "{}...{}", self.open, self.close),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(parser: &ParserRef, text: &str) -> ParseResult {
        let mut cursor = TextCursor::new(text);
        parser.parse(&mut cursor, &ParserContext::default())
    }

    #[test]
    fn test_double_quoted() {
        let parser = QuotedParser::double_quoted();
        assert_eq!(
            parse(&parser, r#""abc" rest"#),
            Ok(Some(ParserToken::double_quoted("abc", r#""abc""#)))
        );
        assert_eq!(parse(&parser, "abc"), Ok(None));
    }

    #[test]
    fn test_single_quoted_escapes() {
        let parser = QuotedParser::single_quoted();
        let text = r#"'a\'b\"c\\d\t\n\r\f\0'"#;
        assert_eq!(
            parse(&parser, text),
            Ok(Some(ParserToken::single_quoted(
                "a'b\"c\\d\t\n\r\u{c}\0",
                text
            )))
        );
    }

    #[test]
    fn test_unicode_escapes() {
        let parser = QuotedParser::double_quoted();
        let token = parse(&parser, r#""\u0041\u00e9""#).unwrap().unwrap();
        assert_eq!(token.as_str(), Some("Aé"));

        // surrogate pair
        let token = parse(&parser, r#""\ud83d\ude00""#).unwrap().unwrap();
        assert_eq!(token.as_str(), Some("😀"));
    }

    #[test]
    fn test_invalid_backslash_escape() {
        let parser = QuotedParser::double_quoted();
        let error = parse(&parser, r#""ab\!c""#).unwrap_err();
        assert!(error
            .to_string()
            .contains("invalid backslash escape char '!'"));
    }

    #[test]
    fn test_invalid_unicode_escape() {
        let parser = QuotedParser::double_quoted();
        let error = parse(&parser, r#""\u00G0""#).unwrap_err();
        assert!(error.to_string().contains("invalid unicode escape char 'G'"));
    }

    #[test]
    fn test_missing_terminator() {
        let parser = QuotedParser::double_quoted();
        let error = parse(&parser, r#""abc"#).unwrap_err();
        assert!(error.to_string().contains("missing terminating \""));
    }

    #[test]
    fn test_surround() {
        let parser = QuotedParser::surround("<<", ">>").unwrap();
        assert_eq!(
            parse(&parser, "<<a>b>>!"),
            Ok(Some(ParserToken::string("a>b", "<<a>b>>")))
        );
        assert_eq!(parser.to_string(), "<<...>>");

        assert_eq!(
            QuotedParser::surround("", ">"),
            Err(BuildError::Empty("open delimiter"))
        );
    }
}
