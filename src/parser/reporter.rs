//! Escalation of a no-match into a hard [`ParseError`].

use std::fmt;

use strum::{AsRefStr, Display, EnumString};

use super::core::{ParseError, Parser};
use crate::config::ParserContext;
use crate::cursor::TextCursor;

/// When a reporting parser escalates a no-match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ReportCondition {
    Always,
    NotAtEnd,
}

impl ReportCondition {
    pub fn holds(&self, cursor: &TextCursor<'_>) -> bool {
        match self {
            ReportCondition::Always => true,
            ReportCondition::NotAtEnd => !cursor.at_end(),
        }
    }
}

/// Builds the error raised for a parser that had to match but did not.
pub trait ParserReporter: fmt::Debug + Send + Sync + 'static {
    fn report(
        &self,
        cursor: &TextCursor<'_>,
        context: &ParserContext,
        parser: &dyn Parser,
    ) -> ParseError;
}

/// Reports the character under the cursor, or the end of text, together with
/// the display string of the parser that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DefaultReporter;

impl ParserReporter for DefaultReporter {
    fn report(
        &self,
        cursor: &TextCursor<'_>,
        _context: &ParserContext,
        parser: &dyn Parser,
    ) -> ParseError {
        let position = cursor.line_info();
        let expected = parser.to_string();
        match cursor.peek() {
            Some(found) => ParseError::Unrecognized {
                found,
                position,
                expected,
            },
            None => ParseError::EndOfText { position, expected },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::leaf::string::{CaseSensitivity, StringParser};

    #[test]
    fn test_condition() {
        let mut cursor = TextCursor::new("a");
        assert!(ReportCondition::Always.holds(&cursor));
        assert!(ReportCondition::NotAtEnd.holds(&cursor));

        cursor.next().unwrap();
        assert!(ReportCondition::Always.holds(&cursor));
        assert!(!ReportCondition::NotAtEnd.holds(&cursor));

        assert_eq!(ReportCondition::NotAtEnd.to_string(), "not_at_end");
        assert_eq!("always".parse::<ReportCondition>(), Ok(ReportCondition::Always));
    }

    #[test]
    fn test_default_reporter_position() {
        let parser = StringParser::with("end", CaseSensitivity::Sensitive).unwrap();
        let mut cursor = TextCursor::new("line one\nline two");
        for _ in 0..14 {
            cursor.next().unwrap();
        }

        let error = DefaultReporter.report(&cursor, &ParserContext::default(), parser.as_parser());
        assert_eq!(
            error.to_string(),
            "Unrecognized character 't' at (2,6) \"line two\" expected \"end\""
        );
    }
}
