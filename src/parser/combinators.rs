//! # Parser Combinators
//!
//! Combinators build new parsers out of existing [`ParserRef`]s. Each one is a
//! small struct implementing [`Parser`]; the extension methods at the bottom
//! of this module (`or`, `optional`, `repeated`, ...) are the usual way to
//! assemble them.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock};

use super::core::{same, ParseError, ParseResult, Parser, ParserRef};
use super::reporter::{ParserReporter, ReportCondition};
use crate::config::ParserContext;
use crate::cursor::TextCursor;
use crate::error::BuildError;
use crate::token::binary::{self, BinaryOperatorClassifier};
use crate::token::ParserToken;

/// One slot of a [`SequenceParser`].
#[derive(Debug, Clone)]
struct Slot {
    parser: ParserRef,
    required: bool,
    name: String,
}

/// Slot names only label `Missing` tokens and do not take part in equality.
impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        self.required == other.required && self.parser == other.parser
    }
}

/// SequenceParser: matches its slots in order.
///
/// A required slot that does not match rewinds the cursor to the start of the
/// sequence and the whole sequence does not match. An optional slot that does
/// not match contributes a `Missing` token named after the slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceParser {
    slots: Vec<Slot>,
}

impl SequenceParser {
    pub fn builder() -> SequenceParserBuilder {
        SequenceParserBuilder::default()
    }
}

impl Parser for SequenceParser {
    fn parse(&self, cursor: &mut TextCursor<'_>, context: &ParserContext) -> ParseResult {
        let start = cursor.save();
        let mut children = Vec::with_capacity(self.slots.len());

        for slot in &self.slots {
            match slot.parser.parse(cursor, context)? {
                Some(token) => children.push(token),
                None if slot.required => {
                    tracing::trace!(
                        target: "kumi::parser::sequence",
                        slot = %slot.parser,
                        offset = cursor.offset(),
                        "required slot not matched"
                    );
                    cursor.restore(start);
                    return Ok(None);
                }
                None => children.push(ParserToken::missing(slot.name.as_str())),
            }
        }

        Ok(Some(ParserToken::sequence(children)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Parser) -> bool {
        same(self, other)
    }
}

impl fmt::Display for SequenceParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if slot.required {
                write!(f, "{}", slot.parser)?;
            } else {
                write!(f, "[{}]", slot.parser)?;
            }
        }
        f.write_str(")")
    }
}

/// Accumulates the slots of a [`SequenceParser`].
#[derive(Debug, Clone, Default)]
pub struct SequenceParserBuilder {
    slots: Vec<Slot>,
}

impl SequenceParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, parser: impl Into<ParserRef>) -> Self {
        let parser = parser.into();
        self.slots.push(Slot {
            name: parser.to_string(),
            parser,
            required: true,
        });
        self
    }

    /// Adds an optional slot whose `Missing` token is named after the parser.
    pub fn optional(self, parser: impl Into<ParserRef>) -> Self {
        let parser = parser.into();
        let name = parser.to_string();
        self.optional_named(parser, name)
    }

    pub fn optional_named(mut self, parser: impl Into<ParserRef>, name: impl Into<String>) -> Self {
        self.slots.push(Slot {
            parser: parser.into(),
            required: false,
            name: name.into(),
        });
        self
    }

    pub fn build(self) -> Result<ParserRef, BuildError> {
        if self.slots.is_empty() {
            return Err(BuildError::Empty("sequence"));
        }
        Ok(SequenceParser { slots: self.slots }.into())
    }
}

/// AlternativesParser: the first alternative that matches wins.
#[derive(Debug, Clone, PartialEq)]
pub struct AlternativesParser {
    parsers: Vec<ParserRef>,
}

impl AlternativesParser {
    /// Combines `parsers` into one alternation.
    ///
    /// A single parser is returned as is. Nested alternatives, including
    /// alternatives behind a display override, are spliced into the new list.
    pub fn with(parsers: Vec<ParserRef>) -> Result<ParserRef, BuildError> {
        if parsers.is_empty() {
            return Err(BuildError::Empty("alternatives"));
        }
        Ok(Self::merge(parsers))
    }

    fn merge(mut parsers: Vec<ParserRef>) -> ParserRef {
        if parsers.len() == 1 {
            return parsers.remove(0);
        }

        let mut merged = Vec::with_capacity(parsers.len());
        for parser in parsers {
            match Self::nested(&parser) {
                Some(alternatives) => merged.extend(alternatives.parsers.iter().cloned()),
                None => merged.push(parser),
            }
        }
        AlternativesParser { parsers: merged }.into()
    }

    fn nested(parser: &ParserRef) -> Option<&AlternativesParser> {
        parser.downcast_ref::<AlternativesParser>().or_else(|| {
            parser
                .downcast_ref::<CustomToStringParser>()
                .and_then(|custom| custom.parser.downcast_ref::<AlternativesParser>())
        })
    }

    pub fn parsers(&self) -> &[ParserRef] {
        &self.parsers
    }
}

impl Parser for AlternativesParser {
    fn parse(&self, cursor: &mut TextCursor<'_>, context: &ParserContext) -> ParseResult {
        for parser in &self.parsers {
            if let Some(token) = parser.parse(cursor, context)? {
                return Ok(Some(token));
            }
        }
        Ok(None)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Parser) -> bool {
        same(self, other)
    }
}

impl fmt::Display for AlternativesParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, parser) in self.parsers.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{}", parser)?;
        }
        f.write_str(")")
    }
}

/// RepeatedParser: one or more matches of the wrapped parser.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatedParser {
    parser: ParserRef,
}

impl RepeatedParser {
    /// Repeating a repeated parser returns it unchanged.
    pub fn with(parser: ParserRef) -> ParserRef {
        if parser.downcast_ref::<RepeatedParser>().is_some() {
            return parser;
        }
        RepeatedParser { parser }.into()
    }
}

impl Parser for RepeatedParser {
    fn parse(&self, cursor: &mut TextCursor<'_>, context: &ParserContext) -> ParseResult {
        let mut children = Vec::new();

        loop {
            let before = cursor.offset();
            match self.parser.parse(cursor, context)? {
                Some(token) => {
                    children.push(token);
                    // an empty match would repeat forever
                    if cursor.offset() == before {
                        break;
                    }
                }
                None => break,
            }
        }

        if children.is_empty() {
            return Ok(None);
        }
        Ok(Some(ParserToken::repeated(children)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Parser) -> bool {
        same(self, other)
    }
}

impl fmt::Display for RepeatedParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.parser)
    }
}

/// OptionalParser: always matches, yielding `Missing` when the wrapped parser
/// does not.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalParser {
    parser: ParserRef,
    missing: String,
}

impl OptionalParser {
    pub fn new(parser: ParserRef, missing: impl Into<String>) -> Self {
        Self {
            parser,
            missing: missing.into(),
        }
    }
}

impl Parser for OptionalParser {
    fn parse(&self, cursor: &mut TextCursor<'_>, context: &ParserContext) -> ParseResult {
        Ok(Some(
            self.parser
                .parse(cursor, context)?
                .unwrap_or_else(|| ParserToken::missing(self.missing.as_str())),
        ))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Parser) -> bool {
        same(self, other)
    }
}

impl fmt::Display for OptionalParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.parser)
    }
}

/// AndNotParser: matches `left` unless `right` matches at the same position.
///
/// `right` is only a lookahead and never consumes input.
#[derive(Debug, Clone, PartialEq)]
pub struct AndNotParser {
    left: ParserRef,
    right: ParserRef,
}

impl AndNotParser {
    pub fn new(left: ParserRef, right: ParserRef) -> Self {
        Self { left, right }
    }
}

impl Parser for AndNotParser {
    fn parse(&self, cursor: &mut TextCursor<'_>, context: &ParserContext) -> ParseResult {
        let start = cursor.save();
        if self.right.parse(cursor, context)?.is_some() {
            cursor.restore(start);
            return Ok(None);
        }
        self.left.parse(cursor, context)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Parser) -> bool {
        same(self, other)
    }
}

impl fmt::Display for AndNotParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} - {})", self.left, self.right)
    }
}

pub type TransformFn =
    Arc<dyn Fn(ParserToken, &ParserContext) -> Result<ParserToken, ParseError> + Send + Sync>;

/// TransformingParser: maps the token of a successful match.
#[derive(Clone)]
pub struct TransformingParser {
    parser: ParserRef,
    transform: TransformFn,
}

impl TransformingParser {
    pub fn new<F>(parser: ParserRef, transform: F) -> Self
    where
        F: Fn(ParserToken, &ParserContext) -> Result<ParserToken, ParseError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            parser,
            transform: Arc::new(transform),
        }
    }
}

impl Parser for TransformingParser {
    fn parse(&self, cursor: &mut TextCursor<'_>, context: &ParserContext) -> ParseResult {
        match self.parser.parse(cursor, context)? {
            Some(token) => (self.transform)(token, context).map(Some),
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

/// Equal when wrapping equal parsers with the same transform function.
impl PartialEq for TransformingParser {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.transform, &other.transform) && self.parser == other.parser
    }
}

impl fmt::Debug for TransformingParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformingParser")
            .field("parser", &self.parser)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for TransformingParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parser)
    }
}

/// ReportingParser: turns a no-match into a hard error when its condition
/// holds.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportingParser<R> {
    condition: ReportCondition,
    reporter: R,
    parser: ParserRef,
}

impl<R: ParserReporter + PartialEq> ReportingParser<R> {
    pub fn new(condition: ReportCondition, reporter: R, parser: ParserRef) -> Self {
        Self {
            condition,
            reporter,
            parser,
        }
    }
}

impl<R: ParserReporter + PartialEq> Parser for ReportingParser<R> {
    fn parse(&self, cursor: &mut TextCursor<'_>, context: &ParserContext) -> ParseResult {
        if let Some(token) = self.parser.parse(cursor, context)? {
            return Ok(Some(token));
        }
        if !self.condition.holds(cursor) {
            return Ok(None);
        }

        let error = self.reporter.report(cursor, context, self.parser.as_parser());
        tracing::debug!(
            target: "kumi::parser::report",
            parser = %self.parser,
            condition = %self.condition,
            error = %error,
            "escalating no-match"
        );
        Err(error)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Parser) -> bool {
        same(self, other)
    }
}

impl<R> fmt::Display for ReportingParser<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parser)
    }
}

/// CustomToStringParser: overrides the display string of another parser.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomToStringParser {
    parser: ParserRef,
    text: String,
}

impl CustomToStringParser {
    /// Wraps `parser` so that it displays as `text`.
    ///
    /// Returns `parser` itself when it already displays as `text`. An existing
    /// override is replaced rather than wrapped again.
    pub fn with(parser: ParserRef, text: impl Into<String>) -> ParserRef {
        let text = text.into();
        let parser = match parser.downcast_ref::<CustomToStringParser>() {
            Some(custom) if custom.text != text => custom.parser.clone(),
            _ => parser,
        };
        if parser.to_string() == text {
            return parser;
        }
        CustomToStringParser { parser, text }.into()
    }

    pub fn wrapped(&self) -> &ParserRef {
        &self.parser
    }
}

impl Parser for CustomToStringParser {
    fn parse(&self, cursor: &mut TextCursor<'_>, context: &ParserContext) -> ParseResult {
        self.parser.parse(cursor, context)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Parser) -> bool {
        same(self, other)
    }
}

impl fmt::Display for CustomToStringParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// FixedParser: returns a pre-built result without consuming input.
///
/// With `None` it never matches.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedParser {
    token: Option<ParserToken>,
}

impl FixedParser {
    pub fn new(token: Option<ParserToken>) -> Self {
        Self { token }
    }
}

impl Parser for FixedParser {
    fn parse(&self, _cursor: &mut TextCursor<'_>, _context: &ParserContext) -> ParseResult {
        Ok(self.token.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Parser) -> bool {
        same(self, other)
    }
}

impl fmt::Display for FixedParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token {
            Some(token) => write!(f, "{:?}", token.text()),
            None => f.write_str("<never>"),
        }
    }
}

/// EndOfTextParser: matches the empty string at the end of the text only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EndOfTextParser;

impl Parser for EndOfTextParser {
    fn parse(&self, cursor: &mut TextCursor<'_>, _context: &ParserContext) -> ParseResult {
        if cursor.at_end() {
            Ok(Some(ParserToken::string("", "")))
        } else {
            Ok(None)
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Parser) -> bool {
        same(self, other)
    }
}

impl fmt::Display for EndOfTextParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<end of text>")
    }
}

type ParserFactory = Arc<dyn Fn() -> ParserRef + Send + Sync>;

/// LazyParser: builds its parser on first use, allowing recursive grammars.
///
/// Displays as its name so that printing a recursive grammar terminates.
pub struct LazyParser {
    name: String,
    factory: ParserFactory,
    parser: OnceLock<ParserRef>,
}

impl LazyParser {
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> ParserRef + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            factory: Arc::new(factory),
            parser: OnceLock::new(),
        }
    }

    fn parser(&self) -> &ParserRef {
        self.parser.get_or_init(|| (self.factory)())
    }
}

impl Parser for LazyParser {
    fn parse(&self, cursor: &mut TextCursor<'_>, context: &ParserContext) -> ParseResult {
        self.parser().parse(cursor, context)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Parser) -> bool {
        same(self, other)
    }
}

impl PartialEq for LazyParser {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.factory, &other.factory)
    }
}

impl fmt::Debug for LazyParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyParser")
            .field("name", &self.name)
            .field("initialized", &self.parser.get().is_some())
            .finish()
    }
}

impl fmt::Display for LazyParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Composition methods.
impl ParserRef {
    /// `self` or else `other`. Chains flatten into one alternation.
    pub fn or(&self, other: impl Into<ParserRef>) -> ParserRef {
        AlternativesParser::merge(vec![self.clone(), other.into()])
    }

    /// Always matches, with a `Missing` token named after `self` on no-match.
    pub fn optional(&self) -> ParserRef {
        OptionalParser::new(self.clone(), self.to_string()).into()
    }

    pub fn optional_named(&self, missing: impl Into<String>) -> ParserRef {
        OptionalParser::new(self.clone(), missing).into()
    }

    pub fn repeated(&self) -> ParserRef {
        RepeatedParser::with(self.clone())
    }

    pub fn transform<F>(&self, transform: F) -> ParserRef
    where
        F: Fn(ParserToken, &ParserContext) -> Result<ParserToken, ParseError>
            + Send
            + Sync
            + 'static,
    {
        TransformingParser::new(self.clone(), transform).into()
    }

    pub fn and_not(&self, other: impl Into<ParserRef>) -> ParserRef {
        AndNotParser::new(self.clone(), other.into()).into()
    }

    /// A two slot sequence of `self` then `other`, both required.
    pub fn and_then(&self, other: impl Into<ParserRef>) -> ParserRef {
        let other = other.into();
        SequenceParser {
            slots: vec![
                Slot {
                    name: self.to_string(),
                    parser: self.clone(),
                    required: true,
                },
                Slot {
                    name: other.to_string(),
                    parser: other,
                    required: true,
                },
            ],
        }
        .into()
    }

    /// Reports every no-match through `reporter`.
    pub fn or_report<R: ParserReporter + PartialEq>(&self, reporter: R) -> ParserRef {
        ReportingParser::new(ReportCondition::Always, reporter, self.clone()).into()
    }

    /// Reports a no-match through `reporter` unless the cursor is at the end.
    pub fn or_fail_if_not_at_end<R: ParserReporter + PartialEq>(&self, reporter: R) -> ParserRef {
        ReportingParser::new(ReportCondition::NotAtEnd, reporter, self.clone()).into()
    }

    pub fn set_to_string(&self, text: impl Into<String>) -> ParserRef {
        CustomToStringParser::with(self.clone(), text)
    }

    /// Regroups each matched token into binary expressions using `classifier`.
    pub fn binary_operators<C>(&self, classifier: C) -> ParserRef
    where
        C: BinaryOperatorClassifier + 'static,
    {
        let classifier = Arc::new(classifier);
        self.transform(move |token, _context| Ok(binary::transform(&token, classifier.as_ref())))
    }
}
