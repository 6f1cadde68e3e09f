//! # Parser Tokens
//!
//! Every successful parse produces a [`ParserToken`]. A token records both the
//! semantic value and the exact text consumed from the input, so that the
//! text of a container always equals the concatenation of its children's text.
//!
//! ## Token Kinds
//!
//! * **Leaf tokens**: characters, strings, whitespace, comments, quoted
//!   literals, numbers and date/times, each a [`LeafToken`]
//! * **Missing**: placeholder for an optional slot that did not match
//! * **Containers**: [`ParserToken::Sequence`], [`ParserToken::Repeated`] and
//!   named [`ParserToken::Node`] tokens built by transforms
//!
//! Tokens are immutable. Operations like [`ParserToken::flat`] or
//! [`ParserToken::remove_noise`] return new tokens.
//!
//! ## Traversal
//!
//! * [`visitor`]: double dispatch with skip/continue control
//! * [`node`]: read-only node projection and path selectors
//! * [`binary`]: regroups flat operator sequences into binary expression trees

pub mod binary;
pub mod node;
pub mod visitor;

use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use num_bigint::BigInt;
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Identifies the variant of a [`ParserToken`].
///
/// The string form is also the node name used by the node projection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, IntoStaticStr,
)]
pub enum TokenKind {
    Character,
    String,
    Whitespace,
    Comment,
    SingleQuoted,
    DoubleQuoted,
    Long,
    BigInteger,
    BigDecimal,
    Double,
    LocalDate,
    LocalTime,
    LocalDateTime,
    OffsetTime,
    OffsetDateTime,
    ZonedDateTime,
    Missing,
    Sequence,
    Repeated,
    Node,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Missing required token at index {index} of {parent}")]
    Missing { index: usize, parent: String },
    #[error("Expected {expected} at index {index} but got {actual}")]
    WrongKind {
        index: usize,
        expected: TokenKind,
        actual: TokenKind,
    },
    #[error("{0} token has no children")]
    NotAContainer(TokenKind),
}

/// A value together with the text it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafToken<T> {
    value: T,
    text: String,
}

impl<T> LeafToken<T> {
    pub fn new(value: T, text: impl Into<String>) -> Self {
        Self {
            value,
            text: text.into(),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// A time of day with a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetTime {
    pub time: NaiveTime,
    pub offset: FixedOffset,
}

impl fmt::Display for OffsetTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.time, self.offset)
    }
}

/// Placeholder for an optional slot that did not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingToken {
    name: String,
}

impl MissingToken {
    /// Name of the slot that was skipped.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Ordered children of a sequence or repeated token.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerToken {
    children: Vec<ParserToken>,
    text: String,
}

impl ContainerToken {
    fn new(children: Vec<ParserToken>) -> Self {
        let text = concat_text(&children);
        Self { children, text }
    }

    pub fn children(&self) -> &[ParserToken] {
        &self.children
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A named container, typically built by a transform or operator classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeToken {
    name: String,
    children: Vec<ParserToken>,
    text: String,
}

impl NodeToken {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[ParserToken] {
        &self.children
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParserToken {
    Character(LeafToken<char>),
    String(LeafToken<String>),
    Whitespace(LeafToken<String>),
    Comment(LeafToken<String>),
    SingleQuoted(LeafToken<String>),
    DoubleQuoted(LeafToken<String>),
    Long(LeafToken<i64>),
    BigInteger(LeafToken<BigInt>),
    BigDecimal(LeafToken<BigDecimal>),
    Double(LeafToken<f64>),
    LocalDate(LeafToken<NaiveDate>),
    LocalTime(LeafToken<NaiveTime>),
    LocalDateTime(LeafToken<NaiveDateTime>),
    OffsetTime(LeafToken<OffsetTime>),
    OffsetDateTime(LeafToken<DateTime<FixedOffset>>),
    ZonedDateTime(LeafToken<DateTime<Tz>>),
    Missing(MissingToken),
    Sequence(ContainerToken),
    Repeated(ContainerToken),
    Node(NodeToken),
}

impl ParserToken {
    pub fn character(value: char, text: impl Into<String>) -> Self {
        ParserToken::Character(LeafToken::new(value, text))
    }

    pub fn string(value: impl Into<String>, text: impl Into<String>) -> Self {
        ParserToken::String(LeafToken::new(value.into(), text))
    }

    pub fn whitespace(text: impl Into<String>) -> Self {
        let text = text.into();
        ParserToken::Whitespace(LeafToken::new(text.clone(), text))
    }

    pub fn comment(value: impl Into<String>, text: impl Into<String>) -> Self {
        ParserToken::Comment(LeafToken::new(value.into(), text))
    }

    pub fn single_quoted(value: impl Into<String>, text: impl Into<String>) -> Self {
        ParserToken::SingleQuoted(LeafToken::new(value.into(), text))
    }

    pub fn double_quoted(value: impl Into<String>, text: impl Into<String>) -> Self {
        ParserToken::DoubleQuoted(LeafToken::new(value.into(), text))
    }

    pub fn long(value: i64, text: impl Into<String>) -> Self {
        ParserToken::Long(LeafToken::new(value, text))
    }

    pub fn big_integer(value: BigInt, text: impl Into<String>) -> Self {
        ParserToken::BigInteger(LeafToken::new(value, text))
    }

    pub fn big_decimal(value: BigDecimal, text: impl Into<String>) -> Self {
        ParserToken::BigDecimal(LeafToken::new(value, text))
    }

    pub fn double(value: f64, text: impl Into<String>) -> Self {
        ParserToken::Double(LeafToken::new(value, text))
    }

    pub fn local_date(value: NaiveDate, text: impl Into<String>) -> Self {
        ParserToken::LocalDate(LeafToken::new(value, text))
    }

    pub fn local_time(value: NaiveTime, text: impl Into<String>) -> Self {
        ParserToken::LocalTime(LeafToken::new(value, text))
    }

    pub fn local_date_time(value: NaiveDateTime, text: impl Into<String>) -> Self {
        ParserToken::LocalDateTime(LeafToken::new(value, text))
    }

    pub fn offset_time(value: OffsetTime, text: impl Into<String>) -> Self {
        ParserToken::OffsetTime(LeafToken::new(value, text))
    }

    pub fn offset_date_time(value: DateTime<FixedOffset>, text: impl Into<String>) -> Self {
        ParserToken::OffsetDateTime(LeafToken::new(value, text))
    }

    pub fn zoned_date_time(value: DateTime<Tz>, text: impl Into<String>) -> Self {
        ParserToken::ZonedDateTime(LeafToken::new(value, text))
    }

    pub fn missing(name: impl Into<String>) -> Self {
        ParserToken::Missing(MissingToken { name: name.into() })
    }

    pub fn sequence(children: Vec<ParserToken>) -> Self {
        ParserToken::Sequence(ContainerToken::new(children))
    }

    pub fn repeated(children: Vec<ParserToken>) -> Self {
        ParserToken::Repeated(ContainerToken::new(children))
    }

    pub fn node(name: impl Into<String>, children: Vec<ParserToken>) -> Self {
        let text = concat_text(&children);
        ParserToken::Node(NodeToken {
            name: name.into(),
            children,
            text,
        })
    }

    pub fn kind(&self) -> TokenKind {
        match self {
            ParserToken::Character(_) => TokenKind::Character,
            ParserToken::String(_) => TokenKind::String,
            ParserToken::Whitespace(_) => TokenKind::Whitespace,
            ParserToken::Comment(_) => TokenKind::Comment,
            ParserToken::SingleQuoted(_) => TokenKind::SingleQuoted,
            ParserToken::DoubleQuoted(_) => TokenKind::DoubleQuoted,
            ParserToken::Long(_) => TokenKind::Long,
            ParserToken::BigInteger(_) => TokenKind::BigInteger,
            ParserToken::BigDecimal(_) => TokenKind::BigDecimal,
            ParserToken::Double(_) => TokenKind::Double,
            ParserToken::LocalDate(_) => TokenKind::LocalDate,
            ParserToken::LocalTime(_) => TokenKind::LocalTime,
            ParserToken::LocalDateTime(_) => TokenKind::LocalDateTime,
            ParserToken::OffsetTime(_) => TokenKind::OffsetTime,
            ParserToken::OffsetDateTime(_) => TokenKind::OffsetDateTime,
            ParserToken::ZonedDateTime(_) => TokenKind::ZonedDateTime,
            ParserToken::Missing(_) => TokenKind::Missing,
            ParserToken::Sequence(_) => TokenKind::Sequence,
            ParserToken::Repeated(_) => TokenKind::Repeated,
            ParserToken::Node(_) => TokenKind::Node,
        }
    }

    /// Node name: the kind, or the given name of a [`ParserToken::Node`].
    pub fn name(&self) -> &str {
        match self {
            ParserToken::Node(node) => &node.name,
            other => other.kind().into(),
        }
    }

    /// The exact text consumed to produce this token.
    pub fn text(&self) -> &str {
        match self {
            ParserToken::Character(t) => t.text(),
            ParserToken::String(t)
            | ParserToken::Whitespace(t)
            | ParserToken::Comment(t)
            | ParserToken::SingleQuoted(t)
            | ParserToken::DoubleQuoted(t) => t.text(),
            ParserToken::Long(t) => t.text(),
            ParserToken::BigInteger(t) => t.text(),
            ParserToken::BigDecimal(t) => t.text(),
            ParserToken::Double(t) => t.text(),
            ParserToken::LocalDate(t) => t.text(),
            ParserToken::LocalTime(t) => t.text(),
            ParserToken::LocalDateTime(t) => t.text(),
            ParserToken::OffsetTime(t) => t.text(),
            ParserToken::OffsetDateTime(t) => t.text(),
            ParserToken::ZonedDateTime(t) => t.text(),
            ParserToken::Missing(_) => "",
            ParserToken::Sequence(c) | ParserToken::Repeated(c) => c.text(),
            ParserToken::Node(n) => n.text(),
        }
    }

    /// Children of a container, empty for leaves.
    pub fn children(&self) -> &[ParserToken] {
        match self {
            ParserToken::Sequence(c) | ParserToken::Repeated(c) => c.children(),
            ParserToken::Node(n) => n.children(),
            _ => &[],
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(
            self,
            ParserToken::Sequence(_) | ParserToken::Repeated(_) | ParserToken::Node(_)
        )
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ParserToken::Missing(_))
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, ParserToken::Whitespace(_))
    }

    /// Noise tokens carry no meaning for later stages: missing slots and comments.
    pub fn is_noise(&self) -> bool {
        matches!(self, ParserToken::Missing(_) | ParserToken::Comment(_))
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            ParserToken::Character(t) => Some(t.value),
            _ => None,
        }
    }

    /// String value of string-like leaves (string, whitespace, comment, quoted).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParserToken::String(t)
            | ParserToken::Whitespace(t)
            | ParserToken::Comment(t)
            | ParserToken::SingleQuoted(t)
            | ParserToken::DoubleQuoted(t) => Some(t.value().as_str()),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            ParserToken::Long(t) => Some(t.value),
            _ => None,
        }
    }

    pub fn as_big_integer(&self) -> Option<&BigInt> {
        match self {
            ParserToken::BigInteger(t) => Some(t.value()),
            _ => None,
        }
    }

    pub fn as_big_decimal(&self) -> Option<&BigDecimal> {
        match self {
            ParserToken::BigDecimal(t) => Some(t.value()),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            ParserToken::Double(t) => Some(t.value),
            _ => None,
        }
    }

    pub fn as_local_date(&self) -> Option<NaiveDate> {
        match self {
            ParserToken::LocalDate(t) => Some(t.value),
            _ => None,
        }
    }

    pub fn as_local_time(&self) -> Option<NaiveTime> {
        match self {
            ParserToken::LocalTime(t) => Some(t.value),
            _ => None,
        }
    }

    pub fn as_local_date_time(&self) -> Option<NaiveDateTime> {
        match self {
            ParserToken::LocalDateTime(t) => Some(t.value),
            _ => None,
        }
    }

    pub fn as_offset_time(&self) -> Option<OffsetTime> {
        match self {
            ParserToken::OffsetTime(t) => Some(t.value),
            _ => None,
        }
    }

    pub fn as_offset_date_time(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            ParserToken::OffsetDateTime(t) => Some(t.value),
            _ => None,
        }
    }

    pub fn as_zoned_date_time(&self) -> Option<&DateTime<Tz>> {
        match self {
            ParserToken::ZonedDateTime(t) => Some(t.value()),
            _ => None,
        }
    }

    /// The child at `index`, which must be present, not missing and of `kind`.
    pub fn required(&self, index: usize, kind: TokenKind) -> Result<&ParserToken, TokenError> {
        self.optional(index, kind)?.ok_or_else(|| TokenError::Missing {
            index,
            parent: self.name().to_string(),
        })
    }

    /// The child at `index` if present and not missing; it must be of `kind`.
    pub fn optional(
        &self,
        index: usize,
        kind: TokenKind,
    ) -> Result<Option<&ParserToken>, TokenError> {
        if !self.is_container() {
            return Err(TokenError::NotAContainer(self.kind()));
        }
        match self.children().get(index) {
            None => Ok(None),
            Some(child) if child.is_missing() => Ok(None),
            Some(child) if child.kind() == kind => Ok(Some(child)),
            Some(child) => Err(TokenError::WrongKind {
                index,
                expected: kind,
                actual: child.kind(),
            }),
        }
    }

    /// Replaces the children of a container, recomputing its text.
    ///
    /// Returns a clone of `self` when the children are unchanged.
    pub fn set_children(&self, children: Vec<ParserToken>) -> Result<ParserToken, TokenError> {
        if !self.is_container() {
            return Err(TokenError::NotAContainer(self.kind()));
        }
        if self.children() == children.as_slice() {
            return Ok(self.clone());
        }
        Ok(self.with_children(children))
    }

    fn with_children(&self, children: Vec<ParserToken>) -> ParserToken {
        match self {
            ParserToken::Sequence(_) => ParserToken::sequence(children),
            ParserToken::Repeated(_) => ParserToken::repeated(children),
            ParserToken::Node(n) => ParserToken::node(n.name.clone(), children),
            leaf => leaf.clone(),
        }
    }

    /// Merges nested containers of the same kind into a single level.
    pub fn flat(&self) -> ParserToken {
        match self {
            ParserToken::Sequence(_) | ParserToken::Repeated(_) => {
                let mut flattened = Vec::with_capacity(self.children().len());
                flatten_into(self.kind(), self.children(), &mut flattened);
                self.with_children(flattened)
            }
            other => other.clone(),
        }
    }

    /// Removes missing and comment children.
    pub fn remove_noise(&self) -> ParserToken {
        self.retain_children(|t| !t.is_noise())
    }

    /// Removes whitespace children.
    pub fn remove_whitespace(&self) -> ParserToken {
        self.retain_children(|t| !t.is_whitespace())
    }

    /// Removes missing children.
    pub fn remove_missing(&self) -> ParserToken {
        self.retain_children(|t| !t.is_missing())
    }

    fn retain_children<F>(&self, keep: F) -> ParserToken
    where
        F: Fn(&ParserToken) -> bool,
    {
        if !self.is_container() || self.children().iter().all(&keep) {
            return self.clone();
        }
        let children = self.children().iter().filter(|t| keep(t)).cloned().collect();
        self.with_children(children)
    }
}

impl fmt::Display for ParserToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

fn concat_text(children: &[ParserToken]) -> String {
    children.iter().map(ParserToken::text).collect()
}

fn flatten_into(kind: TokenKind, children: &[ParserToken], out: &mut Vec<ParserToken>) {
    for child in children {
        if child.kind() == kind {
            flatten_into(kind, child.children(), out);
        } else {
            out.push(child.clone());
        }
    }
}
