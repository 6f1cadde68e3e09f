//! Parsers that read input directly rather than composing other parsers.

pub mod character;
pub mod datetime;
pub mod number;
pub mod quoted;
pub mod string;

pub use character::{
    whitespace, CharacterParser, StringCharPredicateParser, StringInitialAndPartCharPredicateParser,
};
pub use datetime::{DateTimeKind, DateTimeParser, DateTimePattern};
pub use number::{BigDecimalParser, BigIntegerParser, DecimalParser, DoubleParser, LongParser};
pub use quoted::QuotedParser;
pub use string::{CaseSensitivity, StringParser};
