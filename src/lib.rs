//! # kumi: Composable Text Parsers
//!
//! kumi builds parsers out of small, shareable pieces and runs them over a
//! [`cursor::TextCursor`]. Every successful parse produces a
//! [`token::ParserToken`] that records both the parsed value and the exact
//! text it came from.
//!
//! ## Building Blocks
//!
//! ### 1. Cursor and Predicates
//! - Position, mark/restore and line information ([`cursor`])
//! - Named `char -> bool` tests ([`predicate`])
//!
//! ### 2. Parsers
//! - The [`parser::Parser`] trait and the [`parser::ParserRef`] handle ([`parser::core`])
//! - Sequences, alternatives, repetition, transforms ([`parser::combinators`])
//! - Strings, quoted literals, numbers and dates ([`parser::leaf`])
//! - Free constructor functions ([`parser::prelude`])
//!
//! ### 3. Tokens
//! - Leaf and container tokens ([`token`])
//! - Visitors, node projection and selectors ([`token::visitor`], [`token::node`])
//! - Binary expression regrouping ([`token::binary`])
//!
//! ### 4. Context and Errors
//! - Locale symbols for numbers and dates, loadable from JSON ([`config`])
//! - Build, parse and aggregate errors ([`error`])
//!
//! ## Matching Model
//!
//! A parser either consumes input and returns `Ok(Some(token))`, or leaves the
//! cursor where it was and returns `Ok(None)`. `Err` is reserved for hard
//! errors that no combinator recovers from.
//!
//! ```
//! use kumi::parser::prelude::*;
//! use kumi::ParserContext;
//!
//! let greeting = string("hello").unwrap().and_then(whitespace()).and_then(long(10).unwrap());
//! let (token, rest) = greeting
//!     .parse_text("hello  42!", &ParserContext::default())
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(token.text(), "hello  42");
//! assert_eq!(rest, "!");
//! ```

pub mod config;
pub mod cursor;
pub mod error;
pub mod parser;
pub mod predicate;
pub mod token;

// Re-exports
pub use config::ParserContext;
pub use cursor::TextCursor;
pub use error::*;
pub use parser::{ParseError, ParseResult, Parser, ParserRef};
pub use predicate::CharPredicate;
pub use token::{ParserToken, TokenKind};
