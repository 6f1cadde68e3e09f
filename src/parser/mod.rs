pub mod combinators;
pub mod core;
pub mod leaf;
pub mod prelude;
pub mod reporter;

pub use core::ParseError;
pub use core::ParseResult;
pub use core::Parser;
pub use core::ParserRef;

pub use combinators::SequenceParserBuilder;
pub use reporter::{DefaultReporter, ParserReporter, ReportCondition};
