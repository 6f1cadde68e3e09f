use thiserror::Error;

use crate::config::ConfigError;
use crate::cursor::CursorError;
use crate::parser::ParseError;
use crate::token::node::SelectorError;
use crate::token::TokenError;

/// Raised while building parsers, predicates or patterns, never at parse time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Empty {0}")]
    Empty(&'static str),
    #[error("Invalid radix {0}, expected 2..=36")]
    InvalidRadix(u32),
    #[error("Invalid length bounds: min {min}, max {max}")]
    InvalidLength { min: usize, max: usize },
    #[error("Invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Build error: {0}")]
    Build(#[from] BuildError),
    #[error("Token error: {0}")]
    Token(#[from] TokenError),
    #[error("Cursor error: {0}")]
    Cursor(#[from] CursorError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Selector error: {0}")]
    Selector(#[from] SelectorError),
}

pub type KumiResult<T> = Result<T, Error>;
