//! # Text Cursor
//!
//! A [`TextCursor`] is the only mutable object in a parse. It holds a borrowed
//! `&str` and a byte offset that always sits on a char boundary.
//!
//! Backtracking never clones the cursor. A parser calls [`TextCursor::save`]
//! before an attempt and [`TextCursor::restore`] when the attempt fails, which
//! leaves the cursor exactly where it was before the call.
//!
//! ```text
//! "abc///"      save() -> Mark(0)
//!  ^
//! "abc///"      next() x3
//!     ^
//! "abc///"      restore(Mark(0))
//!  ^
//! ```

use std::fmt;

use thiserror::Error;

/// Errors raised by cursor operations that require a current character.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CursorError {
    #[error("End of text at {0}")]
    EndOfText(LineInfo),
}

/// An opaque restore point returned by [`TextCursor::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mark(usize);

impl Mark {
    /// Byte offset captured by this mark.
    pub fn offset(&self) -> usize {
        self.0
    }
}

/// Line and column of a cursor position, plus the full text of that line.
///
/// Lines and columns are 1-based and counted in chars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineInfo {
    pub line: usize,
    pub column: usize,
    pub text: String,
}

impl fmt::Display for LineInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{}) {:?}", self.line, self.column, self.text)
    }
}

#[derive(Debug)]
pub struct TextCursor<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> TextCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, offset: 0 }
    }

    pub fn at_end(&self) -> bool {
        self.offset == self.text.len()
    }

    /// The current character, or `None` at the end of text.
    pub fn peek(&self) -> Option<char> {
        self.text[self.offset..].chars().next()
    }

    /// The current character, failing at the end of text.
    pub fn character(&self) -> Result<char, CursorError> {
        self.peek()
            .ok_or_else(|| CursorError::EndOfText(self.line_info()))
    }

    /// Advances past the current character.
    pub fn next(&mut self) -> Result<(), CursorError> {
        let c = self.character()?;
        self.offset += c.len_utf8();
        Ok(())
    }

    pub fn save(&self) -> Mark {
        Mark(self.offset)
    }

    pub fn restore(&mut self, mark: Mark) {
        debug_assert!(mark.0 <= self.text.len() && self.text.is_char_boundary(mark.0));
        self.offset = mark.0;
    }

    /// Text consumed since `mark` was saved.
    pub fn text_since(&self, mark: Mark) -> &'a str {
        &self.text[mark.0.min(self.offset)..self.offset]
    }

    /// Text not yet consumed.
    pub fn remaining(&self) -> &'a str {
        &self.text[self.offset..]
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Consumes `prefix` if the remaining text starts with it.
    pub(crate) fn eat(&mut self, prefix: &str) -> bool {
        if !prefix.is_empty() && self.remaining().starts_with(prefix) {
            self.offset += prefix.len();
            true
        } else {
            false
        }
    }

    /// Consumes `prefix` ignoring ASCII case.
    pub(crate) fn eat_ignore_ascii_case(&mut self, prefix: &str) -> bool {
        let remaining = self.remaining();
        match remaining.get(..prefix.len()) {
            Some(head) if !prefix.is_empty() && head.eq_ignore_ascii_case(prefix) => {
                self.offset += prefix.len();
                true
            }
            _ => false,
        }
    }

    /// Computes the line, column and line text of the current offset.
    pub fn line_info(&self) -> LineInfo {
        let mut line = 1;
        let mut line_start = 0;

        for (i, c) in self.text[..self.offset].char_indices() {
            if c == '\n' {
                line += 1;
                line_start = i + 1;
            }
        }

        let column = self.text[line_start..self.offset].chars().count() + 1;
        let line_end = self.text[line_start..]
            .find(['\n', '\r'])
            .map(|i| line_start + i)
            .unwrap_or(self.text.len());

        LineInfo {
            line,
            column,
            text: self.text[line_start..line_end].to_string(),
        }
    }
}

impl fmt::Display for TextCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} | {:?}",
            &self.text[..self.offset],
            &self.text[self.offset..]
        )
    }
}
