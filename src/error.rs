//! Error types for table-literal parsing, serialization and the serde bridge.
//!
//! Every failure is fatal for the call that produced it: the parser never
//! recovers and never hands back a partially built value.
//!
//! ## Error Categories
//!
//! - **Lexical errors**: unterminated constructs, raw newlines in quoted
//!   strings, bad escape sequences, literals that are neither identifiers nor
//!   numbers
//! - **Structural errors**: unbalanced braces, malformed keys or assignments
//! - **Bridge errors**: host values with no table representation
//! - **I/O errors**: reader/writer failures in the thin I/O helpers
//!
//! ## Error Context
//!
//! Positional errors carry a byte offset into the original input. Use
//! [`Error::line_col`] to turn it into a 1-based line and column.
//!
//! ## Examples
//!
//! ```rust
//! use serde_luatable::{parse, Error};
//!
//! let err = parse("{ \"\\256\" }").unwrap_err();
//! assert!(matches!(err, Error::EscapeOutOfRange { value: 256, .. }));
//! assert_eq!(err.line_col("{ \"\\256\" }"), Some((1, 4)));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by the parser, the serializer and the
/// serde bridge.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A comment, quoted string or long-bracket string was still open at end of input.
    #[error("Unterminated {construct} starting at offset {offset}")]
    UnterminatedConstruct {
        construct: &'static str,
        offset: usize,
    },

    /// A raw line break inside a single- or double-quoted string.
    #[error("Unescaped newline in quoted string at offset {offset}")]
    MalformedString { offset: usize },

    /// A backslash followed by a character outside the escape set.
    #[error("Invalid escape sequence '\\{escape}' at offset {offset}")]
    InvalidEscape { escape: char, offset: usize },

    /// `\x` not followed by two hexadecimal digits.
    #[error("Invalid hex escape at offset {offset}: expected two hex digits after '\\x'")]
    InvalidHexEscape { offset: usize },

    /// A decimal escape whose value does not fit in a byte.
    #[error("Decimal escape at offset {offset} is out of range: {value} > 255")]
    EscapeOutOfRange { value: u32, offset: usize },

    /// Escapes produced a byte sequence that is not valid UTF-8.
    #[error("String literal at offset {offset} decodes to invalid UTF-8")]
    InvalidUtf8 { offset: usize },

    /// A bare token that is neither an identifier nor a number.
    #[error("Invalid literal '{literal}' at offset {offset}")]
    InvalidLiteral { literal: String, offset: usize },

    /// Unbalanced braces, malformed keys, stray tokens.
    #[error("Malformed structure at offset {offset}: {msg}")]
    MalformedStructure { msg: String, offset: usize },

    /// Tables nested deeper than the configured limit.
    #[error("Nesting depth limit of {limit} exceeded at offset {offset}")]
    DepthLimitExceeded { limit: usize, offset: usize },

    /// A host value with no mapping into the table model.
    #[error("Unsupported host type: {0}")]
    UnsupportedHostType(String),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an unterminated-construct error.
    pub fn unterminated(construct: &'static str, offset: usize) -> Self {
        Error::UnterminatedConstruct { construct, offset }
    }

    /// Creates a structural error with a short description of what was expected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_luatable::Error;
    ///
    /// let err = Error::malformed(7, "expected ']'");
    /// assert!(err.to_string().contains("offset 7"));
    /// ```
    pub fn malformed(offset: usize, msg: &str) -> Self {
        Error::MalformedStructure {
            msg: msg.to_string(),
            offset,
        }
    }

    /// Creates an invalid-literal error for a bare token.
    pub fn invalid_literal(offset: usize, literal: &str) -> Self {
        Error::InvalidLiteral {
            literal: literal.to_string(),
            offset,
        }
    }

    /// Creates an unsupported host type error.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedHostType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_luatable::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the byte offset the error points at, if it is positional.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::UnterminatedConstruct { offset, .. }
            | Error::MalformedString { offset }
            | Error::InvalidEscape { offset, .. }
            | Error::InvalidHexEscape { offset }
            | Error::EscapeOutOfRange { offset, .. }
            | Error::InvalidUtf8 { offset }
            | Error::InvalidLiteral { offset, .. }
            | Error::MalformedStructure { offset, .. }
            | Error::DepthLimitExceeded { offset, .. } => Some(*offset),
            Error::UnsupportedHostType(_) | Error::Io(_) | Error::Custom(_) => None,
        }
    }

    /// Resolves the error offset to a 1-based `(line, column)` pair in `source`.
    ///
    /// Columns count characters, not bytes.
    #[must_use]
    pub fn line_col(&self, source: &str) -> Option<(usize, usize)> {
        let offset = self.offset()?.min(source.len());
        let before = source.get(..offset)?;
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let col = before[line_start..].chars().count() + 1;
        Some((line, col))
    }

    /// Rewrites the positional offset through `map`, leaving other errors untouched.
    pub(crate) fn map_offset(mut self, map: impl Fn(usize) -> usize) -> Self {
        match &mut self {
            Error::UnterminatedConstruct { offset, .. }
            | Error::MalformedString { offset }
            | Error::InvalidEscape { offset, .. }
            | Error::InvalidHexEscape { offset }
            | Error::EscapeOutOfRange { offset, .. }
            | Error::InvalidUtf8 { offset }
            | Error::InvalidLiteral { offset, .. }
            | Error::MalformedStructure { offset, .. }
            | Error::DepthLimitExceeded { offset, .. } => *offset = map(*offset),
            Error::UnsupportedHostType(_) | Error::Io(_) | Error::Custom(_) => {}
        }
        self
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
