//! Comment removal.
//!
//! Line comments (`-- ...`) run to the end of the line; the line break itself
//! is kept. Block comments (`--[[ ... ]]`, `--[==[ ... ]==]`) end at the
//! closer of the same level and are replaced by a single space so that the
//! tokens around them stay apart. Quoted and long-bracket strings are copied
//! through untouched, so a `--` inside a string is never a comment.
//!
//! ```rust
//! use serde_luatable::comment::strip_comments;
//!
//! let stripped = strip_comments("{1, -- one\n\"--two\"}").unwrap();
//! assert_eq!(stripped.as_str(), "{1, \n\"--two\"}");
//! ```

use crate::escape::is_escape_start;
use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Normal,
    LineComment,
    BlockComment { level: usize },
    Quoted { quote: u8 },
    QuotedEscape { quote: u8 },
    LongString { level: usize },
}

/// Comment-free text plus the bookkeeping needed to map its offsets back to
/// the input it was produced from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stripped {
    text: String,
    /// `(stripped_start, original_start)` of every contiguous kept chunk.
    segments: Vec<(usize, usize)>,
}

impl Stripped {
    fn with_capacity(capacity: usize) -> Self {
        Stripped {
            text: String::with_capacity(capacity),
            segments: Vec::new(),
        }
    }

    fn keep(&mut self, source: &str, from: usize, to: usize) {
        if from < to {
            self.segments.push((self.text.len(), from));
            self.text.push_str(&source[from..to]);
        }
    }

    fn blank(&mut self, original: usize) {
        self.segments.push((self.text.len(), original));
        self.text.push(' ');
    }

    #[must_use]
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }

    /// Maps a byte offset in the stripped text to the matching offset in the
    /// original input.
    ///
    /// ```rust
    /// use serde_luatable::comment::strip_comments;
    ///
    /// let source = "--[[ header ]]{x}";
    /// let stripped = strip_comments(source).unwrap();
    /// let x = stripped.as_str().find('x').unwrap();
    /// assert_eq!(stripped.original_offset(x), source.find('x').unwrap());
    /// ```
    #[must_use]
    pub fn original_offset(&self, offset: usize) -> usize {
        let idx = self.segments.partition_point(|&(start, _)| start <= offset);
        match idx.checked_sub(1).and_then(|i| self.segments.get(i)) {
            Some(&(start, original)) => original + (offset - start),
            None => offset,
        }
    }
}

/// If `bytes` starts with a long-bracket opener (`[[`, `[=[`, `[==[`, ...),
/// returns its level (the number of `=`).
pub(crate) fn long_bracket_level(bytes: &[u8]) -> Option<usize> {
    if bytes.first() != Some(&b'[') {
        return None;
    }
    let level = bytes[1..].iter().take_while(|&&b| b == b'=').count();
    (bytes.get(level + 1) == Some(&b'[')).then_some(level)
}

/// The closer matching an opener of the given level.
pub(crate) fn long_bracket_closer(level: usize) -> String {
    format!("]{}]", "=".repeat(level))
}

/// Removes every comment from `text`.
///
/// # Errors
///
/// - [`Error::UnterminatedConstruct`] if a block comment or string is still
///   open at the end of the input
/// - [`Error::MalformedString`] for a raw line break in a quoted string
/// - [`Error::InvalidEscape`] for a backslash followed by a character that
///   cannot start an escape
pub fn strip_comments(text: &str) -> Result<Stripped> {
    let bytes = text.as_bytes();
    let mut out = Stripped::with_capacity(text.len());
    let mut state = State::Normal;
    let mut construct_start = 0;
    let mut kept_from = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match state {
            State::Normal => match b {
                b'-' if bytes.get(i + 1) == Some(&b'-') => {
                    out.keep(text, kept_from, i);
                    construct_start = i;
                    match long_bracket_level(&bytes[i + 2..]) {
                        Some(level) => {
                            state = State::BlockComment { level };
                            i += level + 4;
                        }
                        None => {
                            state = State::LineComment;
                            i += 2;
                        }
                    }
                }
                b'"' | b'\'' => {
                    construct_start = i;
                    state = State::Quoted { quote: b };
                    i += 1;
                }
                b'[' => match long_bracket_level(&bytes[i..]) {
                    Some(level) => {
                        construct_start = i;
                        state = State::LongString { level };
                        i += level + 2;
                    }
                    None => i += 1,
                },
                _ => i += 1,
            },
            State::LineComment => {
                if b == b'\n' {
                    kept_from = i;
                    state = State::Normal;
                }
                i += 1;
            }
            State::BlockComment { level } => match closes_at(bytes, i, level) {
                Some(end) => {
                    out.blank(construct_start);
                    kept_from = end;
                    state = State::Normal;
                    i = end;
                }
                None => i += 1,
            },
            State::Quoted { quote } => {
                if b == quote {
                    state = State::Normal;
                } else if b == b'\\' {
                    state = State::QuotedEscape { quote };
                } else if b == b'\n' || b == b'\r' {
                    return Err(Error::MalformedString { offset: i });
                }
                i += 1;
            }
            State::QuotedEscape { quote } => {
                let c = text[i..].chars().next().unwrap_or('\0');
                if !is_escape_start(c) {
                    return Err(Error::InvalidEscape {
                        escape: c,
                        offset: i - 1,
                    });
                }
                i += c.len_utf8();
                if c == '\r' && bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                state = State::Quoted { quote };
            }
            State::LongString { level } => match closes_at(bytes, i, level) {
                Some(end) => {
                    state = State::Normal;
                    i = end;
                }
                None => i += 1,
            },
        }
    }

    match state {
        State::Normal => out.keep(text, kept_from, text.len()),
        State::LineComment => {}
        State::BlockComment { .. } => {
            return Err(Error::unterminated("block comment", construct_start))
        }
        State::Quoted { .. } | State::QuotedEscape { .. } => {
            return Err(Error::unterminated("quoted string", construct_start))
        }
        State::LongString { .. } => {
            return Err(Error::unterminated("long string", construct_start))
        }
    }

    Ok(out)
}

/// If a closer of `level` starts at `i`, returns the offset just past it.
fn closes_at(bytes: &[u8], i: usize, level: usize) -> Option<usize> {
    let end = i + level + 2;
    let candidate = bytes.get(i..end)?;
    let closes = candidate[0] == b']'
        && candidate[end - i - 1] == b']'
        && candidate[1..=level].iter().all(|&b| b == b'=');
    closes.then_some(end)
}
