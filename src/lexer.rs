//! Tokenization of comment-free text into a placeholder skeleton.
//!
//! Tokenizing runs in two passes. The first pass decodes every quoted and
//! long-bracket string into the string table and drops whitespace. The
//! second pass turns every run of non-structural characters into a decoded
//! literal. What remains is a flat [`Skeleton`]: structural tokens plus
//! references into the two tables, so the structural parser never looks at
//! string or literal contents.
//!
//! ```rust
//! use serde_luatable::lexer::tokenize;
//!
//! let skeleton = tokenize(r#"{ name = "x", 42 }"#).unwrap();
//! assert_eq!(skeleton.to_string(), "{$=@,$}");
//! assert_eq!(skeleton.strings, vec!["x".to_string()]);
//! ```

use std::fmt;

use crate::comment::{long_bracket_closer, long_bracket_level};
use crate::escape::{classify_literal, decode_escapes};
use crate::{Error, LuaValue, Result};

/// The kinds of token in a skeleton.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// `{`
    Open,
    /// `}`
    Close,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `=`
    Assign,
    /// `,` or `;`
    Separator(char),
    /// Index into [`Skeleton::strings`].
    Str(usize),
    /// Index into [`Skeleton::literals`].
    Literal(usize),
}

impl TokenKind {
    /// Returns `true` for string and literal references.
    #[must_use]
    #[inline]
    pub fn is_scalar(self) -> bool {
        matches!(self, TokenKind::Str(_) | TokenKind::Literal(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset in the tokenized text.
    pub offset: usize,
}

/// The output of [`tokenize`].
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Skeleton {
    pub tokens: Vec<Token>,
    pub strings: Vec<String>,
    pub literals: Vec<LuaValue>,
    /// Length of the tokenized text; errors at end of input point here.
    pub end: usize,
}

impl fmt::Display for Skeleton {
    /// Renders the skeleton with `@` for strings and `$` for literals.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for token in &self.tokens {
            let c = match token.kind {
                TokenKind::Open => '{',
                TokenKind::Close => '}',
                TokenKind::LBracket => '[',
                TokenKind::RBracket => ']',
                TokenKind::Assign => '=',
                TokenKind::Separator(c) => c,
                TokenKind::Str(_) => '@',
                TokenKind::Literal(_) => '$',
            };
            f.write_char(c)?;
        }
        Ok(())
    }
}

/// First-pass output: string references are resolved, everything else is
/// still raw characters.
enum Piece {
    Char(char, usize),
    Str(usize, usize),
    /// Collapsed whitespace. Never becomes a token but ends a literal run.
    Gap,
}

#[inline]
fn is_structural(c: char) -> bool {
    matches!(c, '{' | '}' | '[' | ']' | '=' | ',' | ';')
}

#[inline]
fn is_blank(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0B'
}

/// Tokenizes comment-free text.
///
/// # Errors
///
/// String decoding errors from [`crate::escape::decode_escapes`],
/// [`Error::InvalidLiteral`] for bare tokens that are neither identifiers nor
/// numbers, and [`Error::UnterminatedConstruct`] for unclosed strings.
pub fn tokenize(text: &str) -> Result<Skeleton> {
    let mut skeleton = Skeleton {
        end: text.len(),
        ..Skeleton::default()
    };
    let pieces = scan_strings(text, &mut skeleton.strings)?;
    scan_literals(pieces, &mut skeleton)?;
    Ok(skeleton)
}

fn scan_strings(text: &str, strings: &mut Vec<String>) -> Result<Vec<Piece>> {
    let bytes = text.as_bytes();
    let mut pieces = Vec::with_capacity(text.len() / 2);
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'"' || b == b'\'' {
            let close = find_quote_end(bytes, i)?;
            strings.push(decode_escapes(&text[i + 1..close], i + 1)?);
            pieces.push(Piece::Str(strings.len() - 1, i));
            i = close + 1;
        } else if let Some(level) = long_bracket_level(&bytes[i..]) {
            let content_start = i + level + 2;
            let closer = long_bracket_closer(level);
            let len = text[content_start..]
                .find(&closer)
                .ok_or_else(|| Error::unterminated("long string", i))?;
            let content = &text[content_start..content_start + len];
            let content = content
                .strip_prefix("\r\n")
                .or_else(|| content.strip_prefix('\n'))
                .unwrap_or(content);
            strings.push(content.to_string());
            pieces.push(Piece::Str(strings.len() - 1, i));
            i = content_start + len + closer.len();
        } else {
            let c = text[i..].chars().next().unwrap_or('\u{FFFD}');
            if is_blank(c) {
                if !matches!(pieces.last(), Some(Piece::Gap)) {
                    pieces.push(Piece::Gap);
                }
            } else {
                pieces.push(Piece::Char(c, i));
            }
            i += c.len_utf8();
        }
    }

    Ok(pieces)
}

/// Returns the offset of the quote closing the string opened at `start`.
fn find_quote_end(bytes: &[u8], start: usize) -> Result<usize> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if bytes.get(i + 1) == Some(&b'\r') && bytes.get(i + 2) == Some(&b'\n') => {
                i += 3
            }
            b'\\' => i += 2,
            b'\n' | b'\r' => return Err(Error::MalformedString { offset: i }),
            b if b == quote => return Ok(i),
            _ => i += 1,
        }
    }
    Err(Error::unterminated("quoted string", start))
}

fn scan_literals(pieces: Vec<Piece>, skeleton: &mut Skeleton) -> Result<()> {
    let mut run = String::new();
    let mut run_start = 0;

    for piece in pieces {
        match piece {
            Piece::Char(c, offset) if !is_structural(c) => {
                if run.is_empty() {
                    run_start = offset;
                }
                run.push(c);
                continue;
            }
            _ => flush_literal(&mut run, run_start, skeleton)?,
        }

        match piece {
            Piece::Char(c, offset) => {
                let kind = match c {
                    '{' => TokenKind::Open,
                    '}' => TokenKind::Close,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    '=' => TokenKind::Assign,
                    sep => TokenKind::Separator(sep),
                };
                skeleton.tokens.push(Token { kind, offset });
            }
            Piece::Str(index, offset) => skeleton.tokens.push(Token {
                kind: TokenKind::Str(index),
                offset,
            }),
            Piece::Gap => {}
        }
    }

    flush_literal(&mut run, run_start, skeleton)
}

fn flush_literal(run: &mut String, offset: usize, skeleton: &mut Skeleton) -> Result<()> {
    if run.is_empty() {
        return Ok(());
    }
    skeleton.literals.push(classify_literal(run, offset)?);
    skeleton.tokens.push(Token {
        kind: TokenKind::Literal(skeleton.literals.len() - 1),
        offset,
    });
    run.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str) -> String {
        tokenize(text).unwrap().to_string()
    }

    #[test]
    fn test_placeholder_rendering() {
        assert_eq!(render(r#"{ [1] = "a"; b = true, }"#), "{[$]=@;$=$,}");
        assert_eq!(render("{{},{{}}}"), "{{},{{}}}");
    }

    #[test]
    fn test_string_table_order() {
        let skeleton = tokenize(r#"{"a", 'b', [[c]]}"#).unwrap();
        assert_eq!(skeleton.strings, vec!["a", "b", "c"]);
        assert_eq!(skeleton.to_string(), "{@,@,@}");
    }

    #[test]
    fn test_structural_chars_inside_strings_are_content() {
        let skeleton = tokenize(r#"{"{=}", [==[a]]b]==]}"#).unwrap();
        assert_eq!(skeleton.strings, vec!["{=}", "a]]b"]);
        assert_eq!(skeleton.to_string(), "{@,@}");
    }

    #[test]
    fn test_long_string_drops_one_leading_newline() {
        let skeleton = tokenize("{[[\nline1\nline2]], [[\r\n\nx]]}").unwrap();
        assert_eq!(skeleton.strings, vec!["line1\nline2", "\nx"]);
    }

    #[test]
    fn test_literals_are_decoded() {
        let skeleton = tokenize("{nil, -1.5, 0x10, abc}").unwrap();
        assert_eq!(
            skeleton.literals,
            vec![
                LuaValue::Nil,
                LuaValue::from(-1.5),
                LuaValue::from(16.0),
                LuaValue::from("abc")
            ]
        );
    }

    #[test]
    fn test_whitespace_separates_literals() {
        assert_eq!(render("{1 2}"), "{$$}");
        assert_eq!(render("{ a\t=\n1 }"), "{$=$}");
    }

    #[test]
    fn test_offsets_point_at_token_start() {
        let skeleton = tokenize(r#"{ x = "s" }"#).unwrap();
        let offsets: Vec<_> = skeleton.tokens.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![0, 2, 4, 6, 10]);
    }

    #[test]
    fn test_invalid_literal_offset() {
        assert_eq!(
            tokenize("{1, a.b}"),
            Err(Error::invalid_literal(4, "a.b"))
        );
    }
}
