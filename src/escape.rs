//! Escape-sequence decoding and bare-literal classification.
//!
//! Quoted strings recognize the named escapes `\a \b \f \n \r \t \v \\ \" \'`,
//! a backslash before a line break, up to three decimal digits (`\65`,
//! `\065`) and exactly two hex digits (`\x41`). Escapes produce bytes, so a
//! run of decimal escapes can spell out a multi-byte UTF-8 character.
//!
//! Bare tokens are either identifiers (`nil`, `true`, `false`, or a name that
//! stands for itself as a string) or numbers.
//!
//! ```rust
//! use serde_luatable::escape::{classify_literal, decode_escapes};
//! use serde_luatable::{LuaValue, Number};
//!
//! assert_eq!(decode_escapes(r"\065\x42", 0).unwrap(), "AB");
//! assert_eq!(classify_literal("0x10", 0).unwrap(), LuaValue::Number(Number::Float(16.0)));
//! assert_eq!(classify_literal("name", 0).unwrap(), LuaValue::from("name"));
//! ```

use crate::{Error, LuaValue, Number, Result};

#[inline]
pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[inline]
pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Characters allowed right after a backslash inside a quoted string.
#[inline]
pub(crate) fn is_escape_start(c: char) -> bool {
    matches!(
        c,
        'a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\\' | '"' | '\'' | 'x' | '\n' | '\r'
    ) || c.is_ascii_digit()
}

/// Decodes the body of a quoted string (the text between the quotes).
///
/// `offset` is the position of `body` in the source and is only used for
/// error reporting.
///
/// # Errors
///
/// [`Error::InvalidEscape`], [`Error::InvalidHexEscape`],
/// [`Error::EscapeOutOfRange`], or [`Error::InvalidUtf8`] when escapes
/// produce bytes that are not UTF-8.
pub fn decode_escapes(body: &str, offset: usize) -> Result<String> {
    let bytes = body.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b != b'\\' {
            out.push(b);
            i += 1;
            continue;
        }

        let escape_at = offset + i;
        let Some(&next) = bytes.get(i + 1) else {
            return Err(Error::unterminated("quoted string", escape_at));
        };
        i += 2;

        match next {
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0C),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'v' => out.push(0x0B),
            b'\\' => out.push(b'\\'),
            b'"' => out.push(b'"'),
            b'\'' => out.push(b'\''),
            b'\n' => out.push(b'\n'),
            b'\r' => {
                // `\` followed by CRLF is a single line break.
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                out.push(b'\n');
            }
            b'0'..=b'9' => {
                let mut value = u32::from(next - b'0');
                let mut digits = 1;
                while digits < 3 {
                    match bytes.get(i) {
                        Some(d) if d.is_ascii_digit() => {
                            value = value * 10 + u32::from(d - b'0');
                            digits += 1;
                            i += 1;
                        }
                        _ => break,
                    }
                }
                let byte = u8::try_from(value).map_err(|_| Error::EscapeOutOfRange {
                    value,
                    offset: escape_at,
                })?;
                out.push(byte);
            }
            b'x' => {
                let hi = bytes.get(i).and_then(|&h| (h as char).to_digit(16));
                let lo = bytes.get(i + 1).and_then(|&h| (h as char).to_digit(16));
                match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi * 16 + lo) as u8);
                        i += 2;
                    }
                    _ => return Err(Error::InvalidHexEscape { offset: escape_at }),
                }
            }
            _ => {
                // Report the whole character, not just its first byte.
                let escape = body[i - 1..].chars().next().unwrap_or('\u{FFFD}');
                return Err(Error::InvalidEscape {
                    escape,
                    offset: escape_at,
                });
            }
        }
    }

    String::from_utf8(out).map_err(|_| Error::InvalidUtf8 { offset })
}

/// Classifies and decodes a bare (unquoted, non-structural) token.
///
/// # Errors
///
/// [`Error::InvalidLiteral`] if the token is neither an identifier nor a number.
pub fn classify_literal(token: &str, offset: usize) -> Result<LuaValue> {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if is_ident_start(c) => {
            if !chars.all(is_ident_continue) {
                return Err(Error::invalid_literal(offset, token));
            }
            Ok(match token {
                "nil" => LuaValue::Nil,
                "true" | "True" => LuaValue::Bool(true),
                "false" | "False" => LuaValue::Bool(false),
                _ => LuaValue::String(token.to_string()),
            })
        }
        Some(_) => parse_number(token, offset).map(LuaValue::Number),
        None => Err(Error::invalid_literal(offset, token)),
    }
}

/// Parses a numeric token: hex tokens as floats, decimal tokens as integers
/// when they have no fraction or exponent and fit in `i64`, floats otherwise.
///
/// # Errors
///
/// [`Error::InvalidLiteral`] if the token is not a well-formed number.
pub fn parse_number(token: &str, offset: usize) -> Result<Number> {
    let invalid = || Error::invalid_literal(offset, token);

    if token.contains("0x") || token.contains("0X") {
        return parse_hex_float(token).map(Number::Float).ok_or_else(invalid);
    }

    let starts_ok = token
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_digit() || c == '.' || c == '-');
    let chars_ok = token
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !starts_ok || !chars_ok {
        return Err(invalid());
    }

    if !token.contains(|c| matches!(c, '.' | 'e' | 'E')) {
        if let Ok(i) = token.parse::<i64>() {
            return Ok(Number::Integer(i));
        }
    }
    token.parse::<f64>().map(Number::Float).map_err(|_| invalid())
}

/// Parses `[-]0x<hex>[.<hex>][p[+-]<dec>]`.
fn parse_hex_float(text: &str) -> Option<f64> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let rest = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))?;

    let (mantissa, exponent) = match rest.find(|c| c == 'p' || c == 'P') {
        Some(i) => (&rest[..i], Some(&rest[i + 1..])),
        None => (rest, None),
    };
    let (int_part, frac_part) = match mantissa.find('.') {
        Some(i) => (&mantissa[..i], &mantissa[i + 1..]),
        None => (mantissa, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut value = 0.0_f64;
    for c in int_part.chars() {
        value = value * 16.0 + f64::from(c.to_digit(16)?);
    }
    let mut scale = 1.0 / 16.0;
    for c in frac_part.chars() {
        value += f64::from(c.to_digit(16)?) * scale;
        scale /= 16.0;
    }
    if let Some(exponent) = exponent {
        let exponent: i32 = exponent.parse().ok()?;
        value *= 2.0_f64.powi(exponent);
    }

    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_escapes() {
        assert_eq!(
            decode_escapes(r#"a\tb\n\\\"\'\a\b\f\v\r"#, 0).unwrap(),
            "a\tb\n\\\"'\u{7}\u{8}\u{c}\u{b}\r"
        );
    }

    #[test]
    fn test_escaped_line_break() {
        assert_eq!(decode_escapes("one\\\ntwo", 0).unwrap(), "one\ntwo");
        assert_eq!(decode_escapes("one\\\r\ntwo", 0).unwrap(), "one\ntwo");
    }

    #[test]
    fn test_decimal_escapes_are_greedy_up_to_three_digits() {
        assert_eq!(decode_escapes(r"\065", 0).unwrap(), "A");
        assert_eq!(decode_escapes(r"\65", 0).unwrap(), "A");
        assert_eq!(decode_escapes(r"\0651", 0).unwrap(), "A1");
        assert_eq!(decode_escapes(r"\9x", 0).unwrap(), "\tx");
    }

    #[test]
    fn test_decimal_escape_out_of_range() {
        assert_eq!(
            decode_escapes(r"ab\256", 10),
            Err(Error::EscapeOutOfRange {
                value: 256,
                offset: 12
            })
        );
    }

    #[test]
    fn test_hex_escapes() {
        assert_eq!(decode_escapes(r"\x41\x6a", 0).unwrap(), "Aj");
        assert_eq!(
            decode_escapes(r"\x4", 0),
            Err(Error::InvalidHexEscape { offset: 0 })
        );
        assert_eq!(
            decode_escapes(r"\xg1", 0),
            Err(Error::InvalidHexEscape { offset: 0 })
        );
    }

    #[test]
    fn test_byte_escapes_build_utf8() {
        assert_eq!(decode_escapes(r"\228\189\160", 0).unwrap(), "你");
        assert_eq!(
            decode_escapes(r"\255", 4),
            Err(Error::InvalidUtf8 { offset: 4 })
        );
    }

    #[test]
    fn test_unknown_escape() {
        assert_eq!(
            decode_escapes(r"x\q", 0),
            Err(Error::InvalidEscape {
                escape: 'q',
                offset: 1
            })
        );
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(classify_literal("nil", 0).unwrap(), LuaValue::Nil);
        assert_eq!(classify_literal("True", 0).unwrap(), LuaValue::Bool(true));
        assert_eq!(classify_literal("false", 0).unwrap(), LuaValue::Bool(false));
        assert_eq!(classify_literal("_x9", 0).unwrap(), LuaValue::from("_x9"));
        assert!(matches!(
            classify_literal("a.b", 3),
            Err(Error::InvalidLiteral { offset: 3, .. })
        ));
    }

    #[test]
    fn test_decimal_numbers() {
        assert_eq!(parse_number("42", 0).unwrap(), Number::Integer(42));
        assert_eq!(parse_number("-7", 0).unwrap(), Number::Integer(-7));
        assert_eq!(parse_number("54.33", 0).unwrap(), Number::Float(54.33));
        assert_eq!(parse_number("1e3", 0).unwrap(), Number::Float(1000.0));
        assert_eq!(parse_number(".5", 0).unwrap(), Number::Float(0.5));
        assert_eq!(
            parse_number("99999999999999999999", 0).unwrap(),
            Number::Float(1e20)
        );
    }

    #[test]
    fn test_hex_numbers_are_floats() {
        assert_eq!(parse_number("0x10", 0).unwrap(), Number::Float(16.0));
        assert_eq!(parse_number("0XfF", 0).unwrap(), Number::Float(255.0));
        assert_eq!(parse_number("-0x1p4", 0).unwrap(), Number::Float(-16.0));
        assert_eq!(parse_number("0x.8", 0).unwrap(), Number::Float(0.5));
        assert_eq!(parse_number("0x1.8p-1", 0).unwrap(), Number::Float(0.75));
    }

    #[test]
    fn test_invalid_numbers() {
        for token in ["+1", "1-2", "-", "1e", "0x", "0xg", "10x5", "1/0", "."] {
            assert!(
                matches!(parse_number(token, 0), Err(Error::InvalidLiteral { .. })),
                "{token} should be rejected"
            );
        }
    }
}
