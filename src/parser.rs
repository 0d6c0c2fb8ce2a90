//! Structural reconstruction of values from a token skeleton.
//!
//! The parser is a recursive descent over [`Skeleton::tokens`]. Each brace
//! level collects two groups of entries:
//!
//! - keyed entries, from `[key] = value` and `name = value`
//! - positional entries, from bare values and nested tables
//!
//! When the level closes, the groups are merged by [`reduce`]:
//!
//! 1. Keyed entries whose value is `nil` are dropped.
//! 2. With no keyed entries left the level is an array of the positional
//!    entries (`nil` elements included).
//! 3. With no positional entries and keys exactly `1..=n` the level is an
//!    array in key order.
//! 4. Otherwise the level is a table. Positional entry `i` is stored under
//!    key `i` (1-based) and replaces any keyed entry with that key; a
//!    positional `nil` removes the key instead.
//!
//! A merged table whose keys end up exactly `1..=n`, such as `{'a', [2]='b'}`,
//! stays a table here. Written back out it uses bracketed keys only, so the
//! next parse reads it as an array by rule 3.
//!
//! ```rust
//! use serde_luatable::{parse, serialize, LuaValue};
//!
//! assert_eq!(parse("{[1]='a', [2]='b'}").unwrap(), parse("{'a', 'b'}").unwrap());
//!
//! let merged = parse("{[1]=99, 'x', 'y'}").unwrap();
//! assert_eq!(merged.get(1), Some(&LuaValue::from("x")));
//! assert_eq!(merged.get(2), Some(&LuaValue::from("y")));
//!
//! let merged = parse("{'a', [2]='b'}").unwrap();
//! assert!(merged.is_table());
//! assert!(parse(&serialize(&merged)).unwrap().is_array());
//! ```

use crate::lexer::{Skeleton, Token, TokenKind};
use crate::{Error, LuaKey, LuaOptions, LuaTable, LuaValue, Result};

/// Builds the value described by `skeleton`.
///
/// The document is a single table constructor or a single scalar.
///
/// # Errors
///
/// [`Error::MalformedStructure`] for unbalanced braces, malformed entries or
/// stray tokens, and [`Error::DepthLimitExceeded`] when tables nest deeper
/// than [`LuaOptions::max_depth`].
pub fn reconstruct(skeleton: Skeleton, options: &LuaOptions) -> Result<LuaValue> {
    let Skeleton {
        tokens,
        strings,
        literals,
        end,
    } = skeleton;
    let mut parser = Parser {
        tokens: &tokens,
        strings,
        literals,
        pos: 0,
        end,
        max_depth: options.max_depth,
    };

    let value = match parser.peek() {
        None => return Err(Error::malformed(end, "empty input")),
        Some(Token {
            kind: TokenKind::Open,
            ..
        }) => parser.table(1)?,
        Some(token) if token.kind.is_scalar() => parser.scalar()?,
        Some(token) => {
            return Err(Error::malformed(
                token.offset,
                "expected a table constructor or a value",
            ))
        }
    };

    if let Some(token) = parser.peek() {
        return Err(Error::malformed(
            token.offset,
            "unexpected token after the top-level value",
        ));
    }
    Ok(value)
}

struct Parser<'a> {
    tokens: &'a [Token],
    strings: Vec<String>,
    literals: Vec<LuaValue>,
    pos: usize,
    end: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    #[inline]
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    #[inline]
    fn peek_kind_at(&self, ahead: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + ahead).map(|t| t.kind)
    }

    fn expect(&mut self, kind: TokenKind, msg: &str) -> Result<Token> {
        match self.peek() {
            Some(token) if token.kind == kind => {
                self.pos += 1;
                Ok(token)
            }
            Some(token) => Err(Error::malformed(token.offset, msg)),
            None => Err(Error::malformed(self.end, msg)),
        }
    }

    /// Parses a `{ ... }` constructor at nesting level `depth` (outermost is 1).
    fn table(&mut self, depth: usize) -> Result<LuaValue> {
        let open = self.expect(TokenKind::Open, "expected '{'")?;
        if depth > self.max_depth {
            return Err(Error::DepthLimitExceeded {
                limit: self.max_depth,
                offset: open.offset,
            });
        }

        let mut keyed = LuaTable::new();
        let mut positional = Vec::new();
        let mut entries = 0;

        loop {
            let Some(token) = self.peek() else {
                return Err(Error::malformed(open.offset, "unbalanced '{'"));
            };
            match token.kind {
                TokenKind::Close => {
                    self.pos += 1;
                    break;
                }
                TokenKind::Separator(_) => {
                    // Extra separators are tolerated only right before the closing brace.
                    let run = self.tokens[self.pos..]
                        .iter()
                        .take_while(|t| matches!(t.kind, TokenKind::Separator(_)))
                        .count();
                    if entries == 0 || self.peek_kind_at(run) != Some(TokenKind::Close) {
                        return Err(Error::malformed(token.offset, "empty table entry"));
                    }
                    self.pos += run;
                    continue;
                }
                _ => {
                    self.entry(depth, &mut keyed, &mut positional)?;
                    entries += 1;
                }
            }

            match self.peek() {
                Some(Token {
                    kind: TokenKind::Separator(_),
                    ..
                }) => self.pos += 1,
                Some(Token {
                    kind: TokenKind::Close,
                    ..
                }) => {}
                Some(token) => {
                    return Err(Error::malformed(
                        token.offset,
                        "expected ',', ';' or '}' after table entry",
                    ));
                }
                None => return Err(Error::malformed(open.offset, "unbalanced '{'")),
            }
        }

        Ok(reduce(keyed, positional))
    }

    fn entry(
        &mut self,
        depth: usize,
        keyed: &mut LuaTable,
        positional: &mut Vec<LuaValue>,
    ) -> Result<()> {
        let Some(token) = self.peek() else {
            return Err(Error::malformed(self.end, "expected a table entry"));
        };

        match token.kind {
            TokenKind::Open => positional.push(self.table(depth + 1)?),
            TokenKind::LBracket => {
                self.pos += 1;
                let key = self.bracket_key(token.offset)?;
                self.expect(TokenKind::RBracket, "expected ']' after key")?;
                self.expect(TokenKind::Assign, "expected '=' after ']'")?;
                let value = self.value(depth)?;
                keyed.insert(key, value);
            }
            kind if kind.is_scalar() => {
                if self.peek_kind_at(1) == Some(TokenKind::Assign) {
                    let name = self.scalar()?;
                    let key = LuaKey::from_value(&name)
                        .ok_or_else(|| Error::malformed(token.offset, "invalid key before '='"))?;
                    self.pos += 1;
                    let value = self.value(depth)?;
                    keyed.insert(key, value);
                } else {
                    positional.push(self.scalar()?);
                }
            }
            _ => return Err(Error::malformed(token.offset, "unexpected token in table")),
        }
        Ok(())
    }

    fn bracket_key(&mut self, bracket_offset: usize) -> Result<LuaKey> {
        let Some(token) = self.peek() else {
            return Err(Error::malformed(bracket_offset, "unclosed '['"));
        };
        match token.kind {
            kind if kind.is_scalar() => {
                let value = self.scalar()?;
                match value {
                    LuaValue::Nil => Err(Error::malformed(token.offset, "nil is not a valid key")),
                    other => LuaKey::from_value(&other)
                        .ok_or_else(|| Error::malformed(token.offset, "invalid table key")),
                }
            }
            TokenKind::RBracket => Err(Error::malformed(token.offset, "empty key brackets")),
            TokenKind::Open => Err(Error::malformed(
                token.offset,
                "tables cannot be used as keys",
            )),
            _ => Err(Error::malformed(token.offset, "expected a key after '['")),
        }
    }

    fn value(&mut self, depth: usize) -> Result<LuaValue> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Open,
                ..
            }) => self.table(depth + 1),
            Some(token) if token.kind.is_scalar() => self.scalar(),
            Some(token) => Err(Error::malformed(token.offset, "expected a value after '='")),
            None => Err(Error::malformed(self.end, "expected a value after '='")),
        }
    }

    /// Consumes a string or literal reference and takes its value out of the table.
    fn scalar(&mut self) -> Result<LuaValue> {
        let Some(token) = self.peek() else {
            return Err(Error::malformed(self.end, "expected a value"));
        };
        let value = match token.kind {
            TokenKind::Str(i) => self
                .strings
                .get_mut(i)
                .map(|s| LuaValue::String(std::mem::take(s))),
            TokenKind::Literal(i) => self
                .literals
                .get_mut(i)
                .map(|v| std::mem::replace(v, LuaValue::Nil)),
            _ => None,
        };
        let value = value.ok_or_else(|| Error::malformed(token.offset, "expected a value"))?;
        self.pos += 1;
        Ok(value)
    }
}

/// Merges the keyed and positional entries of one table level.
pub(crate) fn reduce(mut keyed: LuaTable, positional: Vec<LuaValue>) -> LuaValue {
    keyed.retain(|_, value| !value.is_nil());

    if keyed.is_empty() {
        return LuaValue::Array(positional);
    }
    if positional.is_empty() {
        if let Some(sequence) = as_sequence(&keyed) {
            let mut slots: Vec<Option<LuaValue>> = vec![None; sequence];
            for (key, value) in keyed {
                if let Some(i) = key.as_integer() {
                    slots[(i - 1) as usize] = Some(value);
                }
            }
            return LuaValue::Array(slots.into_iter().flatten().collect());
        }
    }

    let mut table = LuaTable::with_capacity(keyed.len() + positional.len());
    for (i, value) in positional.into_iter().enumerate() {
        let key = LuaKey::Integer(i as i64 + 1);
        keyed.remove(&key);
        if !value.is_nil() {
            table.insert(key, value);
        }
    }
    for (key, value) in keyed {
        table.insert(key, value);
    }
    LuaValue::Table(table)
}

/// Returns `n` when the keys are exactly the integers `1..=n`.
fn as_sequence(table: &LuaTable) -> Option<usize> {
    let n = table.len();
    table
        .keys()
        .all(|key| matches!(key.as_integer(), Some(i) if i >= 1 && (i as u64) <= n as u64))
        .then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::Number;

    fn parse(text: &str) -> Result<LuaValue> {
        reconstruct(tokenize(text)?, &LuaOptions::default())
    }

    fn table(entries: Vec<(LuaKey, LuaValue)>) -> LuaValue {
        LuaValue::Table(entries.into_iter().collect())
    }

    #[test]
    fn test_positional_only_is_array() {
        assert_eq!(
            parse("{1, 'a', nil, true}").unwrap(),
            LuaValue::Array(vec![
                LuaValue::from(1),
                LuaValue::from("a"),
                LuaValue::Nil,
                LuaValue::from(true),
            ])
        );
    }

    #[test]
    fn test_empty_table_is_empty_array() {
        assert_eq!(parse("{}").unwrap(), LuaValue::Array(vec![]));
    }

    #[test]
    fn test_nil_keyed_entries_are_dropped() {
        assert_eq!(parse("{a=nil, b=1}").unwrap(), table(vec![("b".into(), 1.into())]));
        assert_eq!(parse("{a=nil}").unwrap(), LuaValue::Array(vec![]));
    }

    #[test]
    fn test_consecutive_integer_keys_become_array() {
        assert_eq!(
            parse("{[2]='b', [1]='a'}").unwrap(),
            LuaValue::Array(vec![LuaValue::from("a"), LuaValue::from("b")])
        );
        assert!(parse("{[1]='a', [3]='c'}").unwrap().is_table());
    }

    #[test]
    fn test_positional_entries_overwrite_keys() {
        assert_eq!(
            parse("{[1]=99, 'x', 'y'}").unwrap(),
            table(vec![(1.into(), "x".into()), (2.into(), "y".into())])
        );
        assert_eq!(
            parse("{[2]=5, nil, nil, k=1}").unwrap(),
            table(vec![("k".into(), 1.into())])
        );
    }

    #[test]
    fn test_mixed_table_order() {
        let value = parse("{x=1, 'a', [5]=2}").unwrap();
        let keys: Vec<String> = value
            .as_table()
            .unwrap()
            .keys()
            .map(ToString::to_string)
            .collect();
        assert_eq!(keys, vec!["1", "x", "5"]);
    }

    #[test]
    fn test_key_forms() {
        let value = parse("{[true]=1, [1.5]=2, ['s']=3, name=4, [2.0]=5}").unwrap();
        let t = value.as_table().unwrap();
        assert_eq!(t.get(&LuaKey::Bool(true)), Some(&LuaValue::from(1)));
        assert_eq!(t.get(&LuaKey::Float(1.5)), Some(&LuaValue::from(2)));
        assert_eq!(t.get_str("s"), Some(&LuaValue::from(3)));
        assert_eq!(t.get_str("name"), Some(&LuaValue::from(4)));
        assert_eq!(t.get(&LuaKey::Integer(2)), Some(&LuaValue::from(5)));
    }

    #[test]
    fn test_nested_tables() {
        let value = parse("{a={b={1,2}}, {3}}").unwrap();
        assert_eq!(
            value.get("a").and_then(|a| a.get("b")),
            Some(&LuaValue::Array(vec![1.into(), 2.into()]))
        );
        assert_eq!(value.get(1), Some(&LuaValue::Array(vec![3.into()])));
    }

    #[test]
    fn test_top_level_scalar() {
        assert_eq!(
            parse("42").unwrap(),
            LuaValue::Number(Number::Integer(42))
        );
        assert_eq!(parse("'s'").unwrap(), LuaValue::from("s"));
    }

    #[test]
    fn test_repeated_separators_before_close() {
        assert_eq!(parse("{x=1;;}").unwrap(), table(vec![("x".into(), 1.into())]));
        assert_eq!(
            parse("{1, 2,;,}").unwrap(),
            LuaValue::Array(vec![1.into(), 2.into()])
        );
        assert!(parse("{,,}").is_err());
        assert!(parse("{1,;2}").is_err());
    }

    #[test]
    fn test_malformed_structures() {
        let cases = [
            ("", "empty input"),
            ("{1,,2}", "empty table entry"),
            ("{,}", "empty table entry"),
            ("{1", "unbalanced"),
            ("{1}}", "after the top-level value"),
            ("{[]=1}", "empty key brackets"),
            ("{[nil]=1}", "nil is not a valid key"),
            ("{[{}]=1}", "tables cannot be used as keys"),
            ("{[1]}", "expected '='"),
            ("{[1]=}", "expected a value"),
            ("{a=}", "expected a value"),
            ("{1 2}", "after table entry"),
            ("{nil=1}", "invalid key"),
            ("{=1}", "unexpected token"),
            ("}", "expected a table constructor"),
            ("{} {}", "after the top-level value"),
        ];
        for (input, fragment) in cases {
            match parse(input) {
                Err(Error::MalformedStructure { msg, .. }) => {
                    assert!(msg.contains(fragment), "{input:?}: {msg}")
                }
                other => panic!("{input:?} should be malformed, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_depth_limit() {
        let options = LuaOptions::new().with_max_depth(3);
        assert!(reconstruct(tokenize("{{{}}}").unwrap(), &options).is_ok());
        assert_eq!(
            reconstruct(tokenize("{{{{}}}}").unwrap(), &options),
            Err(Error::DepthLimitExceeded {
                limit: 3,
                offset: 3
            })
        );
    }

    #[test]
    fn test_reduce_directly() {
        let mut keyed = LuaTable::new();
        keyed.insert(LuaKey::from(1), LuaValue::from("keyed"));
        keyed.insert(LuaKey::from("k"), LuaValue::Nil);
        assert_eq!(
            reduce(keyed, vec![LuaValue::from("pos")]),
            table(vec![(1.into(), "pos".into())])
        );
    }
}
