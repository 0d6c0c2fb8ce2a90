//! # serde_luatable
//!
//! A parser and serializer for Lua-style table literals, with a Serde bridge
//! to ordinary Rust types.
//!
//! ## The Format
//!
//! A document is one table constructor (or a single scalar):
//!
//! ```text
//! {
//!     name = "server",          -- identifier key
//!     ["port"] = 8080,          -- bracketed key, any scalar
//!     [[a long
//! string]],                     -- long bracket string, nesting level 0
//!     { 1, 2, 3 };              -- nested table, ',' or ';' separators
//!     ratio = 0x1.8p1,          -- hex numbers decode as floats
//!     --[[ block comment ]]
//! }
//! ```
//!
//! Strings use `'` or `"` with escapes `\n \t \\ \ddd \xHH` and friends, or
//! long brackets `[==[ ... ]==]` with verbatim content. Bare identifiers
//! other than `nil`, `true` and `false` read as strings.
//!
//! ## Arrays and Tables
//!
//! Every brace level becomes either an [`LuaValue::Array`] or a
//! [`LuaValue::Table`], never both. Positional entries alone give an array;
//! keyed entries give a table; when both are present, positional entries take
//! the integer keys `1..=n`. A table keyed exactly `1..=n` is read as an
//! array. See [`parser`] for the full rule.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_luatable::{parse, serialize, LuaValue};
//!
//! let value = parse("{name = 'Alice', tags = {'a', 'b'}} -- trailing comment").unwrap();
//! assert_eq!(value.get("name"), Some(&LuaValue::from("Alice")));
//!
//! let text = serialize(&value);
//! assert_eq!(parse(&text).unwrap(), value);
//! ```
//!
//! ### Host Types
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_luatable::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User { id: 123, name: "Alice".to_string(), active: true };
//!
//! let text = to_string(&user).unwrap();
//! assert_eq!(text, r#"{["id"]=123,["name"]="Alice",["active"]=true,}"#);
//!
//! let user_back: User = from_str(&text).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ### Dynamic Values with lua! Macro
//!
//! ```rust
//! use serde_luatable::lua;
//!
//! let data = lua!({
//!     "name": "Alice",
//!     "tags": ["rust", "lua"]
//! });
//! assert_eq!(data.get("tags").and_then(|t| t.get(2)).and_then(|v| v.as_str()), Some("lua"));
//! ```
//!
//! ## Errors
//!
//! Parsing stops at the first error. Positional errors carry a byte offset
//! into the original text, comments included; [`Error::line_col`] turns it
//! into a line and column.
//!
//! ## Pipeline
//!
//! [`comment`] strips comments, [`lexer`] turns strings and literals into
//! table references, and [`parser`] rebuilds the nested structure. The
//! [`escape`] module decodes string escapes and bare literals for the lexer.
//! All state is local to one call, so independent parses can run on any
//! number of threads.

pub mod comment;
pub mod de;
pub mod error;
pub mod escape;
pub mod lexer;
pub mod macros;
pub mod map;
pub mod options;
pub mod parser;
pub mod ser;
pub mod value;

pub use error::{Error, Result};
pub use map::LuaTable;
pub use options::{LuaOptions, Quote, Separator};
pub use ser::{LuaValueSerializer, Serializer};
pub use value::{LuaKey, LuaValue, Number, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Parses table-literal text into a [`LuaValue`].
///
/// # Examples
///
/// ```rust
/// use serde_luatable::{parse, LuaValue};
///
/// let value = parse("{1, 2, x = true}").unwrap();
/// assert_eq!(value.get(2), Some(&LuaValue::from(2)));
/// assert_eq!(value.get("x"), Some(&LuaValue::from(true)));
/// ```
///
/// # Errors
///
/// Returns the first lexical or structural error found; see [`Error`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(text: &str) -> Result<LuaValue> {
    parse_with_options(text, &LuaOptions::default())
}

/// Parses table-literal text with custom options.
///
/// Only [`LuaOptions::max_depth`] affects parsing.
///
/// # Errors
///
/// Returns the first lexical or structural error found; see [`Error`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_options(text: &str, options: &LuaOptions) -> Result<LuaValue> {
    let stripped = comment::strip_comments(text)?;
    lexer::tokenize(stripped.as_str())
        .and_then(|skeleton| parser::reconstruct(skeleton, options))
        .map_err(|err| err.map_offset(|offset| stripped.original_offset(offset)))
}

/// Writes a [`LuaValue`] as compact table-literal text.
///
/// # Examples
///
/// ```rust
/// use serde_luatable::{lua, serialize};
///
/// assert_eq!(serialize(&lua!([1, "two", nil])), r#"{1,"two",nil,}"#);
/// ```
#[must_use]
pub fn serialize(value: &LuaValue) -> String {
    serialize_with_options(value, &LuaOptions::default())
}

/// Writes a [`LuaValue`] as table-literal text with custom options.
#[must_use]
pub fn serialize_with_options(value: &LuaValue, options: &LuaOptions) -> String {
    let mut serializer = Serializer::new(options.clone());
    serializer.write_value(value);
    serializer.into_inner()
}

/// Serialize any `T: Serialize` to a table-literal string.
///
/// # Examples
///
/// ```rust
/// use serde_luatable::to_string;
///
/// assert_eq!(to_string(&vec![1, 2, 3]).unwrap(), "{1,2,3,}");
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedHostType`] if a map key has no table-key form.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &LuaOptions::default())
}

/// Serialize any `T: Serialize` to a pretty-printed table-literal string.
///
/// # Errors
///
/// Returns an error if the value cannot be converted.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_pretty<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &LuaOptions::pretty())
}

/// Serialize any `T: Serialize` to a table-literal string with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_luatable::{to_string_with_options, LuaOptions, Quote};
///
/// let options = LuaOptions::new().with_quote(Quote::Single);
/// assert_eq!(to_string_with_options(&("a", 1), &options).unwrap(), "{'a',1,}");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be converted.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &LuaOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    Ok(serialize_with_options(&to_value(value)?, options))
}

/// Convert any `T: Serialize` to a [`LuaValue`].
///
/// Maps and structs are reduced like parsed tables: `None` fields are
/// dropped and a map keyed `1..=n` becomes an array.
///
/// # Examples
///
/// ```rust
/// use serde_luatable::{to_value, LuaValue};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: Option<i32> }
///
/// let value = to_value(&Point { x: 1, y: None }).unwrap();
/// assert!(value.is_table());
/// assert_eq!(value.get("x"), Some(&LuaValue::from(1)));
/// assert_eq!(value.get("y"), None);
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedHostType`] for map keys that are `None`,
/// NaN, sequences or maps, for NaN values, and for `u64` values above
/// `i64::MAX`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<LuaValue>
where
    T: ?Sized + Serialize,
{
    value.serialize(LuaValueSerializer)
}

/// Convert a [`LuaValue`] into any `T: Deserialize`.
///
/// # Examples
///
/// ```rust
/// use serde_luatable::{from_value, parse};
/// use std::collections::HashMap;
///
/// let value = parse("{a = 1, [2] = 3}").unwrap();
/// let map: HashMap<String, i32> = from_value(value).unwrap();
/// assert_eq!(map["a"], 1);
/// assert_eq!(map["2"], 3);
/// ```
///
/// # Errors
///
/// Returns an error if the value does not fit the shape of `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: LuaValue) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(value)
}

/// Serialize any `T: Serialize` to a writer.
///
/// # Examples
///
/// ```rust
/// use serde_luatable::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &[true, false]).unwrap();
/// assert_eq!(buffer, b"{true,false,}");
/// ```
///
/// # Errors
///
/// Returns an error if conversion fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, &LuaOptions::default())
}

/// Serialize any `T: Serialize` to a writer with custom options.
///
/// # Errors
///
/// Returns an error if conversion fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: &LuaOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string_with_options(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from table-literal text.
///
/// # Examples
///
/// ```rust
/// use serde_luatable::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("{ x = 1, y = 2 }").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns a parse error, or an error if the value does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(parse(s)?)
}

/// Deserialize an instance of type `T` from an I/O stream of table-literal text.
///
/// # Examples
///
/// ```rust
/// use serde_luatable::from_reader;
/// use std::io::Cursor;
///
/// let values: Vec<i32> = from_reader(Cursor::new(b"{1, 2, 3}")).unwrap();
/// assert_eq!(values, vec![1, 2, 3]);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input does not parse, or the value
/// does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Deserialize an instance of type `T` from bytes of table-literal text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, do not parse, or do not
/// fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lua;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
    }

    fn sample_user() -> User {
        User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
        }
    }

    #[test]
    fn test_concrete_scenario() {
        let value = parse(
            r#"{array = {65,23,5,}, dict = {mixed = {43,54.33,false,9,string = "value",}, array = {3,6,4,}, string = "value",},}"#,
        )
        .unwrap();

        assert_eq!(value.get("array"), Some(&lua!([65, 23, 5])));

        let dict = value.get("dict").unwrap();
        assert!(dict.is_table());
        assert_eq!(dict.get("array"), Some(&lua!([3, 6, 4])));
        assert_eq!(dict.get("string"), Some(&LuaValue::from("value")));

        let mixed = dict.get("mixed").unwrap().as_table().unwrap();
        assert_eq!(mixed.len(), 5);
        assert_eq!(mixed.get(&LuaKey::from(1)), Some(&LuaValue::from(43)));
        assert_eq!(mixed.get(&LuaKey::from(2)), Some(&LuaValue::from(54.33)));
        assert_eq!(mixed.get(&LuaKey::from(3)), Some(&LuaValue::from(false)));
        assert_eq!(mixed.get(&LuaKey::from(4)), Some(&LuaValue::from(9)));
        assert_eq!(mixed.get_str("string"), Some(&LuaValue::from("value")));
    }

    #[test]
    fn test_escape_decoding() {
        assert_eq!(parse(r#""\065""#).unwrap(), LuaValue::from("A"));
        assert_eq!(parse(r#""\x41""#).unwrap(), LuaValue::from("A"));
        assert!(matches!(
            parse(r#"{"\256"}"#),
            Err(Error::EscapeOutOfRange { value: 256, .. })
        ));
    }

    #[test]
    fn test_long_bracket_levels() {
        assert_eq!(parse("{[==[text]==]}").unwrap(), lua!(["text"]));
        assert!(matches!(
            parse("{[==[text]=]}"),
            Err(Error::UnterminatedConstruct { .. })
        ));
    }

    #[test]
    fn test_comment_transparency() {
        assert_eq!(
            parse("-- [[ not a real comment marker\n{1,2}").unwrap(),
            lua!([1, 2])
        );
        assert_eq!(parse("{1, --[[ two ]] 3}").unwrap(), lua!([1, 3]));
    }

    #[test]
    fn test_error_offsets_point_into_original_text() {
        let source = "--[[ header\n]] {1, ?}";
        let err = parse(source).unwrap_err();
        assert_eq!(err.offset(), source.find('?'));
        assert_eq!(err.line_col(source), Some((2, 8)));
    }

    #[test]
    fn test_serialize_round_trip() {
        let value = parse("{1, 'two', {3.5, nil}, x = {y = true, [10] = 'ten'}}").unwrap();
        assert_eq!(parse(&serialize(&value)).unwrap(), value);
        assert_eq!(
            parse(&serialize_with_options(&value, &LuaOptions::pretty())).unwrap(),
            value
        );
    }

    #[test]
    fn test_serialize_deserialize_user() {
        let user = sample_user();
        let text = to_string(&user).unwrap();
        let user_back: User = from_str(&text).unwrap();
        assert_eq!(user, user_back);
    }

    #[test]
    fn test_pretty_printing() {
        let user = sample_user();
        let text = to_string_pretty(&user).unwrap();
        assert!(text.contains("\n  [\"id\"] = 123,\n"));
        let user_back: User = from_str(&text).unwrap();
        assert_eq!(user, user_back);
    }

    #[test]
    fn test_to_value() {
        let value = to_value(&Point { x: 1, y: 2 }).unwrap();
        let table = value.as_table().unwrap();
        assert_eq!(table.get_str("x"), Some(&LuaValue::Number(Number::Integer(1))));
        assert_eq!(table.get_str("y"), Some(&LuaValue::Number(Number::Integer(2))));
    }

    #[test]
    fn test_io_helpers() {
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &Point { x: 1, y: 2 }).unwrap();
        let point: Point = from_reader(buffer.as_slice()).unwrap();
        assert_eq!(point, Point { x: 1, y: 2 });

        let point: Point = from_slice(b"{x=3,y=4}").unwrap();
        assert_eq!(point, Point { x: 3, y: 4 });
        assert!(matches!(
            from_slice::<Point>(&[0xff, 0xfe]),
            Err(Error::Custom(_))
        ));
    }

    #[test]
    fn test_parallel_parses() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    let text = format!("{{n = {i}, list = {{{i}, {i}}}}}");
                    parse(&text).unwrap()
                })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let value = handle.join().unwrap();
            assert_eq!(value.get("n"), Some(&LuaValue::from(i as i64)));
        }
    }
}
