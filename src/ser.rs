//! Table-literal serialization.
//!
//! This module holds the two halves of the output path:
//!
//! - [`Serializer`] writes a [`LuaValue`] tree as table-literal text
//! - [`LuaValueSerializer`] is a serde serializer that turns any
//!   `Serialize` host value into a [`LuaValue`]
//!
//! Host values always go through a [`LuaValue`] first, because map levels
//! must be reduced to an array or a table before the first byte is written.
//!
//! ## Output Shape
//!
//! - arrays: `{elem,elem,}`
//! - tables: `{[key]=value,}` in insertion order
//! - strings: quoted, with control characters escaped
//!
//! ```rust
//! use serde_luatable::{lua, serialize};
//!
//! let value = lua!({ "name": "Alice", "tags": ["a", "b"] });
//! assert_eq!(serialize(&value), "{[\"name\"]=\"Alice\",[\"tags\"]={\"a\",\"b\",},}");
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use serde_luatable::{lua, LuaOptions, Serializer};
//!
//! let mut serializer = Serializer::new(LuaOptions::pretty());
//! serializer.write_value(&lua!([1, 2]));
//! assert_eq!(serializer.into_inner(), "{\n  1,\n  2,\n}");
//! ```

use crate::value::write_float;
use crate::{Error, LuaKey, LuaOptions, LuaTable, LuaValue, Number, Result};
use serde::{ser, Serialize};

/// The table-literal text writer.
///
/// Writing never fails: every [`LuaValue`] has a text form. Created via
/// [`Serializer::new`] with customizable options.
pub struct Serializer {
    output: String,
    options: LuaOptions,
    indent_level: usize,
}

impl Serializer {
    pub fn new(options: LuaOptions) -> Self {
        Serializer {
            output: String::with_capacity(256),
            options,
            indent_level: 0,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Appends the text form of `value`.
    pub fn write_value(&mut self, value: &LuaValue) {
        match value {
            LuaValue::Nil => self.output.push_str("nil"),
            LuaValue::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            LuaValue::Number(n) => self.write_number(*n),
            LuaValue::String(s) => self.write_string(s),
            LuaValue::Array(elements) => {
                self.begin_table(elements.is_empty());
                for element in elements {
                    self.begin_entry();
                    self.write_value(element);
                    self.end_entry();
                }
                self.end_table(elements.is_empty());
            }
            LuaValue::Table(table) => {
                self.begin_table(table.is_empty());
                for (key, value) in table {
                    self.begin_entry();
                    self.output.push('[');
                    self.write_key(key);
                    self.output
                        .push_str(if self.options.pretty { "] = " } else { "]=" });
                    self.write_value(value);
                    self.end_entry();
                }
                self.end_table(table.is_empty());
            }
        }
    }

    fn write_number(&mut self, n: Number) {
        match n {
            Number::Integer(i) => self.output.push_str(&i.to_string()),
            Number::Float(f) => write_float(&mut self.output, f),
        }
    }

    fn write_key(&mut self, key: &LuaKey) {
        match key {
            LuaKey::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            LuaKey::Integer(i) => self.output.push_str(&i.to_string()),
            LuaKey::Float(f) => write_float(&mut self.output, *f),
            LuaKey::String(s) => self.write_string(s),
        }
    }

    #[inline]
    fn write_string(&mut self, s: &str) {
        let quote = self.options.quote.as_char();
        self.output.push(quote);
        for ch in s.chars() {
            match ch {
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                '\u{0007}' => self.output.push_str("\\a"),
                '\u{0008}' => self.output.push_str("\\b"),
                '\u{000B}' => self.output.push_str("\\v"),
                '\u{000C}' => self.output.push_str("\\f"),
                c if c == quote => {
                    self.output.push('\\');
                    self.output.push(c);
                }
                // Always three digits so a following digit is not absorbed.
                c if c.is_ascii_control() => {
                    self.output.push_str(&format!("\\{:03}", c as u32));
                }
                c => self.output.push(c),
            }
        }
        self.output.push(quote);
    }

    fn begin_table(&mut self, empty: bool) {
        self.output.push('{');
        if self.options.pretty && !empty {
            self.output.push('\n');
        }
        self.indent_level += 1;
    }

    fn end_table(&mut self, empty: bool) {
        self.indent_level -= 1;
        if self.options.pretty && !empty {
            self.write_indent();
        }
        self.output.push('}');
    }

    fn begin_entry(&mut self) {
        if self.options.pretty {
            self.write_indent();
        }
    }

    fn end_entry(&mut self) {
        self.output.push(self.options.separator.as_char());
        if self.options.pretty {
            self.output.push('\n');
        }
    }

    fn write_indent(&mut self) {
        let width = self.indent_level * self.options.indent;
        self.output.extend(std::iter::repeat(' ').take(width));
    }
}

/// Serde serializer producing a [`LuaValue`] from any `Serialize` type.
///
/// - `None` and `()` become `nil`; `nil` map values are dropped
/// - sequences and tuples become arrays
/// - maps and structs become tables, reduced like parsed tables, so a map
///   keyed `1..=n` becomes an array
/// - enums are externally tagged: `{Variant = value}`
///
/// ```rust
/// use serde::Serialize;
/// use serde_luatable::ser::LuaValueSerializer;
/// use serde_luatable::LuaValue;
///
/// let value = Some(3).serialize(LuaValueSerializer).unwrap();
/// assert_eq!(value, LuaValue::from(3));
/// ```
pub struct LuaValueSerializer;

pub struct SerializeVec {
    vec: Vec<LuaValue>,
}

pub struct SerializeTupleVariant {
    variant: &'static str,
    vec: Vec<LuaValue>,
}

pub struct SerializeMap {
    map: LuaTable,
    current_key: Option<LuaKey>,
}

pub struct SerializeStructVariant {
    variant: &'static str,
    map: LuaTable,
}

impl ser::Serializer for LuaValueSerializer {
    type Ok = LuaValue;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<LuaValue> {
        Ok(LuaValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<LuaValue> {
        Ok(LuaValue::Number(Number::Integer(v as i64)))
    }

    fn serialize_i16(self, v: i16) -> Result<LuaValue> {
        Ok(LuaValue::Number(Number::Integer(v as i64)))
    }

    fn serialize_i32(self, v: i32) -> Result<LuaValue> {
        Ok(LuaValue::Number(Number::Integer(v as i64)))
    }

    fn serialize_i64(self, v: i64) -> Result<LuaValue> {
        Ok(LuaValue::Number(Number::Integer(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<LuaValue> {
        Ok(LuaValue::Number(Number::Integer(v as i64)))
    }

    fn serialize_u16(self, v: u16) -> Result<LuaValue> {
        Ok(LuaValue::Number(Number::Integer(v as i64)))
    }

    fn serialize_u32(self, v: u32) -> Result<LuaValue> {
        Ok(LuaValue::Number(Number::Integer(v as i64)))
    }

    fn serialize_u64(self, v: u64) -> Result<LuaValue> {
        i64::try_from(v)
            .map(|i| LuaValue::Number(Number::Integer(i)))
            .map_err(|_| Error::unsupported_type("u64 values above i64::MAX have no integer form"))
    }

    fn serialize_f32(self, v: f32) -> Result<LuaValue> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<LuaValue> {
        if v.is_nan() {
            return Err(Error::unsupported_type("NaN has no table-literal form"));
        }
        Ok(LuaValue::Number(Number::Float(v)))
    }

    fn serialize_char(self, v: char) -> Result<LuaValue> {
        Ok(LuaValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<LuaValue> {
        Ok(LuaValue::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<LuaValue> {
        let vec = v
            .iter()
            .map(|&b| LuaValue::Number(Number::Integer(b as i64)))
            .collect();
        Ok(LuaValue::Array(vec))
    }

    fn serialize_none(self) -> Result<LuaValue> {
        Ok(LuaValue::Nil)
    }

    fn serialize_some<T>(self, value: &T) -> Result<LuaValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<LuaValue> {
        Ok(LuaValue::Nil)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<LuaValue> {
        Ok(LuaValue::Nil)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<LuaValue> {
        Ok(LuaValue::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<LuaValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<LuaValue>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged(variant, to_lua_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            variant,
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            map: LuaTable::new(),
        })
    }
}

impl SerializeVec {
    fn new(capacity: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
        }
    }
}

impl SerializeMap {
    fn new() -> Self {
        SerializeMap {
            map: LuaTable::new(),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = LuaValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_lua_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<LuaValue> {
        Ok(LuaValue::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = LuaValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<LuaValue> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = LuaValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<LuaValue> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = LuaValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_lua_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<LuaValue> {
        Ok(tagged(self.variant, LuaValue::Array(self.vec)))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = LuaValue;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = to_lua_value(key)?;
        match LuaKey::from_value(&key) {
            Some(key) => {
                self.current_key = Some(key);
                Ok(())
            }
            None => Err(Error::unsupported_type(&format!(
                "{} cannot be used as a table key",
                key.type_name()
            ))),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_lua_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<LuaValue> {
        Ok(crate::parser::reduce(self.map, Vec::new()))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = LuaValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(LuaKey::from(key), to_lua_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<LuaValue> {
        ser::SerializeMap::end(self)
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = LuaValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(LuaKey::from(key), to_lua_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<LuaValue> {
        let fields = crate::parser::reduce(self.map, Vec::new());
        Ok(tagged(self.variant, fields))
    }
}

fn to_lua_value<T: Serialize + ?Sized>(value: &T) -> Result<LuaValue> {
    value.serialize(LuaValueSerializer)
}

/// `{variant = value}`, the externally tagged form of an enum variant.
/// A `nil` payload has no table entry, so the variant name stands alone.
fn tagged(variant: &str, value: LuaValue) -> LuaValue {
    if value.is_nil() {
        return LuaValue::String(variant.to_string());
    }
    let mut table = LuaTable::with_capacity(1);
    table.insert(LuaKey::from(variant), value);
    crate::parser::reduce(table, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lua, Quote, Separator};
    use std::collections::{BTreeMap, HashMap};

    fn write(value: &LuaValue, options: LuaOptions) -> String {
        let mut serializer = Serializer::new(options);
        serializer.write_value(value);
        serializer.into_inner()
    }

    fn compact(value: &LuaValue) -> String {
        write(value, LuaOptions::default())
    }

    #[test]
    fn test_scalars() {
        assert_eq!(compact(&LuaValue::Nil), "nil");
        assert_eq!(compact(&LuaValue::from(false)), "false");
        assert_eq!(compact(&LuaValue::from(-12)), "-12");
        assert_eq!(compact(&LuaValue::from(1.0)), "1.0");
        assert_eq!(compact(&LuaValue::from(0.1)), "0.1");
        assert_eq!(compact(&LuaValue::from(f64::INFINITY)), "1e999");
        assert_eq!(compact(&LuaValue::from(f64::NEG_INFINITY)), "-1e999");
        assert_eq!(compact(&LuaValue::from(f64::NAN)), "0/0");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(
            compact(&LuaValue::from("a\"b\\c\n\t\u{7}")),
            r#""a\"b\\c\n\t\a""#
        );
        assert_eq!(compact(&LuaValue::from("\u{1}9")), r#""\0019""#);
        assert_eq!(compact(&LuaValue::from("it's")), r#""it's""#);
        assert_eq!(
            write(
                &LuaValue::from("it's \"q\""),
                LuaOptions::new().with_quote(Quote::Single)
            ),
            r#"'it\'s "q"'"#
        );
    }

    #[test]
    fn test_array_and_table() {
        assert_eq!(compact(&lua!([])), "{}");
        assert_eq!(compact(&lua!([1, [2], nil])), "{1,{2,},nil,}");

        let mut table = LuaTable::new();
        table.insert(LuaKey::from("k"), LuaValue::from(1));
        table.insert(LuaKey::from(true), LuaValue::from("t"));
        table.insert(LuaKey::Float(2.5), LuaValue::from(3));
        assert_eq!(
            compact(&LuaValue::Table(table)),
            r#"{["k"]=1,[true]="t",[2.5]=3,}"#
        );
    }

    #[test]
    fn test_pretty_and_separator() {
        let value = lua!({ "a": [1], "b": {} });
        assert_eq!(
            write(&value, LuaOptions::pretty()),
            "{\n  [\"a\"] = {\n    1,\n  },\n  [\"b\"] = {},\n}"
        );
        assert_eq!(
            write(&value, LuaOptions::new().with_separator(Separator::Semicolon)),
            "{[\"a\"]={1;};[\"b\"]={};}"
        );
    }

    #[test]
    fn test_host_maps_are_reduced() {
        let mut map = BTreeMap::new();
        map.insert(2, "b");
        map.insert(1, "a");
        assert_eq!(
            map.serialize(LuaValueSerializer).unwrap(),
            LuaValue::Array(vec!["a".into(), "b".into()])
        );

        let mut map = HashMap::new();
        map.insert("gone", None);
        map.insert("kept", Some(1));
        let value = map.serialize(LuaValueSerializer).unwrap();
        assert_eq!(value.as_table().map(LuaTable::len), Some(1));
    }

    #[test]
    fn test_unsupported_keys() {
        let mut map = HashMap::new();
        map.insert(vec![1], 1);
        assert!(matches!(
            map.serialize(LuaValueSerializer),
            Err(Error::UnsupportedHostType(_))
        ));

        let mut map = BTreeMap::new();
        map.insert(Option::<i32>::None, 1);
        assert!(matches!(
            map.serialize(LuaValueSerializer),
            Err(Error::UnsupportedHostType(_))
        ));
    }

    #[test]
    fn test_enums_are_externally_tagged() {
        #[derive(Serialize)]
        enum Shape {
            Dot,
            Circle(f64),
            Rect { w: i32, h: i32 },
        }

        assert_eq!(
            Shape::Dot.serialize(LuaValueSerializer).unwrap(),
            LuaValue::from("Dot")
        );
        assert_eq!(
            compact(&Shape::Circle(1.5).serialize(LuaValueSerializer).unwrap()),
            r#"{["Circle"]=1.5,}"#
        );
        assert_eq!(
            compact(&Shape::Rect { w: 1, h: 2 }.serialize(LuaValueSerializer).unwrap()),
            r#"{["Rect"]={["w"]=1,["h"]=2,},}"#
        );
    }

    #[test]
    fn test_nil_payload_variant_is_its_name() {
        #[derive(Serialize)]
        enum Slot {
            Empty(Option<u8>),
        }

        assert_eq!(
            Slot::Empty(None).serialize(LuaValueSerializer).unwrap(),
            LuaValue::from("Empty")
        );
    }

    #[test]
    fn test_host_numbers_without_literals() {
        assert!(matches!(
            f64::NAN.serialize(LuaValueSerializer),
            Err(Error::UnsupportedHostType(_))
        ));
        assert!(matches!(
            (i64::MAX as u64 + 1).serialize(LuaValueSerializer),
            Err(Error::UnsupportedHostType(_))
        ));
        assert_eq!(
            (i64::MAX as u64).serialize(LuaValueSerializer).unwrap(),
            LuaValue::from(i64::MAX)
        );
    }
}
