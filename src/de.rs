//! Conversion of [`LuaValue`] trees into host types.
//!
//! [`LuaValue`] implements [`serde::Deserializer`], so any `Deserialize`
//! type can be built from a parsed value:
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_luatable::{from_value, parse};
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Point { x: i32, y: i32 }
//!
//! let value = parse("{x = 1, y = 2}").unwrap();
//! let point: Point = from_value(value).unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//! ```
//!
//! ## Mapping
//!
//! - `nil` is unit and `None`
//! - arrays are sequences; an array offered to a map target presents its
//!   elements under keys `1..=n`, so `{}` satisfies any map or struct
//! - table keys that are numbers or booleans are rendered as text when the
//!   target expects string keys
//! - integral floats (hex literals are always floats) satisfy integer targets
//! - enums are read from a variant name or a one-entry `{Variant = value}` table

use crate::value::float_to_i64;
use crate::{Error, LuaKey, LuaTable, LuaValue, Number, Result};
use serde::de::IntoDeserializer;
use serde::{de, forward_to_deserialize_any};

impl<'de> de::Deserializer<'de> for LuaValue {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            LuaValue::Nil => visitor.visit_unit(),
            LuaValue::Bool(b) => visitor.visit_bool(b),
            LuaValue::Number(Number::Integer(i)) => visitor.visit_i64(i),
            LuaValue::Number(Number::Float(f)) => visitor.visit_f64(f),
            LuaValue::String(s) => visitor.visit_string(s),
            LuaValue::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            LuaValue::Table(table) => visitor.visit_map(MapDeserializer::new(table)),
        }
    }

    fn deserialize_i8<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_i16<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_i32<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_i64<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_u8<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_u16<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_u32<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_u64<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            LuaValue::Nil => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            LuaValue::Nil => visitor.visit_unit(),
            other => Err(Error::custom(format!(
                "expected nil, found {}",
                other.type_name()
            ))),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            LuaValue::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            other => Err(Error::custom(format!(
                "expected array, found {}",
                other.type_name()
            ))),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            LuaValue::Table(table) => visitor.visit_map(MapDeserializer::new(table)),
            LuaValue::Array(arr) => visitor.visit_map(MapDeserializer::new(indexed(arr))),
            other => Err(Error::custom(format!(
                "expected table, found {}",
                other.type_name()
            ))),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            LuaValue::String(variant) => visitor.visit_enum(EnumDeserializer {
                variant,
                value: None,
            }),
            LuaValue::Table(table) if table.len() == 1 => {
                match table.into_iter().next() {
                    Some((variant, value)) => {
                        visitor.visit_enum(EnumDeserializer::new(variant.to_string(), value))
                    }
                    None => Err(Error::custom("expected enum variant")),
                }
            }
            LuaValue::Table(_) => Err(Error::custom(
                "expected a table with exactly one entry for an enum variant",
            )),
            other => Err(Error::custom(format!(
                "expected enum, found {}",
                other.type_name()
            ))),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i128 u128 f32 f64 char str string bytes byte_buf identifier
    }
}

impl LuaValue {
    fn deserialize_integer<'de, V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            LuaValue::Number(Number::Float(f)) => match float_to_i64(f) {
                Some(i) => visitor.visit_i64(i),
                None => visitor.visit_f64(f),
            },
            other => de::Deserializer::deserialize_any(other, visitor),
        }
    }
}

/// Presents array elements under keys `1..=n`.
fn indexed(arr: Vec<LuaValue>) -> LuaTable {
    arr.into_iter()
        .enumerate()
        .map(|(i, value)| (LuaKey::Integer(i as i64 + 1), value))
        .collect()
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<LuaValue>,
}

impl SeqDeserializer {
    fn new(vec: Vec<LuaValue>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(value).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: <LuaTable as IntoIterator>::IntoIter,
    value: Option<LuaValue>,
}

impl MapDeserializer {
    fn new(table: LuaTable) -> Self {
        MapDeserializer {
            iter: table.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(KeyDeserializer { key }).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(value),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

/// Deserializes a table key. String targets get the key's text form;
/// integer targets accept string keys holding a decimal integer.
struct KeyDeserializer {
    key: LuaKey,
}

impl KeyDeserializer {
    fn deserialize_integer<'de, V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match &self.key {
            LuaKey::String(s) => match s.parse::<i64>() {
                Ok(i) => visitor.visit_i64(i),
                Err(_) => visitor.visit_string(self.key.to_string()),
            },
            _ => de::Deserializer::deserialize_any(self, visitor),
        }
    }
}

impl<'de> de::Deserializer<'de> for KeyDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.key {
            LuaKey::Bool(b) => visitor.visit_bool(b),
            LuaKey::Integer(i) => visitor.visit_i64(i),
            LuaKey::Float(f) => visitor.visit_f64(f),
            LuaKey::String(s) => visitor.visit_string(s),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.key.to_string())
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.key.to_string())
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.key.to_string())
    }

    fn deserialize_i8<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_i16<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_i32<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_i64<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_u8<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_u16<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_u32<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_u64<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_enum(self.key.to_string().into_deserializer())
    }

    forward_to_deserialize_any! {
        bool i128 u128 f32 f64 char bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct ignored_any
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<LuaValue>,
}

impl EnumDeserializer {
    fn new(variant: String, value: LuaValue) -> Self {
        EnumDeserializer {
            variant,
            value: Some(value),
        }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(LuaValue::String(self.variant))?;
        let visitor = VariantDeserializer { value: self.value };
        Ok((variant, visitor))
    }
}

struct VariantDeserializer {
    value: Option<LuaValue>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Some(LuaValue::Nil) | None => Ok(()),
            _ => Err(Error::custom("expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(value),
            None => seed.deserialize(LuaValue::Nil),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(LuaValue::Array(arr)) => visitor.visit_seq(SeqDeserializer::new(arr)),
            _ => Err(Error::custom("expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(value @ (LuaValue::Table(_) | LuaValue::Array(_))) => {
                de::Deserializer::deserialize_map(value, visitor)
            }
            _ => Err(Error::custom("expected struct variant")),
        }
    }
}
