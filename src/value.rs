//! Dynamic value representation for table-literal data.
//!
//! This module provides the [`LuaValue`] enum which represents any value a
//! table literal can hold, together with [`Number`] and the [`LuaKey`] type
//! used for keyed table entries.
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use serde_luatable::{LuaValue, Number};
//!
//! let nil = LuaValue::Nil;
//! let boolean = LuaValue::from(true);
//! let number = LuaValue::from(42);
//! let text = LuaValue::from("hello");
//!
//! use serde_luatable::lua;
//! let table = lua!({
//!     "name": "Alice",
//!     "age": 30
//! });
//! assert!(table.is_table());
//! ```
//!
//! ### Extracting Values
//!
//! ```rust
//! use serde_luatable::LuaValue;
//! use std::convert::TryFrom;
//!
//! let value = LuaValue::from(42);
//! let num: i64 = i64::try_from(value).unwrap();
//! assert_eq!(num, 42);
//! ```

use crate::LuaTable;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A dynamically-typed representation of any table-literal value.
///
/// Arrays and keyed tables are distinct variants: the parser decides per
/// brace level which one a constructor becomes (see [`crate::parser`]).
///
/// # Examples
///
/// ```rust
/// use serde_luatable::{LuaValue, Number};
///
/// let nil = LuaValue::Nil;
/// let num = LuaValue::Number(Number::Integer(42));
/// let text = LuaValue::String("hello".to_string());
///
/// assert!(nil.is_nil());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum LuaValue {
    #[default]
    Nil,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<LuaValue>),
    Table(LuaTable),
}

/// Shorthand used throughout the crate.
pub type Value = LuaValue;

/// A numeric value: integer or floating-point.
///
/// Decimal tokens without a fraction or exponent become integers; everything
/// else, including every hexadecimal literal, becomes a float.
///
/// # Examples
///
/// ```rust
/// use serde_luatable::Number;
///
/// let integer = Number::Integer(42);
/// let float = Number::Float(3.5);
///
/// assert!(integer.is_integer());
/// assert_eq!(integer.as_i64(), Some(42));
/// assert_eq!(float.as_f64(), 3.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Returns `true` if this is an integer.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Returns `true` if this is a float.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Returns the value as `i64` if it is an integer or a whole float in range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_luatable::Number;
    ///
    /// assert_eq!(Number::Integer(7).as_i64(), Some(7));
    /// assert_eq!(Number::Float(7.0).as_i64(), Some(7));
    /// assert_eq!(Number::Float(7.5).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::Integer(i) => Some(i),
            Number::Float(f) => float_to_i64(f),
        }
    }

    /// Converts this number to an `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Integer(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

/// Exact float → integer conversion; `None` when the float has a fraction,
/// is not finite, or falls outside `i64`.
pub(crate) fn float_to_i64(f: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or above it overflows i64.
    if f.is_finite()
        && f.fract() == 0.0
        && f >= -9_223_372_036_854_775_808.0
        && f < 9_223_372_036_854_775_808.0
    {
        Some(f as i64)
    } else {
        None
    }
}

/// Writes a float so that it re-parses as a float: always with a `.` or an
/// exponent. Infinities use an overflowing literal; NaN has no literal form.
pub(crate) fn write_float(out: &mut String, f: f64) {
    if f.is_nan() {
        out.push_str("0/0");
    } else if f.is_infinite() {
        out.push_str(if f > 0.0 { "1e999" } else { "-1e999" });
    } else {
        // `{:?}` is the shortest round-trip form and keeps a trailing `.0`.
        out.push_str(&format!("{:?}", f));
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => {
                let mut s = String::new();
                write_float(&mut s, fl);
                f.write_str(&s)
            }
        }
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

/// A key of a keyed table entry.
///
/// Keys are scalars only. Floats holding an integral value are normalized to
/// [`LuaKey::Integer`] on construction, so `[1.0]` and `[1]` address the same
/// entry; NaN cannot be a key.
#[derive(Clone, Debug)]
pub enum LuaKey {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl LuaKey {
    /// Builds a key from a float, normalizing integral values. Returns `None` for NaN.
    #[must_use]
    pub fn from_f64(f: f64) -> Option<Self> {
        if f.is_nan() {
            None
        } else if let Some(i) = float_to_i64(f) {
            Some(LuaKey::Integer(i))
        } else {
            Some(LuaKey::Float(f))
        }
    }

    /// Converts a scalar value into a key. `Nil`, NaN and containers have no key form.
    #[must_use]
    pub fn from_value(value: &LuaValue) -> Option<Self> {
        match value {
            LuaValue::Bool(b) => Some(LuaKey::Bool(*b)),
            LuaValue::Number(Number::Integer(i)) => Some(LuaKey::Integer(*i)),
            LuaValue::Number(Number::Float(f)) => LuaKey::from_f64(*f),
            LuaValue::String(s) => Some(LuaKey::String(s.clone())),
            LuaValue::Nil | LuaValue::Array(_) | LuaValue::Table(_) => None,
        }
    }

    /// Returns the key as a value.
    #[must_use]
    pub fn to_value(&self) -> LuaValue {
        match self {
            LuaKey::Bool(b) => LuaValue::Bool(*b),
            LuaKey::Integer(i) => LuaValue::Number(Number::Integer(*i)),
            LuaKey::Float(f) => LuaValue::Number(Number::Float(*f)),
            LuaKey::String(s) => LuaValue::String(s.clone()),
        }
    }

    /// Returns the integer if this is an integer key.
    #[inline]
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            LuaKey::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the string if this is a string key.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LuaKey::String(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for LuaKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LuaKey::Bool(a), LuaKey::Bool(b)) => a == b,
            (LuaKey::Integer(a), LuaKey::Integer(b)) => a == b,
            // Bitwise so that Eq and Hash agree; -0.0 never reaches here
            // because it normalizes to Integer(0).
            (LuaKey::Float(a), LuaKey::Float(b)) => a.to_bits() == b.to_bits(),
            (LuaKey::String(a), LuaKey::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for LuaKey {}

impl Hash for LuaKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            LuaKey::Bool(b) => b.hash(state),
            LuaKey::Integer(i) => i.hash(state),
            LuaKey::Float(f) => f.to_bits().hash(state),
            LuaKey::String(s) => s.hash(state),
        }
    }
}

impl fmt::Display for LuaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LuaKey::Bool(b) => write!(f, "{}", b),
            LuaKey::Integer(i) => write!(f, "{}", i),
            LuaKey::Float(fl) => write!(f, "{}", Number::Float(*fl)),
            LuaKey::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for LuaKey {
    fn from(value: &str) -> Self {
        LuaKey::String(value.to_string())
    }
}

impl From<String> for LuaKey {
    fn from(value: String) -> Self {
        LuaKey::String(value)
    }
}

impl From<i64> for LuaKey {
    fn from(value: i64) -> Self {
        LuaKey::Integer(value)
    }
}

impl From<i32> for LuaKey {
    fn from(value: i32) -> Self {
        LuaKey::Integer(value as i64)
    }
}

impl From<bool> for LuaKey {
    fn from(value: bool) -> Self {
        LuaKey::Bool(value)
    }
}

impl LuaValue {
    /// Returns `true` if the value is nil.
    #[inline]
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, LuaValue::Nil)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, LuaValue::Bool(_))
    }

    /// Returns `true` if the value is a number.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, LuaValue::Number(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, LuaValue::String(_))
    }

    /// Returns `true` if the value is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, LuaValue::Array(_))
    }

    /// Returns `true` if the value is a keyed table.
    #[inline]
    #[must_use]
    pub const fn is_table(&self) -> bool {
        matches!(self, LuaValue::Table(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LuaValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_luatable::LuaValue;
    ///
    /// assert_eq!(LuaValue::from("hello").as_str(), Some("hello"));
    /// assert_eq!(LuaValue::from(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LuaValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an integer or a whole-number float, returns it.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            LuaValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// If the value is a number, returns it as `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LuaValue::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// If the value is an array, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<LuaValue>> {
        match self {
            LuaValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// If the value is a keyed table, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_table(&self) -> Option<&LuaTable> {
        match self {
            LuaValue::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Looks up an entry by key, treating arrays as tables keyed `1..=n`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_luatable::parse;
    ///
    /// let value = parse("{10, 20, name = 'x'}").unwrap();
    /// assert_eq!(value.get(1).and_then(|v| v.as_i64()), Some(10));
    /// assert_eq!(value.get("name").and_then(|v| v.as_str()), Some("x"));
    ///
    /// let array = parse("{10, 20}").unwrap();
    /// assert_eq!(array.get(2).and_then(|v| v.as_i64()), Some(20));
    /// ```
    #[must_use]
    pub fn get<K: Into<crate::LuaKey>>(&self, key: K) -> Option<&LuaValue> {
        let key = key.into();
        match self {
            LuaValue::Table(t) => t.get(&key),
            LuaValue::Array(arr) => {
                let index = key.as_integer()?;
                let index = usize::try_from(index).ok()?.checked_sub(1)?;
                arr.get(index)
            }
            _ => None,
        }
    }

    /// Short type name, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            LuaValue::Nil => "nil",
            LuaValue::Bool(_) => "boolean",
            LuaValue::Number(_) => "number",
            LuaValue::String(_) => "string",
            LuaValue::Array(_) => "array",
            LuaValue::Table(_) => "table",
        }
    }
}

impl fmt::Display for LuaValue {
    /// Formats the value as a compact table literal, same as [`crate::serialize`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::serialize(self))
    }
}

impl Serialize for LuaValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            LuaValue::Nil => serializer.serialize_unit(),
            LuaValue::Bool(b) => serializer.serialize_bool(*b),
            LuaValue::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            LuaValue::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            LuaValue::String(s) => serializer.serialize_str(s),
            LuaValue::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            LuaValue::Table(table) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(table.len()))?;
                for (k, v) in table.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl Serialize for LuaKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            LuaKey::Bool(b) => serializer.serialize_bool(*b),
            LuaKey::Integer(i) => serializer.serialize_i64(*i),
            LuaKey::Float(f) => serializer.serialize_f64(*f),
            LuaKey::String(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for LuaValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct LuaValueVisitor;

        impl<'de> Visitor<'de> for LuaValueVisitor {
            type Value = LuaValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any table-literal value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(LuaValue::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(LuaValue::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                i64::try_from(value)
                    .map(|i| LuaValue::Number(Number::Integer(i)))
                    .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(LuaValue::Number(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(LuaValue::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(LuaValue::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(LuaValue::Nil)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(LuaValue::Nil)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(LuaValue::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut keyed = LuaTable::new();
                while let Some((key, value)) = map.next_entry::<LuaValue, LuaValue>()? {
                    let key = LuaKey::from_value(&key).ok_or_else(|| {
                        de::Error::custom(format!("{} cannot be a table key", key.type_name()))
                    })?;
                    keyed.insert(key, value);
                }
                Ok(crate::parser::reduce(keyed, Vec::new()))
            }
        }

        deserializer.deserialize_any(LuaValueVisitor)
    }
}

impl TryFrom<LuaValue> for i64 {
    type Error = crate::Error;

    fn try_from(value: LuaValue) -> crate::Result<Self> {
        match value {
            LuaValue::Number(n) => n
                .as_i64()
                .ok_or_else(|| crate::Error::custom(format!("cannot convert {} to i64", n))),
            _ => Err(crate::Error::custom(format!(
                "expected integer, found {}",
                value.type_name()
            ))),
        }
    }
}

impl TryFrom<LuaValue> for f64 {
    type Error = crate::Error;

    fn try_from(value: LuaValue) -> crate::Result<Self> {
        match value {
            LuaValue::Number(n) => Ok(n.as_f64()),
            _ => Err(crate::Error::custom(format!(
                "expected number, found {}",
                value.type_name()
            ))),
        }
    }
}

impl TryFrom<LuaValue> for bool {
    type Error = crate::Error;

    fn try_from(value: LuaValue) -> crate::Result<Self> {
        match value {
            LuaValue::Bool(b) => Ok(b),
            _ => Err(crate::Error::custom(format!(
                "expected boolean, found {}",
                value.type_name()
            ))),
        }
    }
}

impl TryFrom<LuaValue> for String {
    type Error = crate::Error;

    fn try_from(value: LuaValue) -> crate::Result<Self> {
        match value {
            LuaValue::String(s) => Ok(s),
            _ => Err(crate::Error::custom(format!(
                "expected string, found {}",
                value.type_name()
            ))),
        }
    }
}

impl From<bool> for LuaValue {
    fn from(value: bool) -> Self {
        LuaValue::Bool(value)
    }
}

impl From<i32> for LuaValue {
    fn from(value: i32) -> Self {
        LuaValue::Number(Number::Integer(value as i64))
    }
}

impl From<i64> for LuaValue {
    fn from(value: i64) -> Self {
        LuaValue::Number(Number::Integer(value))
    }
}

impl From<u32> for LuaValue {
    fn from(value: u32) -> Self {
        LuaValue::Number(Number::Integer(value as i64))
    }
}

impl From<f64> for LuaValue {
    fn from(value: f64) -> Self {
        LuaValue::Number(Number::Float(value))
    }
}

impl From<Number> for LuaValue {
    fn from(value: Number) -> Self {
        LuaValue::Number(value)
    }
}

impl From<String> for LuaValue {
    fn from(value: String) -> Self {
        LuaValue::String(value)
    }
}

impl From<&str> for LuaValue {
    fn from(value: &str) -> Self {
        LuaValue::String(value.to_string())
    }
}

impl From<Vec<LuaValue>> for LuaValue {
    fn from(value: Vec<LuaValue>) -> Self {
        LuaValue::Array(value)
    }
}

impl From<LuaTable> for LuaValue {
    fn from(value: LuaTable) -> Self {
        LuaValue::Table(value)
    }
}

impl From<LuaKey> for LuaValue {
    fn from(value: LuaKey) -> Self {
        value.to_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn test_tryfrom_i64() {
        let value = LuaValue::Number(Number::Integer(42));
        assert_eq!(i64::try_from(value).unwrap(), 42);

        let value = LuaValue::Number(Number::Float(42.0));
        assert_eq!(i64::try_from(value).unwrap(), 42);

        assert!(i64::try_from(LuaValue::Number(Number::Float(0.5))).is_err());
        assert!(i64::try_from(LuaValue::from("test")).is_err());
    }

    #[test]
    fn test_tryfrom_scalars() {
        assert_eq!(f64::try_from(LuaValue::from(3)).unwrap(), 3.0);
        assert!(bool::try_from(LuaValue::Bool(true)).unwrap());
        assert!(bool::try_from(LuaValue::from(1)).is_err());
        assert_eq!(String::try_from(LuaValue::from("hi")).unwrap(), "hi");
        assert!(String::try_from(LuaValue::Nil).is_err());
    }

    #[test]
    fn test_float_keys_normalize() {
        assert_eq!(LuaKey::from_f64(1.0), Some(LuaKey::Integer(1)));
        assert_eq!(LuaKey::from_f64(-0.0), Some(LuaKey::Integer(0)));
        assert_eq!(LuaKey::from_f64(1.5), Some(LuaKey::Float(1.5)));
        assert_eq!(LuaKey::from_f64(f64::NAN), None);
        assert_eq!(
            LuaKey::from_value(&LuaValue::Number(Number::Float(2.0))),
            Some(LuaKey::Integer(2))
        );
    }

    #[test]
    fn test_key_from_value_rejects_non_scalars() {
        assert_eq!(LuaKey::from_value(&LuaValue::Nil), None);
        assert_eq!(LuaKey::from_value(&LuaValue::Array(vec![])), None);
        assert_eq!(LuaKey::from_value(&LuaValue::Table(LuaTable::new())), None);
    }

    #[test]
    fn test_float_display_keeps_fraction() {
        assert_eq!(Number::Float(1.0).to_string(), "1.0");
        assert_eq!(Number::Float(0.1).to_string(), "0.1");
        assert_eq!(Number::Float(f64::INFINITY).to_string(), "1e999");
        assert_eq!(Number::Integer(-5).to_string(), "-5");
    }

    #[test]
    fn test_get_on_array_and_table() {
        let arr = LuaValue::Array(vec![LuaValue::from("a"), LuaValue::from("b")]);
        assert_eq!(arr.get(1), Some(&LuaValue::from("a")));
        assert_eq!(arr.get(0), None);
        assert_eq!(arr.get(3), None);
        assert_eq!(arr.get("x"), None);

        let mut table = LuaTable::new();
        table.insert(LuaKey::from("k"), LuaValue::from(1));
        assert_eq!(LuaValue::Table(table).get("k"), Some(&LuaValue::from(1)));
    }

    #[test]
    fn test_i64_boundaries() {
        assert_eq!(float_to_i64(9_223_372_036_854_775_808.0), None);
        assert_eq!(float_to_i64(-9_223_372_036_854_775_808.0), Some(i64::MIN));
        assert_eq!(float_to_i64(f64::INFINITY), None);
    }

    #[test]
    fn test_deserialize_rejects_u64_beyond_i64() {
        let max: LuaValue = serde_json::from_str("9223372036854775807").unwrap();
        assert_eq!(max, LuaValue::from(i64::MAX));
        assert!(serde_json::from_str::<LuaValue>("18446744073709551615").is_err());
    }
}
