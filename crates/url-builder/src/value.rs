//! Query parameter values.
//!
//! A [`Value`] is either null, a [`Scalar`], or a nested [`ValueMap`]. Maps are insertion
//! ordered and keyed by [`Key`], which is either a non-negative index or a name, so a single
//! container can act as a list, an associative array, or a mix of both.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

use crate::config::BoolFormat;
use crate::error::{Error, Result};

/// Key of an entry inside a [`ValueMap`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Integer position
    Index(usize),
    /// Named entry
    Name(String),
}

impl Key {
    /// Returns the index if this is an integer key.
    #[must_use]
    pub const fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Name(_) => None,
        }
    }

    /// Parses a key the way associative array keys are normalized: canonical decimal strings
    /// (`"0"`, `"17"`, but not `"007"` or `"-1"`) become [`Key::Index`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let canonical = !raw.is_empty()
            && raw.bytes().all(|b| b.is_ascii_digit())
            && (raw == "0" || !raw.starts_with('0'));

        if canonical {
            if let Ok(index) = raw.parse() {
                return Self::Index(index);
            }
        }
        Self::Name(raw.to_string())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for Key {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for Key {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Boolean, rendered according to [`BoolFormat`]
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer that does not fit an `i64`
    UInt(u64),
    /// Floating point number
    Float(f64),
    /// String, used verbatim
    String(String),
}

impl Scalar {
    /// Converts the scalar to the text placed after `=` in the query string.
    #[must_use]
    pub fn stringify(&self, booleans: BoolFormat) -> Cow<'_, str> {
        match self {
            Self::Bool(value) => Cow::Borrowed(booleans.render(*value)),
            Self::Int(value) => Cow::Owned(value.to_string()),
            Self::UInt(value) => Cow::Owned(value.to_string()),
            Self::Float(value) => Cow::Owned(value.to_string()),
            Self::String(value) => Cow::Borrowed(value),
        }
    }
}

/// A query parameter value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Absent; never serialized
    #[default]
    Null,
    /// Single value
    Scalar(Scalar),
    /// Nested list or associative array
    Map(ValueMap),
}

/// Shared null returned by lookups on missing names.
pub(crate) static NULL: Value = Value::Null;

impl Value {
    /// Returns true for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the nested map, if any.
    #[must_use]
    pub const fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the scalar, if any.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Returns the string content of a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(value)) => Some(value),
            _ => None,
        }
    }

    /// Converts any serializable type into a value.
    ///
    /// Sequences become sequentially indexed maps, structs and maps become named maps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValueType`] when the type cannot be expressed as null,
    /// a scalar, or a nested map (for example a map keyed by a struct).
    pub fn from_serialize<T>(value: &T) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_value(value)
            .map(Self::from)
            .map_err(|e| Error::InvalidValueType(e.to_string()))
    }
}

/// Insertion-ordered map of [`Key`] to [`Value`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap(IndexMap<Key, Value>);

impl ValueMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Insert or replace an entry, keeping the position of an existing key.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Append a value under the next free index: one past the largest integer key, or 0.
    pub fn push(&mut self, value: impl Into<Value>) {
        let next = self
            .0
            .keys()
            .filter_map(Key::as_index)
            .max()
            .map_or(0, |max| max.saturating_add(1));
        self.0.insert(Key::Index(next), value.into());
    }

    /// Look up an entry.
    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.0.get(key)
    }

    /// Remove an entry, preserving the order of the remaining ones.
    pub fn remove(&mut self, key: &Key) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Returns true if the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &Key) -> bool {
        self.0.contains_key(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.0.iter()
    }

    /// Returns true if the keys are exactly `0, 1, 2, ...` in order.
    #[must_use]
    pub fn is_list(&self) -> bool {
        self.0
            .keys()
            .enumerate()
            .all(|(position, key)| key.as_index() == Some(position))
    }
}

impl<'a> IntoIterator for &'a ValueMap {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for ValueMap
where
    K: Into<Key>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl<T: Into<Value>> From<Vec<T>> for ValueMap {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().enumerate().collect()
    }
}

macro_rules! value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Scalar(Scalar::Int(i64::from(value)))
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Self::Scalar(Scalar::UInt(value)), |v| {
            Self::Scalar(Scalar::Int(v))
        })
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Self::from(value as u64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Scalar(Scalar::Float(value))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Scalar(Scalar::Float(f64::from(value)))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::String(value.to_string()))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Scalar(Scalar::String(value))
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::Scalar(Scalar::String(value.clone()))
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Self::Map(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Map(ValueMap::from(items))
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Self::Map(items.into_iter().enumerate().collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::from(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Scalar(Scalar::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Self::Scalar(Scalar::UInt(u))
                } else {
                    Self::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            serde_json::Value::String(s) => Self::from(s),
            serde_json::Value::Array(items) => Self::from(items),
            serde_json::Value::Object(entries) => Self::Map(entries.into_iter().collect()),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::UInt(value) => serializer.serialize_u64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::String(value) => serializer.serialize_str(value),
        }
    }
}

impl Serialize for ValueMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.is_list() {
            serializer.collect_seq(self.0.values())
        } else {
            serializer.collect_map(self.0.iter().map(|(key, value)| (key.to_string(), value)))
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Scalar(scalar) => scalar.serialize(serializer),
            Self::Map(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}
