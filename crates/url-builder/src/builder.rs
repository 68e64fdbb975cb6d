//! Immutable URL builder.
//!
//! [`QueryBuilder`] holds an opaque path, a list of preferred field names and an ordered map
//! of named values. Formatting it (via [`Display`](fmt::Display)) yields the path followed by
//! a percent-encoded query string in which preferred fields come first, in declared order, and
//! every other value follows in insertion order.
//!
//! The `with*` methods leave the receiver untouched and return an independent copy; the
//! `set_*`/`unset_*`/`append_*` methods mutate in place for incremental construction.
//!
//! ```
//! use url_builder::QueryBuilder;
//!
//! let url = QueryBuilder::new()
//!     .with_path("/search")
//!     .with_fields(["q"])
//!     .with("page", 2)
//!     .with("q", "rust lang");
//!
//! assert_eq!(url.to_string(), "/search?q=rust%20lang&page=2");
//! ```

use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::ops::Index;
use tracing::{debug, trace};
use url::Url;

use crate::encode::Encoder;
use crate::error::Result;
use crate::query::QueryString;
use crate::value::{Value, NULL};

/// Path, preferred field order and named values of a URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBuilder {
    path: String,
    fields: IndexSet<String>,
    values: IndexMap<String, Value>,
}

impl QueryBuilder {
    /// Create a builder with an empty path, no fields and no values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from its parts. Null values are dropped and duplicate field names
    /// collapse onto their first occurrence.
    #[must_use]
    pub fn from_parts<F, N, V, K, T>(path: impl Into<String>, fields: F, values: V) -> Self
    where
        F: IntoIterator<Item = N>,
        N: Into<String>,
        V: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<Value>,
    {
        let mut builder = Self {
            path: path.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            values: IndexMap::new(),
        };
        builder.extend(values);
        builder
    }

    // Copy-producing mutators

    /// Returns a copy with the path replaced.
    #[must_use]
    pub fn with_path(&self, path: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.path = path.into();
        copy
    }

    /// Returns a copy with `name` set to `value`, or removed when `value` is null.
    #[must_use]
    pub fn with(&self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut copy = self.clone();
        copy.set_value(name, value);
        copy
    }

    /// Returns a copy without `name`.
    #[must_use]
    pub fn without(&self, name: &str) -> Self {
        let mut copy = self.clone();
        copy.unset_value(name);
        copy
    }

    /// Returns a copy with every entry applied as in [`with`](Self::with).
    #[must_use]
    pub fn with_values<I, K, V>(&self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut copy = self.clone();
        copy.extend(values);
        copy
    }

    /// Returns a copy without any of the given names.
    #[must_use]
    pub fn without_values<I, S>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut copy = self.clone();
        for name in names {
            copy.unset_value(name.as_ref());
        }
        copy
    }

    /// Returns a copy with no values. Path and fields are kept.
    #[must_use]
    pub fn without_all_values(&self) -> Self {
        let mut copy = self.clone();
        copy.values.clear();
        copy
    }

    /// Returns a copy whose fields are the union of the current fields and `names`,
    /// in first-seen order.
    #[must_use]
    pub fn with_fields<I, S>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut copy = self.clone();
        copy.fields.extend(names.into_iter().map(Into::into));
        copy
    }

    // In-place mutators

    /// Replace the path.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// Set `name` to `value`; a null value removes the entry instead. An existing entry keeps
    /// its position.
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        match value.into() {
            Value::Null => {
                self.values.shift_remove(&name);
            }
            value => {
                self.values.insert(name, value);
            }
        }
    }

    /// Remove `name`.
    pub fn unset_value(&mut self, name: &str) {
        self.values.shift_remove(name);
    }

    /// Append `value` to the list stored under `name`.
    ///
    /// A missing entry becomes the one-element list `[value]`, a list gets `value` pushed
    /// at its next free index, and a scalar is promoted to `[existing, value]`. Null values
    /// are ignored.
    pub fn append_value(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let value = value.into();
        if value.is_null() {
            return;
        }

        match self.values.entry(name.into()) {
            Entry::Vacant(entry) => {
                entry.insert(Value::from(vec![value]));
            }
            Entry::Occupied(mut entry) => {
                if let Value::Map(list) = entry.get_mut() {
                    list.push(value);
                } else {
                    debug!(name = %entry.key(), "promoting scalar value to list");
                    let previous = std::mem::take(entry.get_mut());
                    entry.insert(Value::from(vec![previous, value]));
                }
            }
        }
    }

    // Readers

    /// Returns true if `name` has a value.
    #[must_use]
    pub fn has_value(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The value stored under `name`.
    #[must_use]
    pub fn get_value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The value stored under `name`, or [`Value::Null`] when absent.
    #[must_use]
    pub fn value_or_null(&self, name: &str) -> &Value {
        self.values.get(name).unwrap_or(&NULL)
    }

    /// All values in insertion order.
    #[must_use]
    pub fn all_values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    /// Values of the preferred fields that are present, in field order.
    #[must_use]
    pub fn fields_values(&self) -> IndexMap<String, Value> {
        self.preferred()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    /// Preferred field names in declared order.
    #[must_use]
    pub fn fields(&self) -> &IndexSet<String> {
        &self.fields
    }

    /// The path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over values in insertion order (field order is not applied).
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.values.iter()
    }

    // Serialization

    fn preferred(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().filter_map(move |name| {
            self.values
                .get_key_value(name.as_str())
                .map(|(name, value)| (name.as_str(), value))
        })
    }

    /// Parameters in serialization order: present preferred fields first, then the rest.
    fn ordered_params(&self) -> impl Iterator<Item = (&str, &Value)> {
        let rest = self
            .values
            .iter()
            .filter(move |(name, _)| !self.fields.contains(name.as_str()))
            .map(|(name, value)| (name.as_str(), value));
        self.preferred().chain(rest)
    }

    /// Encode the values into query fragments with `encoder`.
    #[must_use]
    pub fn query_with(&self, encoder: &Encoder) -> QueryString {
        encoder.encode_params(self.ordered_params())
    }

    /// Build the URL string with `encoder`.
    ///
    /// The path is returned unchanged, without a `?`, when no value produces a fragment.
    #[must_use]
    pub fn build_with(&self, encoder: &Encoder) -> String {
        if self.values.is_empty() {
            return self.path.clone();
        }

        trace!(path = %self.path, values = self.values.len(), "building url");
        let query = self.query_with(encoder);
        if query.is_empty() {
            return self.path.clone();
        }
        format!("{}?{query}", self.path)
    }

    /// Resolve the built string against `base`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`](crate::Error::InvalidUrl) if the result is not a valid URL.
    pub fn resolve(&self, base: &Url) -> Result<Url> {
        Ok(base.join(&self.to_string())?)
    }
}

impl fmt::Display for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build_with(&Encoder::default()))
    }
}

impl Index<&str> for QueryBuilder {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        self.value_or_null(name)
    }
}

impl<'a> IntoIterator for &'a QueryBuilder {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<K, V> Extend<(K, V)> for QueryBuilder
where
    K: Into<String>,
    V: Into<Value>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.set_value(name, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for QueryBuilder
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut builder = Self::new();
        builder.extend(iter);
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncoderConfig;
    use crate::value::ValueMap;
    use crate::Error;

    #[test]
    fn test_empty_values_returns_path() {
        assert_eq!(QueryBuilder::new().to_string(), "");
        assert_eq!(QueryBuilder::new().with_path("/a").to_string(), "/a");
        assert_eq!(
            QueryBuilder::new().with_path("/a").with_fields(["x"]).to_string(),
            "/a"
        );
    }

    #[test]
    fn test_values_without_fragments_return_path() {
        let builder = QueryBuilder::new()
            .with_path("/a")
            .with("empty", ValueMap::new());
        assert!(builder.has_value("empty"));
        assert_eq!(builder.to_string(), "/a");
    }

    #[test]
    fn test_field_ordering() {
        let builder = QueryBuilder::from_parts(
            "",
            ["b", "a"],
            [("a", 1), ("b", 2), ("c", 3)],
        );
        assert_eq!(builder.to_string(), "?b=2&a=1&c=3");
    }

    #[test]
    fn test_missing_fields_are_ignored() {
        let builder = QueryBuilder::new()
            .with_path("/p")
            .with_fields(["missing", "z"])
            .with("a", "1")
            .with("z", "2");
        assert_eq!(builder.to_string(), "/p?z=2&a=1");
    }

    #[test]
    fn test_from_parts_drops_nulls_and_duplicate_fields() {
        let builder = QueryBuilder::from_parts(
            "/p",
            ["a", "b", "a"],
            [("a", Value::Null), ("b", Value::from(1))],
        );
        assert!(!builder.has_value("a"));
        assert_eq!(builder.fields().len(), 2);
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_with_and_null_removal() {
        let builder = QueryBuilder::new().with("k", "v");
        assert_eq!(builder.get_value("k"), Some(&Value::from("v")));

        let cleared = builder.with("k", None::<&str>);
        assert!(!cleared.has_value("k"));
        assert!(builder.has_value("k"));
    }

    #[test]
    fn test_with_keeps_position_of_existing_name() {
        let builder = QueryBuilder::new()
            .with("a", 1)
            .with("b", 2)
            .with("a", 3);
        assert_eq!(builder.to_string(), "?a=3&b=2");
    }

    #[test]
    fn test_path_roundtrip() {
        let builder = QueryBuilder::new().with_path("/users/42");
        assert_eq!(builder.path(), "/users/42");
    }

    #[test]
    fn test_with_without() {
        let builder = QueryBuilder::new().with("n", 1).without("n");
        assert!(!builder.has_value("n"));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_with_values() {
        let base = QueryBuilder::new().with("a", 1).with("b", 2);
        let updated = base.with_values([("a", Value::Null), ("c", Value::from(3))]);

        assert!(!updated.has_value("a"));
        assert_eq!(updated.to_string(), "?b=2&c=3");
        assert_eq!(base.to_string(), "?a=1&b=2");
    }

    #[test]
    fn test_without_values() {
        let builder = QueryBuilder::new()
            .with("a", 1)
            .with("b", 2)
            .with("c", 3)
            .without_values(["a", "c", "absent"]);
        assert_eq!(builder.to_string(), "?b=2");
    }

    #[test]
    fn test_without_all_values_keeps_path_and_fields() {
        let builder = QueryBuilder::new()
            .with_path("/x")
            .with_fields(["a"])
            .with("a", 1)
            .without_all_values();
        assert!(builder.is_empty());
        assert_eq!(builder.path(), "/x");
        assert!(builder.fields().contains("a"));
    }

    #[test]
    fn test_with_fields_union() {
        let builder = QueryBuilder::new()
            .with_fields(["a", "b"])
            .with_fields(["b", "c", "a", "d"]);
        let fields: Vec<&str> = builder.fields().iter().map(String::as_str).collect();
        assert_eq!(fields, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_append_value_sequence() {
        let mut builder = QueryBuilder::new();
        builder.append_value("tag", "x");
        builder.append_value("tag", "y");
        builder.append_value("tag", "z");

        assert_eq!(
            builder.get_value("tag"),
            Some(&Value::from(vec!["x", "y", "z"]))
        );
        assert_eq!(
            builder.to_string(),
            "?tag%5B%5D=x&tag%5B%5D=y&tag%5B%5D=z"
        );
    }

    #[test]
    fn test_append_value_promotes_scalar() {
        let mut builder = QueryBuilder::new().with("tag", "x");
        builder.append_value("tag", "y");
        assert_eq!(builder.get_value("tag"), Some(&Value::from(vec!["x", "y"])));
    }

    #[test]
    fn test_append_null_is_noop() {
        let mut builder = QueryBuilder::new();
        builder.append_value("tag", Value::Null);
        assert!(!builder.has_value("tag"));
    }

    #[test]
    fn test_copy_independence() {
        let a = QueryBuilder::new().with("k", "v").with("list", vec!["x"]);
        let mut b = a.with("other", 1);

        b.set_value("k", "changed");
        b.append_value("list", "y");
        b.unset_value("other");

        assert_eq!(a.get_value("k"), Some(&Value::from("v")));
        assert_eq!(a.get_value("list"), Some(&Value::from(vec!["x"])));
        assert_eq!(b.get_value("list"), Some(&Value::from(vec!["x", "y"])));
    }

    #[test]
    fn test_fields_values() {
        let builder = QueryBuilder::new()
            .with_fields(["c", "a", "missing"])
            .with("a", 1)
            .with("b", 2)
            .with("c", 3);

        let preferred: Vec<_> = builder.fields_values().into_keys().collect();
        assert_eq!(preferred, vec!["c".to_string(), "a".to_string()]);
        assert_eq!(builder.len(), 3);
    }

    #[test]
    fn test_index_and_iteration() {
        let mut builder = QueryBuilder::new().with_fields(["b"]);
        builder.extend([("a", 1), ("b", 2)]);

        assert_eq!(builder["a"], Value::from(1));
        assert!(builder["absent"].is_null());
        assert!(builder.value_or_null("absent").is_null());

        let names: Vec<&String> = (&builder).into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_build_with_custom_encoder() {
        let builder = QueryBuilder::new().with("q", "a b").with("on", true);
        let encoder = Encoder::new(
            EncoderConfig::new()
                .with_space(crate::config::SpaceEncoding::Plus)
                .with_booleans(crate::config::BoolFormat::Literal),
        );
        assert_eq!(builder.build_with(&encoder), "?q=a+b&on=true");
    }

    #[test]
    fn test_resolve() {
        let base = Url::parse("https://api.example.com/v1/").unwrap();
        let url = QueryBuilder::new()
            .with_path("items")
            .with("ids", vec![1, 2])
            .resolve(&base)
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.example.com/v1/items?ids%5B%5D=1&ids%5B%5D=2"
        );
    }

    #[test]
    fn test_resolve_invalid_base() {
        let base = Url::parse("mailto:someone@example.com").unwrap();
        let result = QueryBuilder::new().with_path("items").resolve(&base);
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_from_iterator() {
        let builder: QueryBuilder = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(builder.to_string(), "?a=1&b=2");
    }
}
