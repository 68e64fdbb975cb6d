//! Query string encoding.
//!
//! Keys and scalar values are percent-encoded independently: every character outside the
//! Unicode `\w` class (letters, combining marks, decimal digits and connector punctuation such
//! as `_`) is replaced by the percent-encoded bytes of its UTF-8 form. A whole word therefore
//! stays readable even when it is spelled with combining marks (`हिन्दी`, `สวัสดี`).
//! Nested maps are flattened into bracket notation, `parent%5Bchild%5D=value`, with the
//! brackets inserted after encoding so they always appear as `%5B`/`%5D`.
//!
//! Unlike PHP's `urlencode`, a space is written as `%20` (unless [`SpaceEncoding::Plus`] is
//! configured) and `-`, `.` and `~` are not exempt: they become `%2D`, `%2E` and `%7E`, so
//! a float such as `0.25` is written `0%2E25`.
//!
//! Inside a nested map, integer keys that follow the running sequence `0, 1, 2, ...` are
//! written as empty brackets (`tags%5B%5D=x`). The counter is reset per container and, after
//! any integer-keyed entry (including a null one that is skipped), moves to that key plus one.
//! A key that breaks the sequence is written literally (`list%5B2%5D=b`).

use lazy_regex::{lazy_regex, Lazy, Regex};
use percent_encoding::{percent_encode, NON_ALPHANUMERIC};
use std::borrow::Cow;
use tracing::trace;

use crate::config::{EncoderConfig, SpaceEncoding};
use crate::query::QueryString;
use crate::value::{Key, Value, ValueMap};

static UNICODE_NON_WORD: Lazy<Regex> = lazy_regex!(r"\W+");
static ASCII_NON_WORD: Lazy<Regex> = lazy_regex!(r"[^0-9A-Za-z_]+");

/// Percent-encoder and bracket-notation flattener.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Encoder {
    config: EncoderConfig,
}

impl Encoder {
    /// Create an encoder with the given configuration.
    #[must_use]
    pub const fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Percent-encode a single key or value.
    #[must_use]
    pub fn encode_component(&self, input: &str) -> String {
        let non_word: &Regex = if self.config.unicode_words {
            &UNICODE_NON_WORD
        } else {
            &ASCII_NON_WORD
        };

        let mut out = String::with_capacity(input.len());
        let mut last = 0;
        for run in non_word.find_iter(input) {
            out.push_str(&input[last..run.start()]);
            self.push_escaped(&mut out, run.as_str());
            last = run.end();
        }
        out.push_str(&input[last..]);
        out
    }

    fn push_escaped(&self, out: &mut String, run: &str) {
        for c in run.chars() {
            if c == ' ' && self.config.space == SpaceEncoding::Plus {
                out.push('+');
            } else {
                let mut buf = [0u8; 4];
                out.extend(percent_encode(
                    c.encode_utf8(&mut buf).as_bytes(),
                    NON_ALPHANUMERIC,
                ));
            }
        }
    }

    /// Flatten top-level parameters into encoded fragments, in iteration order.
    ///
    /// Top-level names are always written as names; index suppression only applies inside
    /// nested maps. Null values are skipped, as are nested maps that produce nothing.
    pub fn encode_params<'a, I>(&self, params: I) -> QueryString
    where
        I: IntoIterator<Item = (&'a str, &'a Value)>,
    {
        let mut query = QueryString::new();
        for (name, value) in params {
            if let Some(fragment) = self.encode_entry(&self.encode_component(name), value) {
                query.push(fragment);
            }
        }
        trace!(fragments = query.len(), "encoded query parameters");
        query
    }

    /// Encode one entry whose fully qualified, already encoded name is `name`.
    fn encode_entry(&self, name: &str, value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::Map(map) => {
                let nested = self.encode_nested(map, name);
                (!nested.is_empty()).then_some(nested)
            }
            Value::Scalar(scalar) => {
                let text = scalar.stringify(self.config.booleans);
                Some(format!("{name}={}", self.encode_component(&text)))
            }
        }
    }

    /// Encode a nested map under `parent`, returning its fragments pre-joined with `&`.
    fn encode_nested(&self, map: &ValueMap, parent: &str) -> String {
        let mut next_index = 0usize;
        let mut parts = Vec::with_capacity(map.len());

        for (key, value) in map {
            let local = match key {
                Key::Index(index) => {
                    let local = if *index == next_index {
                        Cow::Borrowed("")
                    } else {
                        Cow::Owned(index.to_string())
                    };
                    next_index = index.saturating_add(1);
                    local
                }
                Key::Name(name) => Cow::Borrowed(name.as_str()),
            };

            if value.is_null() {
                continue;
            }

            let name = format!("{parent}%5B{}%5D", self.encode_component(&local));
            if let Some(part) = self.encode_entry(&name, value) {
                parts.push(part);
            }
        }

        parts.join("&")
    }
}
