//! Configuration for query string encoding.
//!
//! The defaults produce strict percent-encoded output: Unicode word characters are kept,
//! spaces become `%20` and booleans render as `1`/`0`.

use crate::Error;
use serde::{Deserialize, Serialize};

/// How a space character is written in encoded keys and values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceEncoding {
    /// `%20`
    #[default]
    Percent,
    /// `+`, as produced by HTML form encoding
    Plus,
}

/// How boolean scalars are stringified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolFormat {
    /// `1` for true, `0` for false
    #[default]
    Numeric,
    /// `true` / `false`
    Literal,
}

impl BoolFormat {
    /// Render a boolean in this format.
    #[must_use]
    pub const fn render(self, value: bool) -> &'static str {
        match (self, value) {
            (Self::Numeric, true) => "1",
            (Self::Numeric, false) => "0",
            (Self::Literal, true) => "true",
            (Self::Literal, false) => "false",
        }
    }
}

/// Encoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Keep Unicode word characters (letters, combining marks, decimal digits and connector
    /// punctuation) unencoded. When false only ASCII alphanumerics and `_` are kept.
    #[serde(default = "default_unicode_words")]
    pub unicode_words: bool,

    /// Space encoding
    #[serde(default)]
    pub space: SpaceEncoding,

    /// Boolean rendering
    #[serde(default)]
    pub booleans: BoolFormat,
}

const fn default_unicode_words() -> bool {
    true
}

impl EncoderConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            unicode_words: default_unicode_words(),
            space: SpaceEncoding::Percent,
            booleans: BoolFormat::Numeric,
        }
    }

    /// Set whether Unicode word characters are kept unencoded.
    #[must_use]
    pub const fn with_unicode_words(mut self, enabled: bool) -> Self {
        self.unicode_words = enabled;
        self
    }

    /// Set the space encoding.
    #[must_use]
    pub const fn with_space(mut self, space: SpaceEncoding) -> Self {
        self.space = space;
        self
    }

    /// Set the boolean format.
    #[must_use]
    pub const fn with_booleans(mut self, booleans: BoolFormat) -> Self {
        self.booleans = booleans;
        self
    }

    /// Load a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the document is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json)
            .map_err(|e| Error::ConfigError(format!("Invalid encoder configuration: {e}")))
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::new()
    }
}
