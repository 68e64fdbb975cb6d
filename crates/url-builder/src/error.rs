//! Error types for URL building.
//!
//! Building a query string never fails for well-formed values; errors only surface at the
//! edges where foreign data is converted into [`Value`](crate::value::Value)s, where
//! configuration is loaded, or where a built URL is resolved against a base.

use thiserror::Error;

/// Main error type for URL building operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A value could not be represented as null, a scalar, or a nested map
    #[error("Invalid value type: {0}")]
    InvalidValueType(String),

    /// The built string could not be resolved into a URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Specialized result type for URL building operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidValueType(_) => "INVALID_VALUE_TYPE",
            Self::InvalidUrl(_) => "INVALID_URL",
            Self::ConfigError(_) => "CONFIG_ERROR",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidValueType(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::InvalidValueType("test".to_string()).error_code(),
            "INVALID_VALUE_TYPE"
        );
        assert_eq!(
            Error::InvalidUrl("test".to_string()).error_code(),
            "INVALID_URL"
        );
        assert_eq!(
            Error::ConfigError("test".to_string()).error_code(),
            "CONFIG_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidValueType("key must be a string".to_string());
        assert_eq!(err.to_string(), "Invalid value type: key must be a string");
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::InvalidValueType(_)));
    }
}
