//! # url-builder
//!
//! Immutable URL builder producing percent-encoded query strings with bracket notation for
//! nested and list-valued parameters (`filter%5Btags%5D%5B%5D=x`).
//!
//! ## Modules
//!
//! - [`builder`] - The [`QueryBuilder`] value object and its copy/in-place mutation API
//! - [`value`] - Null, scalar and nested map values
//! - [`encode`] - Percent-encoding and bracket-notation flattening
//! - [`query`] - Ordered list of encoded query fragments
//! - [`config`] - Encoder configuration
//! - [`error`] - Error types

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod config;
pub mod encode;
pub mod error;
pub mod query;
pub mod value;

// Re-export commonly used types
pub use builder::QueryBuilder;
pub use config::{BoolFormat, EncoderConfig, SpaceEncoding};
pub use encode::Encoder;
pub use error::{Error, Result};
pub use query::QueryString;
pub use value::{Key, Scalar, Value, ValueMap};
