//! Ordered list of encoded query fragments.
//!
//! Each fragment is already percent-encoded. A fragment produced for a nested container may
//! itself hold several `&`-joined pairs; joining the list with `&` still yields a flat query.

use std::fmt;

/// Encoded `key=value` fragments in output order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryString {
    fragments: Vec<String>,
}

impl QueryString {
    /// Create a new, empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fragments: Vec::new(),
        }
    }

    /// Append an encoded fragment. Empty fragments are ignored.
    pub fn push(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        if !fragment.is_empty() {
            self.fragments.push(fragment);
        }
    }

    /// Borrow the fragments.
    #[must_use]
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Return the collected fragments.
    #[must_use]
    pub fn into_fragments(self) -> Vec<String> {
        self.fragments
    }

    /// Number of fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns true if no fragments have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl fmt::Display for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fragments.join("&"))
    }
}
