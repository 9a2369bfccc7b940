//! Qualified names for declared program elements
//!
//! Names are dot-separated identifiers:
//! - `java.lang.String`
//! - `com.acme.Order`
//! - `com.acme.Order.total` (a member of `com.acme.Order`)
//!
//! Checks compare annotation types and declarations by qualified name, never
//! by object identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A dot-separated, fully qualified name.
///
/// Names are immutable and support cheap comparison and hashing. They key the
/// declaration table of a [`TypeUniverse`](crate::TypeUniverse).
///
/// # Examples
///
/// ```
/// # use bvcheck_model::QualifiedName;
/// let name = QualifiedName::from("javax.validation.Payload");
/// assert_eq!(name.simple_name(), "Payload");
/// assert_eq!(name.to_string(), "javax.validation.Payload");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedName {
    segments: Vec<String>,
}

impl QualifiedName {
    /// Create a name from its segments.
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Parse a name from a dot-separated string.
    pub fn parse(s: &str) -> Self {
        Self {
            segments: s.split('.').map(String::from).collect(),
        }
    }

    /// Get the last segment, or an empty string for an empty name.
    pub fn simple_name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Append a member segment, e.g. `com.acme.Order` + `total`.
    pub fn member(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self::new(segments)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for QualifiedName {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl PartialEq<&str> for QualifiedName {
    fn eq(&self, other: &&str) -> bool {
        let mut parts = other.split('.');
        self.segments
            .iter()
            .all(|segment| parts.next() == Some(segment.as_str()))
            && parts.next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        let name = QualifiedName::from("com.acme.Order.total");
        assert_eq!(name.simple_name(), "total");
        assert_eq!(QualifiedName::from("Order").simple_name(), "Order");
        assert_eq!(QualifiedName::new(Vec::new()).simple_name(), "");
    }

    #[test]
    fn test_member_appends_segment() {
        let owner = QualifiedName::from("com.acme.Order");
        assert_eq!(owner.member("total").to_string(), "com.acme.Order.total");
    }

    #[test]
    fn test_str_comparison() {
        let name = QualifiedName::from("java.lang.String");
        assert!(name == "java.lang.String");
        assert!(name != "java.lang");
        assert!(name != "java.lang.String.value");
    }
}
