//! Type-safe wrapper for application identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe wrapper for application identifiers.
///
/// Each application owns one database; every connection and every version
/// partition is scoped to an `AppId`. Ensures app identifiers cannot be
/// accidentally used where table names or row ids are expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppId(String);

impl AppId {
    /// Creates a new AppId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a new AppId, rejecting empty or path-unsafe values.
    pub fn try_new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.is_empty() {
            return Err("app id cannot be empty".to_string());
        }
        if id.contains('/') || id.contains("..") {
            return Err(format!("app id contains path separators: {}", id));
        }
        Ok(Self(id))
    }

    /// Returns the app ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AppId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AppId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for AppId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_empty() {
        assert!(AppId::try_new("").is_err());
    }

    #[test]
    fn test_try_new_rejects_path_separators() {
        assert!(AppId::try_new("../etc").is_err());
        assert!(AppId::try_new("a/b").is_err());
        assert!(AppId::try_new("survey").is_ok());
    }
}
