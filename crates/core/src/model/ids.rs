use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a Passage, carried through from the catalog source.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PassageId(String);

impl PassageId {
    /// Creates a new `PassageId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying identifier string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PassageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PassageId({})", self.0)
    }
}

impl fmt::Display for PassageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PassageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passage_id_display() {
        let id = PassageId::new("rc-042");
        assert_eq!(id.to_string(), "rc-042");
        assert_eq!(id.as_str(), "rc-042");
    }

    #[test]
    fn passage_id_debug() {
        let id = PassageId::new("7");
        assert_eq!(format!("{id:?}"), "PassageId(7)");
    }
}
