//! Document identifiers
//!
//! The store's native identifier is a 128-bit UUID. Outside the store it is
//! only ever seen as its hyphenated string form.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Native identifier of a stored document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh, globally unique identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Whether `s` is the string form of some identifier.
    ///
    /// Only the canonical hyphenated form is accepted.
    pub fn is_well_formed(s: &str) -> bool {
        Self::parse(s).is_some()
    }

    /// Convert an external string to the native identifier
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != 36 {
            return None;
        }
        Uuid::parse_str(s).ok().map(Self)
    }

    /// External string form
    pub fn to_external(&self) -> String {
        self.0.hyphenated().to_string()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
