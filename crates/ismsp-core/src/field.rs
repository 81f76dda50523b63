//! Operator-authored text fields and the backend's "not yet written" sentinel.
//!
//! The backend marks unwritten `description` / `evidence_name` columns with
//! `"-"` (and older rows with an empty string or `null`). Those forms are
//! decoded once, here, into [`TextField::Unset`] so nothing downstream ever
//! compares against the sentinel string again.

use serde::{Deserialize, Serialize};

/// Wire marker the backend uses for an unwritten field.
pub const SENTINEL: &str = "-";

/// A free-text field that is either unset or carries operator text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum TextField {
    #[default]
    Unset,
    Text(String),
}

impl TextField {
    /// Decode a raw wire value. `"-"`, blank and missing all mean unset.
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if !is_sentinel(s) => Self::Text(s.to_string()),
            _ => Self::Unset,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Self::Unset => None,
            Self::Text(s) => Some(s.as_str()),
        }
    }

    /// Wire encoding, with unset written back as the sentinel.
    pub fn to_wire(&self) -> &str {
        self.as_deref().unwrap_or(SENTINEL)
    }
}

impl From<Option<String>> for TextField {
    fn from(raw: Option<String>) -> Self {
        Self::from_wire(raw.as_deref())
    }
}

impl From<&str> for TextField {
    fn from(raw: &str) -> Self {
        Self::from_wire(Some(raw))
    }
}

impl From<TextField> for String {
    fn from(field: TextField) -> Self {
        match field {
            TextField::Unset => SENTINEL.to_string(),
            TextField::Text(s) => s,
        }
    }
}

/// True for the sentinel forms: `"-"` or blank.
pub fn is_sentinel(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed == SENTINEL
}
