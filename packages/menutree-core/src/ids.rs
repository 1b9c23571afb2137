use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timestamp attached to every node.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Opaque identifier for a menu node.
///
/// Generated ids are UUID v4 text. Fixed ids (such as the seed hierarchy's `"1-1"`) are
/// accepted as-is; the store only requires uniqueness.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MenuId(pub String);

impl MenuId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MenuId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for MenuId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
