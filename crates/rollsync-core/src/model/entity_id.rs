// ── Core identity type ──
//
// EntityId is the key every domain type is addressed by. It unifies the
// service's numeric row ids, older string keys, and the locally
// synthesized ids of freshly recorded events.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use rollsync_api::RecordId;

/// Canonical identifier for any roster entity.
///
/// Numeric and textual keys compare unequal even when they print the same
/// (`7` vs `"7"`); parsing from text prefers the numeric form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl EntityId {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// Loose comparison used by client-side filters: the service is not
    /// consistent about emitting `7` or `"7"` for the same key.
    pub fn matches(&self, other: &EntityId) -> bool {
        self == other || self.to_string() == other.to_string()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match s.parse::<i64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<RecordId> for EntityId {
    fn from(id: RecordId) -> Self {
        match id {
            RecordId::Number(n) => Self::Number(n),
            RecordId::Text(s) => Self::Text(s),
        }
    }
}

impl From<&EntityId> for RecordId {
    fn from(id: &EntityId) -> Self {
        match id {
            EntityId::Number(n) => Self::Number(*n),
            EntityId::Text(s) => Self::Text(s.clone()),
        }
    }
}
