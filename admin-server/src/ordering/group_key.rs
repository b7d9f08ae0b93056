//! Group identity
//!
//! A variation's `category` column is the only persisted trace of its group.
//! [`GroupKey`] is the identity read back from that column; the display label
//! is derived separately and may be empty while the key stays stable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category values starting with this prefix are placeholder keys
pub const PLACEHOLDER_PREFIX: &str = "__group:";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroupKey {
    /// User-supplied category, stored verbatim
    Named { name: String },
    /// Variations that never had a category
    Anonymous,
    /// Group whose label was emptied; anchored on one member's id
    Placeholder { anchor: i64 },
}

impl GroupKey {
    /// Resolve the key of a stored `category` value
    pub fn resolve(category: Option<&str>) -> Self {
        let Some(value) = category else {
            return Self::Anonymous;
        };
        if value.trim().is_empty() {
            return Self::Anonymous;
        }
        if let Some(anchor) = value
            .strip_prefix(PLACEHOLDER_PREFIX)
            .and_then(|rest| rest.parse::<i64>().ok())
        {
            return Self::Placeholder { anchor };
        }
        Self::Named {
            name: value.to_string(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named { name: name.into() }
    }

    pub fn placeholder_for(anchor: i64) -> Self {
        Self::Placeholder { anchor }
    }

    /// Value written to `category` for members of this group
    pub fn category_value(&self) -> Option<String> {
        match self {
            Self::Named { name } => Some(name.clone()),
            Self::Anonymous => None,
            Self::Placeholder { anchor } => Some(format!("{PLACEHOLDER_PREFIX}{anchor}")),
        }
    }

    /// Label shown to the admin; empty for anonymous and placeholder groups
    pub fn label(&self) -> &str {
        match self {
            Self::Named { name } => name,
            Self::Anonymous | Self::Placeholder { .. } => "",
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// User input that would be read back as a placeholder key
    pub fn is_reserved_name(name: &str) -> bool {
        name.starts_with(PLACEHOLDER_PREFIX)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { name } => write!(f, "'{name}'"),
            Self::Anonymous => f.write_str("<anonymous>"),
            Self::Placeholder { anchor } => write!(f, "<unnamed #{anchor}>"),
        }
    }
}
