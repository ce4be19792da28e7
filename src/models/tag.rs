//! Tag model for category markers extracted from test titles.

use serde::{Deserialize, Serialize};

/// Category tag attached to a spec run.
///
/// Ids are a dense 1-based sequence scoped to one spec's tag list; names are
/// unique within that list (first occurrence wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

impl Tag {
    /// Create a new tag.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Tag {
            id,
            name: name.into(),
        }
    }
}
