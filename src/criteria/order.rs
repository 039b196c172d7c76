//! Result ordering and pagination.

use serde::{Deserialize, Serialize};

/// Sort key: a property and its direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    pub property: String,
    #[serde(default)]
    pub descending: bool,
}

impl Order {
    /// Ascending order on `property`.
    pub fn asc(property: impl Into<String>) -> Self {
        Order {
            property: property.into(),
            descending: false,
        }
    }

    /// Descending order on `property`.
    pub fn desc(property: impl Into<String>) -> Self {
        Order {
            property: property.into(),
            descending: true,
        }
    }
}

/// At most `count` rows starting at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Limit {
    pub count: u64,
    #[serde(default)]
    pub offset: u64,
}

impl Limit {
    /// Creates a limit.
    #[must_use]
    pub fn new(count: u64, offset: u64) -> Self {
        Limit { count, offset }
    }

    /// Limit for the zero-based page `page` of size `page_size`.
    #[must_use]
    pub fn page(page: u64, page_size: u64) -> Self {
        Limit {
            count: page_size,
            offset: page.saturating_mul(page_size),
        }
    }
}
