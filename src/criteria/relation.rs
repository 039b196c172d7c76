//! Comparison relations used by relational bindings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OqlError;

/// Comparison operator between a property and a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relation {
    #[default]
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
}

impl Relation {
    /// All relations, in declaration order.
    pub const ALL: [Relation; 6] = [
        Relation::Equal,
        Relation::NotEqual,
        Relation::LessThan,
        Relation::LessEqual,
        Relation::GreaterThan,
        Relation::GreaterEqual,
    ];

    /// Returns the operator symbol emitted into statements.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Relation::Equal => "=",
            Relation::NotEqual => "!=",
            Relation::LessThan => "<",
            Relation::LessEqual => "<=",
            Relation::GreaterThan => ">",
            Relation::GreaterEqual => ">=",
        }
    }

    /// Returns the canonical upper-case name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Relation::Equal => "EQUAL",
            Relation::NotEqual => "NOT_EQUAL",
            Relation::LessThan => "LESS_THAN",
            Relation::LessEqual => "LESS_EQUAL",
            Relation::GreaterThan => "GREATER_THAN",
            Relation::GreaterEqual => "GREATER_EQUAL",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Relation {
    type Err = OqlError;

    /// Accepts a canonical name (case-insensitive) or an operator symbol.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Relation::ALL
            .into_iter()
            .find(|r| r.symbol() == trimmed || r.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| OqlError::InvalidArgument(format!("Unknown relation '{s}'")))
    }
}
