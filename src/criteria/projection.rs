//! Result value selection: plain property projections and aggregations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OqlError;

/// Sentinel property meaning "the whole object".
pub const WHOLE_OBJECT: &str = "*";

/// Selects one value per qualifying object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Projection {
    /// A single property's value, or the whole object for [`WHOLE_OBJECT`].
    Property { property: String },
    /// An aggregate over a property path or the whole object.
    Aggregation {
        expression: String,
        #[serde(default)]
        function: AggregateFunction,
    },
}

impl Projection {
    /// Projects `property`.
    pub fn property(property: impl Into<String>) -> Self {
        Projection::Property {
            property: property.into(),
        }
    }

    /// Projects the whole object.
    #[must_use]
    pub fn whole_object() -> Self {
        Self::property(WHOLE_OBJECT)
    }

    /// Aggregates `expression` with `function`.
    pub fn aggregation(expression: impl Into<String>, function: AggregateFunction) -> Self {
        Projection::Aggregation {
            expression: expression.into(),
            function,
        }
    }

    /// `COUNT(*)`.
    #[must_use]
    pub fn count_all() -> Self {
        Self::aggregation(WHOLE_OBJECT, AggregateFunction::Count)
    }

    /// Returns the property path this projection reads, `None` for the whole
    /// object.
    #[must_use]
    pub fn property_path(&self) -> Option<&str> {
        let path = match self {
            Projection::Property { property } => property,
            Projection::Aggregation { expression, .. } => expression,
        };
        (path != WHOLE_OBJECT).then_some(path.as_str())
    }
}

/// Aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregateFunction {
    #[default]
    Count,
    Max,
    Min,
    Sum,
    Avg,
}

impl AggregateFunction {
    /// Returns the function name emitted into statements.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Max => "MAX",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggregateFunction {
    type Err = OqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "COUNT" => Ok(AggregateFunction::Count),
            "MAX" => Ok(AggregateFunction::Max),
            "MIN" => Ok(AggregateFunction::Min),
            "SUM" => Ok(AggregateFunction::Sum),
            "AVG" => Ok(AggregateFunction::Avg),
            _ => Err(OqlError::InvalidArgument(format!(
                "Unknown aggregate function '{s}'"
            ))),
        }
    }
}
