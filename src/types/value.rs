//! Literal values and query result containers.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Literal value bound to a positional parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// 64-bit signed integer value.
    Int64(i64),
    /// 64-bit floating point value.
    Float64(f64),
    /// Boolean value.
    Bool(bool),
    /// String value.
    String(String),
    /// Date value (days since Unix epoch).
    Date(i32),
    /// Timestamp value (microseconds since Unix epoch).
    Timestamp(i64),
    /// Null value.
    Null,
}

// Manual Hash implementation because f64 doesn't implement Hash
impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Int64(v) | Value::Timestamp(v) => v.hash(state),
            Value::Float64(v) => v.to_bits().hash(state),
            Value::Bool(v) => v.hash(state),
            Value::String(v) => v.hash(state),
            Value::Date(v) => v.hash(state),
            Value::Null => {}
        }
    }
}

// Floats compare by bit pattern so equality agrees with `Hash` and stays
// reflexive: NaN equals a NaN with the same bits, and 0.0 != -0.0.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int64(a), Value::Int64(b)) | (Value::Timestamp(a), Value::Timestamp(b)) => {
                a == b
            }
            (Value::Float64(a), Value::Float64(b)) => a.to_bits() == b.to_bits(),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Value {
    /// Returns true if this value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Attempts to extract an i64 value.
    #[must_use]
    pub fn as_int64(&self) -> Option<i64> {
        match self {
            Value::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the type name used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int64(_) => "INT64",
            Value::Float64(_) => "FLOAT64",
            Value::Bool(_) => "BOOL",
            Value::String(_) => "STRING",
            Value::Date(_) => "DATE",
            Value::Timestamp(_) => "TIMESTAMP",
            Value::Null => "NULL",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "'{v}'"),
            Value::Date(v) => write!(f, "DATE({v})"),
            Value::Timestamp(v) => write!(f, "TIMESTAMP({v})"),
            Value::Null => f.write_str("nil"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int64(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Represents a single row returned by a query engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: HashMap<String, Value>,
}

impl Row {
    /// Creates a new empty row.
    #[must_use]
    pub fn new() -> Self {
        Row {
            values: HashMap::new(),
        }
    }

    /// Sets a column value in the row.
    pub fn set(&mut self, column: String, value: Value) {
        self.values.insert(column, value);
    }

    /// Gets a value by column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }
}

/// Rows returned by a query engine, with column metadata.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct QueryResult {
    /// Ordered list of column names.
    pub columns: Vec<String>,
    /// Result rows.
    pub rows: Vec<Row>,
}

impl QueryResult {
    /// Creates a new empty result with the given column names.
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        QueryResult {
            columns,
            rows: Vec::new(),
        }
    }

    /// Creates an empty result without columns.
    #[must_use]
    pub fn empty() -> Self {
        QueryResult {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Appends a row to the result.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Returns the value of the first column of the first row, if any.
    #[must_use]
    pub fn first_value(&self) -> Option<&Value> {
        let column = self.columns.first()?;
        self.rows.first()?.get(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::String("a".into()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(2001).to_string(), "2001");
        assert_eq!(Value::from("%foo%").to_string(), "'%foo%'");
        assert_eq!(Value::Null.to_string(), "nil");
    }

    #[test]
    fn test_float_equality_by_bits() {
        assert_eq!(Value::Float64(f64::NAN), Value::Float64(f64::NAN));
        assert_ne!(Value::Float64(0.0), Value::Float64(-0.0));
        assert_eq!(Value::Float64(1.5), Value::from(1.5));
        assert_ne!(Value::Int64(1), Value::Timestamp(1));
    }

    #[test]
    fn test_first_value() {
        let mut result = QueryResult::new(vec!["count".to_string()]);
        assert_eq!(result.first_value(), None);

        let mut row = Row::new();
        row.set("count".to_string(), Value::Int64(7));
        result.add_row(row);
        assert_eq!(result.first_value(), Some(&Value::Int64(7)));
    }
}
