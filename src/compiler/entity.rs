//! Target entity types named in the FROM clause.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{OqlError, Result};

/// Application type mapped to a persistent entity.
///
/// ```ignore
/// struct Widget;
/// impl Entity for Widget {
///     const TYPE_NAME: &'static str = "com.example.Widget";
/// }
/// ```
pub trait Entity {
    /// Fully-qualified name the query engine knows the type by.
    const TYPE_NAME: &'static str;
}

/// Validated fully-qualified entity type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityType {
    name: String,
}

impl EntityType {
    /// Creates an entity type from its fully-qualified name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, contains whitespace, or names an
    /// array type (`Foo[]` or a `[` descriptor).
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(OqlError::InvalidEntityType(
                "entity type name must not be blank".to_string(),
            ));
        }
        if name.starts_with('[') || name.ends_with("[]") {
            return Err(OqlError::InvalidEntityType(format!(
                "array type '{name}' is not an entity type"
            )));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(OqlError::InvalidEntityType(format!(
                "entity type name '{name}' contains whitespace"
            )));
        }
        Ok(EntityType { name })
    }

    /// Entity type declared by `E`.
    ///
    /// # Errors
    ///
    /// Returns an error if `E::TYPE_NAME` is not a valid entity type name.
    pub fn of<E: Entity>() -> Result<Self> {
        Self::new(E::TYPE_NAME)
    }

    /// Returns the fully-qualified name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the last dot-separated segment of the name.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl TryFrom<String> for EntityType {
    type Error = OqlError;

    fn try_from(name: String) -> Result<Self> {
        Self::new(name)
    }
}

impl From<EntityType> for String {
    fn from(entity: EntityType) -> Self {
        entity.name
    }
}
