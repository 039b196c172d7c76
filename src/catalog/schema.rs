//! Entity descriptors used to check criteria before they reach an engine.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::compiler::EntityType;
use crate::criteria::SearchCriteria;
use crate::error::{OqlError, Result};

/// Registry of entity schemas, keyed by simple type name.
///
/// Built once at startup and passed by reference to whatever needs to know
/// an entity's properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    entities: HashMap<String, Arc<EntitySchema>>,
}

impl Catalog {
    /// Creates a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Catalog {
            entities: HashMap::new(),
        }
    }

    /// Registers an entity schema under its simple type name.
    ///
    /// # Errors
    ///
    /// Returns an error if an entity with the same simple name exists.
    pub fn register(&mut self, schema: EntitySchema) -> Result<Arc<EntitySchema>> {
        let key = schema.entity_type.simple_name().to_string();
        if self.entities.contains_key(&key) {
            return Err(OqlError::SchemaError(format!(
                "Entity '{key}' already exists"
            )));
        }
        let schema = Arc::new(schema);
        self.entities.insert(key, Arc::clone(&schema));
        Ok(schema)
    }

    /// Retrieves an entity schema by simple name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<EntitySchema>> {
        self.entities.get(name).cloned()
    }

    /// Retrieves an entity schema by simple name, failing if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if no entity is registered under `name`.
    pub fn require(&self, name: &str) -> Result<Arc<EntitySchema>> {
        self.get(name)
            .ok_or_else(|| OqlError::SchemaError(format!("Entity '{name}' does not exist")))
    }

    /// Checks if an entity exists in the catalog.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// Decodes a catalog from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails or a decoded schema is invalid.
    pub fn from_json(text: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(text)?;
        for schema in catalog.entities.values() {
            schema.validate()?;
        }
        Ok(catalog)
    }

    /// Encodes the catalog as a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Persistent properties of one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    /// Fully-qualified entity type.
    pub entity_type: EntityType,
    /// Declared top-level properties.
    pub properties: Vec<String>,
}

impl EntitySchema {
    /// Creates a new entity schema with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no properties, or a property is blank or
    /// duplicated.
    pub fn new<I, S>(entity_type: EntityType, properties: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let schema = EntitySchema {
            entity_type,
            properties: properties.into_iter().map(Into::into).collect(),
        };
        schema.validate()?;
        Ok(schema)
    }

    fn validate(&self) -> Result<()> {
        if self.properties.is_empty() {
            return Err(OqlError::SchemaError(format!(
                "Entity '{}' must declare at least one property",
                self.entity_type
            )));
        }

        let mut seen = HashSet::new();
        for property in &self.properties {
            if property.trim().is_empty() {
                return Err(OqlError::SchemaError(format!(
                    "Entity '{}' declares a blank property",
                    self.entity_type
                )));
            }
            if !seen.insert(property) {
                return Err(OqlError::SchemaError(format!(
                    "Duplicate property '{property}'"
                )));
            }
        }

        Ok(())
    }

    /// Returns true if the first segment of `path` is a declared property.
    #[must_use]
    pub fn has_property(&self, path: &str) -> bool {
        let head = path.split('.').next().unwrap_or(path);
        self.properties.iter().any(|p| p == head)
    }

    /// Verifies every property path the criteria mentions.
    ///
    /// # Errors
    ///
    /// Returns the first property, in binding/order/projection order, that the
    /// entity does not declare.
    pub fn check_criteria(&self, criteria: &SearchCriteria) -> Result<()> {
        let mut paths: Vec<String> = Vec::new();
        if let Some(binding) = criteria.binding() {
            binding.for_each_property(&mut |p| paths.push(p.to_string()));
        }
        paths.extend(criteria.orders().iter().map(|o| o.property.clone()));
        paths.extend(
            criteria
                .projections()
                .iter()
                .filter_map(|p| p.property_path().map(str::to_string)),
        );

        match paths.iter().find(|p| !self.has_property(p)) {
            Some(unknown) => Err(OqlError::InvalidProperty(format!(
                "'{unknown}' is not a property of {}",
                self.entity_type
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{Binding, Order, Projection};

    fn widget_schema() -> EntitySchema {
        EntitySchema::new(
            EntityType::new("com.example.Widget").unwrap(),
            ["name", "year", "address"],
        )
        .unwrap()
    }

    #[test]
    fn test_catalog_json_roundtrip() {
        let mut catalog = Catalog::new();
        catalog.register(widget_schema()).unwrap();

        let json = catalog.to_json().unwrap();
        let restored = Catalog::from_json(&json).unwrap();

        assert!(restored.contains("Widget"));
        assert_eq!(restored.require("Widget").unwrap().properties.len(), 3);
    }

    #[test]
    fn test_duplicate_entity() {
        let mut catalog = Catalog::new();
        catalog.register(widget_schema()).unwrap();
        assert!(catalog.register(widget_schema()).is_err());
        assert!(catalog.require("Gadget").is_err());
    }

    #[test]
    fn test_schema_validation() {
        let widget = EntityType::new("com.example.Widget").unwrap();
        assert!(EntitySchema::new(widget.clone(), Vec::<String>::new()).is_err());
        assert!(EntitySchema::new(widget.clone(), ["name", "name"]).is_err());
        assert!(EntitySchema::new(widget, ["name", " "]).is_err());
    }

    #[test]
    fn test_nested_paths_check_first_segment() {
        let schema = widget_schema();
        assert!(schema.has_property("address.city"));
        assert!(!schema.has_property("colour"));
    }

    #[test]
    fn test_check_criteria() {
        let schema = widget_schema();
        let ok = SearchCriteria::new()
            .with_binding(Binding::like("name", "%a%"))
            .with_order(Order::desc("year"))
            .with_projection(Projection::count_all());
        assert!(schema.check_criteria(&ok).is_ok());

        let bad = ok.clone().with_projection(Projection::property("colour"));
        let err = schema.check_criteria(&bad).unwrap_err();
        assert!(err.to_string().contains("'colour'"));
    }
}
