//! Entity types of the canonical ER model

use super::property::Property;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Capability flags read from the entity set exposing an entity type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EntityCapabilities {
    pub creatable: bool,
    pub updatable: bool,
    pub deletable: bool,
}

impl Default for EntityCapabilities {
    fn default() -> Self {
        Self {
            creatable: true,
            updatable: true,
            deletable: true,
        }
    }
}

/// Entity model representing an entity type with its properties and key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Leaf entity type name, unique within a model
    pub name: String,
    /// Vendor display label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Properties in declaration order
    pub properties: Vec<Property>,
    /// Names of the key properties
    #[serde(default)]
    pub keys: BTreeSet<String>,
    /// Capability flags, present when an entity set exposes this type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<EntityCapabilities>,
    /// Tags gathered from the entity sets exposing this type
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Entity {
    /// Create an entity from its properties and key names
    ///
    /// Key names that do not name a property are dropped, and every
    /// property's key flag is recomputed from the remaining key set.
    pub fn new(name: impl Into<String>, properties: Vec<Property>, keys: BTreeSet<String>) -> Self {
        let mut entity = Self {
            name: name.into(),
            label: None,
            properties,
            keys,
            capabilities: None,
            tags: BTreeSet::new(),
        };
        entity.normalize_keys();
        entity
    }

    /// Restrict the key set to property names and recompute key flags
    pub fn normalize_keys(&mut self) {
        let names: BTreeSet<&str> = self.properties.iter().map(|p| p.name.as_str()).collect();
        self.keys.retain(|k| names.contains(k.as_str()));
        for property in &mut self.properties {
            property.is_key = self.keys.contains(&property.name);
            property.entity.clone_from(&self.name);
        }
    }

    /// Look up a property by name
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Key properties in declaration order
    pub fn key_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| p.is_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_restricted_to_properties() {
        let keys = BTreeSet::from(["ID".to_string(), "Missing".to_string()]);
        let entity = Entity::new(
            "Product",
            vec![
                Property::new("Product", "ID", "Edm.Int32"),
                Property::new("Product", "Name", "Edm.String"),
            ],
            keys,
        );

        assert_eq!(entity.keys.len(), 1);
        assert!(entity.property("ID").unwrap().is_key);
        assert!(!entity.property("Name").unwrap().is_key);
        assert_eq!(entity.key_properties().count(), 1);
    }

    #[test]
    fn test_owner_is_rewritten() {
        let entity = Entity::new(
            "Order",
            vec![Property::new("Stale", "ID", "Edm.Int32")],
            BTreeSet::new(),
        );
        assert_eq!(entity.properties[0].entity, "Order");
    }
}
