//! Entity extraction
//!
//! Builds [`Entity`] values from entity type elements, enriched with vendor
//! metadata read from the entity sets that expose each type.

use super::ImportWarning;
use super::config::ImportConfig;
use super::locator::{AttributeKey, NodeKind, SchemaLocator, first_present_attribute, vendor_attribute, vendor_flag};
use crate::models::{Entity, EntityCapabilities, Property, PropertyFlags, leaf_name};
use roxmltree::Node;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Default qualified type for properties without a `Type`
pub const DEFAULT_PROPERTY_TYPE: &str = "Edm.String";

/// Vendor metadata of the entity sets exposing one entity type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntitySetMetadata {
    pub label: Option<String>,
    pub capabilities: EntityCapabilities,
    pub tags: BTreeSet<String>,
}

/// Entity Extractor
///
/// Reads entity types, their keys and properties. Fragments missing a
/// required attribute are skipped and recorded in `warnings`.
#[derive(Debug)]
pub struct EntityExtractor<'c> {
    config: &'c ImportConfig,
    locator: SchemaLocator<'c>,
    /// Fragments skipped during extraction
    pub warnings: Vec<ImportWarning>,
}

impl<'c> EntityExtractor<'c> {
    /// Create a new EntityExtractor
    pub fn new(config: &'c ImportConfig) -> Self {
        Self {
            config,
            locator: SchemaLocator::new(config),
            warnings: Vec::new(),
        }
    }

    /// Extract entities from schema elements
    ///
    /// # Arguments
    ///
    /// * `schemas` - Schema elements to search for entity types.
    /// * `entity_sets` - Entity set elements supplying vendor metadata.
    ///
    /// # Returns
    ///
    /// Entities in document order. Entity types without properties are
    /// left out; repeated names are kept and resolved by the model.
    pub fn extract(&mut self, schemas: &[Node<'_, '_>], entity_sets: &[Node<'_, '_>]) -> Vec<Entity> {
        let metadata = self.entity_set_metadata(entity_sets);
        let mut entities = Vec::new();

        for entity_type in self.locator.find_in(schemas, NodeKind::EntityType) {
            let Some(name) = entity_type.attribute("Name") else {
                self.warnings
                    .push(ImportWarning::malformed("EntityType", "missing Name attribute"));
                continue;
            };

            let keys = self.key_names(entity_type);
            let properties = self.properties(entity_type, name);
            if properties.is_empty() {
                debug!(entity = name, "Skipping entity type without properties");
                self.warnings
                    .push(ImportWarning::malformed(format!("EntityType {}", name), "no properties"));
                continue;
            }

            let mut entity = Entity::new(name, properties, keys);
            let own_label = vendor_attribute(entity_type, &self.config.vendor_namespace, "label");
            match metadata.get(name) {
                Some(meta) => {
                    entity.label = meta.label.clone().or(own_label.map(str::to_string));
                    entity.capabilities = Some(meta.capabilities);
                    entity.tags = meta.tags.clone();
                }
                None => entity.label = own_label.map(str::to_string),
            }
            entities.push(entity);
        }

        debug!(count = entities.len(), "Extracted entities");
        entities
    }

    /// Vendor metadata keyed by leaf entity type name
    ///
    /// A label or capability flag declared by a later entity set for the
    /// same type replaces the earlier value; undeclared ones are kept. Tags
    /// accumulate.
    pub fn entity_set_metadata(&self, entity_sets: &[Node<'_, '_>]) -> HashMap<String, EntitySetMetadata> {
        let vendor = &self.config.vendor_namespace;
        let mut metadata: HashMap<String, EntitySetMetadata> = HashMap::new();

        for set in entity_sets {
            let Some(type_ref) = set.attribute("EntityType") else {
                continue;
            };
            let entry = metadata.entry(leaf_name(type_ref).to_string()).or_default();

            if let Some(label) = vendor_attribute(*set, vendor, "label") {
                entry.label = Some(label.to_string());
            }
            let caps = &mut entry.capabilities;
            caps.creatable = vendor_flag(*set, vendor, "creatable", caps.creatable);
            caps.updatable = vendor_flag(*set, vendor, "updatable", caps.updatable);
            caps.deletable = vendor_flag(*set, vendor, "deletable", caps.deletable);
            entry.tags.extend(self.tags(*set));
        }

        metadata
    }

    /// Tag strings below an entity set
    ///
    /// Tag collections appear either directly under the entity set or
    /// wrapped in a `Documentation` element.
    fn tags(&self, set: Node<'_, '_>) -> BTreeSet<String> {
        let direct = self.locator.children(set, NodeKind::Tags);
        let documented = self
            .locator
            .children(set, NodeKind::Documentation)
            .into_iter()
            .flat_map(|doc| self.locator.children(doc, NodeKind::Tags));

        direct
            .into_iter()
            .chain(documented)
            .flat_map(|tags| self.locator.children(tags, NodeKind::Tag))
            .filter_map(|tag| tag.text())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Key property names from `Key/PropertyRef` elements
    fn key_names(&mut self, entity_type: Node<'_, '_>) -> BTreeSet<String> {
        let keys = self.locator.find_all(entity_type, NodeKind::Key.local_name());
        let mut names = BTreeSet::new();
        for property_ref in self.locator.find_in(&keys, NodeKind::PropertyRef) {
            match property_ref.attribute("Name") {
                Some(name) => {
                    names.insert(name.to_string());
                }
                None => self
                    .warnings
                    .push(ImportWarning::malformed("PropertyRef", "missing Name attribute")),
            }
        }
        names
    }

    /// Properties of an entity type in declaration order
    fn properties(&mut self, entity_type: Node<'_, '_>, entity: &str) -> Vec<Property> {
        let vendor = &self.config.vendor_namespace;
        let mut properties = Vec::new();

        for node in self.locator.find_all(entity_type, NodeKind::Property.local_name()) {
            let Some(name) = node.attribute("Name") else {
                self.warnings.push(ImportWarning::malformed(
                    format!("Property of {}", entity),
                    "missing Name attribute",
                ));
                continue;
            };

            let data_type = first_present_attribute(node, &[AttributeKey::Plain("Type")], DEFAULT_PROPERTY_TYPE);
            let mut property = Property::new(entity, name, data_type);
            property.nullable = node
                .attribute("Nullable")
                .map(|v| !v.trim().eq_ignore_ascii_case("false"))
                .unwrap_or(true);
            property.max_length = node.attribute("MaxLength").and_then(|v| v.trim().parse().ok());
            property.label = vendor_attribute(node, vendor, "label").map(str::to_string);
            property.flags = PropertyFlags {
                required: vendor_flag(node, vendor, "required", false),
                creatable: vendor_flag(node, vendor, "creatable", true),
                updatable: vendor_flag(node, vendor, "updatable", true),
                filterable: vendor_flag(node, vendor, "filterable", true),
            };
            properties.push(property);
        }

        properties
    }
}
