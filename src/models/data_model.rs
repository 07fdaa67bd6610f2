//! Canonical entity-relationship model

use super::entity::Entity;
use super::relationship::{Relationship, RelationshipKey};
use crate::validation::relationships::EntityGraph;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Tag string to entity names
pub type TagIndex = BTreeMap<String, BTreeSet<String>>;

/// Key listing row, one per (entity, key property)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyRow {
    pub entity: String,
    pub key_property: String,
}

/// Deduplicated entities and relationships built from one metadata document
///
/// Invariants held by every constructor:
/// - entity names are unique and no entity has zero properties
/// - key names are a subset of the owning entity's property names
/// - every relationship endpoint names an entity of the model
/// - no two relationships share a (from, to, from-mult, to-mult) key
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataModel {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

impl DataModel {
    /// Build a model, enforcing the model invariants
    ///
    /// A later entity with an already-seen name replaces the earlier one in
    /// place. Relationships referencing unknown entities are dropped, and
    /// duplicates keep their first occurrence.
    pub fn from_parts(entities: Vec<Entity>, relationships: Vec<Relationship>) -> Self {
        let mut merged: Vec<Entity> = Vec::with_capacity(entities.len());
        let mut positions: HashMap<String, usize> = HashMap::new();

        for mut entity in entities {
            if entity.properties.is_empty() {
                debug!(entity = %entity.name, "Dropping entity without properties");
                continue;
            }
            entity.normalize_keys();
            match positions.get(&entity.name) {
                Some(&idx) => merged[idx] = entity,
                None => {
                    positions.insert(entity.name.clone(), merged.len());
                    merged.push(entity);
                }
            }
        }

        let relationships = retain_resolvable(relationships, |name| positions.contains_key(name));

        Self {
            entities: merged,
            relationships,
        }
    }

    /// Look up an entity by name
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn entity_names(&self) -> BTreeSet<&str> {
        self.entities.iter().map(|e| e.name.as_str()).collect()
    }

    /// Build the tag index as a fold over the entities
    pub fn tag_index(&self) -> TagIndex {
        self.entities.iter().fold(TagIndex::new(), |mut index, entity| {
            for tag in &entity.tags {
                index
                    .entry(tag.clone())
                    .or_default()
                    .insert(entity.name.clone());
            }
            index
        })
    }

    /// Entities carrying the given tag, in model order
    pub fn entities_with_tag(&self, tag: &str) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|e| e.tags.contains(tag))
            .collect()
    }

    /// Key rows for every entity, in model order
    pub fn key_rows(&self) -> Vec<KeyRow> {
        self.entities
            .iter()
            .flat_map(|entity| {
                entity.key_properties().map(move |p| KeyRow {
                    entity: entity.name.clone(),
                    key_property: p.name.clone(),
                })
            })
            .collect()
    }

    /// Copy of this model without heuristic relationships
    pub fn strict(&self) -> Self {
        Self {
            entities: self.entities.clone(),
            relationships: self
                .relationships
                .iter()
                .filter(|r| !r.confidence.is_low())
                .cloned()
                .collect(),
        }
    }

    /// Restrict the model to a set of entity names
    ///
    /// Unknown names are ignored. With `include_related`, entities one
    /// relationship away from a requested entity are kept as well.
    /// Relationships survive only when both endpoints survive.
    pub fn filter<S: AsRef<str>>(&self, names: &[S], include_related: bool) -> Self {
        let known = self.entity_names();
        let mut selected: BTreeSet<String> = names
            .iter()
            .map(|n| n.as_ref())
            .filter(|n| known.contains(n))
            .map(str::to_string)
            .collect();

        if include_related {
            let graph = EntityGraph::from_model(self);
            let neighbours = graph.neighbours_of(selected.iter().map(String::as_str));
            selected.extend(neighbours);
        }

        let entities: Vec<Entity> = self
            .entities
            .iter()
            .filter(|e| selected.contains(&e.name))
            .cloned()
            .collect();
        let relationships = self
            .relationships
            .iter()
            .filter(|r| selected.contains(&r.from_entity) && selected.contains(&r.to_entity))
            .cloned()
            .collect();

        Self {
            entities,
            relationships,
        }
    }
}

/// Drop relationships with an unknown endpoint and collapse duplicate keys
///
/// Order of first occurrence is preserved.
pub(crate) fn retain_resolvable<F>(relationships: Vec<Relationship>, exists: F) -> Vec<Relationship>
where
    F: Fn(&str) -> bool,
{
    let mut seen: HashSet<RelationshipKey> = HashSet::new();
    relationships
        .into_iter()
        .filter(|r| {
            if !exists(&r.from_entity) || !exists(&r.to_entity) {
                debug!(
                    from = %r.from_entity,
                    to = %r.to_entity,
                    "Dropping relationship with unresolved endpoint"
                );
                return false;
            }
            seen.insert(r.key())
        })
        .collect()
}
