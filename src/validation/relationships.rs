//! Relationship validation functionality
//!
//! Reports relationships that reference unknown entities, self references and
//! guessed edges, and expands entity selections over the relationship graph.

use crate::models::{DataModel, Relationship};
use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Result of relationship validation
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipValidationResult {
    /// Relationships whose endpoints are not entities of the model
    pub dangling: Vec<DanglingRelationship>,
    /// Relationships from an entity to itself
    pub self_references: Vec<SelfReference>,
    /// Relationships derived by the navigation name heuristic
    pub low_confidence: Vec<Relationship>,
}

impl RelationshipValidationResult {
    /// Whether no structural problem was found
    ///
    /// Self references and low-confidence edges are informational.
    pub fn is_valid(&self) -> bool {
        self.dangling.is_empty()
    }
}

/// Relationship endpoint missing from the model
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DanglingRelationship {
    pub relationship: Relationship,
    pub missing_entity: String,
}

/// Self-reference detected
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelfReference {
    pub entity: String,
    pub relationship: Relationship,
}

/// Error during relationship validation
#[derive(Debug, thiserror::Error)]
pub enum RelationshipValidationError {
    #[error("Relationship {from} -> {to} references unknown entity '{missing}'")]
    UnknownEntity {
        from: String,
        to: String,
        missing: String,
    },
}

/// Relationship validator
#[derive(Debug, Default)]
pub struct RelationshipValidator;

impl RelationshipValidator {
    /// Create a new relationship validator
    pub fn new() -> Self {
        Self
    }

    /// Check every relationship of a model
    pub fn validate(&self, model: &DataModel) -> RelationshipValidationResult {
        let names = model.entity_names();
        let mut result = RelationshipValidationResult::default();

        for rel in &model.relationships {
            for endpoint in [&rel.from_entity, &rel.to_entity] {
                if !names.contains(endpoint.as_str()) {
                    result.dangling.push(DanglingRelationship {
                        relationship: rel.clone(),
                        missing_entity: endpoint.clone(),
                    });
                }
            }
            if rel.is_self_reference() {
                result.self_references.push(SelfReference {
                    entity: rel.from_entity.clone(),
                    relationship: rel.clone(),
                });
            }
            if rel.confidence.is_low() {
                result.low_confidence.push(rel.clone());
            }
        }

        result
    }

    /// Fail on the first relationship with an unknown endpoint
    pub fn check_endpoints(&self, model: &DataModel) -> Result<(), RelationshipValidationError> {
        match self.validate(model).dangling.into_iter().next() {
            Some(d) => Err(RelationshipValidationError::UnknownEntity {
                from: d.relationship.from_entity,
                to: d.relationship.to_entity,
                missing: d.missing_entity,
            }),
            None => Ok(()),
        }
    }
}

/// Undirected graph of entities connected by relationships
pub struct EntityGraph {
    graph: UnGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl EntityGraph {
    /// Build the graph from a model's entities and relationships
    pub fn from_model(model: &DataModel) -> Self {
        let mut graph = UnGraph::<String, ()>::new_undirected();
        let mut node_map = HashMap::new();

        for entity in &model.entities {
            let idx = graph.add_node(entity.name.clone());
            node_map.insert(entity.name.clone(), idx);
        }

        for rel in &model.relationships {
            if let (Some(&a), Some(&b)) = (node_map.get(&rel.from_entity), node_map.get(&rel.to_entity)) {
                graph.add_edge(a, b, ());
            }
        }

        Self { graph, node_map }
    }

    /// Entities directly connected to any of the given entities
    pub fn neighbours_of<'a, I>(&self, names: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .filter_map(|name| self.node_map.get(name))
            .flat_map(|&idx| self.graph.neighbors(idx))
            .map(|idx| self.graph[idx].clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, Entity, Property};

    fn model() -> DataModel {
        let entities = ["A", "B", "C", "D"]
            .iter()
            .map(|n| Entity::new(*n, vec![Property::new(*n, "id", "Edm.Int32")], Default::default()))
            .collect();
        DataModel::from_parts(
            entities,
            vec![
                Relationship::new("A", "B", "1", "*"),
                Relationship::new("B", "C", "1", "1"),
                Relationship::new("D", "D", "1", "*").with_confidence(Confidence::Heuristic),
            ],
        )
    }

    #[test]
    fn test_neighbours_are_one_hop() {
        let graph = EntityGraph::from_model(&model());
        let neighbours = graph.neighbours_of(["A"]);
        assert_eq!(neighbours, BTreeSet::from(["B".to_string()]));
    }

    #[test]
    fn test_validate_reports_self_reference_and_heuristics() {
        let result = RelationshipValidator::new().validate(&model());
        assert!(result.is_valid());
        assert_eq!(result.self_references.len(), 1);
        assert_eq!(result.low_confidence.len(), 1);
    }

    #[test]
    fn test_dangling_detected_on_hand_built_model() {
        let mut model = model();
        model.relationships.push(Relationship::new("A", "Ghost", "1", "*"));

        let validator = RelationshipValidator::new();
        assert!(!validator.validate(&model).is_valid());
        assert!(matches!(
            validator.check_endpoints(&model),
            Err(RelationshipValidationError::UnknownEntity { missing, .. }) if missing == "Ghost"
        ));
    }
}
