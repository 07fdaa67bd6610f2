//! Model and validation tests

use odata_erd::models::{Confidence, DataModel, Entity, Property, Relationship};
use odata_erd::validation::RelationshipValidator;
use std::collections::BTreeSet;

fn entity(name: &str, tags: &[&str]) -> Entity {
    let mut entity = Entity::new(
        name,
        vec![Property::new(name, "ID", "Edm.Int32")],
        ["ID".to_string()].into_iter().collect(),
    );
    entity.tags = tags.iter().map(|t| t.to_string()).collect();
    entity
}

fn chain_model() -> DataModel {
    DataModel::from_parts(
        vec![
            entity("Customer", &["Sales"]),
            entity("Order", &["Sales", "Logistics"]),
            entity("Item", &["Logistics"]),
            entity("Warehouse", &[]),
        ],
        vec![
            Relationship::new("Customer", "Order", "1", "*"),
            Relationship::new("Order", "Item", "1", "*"),
            Relationship::new("Item", "Warehouse", "*", "1").with_confidence(Confidence::Heuristic),
        ],
    )
}

mod filter_tests {
    use super::*;

    fn names(model: &DataModel) -> Vec<&str> {
        model.entities.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_filter_exact_selection() {
        let model = chain_model().filter(&["Order", "Item", "Unknown"], false);
        assert_eq!(names(&model), vec!["Order", "Item"]);
        assert_eq!(model.relationships.len(), 1);
    }

    #[test]
    fn test_filter_with_related_entities() {
        let model = chain_model().filter(&["Order"], true);
        assert_eq!(names(&model), vec!["Customer", "Order", "Item"]);
        assert_eq!(model.relationships.len(), 2);
    }

    #[test]
    fn test_filter_keeps_only_surviving_edges() {
        let model = chain_model().filter(&["Customer", "Item"], false);
        assert!(model.relationships.is_empty());
    }
}

mod invariant_tests {
    use super::*;

    #[test]
    fn test_duplicate_relationships_collapse() {
        let model = DataModel::from_parts(
            vec![entity("A", &[]), entity("B", &[])],
            vec![
                Relationship::new("A", "B", "1", "*").with_name("first"),
                Relationship::new("A", "B", "1", "*").with_name("second"),
                Relationship::new("A", "B", "1", "1"),
            ],
        );
        assert_eq!(model.relationships.len(), 2);
        assert_eq!(model.relationships[0].name.as_deref(), Some("first"));
    }

    #[test]
    fn test_is_key_is_derived() {
        let mut property = Property::new("A", "Name", "Edm.String");
        property.is_key = true;
        let entity = Entity::new("A", vec![property], BTreeSet::new());
        assert!(!entity.properties[0].is_key);
    }

    #[test]
    fn test_strict_drops_heuristic_edges() {
        let strict = chain_model().strict();
        assert_eq!(strict.relationships.len(), 2);
        assert_eq!(strict.entities.len(), 4);
    }

    #[test]
    fn test_serialization() {
        let model = chain_model();
        let json = serde_json::to_string(&model).unwrap();
        let parsed: DataModel = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, model);
    }
}

mod tag_tests {
    use super::*;

    #[test]
    fn test_tag_index_fold() {
        let index = chain_model().tag_index();
        assert_eq!(index.len(), 2);
        assert_eq!(
            index["Logistics"].iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["Item", "Order"]
        );
        assert_eq!(chain_model().entities_with_tag("Sales").len(), 2);
    }

    #[test]
    fn test_key_rows() {
        let rows = chain_model().key_rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].entity, "Customer");
        assert_eq!(rows[0].key_property, "ID");
    }
}

mod validation_tests {
    use super::*;

    #[test]
    fn test_validation_of_unchecked_model() {
        let model = DataModel {
            entities: vec![entity("A", &[])],
            relationships: vec![
                Relationship::new("A", "A", "1", "*"),
                Relationship::new("A", "Missing", "1", "*").with_confidence(Confidence::Heuristic),
            ],
        };
        let result = RelationshipValidator::new().validate(&model);

        assert!(!result.is_valid());
        assert_eq!(result.dangling.len(), 1);
        assert_eq!(result.dangling[0].missing_entity, "Missing");
        assert_eq!(result.self_references.len(), 1);
        assert_eq!(result.low_confidence.len(), 1);
        assert!(RelationshipValidator::new().check_endpoints(&model).is_err());
    }

    #[test]
    fn test_constructed_model_is_valid() {
        assert!(RelationshipValidator::new().check_endpoints(&chain_model()).is_ok());
    }
}
