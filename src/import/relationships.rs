//! Relationship resolution
//!
//! Relationships come from two independent passes:
//! 1. associations with exactly two typed ends
//! 2. navigation properties, matched to associations by name and role
//!
//! When a navigation property's roles cannot be matched, a name-splitting
//! heuristic may still guess the target; such edges carry
//! [`Confidence::Heuristic`].

use super::ImportWarning;
use super::config::ImportConfig;
use super::locator::{NodeKind, SchemaLocator, enclosing_schema};
use crate::models::data_model::retain_resolvable;
use crate::models::property::unwrap_collection;
use crate::models::{Confidence, Entity, NavigationReference, Relationship, leaf_name};
use roxmltree::Node;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Multiplicity used when an association end omits it
pub const DEFAULT_MULTIPLICITY: &str = "1";

/// One typed end of an association
#[derive(Debug, Clone, PartialEq)]
struct AssociationEnd {
    role: Option<String>,
    entity: String,
    multiplicity: String,
}

/// An association with its two ends and the names it answers to
#[derive(Debug, Clone)]
struct AssociationInfo {
    name: String,
    qualified_names: Vec<String>,
    ends: [AssociationEnd; 2],
}

impl AssociationInfo {
    fn end_for_role(&self, role: &str) -> Option<&AssociationEnd> {
        self.ends.iter().find(|end| end.role.as_deref() == Some(role))
    }
}

/// Relationship Resolver
///
/// Skipped and guessed relationships are recorded in `warnings`.
#[derive(Debug)]
pub struct RelationshipResolver<'c> {
    config: &'c ImportConfig,
    locator: SchemaLocator<'c>,
    /// Relationships dropped or guessed during resolution
    pub warnings: Vec<ImportWarning>,
}

impl<'c> RelationshipResolver<'c> {
    /// Create a new RelationshipResolver
    pub fn new(config: &'c ImportConfig) -> Self {
        Self {
            config,
            locator: SchemaLocator::new(config),
            warnings: Vec::new(),
        }
    }

    /// Navigation property rows of the given entity types
    pub fn navigation_references(&mut self, entity_types: &[Node<'_, '_>]) -> Vec<NavigationReference> {
        let mut references = Vec::new();

        for entity_type in entity_types {
            let Some(entity) = entity_type.attribute("Name") else {
                continue;
            };
            for node in self
                .locator
                .find_all(*entity_type, NodeKind::NavigationProperty.local_name())
            {
                let Some(name) = node.attribute("Name") else {
                    self.warnings.push(ImportWarning::malformed(
                        format!("NavigationProperty of {}", entity),
                        "missing Name attribute",
                    ));
                    continue;
                };
                let mut reference = NavigationReference::new(entity, name);
                reference.relationship = node.attribute("Relationship").map(str::to_string);
                reference.from_role = node.attribute("FromRole").map(str::to_string);
                reference.to_role = node.attribute("ToRole").map(str::to_string);
                reference.target_type = node.attribute("Type").map(str::to_string);
                reference.nullable = node
                    .attribute("Nullable")
                    .map(|v| !v.trim().eq_ignore_ascii_case("false"))
                    .unwrap_or(true);
                references.push(reference);
            }
        }

        references
    }

    /// Derive the deduplicated relationship set
    ///
    /// # Arguments
    ///
    /// * `associations` - Association elements.
    /// * `entities` - Entities of the model; relationships to other names are dropped.
    /// * `navigation` - Navigation property rows of those entities.
    ///
    /// # Returns
    ///
    /// Association-derived relationships followed by navigation-derived ones,
    /// collapsed on (from, to, from-multiplicity, to-multiplicity) keeping
    /// the first occurrence.
    pub fn resolve(
        &mut self,
        associations: &[Node<'_, '_>],
        entities: &[Entity],
        navigation: &[NavigationReference],
    ) -> Vec<Relationship> {
        let names: HashSet<&str> = entities.iter().map(|e| e.name.as_str()).collect();
        let infos = self.association_infos(associations);

        let mut relationships = self.from_associations(&infos, &names);
        let declared = relationships.len();
        relationships.extend(self.from_navigation(&infos, &names, navigation));
        debug!(
            associations = declared,
            navigation = relationships.len() - declared,
            "Derived relationships before deduplication"
        );

        retain_resolvable(relationships, |name| names.contains(name))
    }

    fn association_infos(&mut self, associations: &[Node<'_, '_>]) -> Vec<AssociationInfo> {
        let mut infos = Vec::new();

        for association in associations {
            let Some(name) = association.attribute("Name") else {
                self.warnings
                    .push(ImportWarning::malformed("Association", "missing Name attribute"));
                continue;
            };
            let ends = self.locator.children(*association, NodeKind::End);
            if ends.len() != 2 {
                debug!(association = name, ends = ends.len(), "Skipping association without two ends");
                continue;
            }
            let (Some(first), Some(second)) = (association_end(ends[0]), association_end(ends[1])) else {
                self.warnings.push(ImportWarning::malformed(
                    format!("Association {}", name),
                    "End without Type attribute",
                ));
                continue;
            };

            let mut qualified_names = Vec::new();
            if let Some(schema) = enclosing_schema(*association) {
                for qualifier in [schema.attribute("Namespace"), schema.attribute("Alias")]
                    .into_iter()
                    .flatten()
                {
                    qualified_names.push(format!("{}.{}", qualifier, name));
                }
            }

            infos.push(AssociationInfo {
                name: name.to_string(),
                qualified_names,
                ends: [first, second],
            });
        }

        infos
    }

    /// Pass 1: one relationship per association whose ends are both entities
    fn from_associations(&mut self, infos: &[AssociationInfo], names: &HashSet<&str>) -> Vec<Relationship> {
        let mut relationships = Vec::new();

        for info in infos {
            let [from, to] = &info.ends;
            if let Some(missing) = [&from.entity, &to.entity]
                .into_iter()
                .find(|e| !names.contains(e.as_str()))
            {
                self.warnings.push(ImportWarning::UnresolvedRelationship {
                    from: from.entity.clone(),
                    to: to.entity.clone(),
                    missing: missing.clone(),
                });
                continue;
            }
            relationships.push(
                Relationship::new(&from.entity, &to.entity, &from.multiplicity, &to.multiplicity)
                    .with_name(&info.name),
            );
        }

        relationships
    }

    /// Pass 2: relationships from navigation properties
    fn from_navigation(
        &mut self,
        infos: &[AssociationInfo],
        names: &HashSet<&str>,
        navigation: &[NavigationReference],
    ) -> Vec<Relationship> {
        let mut relationships = Vec::new();

        for reference in navigation {
            let resolved = match (&reference.relationship, &reference.target_type) {
                (Some(token), _) => self.resolve_token(infos, names, reference, token),
                (None, Some(target_type)) => Some(typed_navigation(reference, target_type)),
                (None, None) => {
                    self.warnings.push(ImportWarning::malformed(
                        format!("NavigationProperty {}.{}", reference.entity, reference.name),
                        "missing Relationship and Type attributes",
                    ));
                    None
                }
            };
            let Some(relationship) = resolved else {
                continue;
            };

            if let Some(missing) = [&relationship.from_entity, &relationship.to_entity]
                .into_iter()
                .find(|e| !names.contains(e.as_str()))
            {
                self.warnings.push(ImportWarning::UnresolvedRelationship {
                    from: relationship.from_entity.clone(),
                    to: relationship.to_entity.clone(),
                    missing: missing.clone(),
                });
                continue;
            }
            relationships.push(relationship);
        }

        relationships
    }

    /// Role-matched resolution with the name heuristic as fallback
    fn resolve_token(
        &mut self,
        infos: &[AssociationInfo],
        names: &HashSet<&str>,
        reference: &NavigationReference,
        token: &str,
    ) -> Option<Relationship> {
        if let Some(relationship) = find_association(infos, token).and_then(|info| roled(info, reference)) {
            return Some(relationship);
        }

        if !self.config.include_heuristic {
            debug!(
                entity = %reference.entity,
                navigation = %reference.name,
                "Unmatched navigation roles, heuristic disabled"
            );
            return None;
        }

        let target = self.heuristic_target(token, names)?;
        warn!(
            entity = %reference.entity,
            navigation = %reference.name,
            relationship = token,
            target = %target,
            "Navigation roles unmatched, guessed target from relationship name"
        );
        self.warnings.push(ImportWarning::AmbiguousNavigationFallback {
            entity: reference.entity.clone(),
            navigation: reference.name.clone(),
            relationship: token.to_string(),
            target: target.clone(),
        });

        Some(
            Relationship::new(&reference.entity, target, "1", "*")
                .with_name(&reference.name)
                .with_confidence(Confidence::Heuristic),
        )
    }

    /// Guess a target entity from a relationship name such as `Assoc_Supplier`
    ///
    /// The leaf segment is split once on the configured separator; the second
    /// part, or a configured prefix followed by it, must name an entity.
    pub fn heuristic_target(&self, token: &str, names: &HashSet<&str>) -> Option<String> {
        let (_, candidate) = leaf_name(token).split_once(self.config.heuristic_separator)?;
        if candidate.is_empty() {
            return None;
        }

        std::iter::once(candidate.to_string())
            .chain(
                self.config
                    .heuristic_prefixes
                    .iter()
                    .map(|prefix| format!("{}{}", prefix, candidate)),
            )
            .find(|name| names.contains(name.as_str()))
    }
}

fn association_end(node: Node<'_, '_>) -> Option<AssociationEnd> {
    let type_ref = node.attribute("Type")?;
    Some(AssociationEnd {
        role: node.attribute("Role").map(str::to_string),
        entity: leaf_name(type_ref).to_string(),
        multiplicity: node
            .attribute("Multiplicity")
            .unwrap_or(DEFAULT_MULTIPLICITY)
            .to_string(),
    })
}

/// Exact qualified-name match first, then leaf-name match
fn find_association<'i>(infos: &'i [AssociationInfo], token: &str) -> Option<&'i AssociationInfo> {
    infos
        .iter()
        .find(|info| info.qualified_names.iter().any(|q| q == token))
        .or_else(|| {
            let leaf = leaf_name(token);
            infos.iter().find(|info| info.name == leaf)
        })
}

/// Relationship from an association whose ends match both navigation roles
fn roled(info: &AssociationInfo, reference: &NavigationReference) -> Option<Relationship> {
    let from = info.end_for_role(reference.from_role.as_deref()?)?;
    let to = info.end_for_role(reference.to_role.as_deref()?)?;

    Some(
        Relationship::new(&reference.entity, &to.entity, &from.multiplicity, &to.multiplicity)
            .with_name(&reference.name)
            .with_confidence(Confidence::Navigation),
    )
}

/// Relationship from a navigation property that names its target type
fn typed_navigation(reference: &NavigationReference, target_type: &str) -> Relationship {
    let is_collection = unwrap_collection(target_type) != target_type.trim();
    let to_multiplicity = if is_collection {
        "*"
    } else if reference.nullable {
        "0..1"
    } else {
        "1"
    };

    Relationship::new(&reference.entity, leaf_name(target_type), "1", to_multiplicity)
        .with_name(&reference.name)
        .with_confidence(Confidence::Navigation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Property;
    use roxmltree::Document;

    const XML: &str = r#"<?xml version="1.0"?>
<edmx:Edmx xmlns:edmx="http://schemas.microsoft.com/ado/2007/06/edmx">
  <edmx:DataServices>
    <Schema Namespace="Shop" Alias="S" xmlns="http://schemas.microsoft.com/ado/2009/11/edm">
      <EntityType Name="Order">
        <Property Name="ID" Type="Edm.Int32"/>
        <NavigationProperty Name="Customer" Relationship="Shop.FK_Order_Customer" FromRole="Order" ToRole="Customer"/>
        <NavigationProperty Name="Lines" Relationship="S.Order_Lines" FromRole="Order" ToRole="Lines"/>
        <NavigationProperty Name="Supplier" Relationship="Vendor.Assoc_Supplier" FromRole="X" ToRole="Y"/>
        <NavigationProperty Name="Plant" Relationship="Vendor.Assoc_Plant" FromRole="X" ToRole="Y"/>
        <NavigationProperty Name="Broken"/>
      </EntityType>
      <EntityType Name="Customer"><Property Name="ID" Type="Edm.Int32"/></EntityType>
      <EntityType Name="OrderLine"><Property Name="ID" Type="Edm.Int32"/></EntityType>
      <EntityType Name="Supplier"><Property Name="ID" Type="Edm.Int32"/></EntityType>
      <EntityType Name="I_Plant"><Property Name="ID" Type="Edm.Int32"/></EntityType>
      <Association Name="FK_Order_Customer">
        <End Type="Shop.Order" Role="Order" Multiplicity="*"/>
        <End Type="Shop.Customer" Role="Customer" Multiplicity="1"/>
      </Association>
      <Association Name="Order_Lines">
        <End Type="Shop.Order" Role="Order" Multiplicity="1"/>
        <End Type="Shop.OrderLine" Role="Lines" Multiplicity="*"/>
      </Association>
      <Association Name="FK_Ghost">
        <End Type="Shop.Order" Role="Order"/>
        <End Type="Shop.Ghost" Role="Ghost" Multiplicity="*"/>
      </Association>
      <Association Name="OneEnded">
        <End Type="Shop.Order" Role="Order"/>
      </Association>
    </Schema>
  </edmx:DataServices>
</edmx:Edmx>"#;

    fn entity(name: &str) -> Entity {
        Entity::new(name, vec![Property::new(name, "ID", "Edm.Int32")], Default::default())
    }

    fn resolve(config: &ImportConfig) -> (Vec<Relationship>, Vec<ImportWarning>) {
        let doc = Document::parse(XML).unwrap();
        let locator = SchemaLocator::new(config);
        let types = locator.locate(&doc, NodeKind::EntityType);
        let associations = locator.locate(&doc, NodeKind::Association);
        let entities: Vec<_> = ["Order", "Customer", "OrderLine", "Supplier", "I_Plant"]
            .into_iter()
            .map(entity)
            .collect();

        let mut resolver = RelationshipResolver::new(config);
        let navigation = resolver.navigation_references(&types);
        let relationships = resolver.resolve(&associations, &entities, &navigation);
        (relationships, resolver.warnings)
    }

    #[test]
    fn test_associations_then_navigation_deduplicated() {
        let (relationships, _) = resolve(&ImportConfig::default());

        let keys: Vec<_> = relationships.iter().map(|r| r.key()).collect();
        let key = |a: &str, b: &str, m: &str, n: &str| (a.to_string(), b.to_string(), m.to_string(), n.to_string());
        assert_eq!(
            keys,
            vec![
                key("Order", "Customer", "*", "1"),
                key("Order", "OrderLine", "1", "*"),
                key("Order", "Supplier", "1", "*"),
                key("Order", "I_Plant", "1", "*"),
            ]
        );
        // association-derived edges win over equal navigation-derived ones
        assert_eq!(relationships[0].confidence, Confidence::Association);
        assert_eq!(relationships[0].name.as_deref(), Some("FK_Order_Customer"));
        assert_eq!(relationships[2].confidence, Confidence::Heuristic);
        assert_eq!(relationships[3].confidence, Confidence::Heuristic);
    }

    #[test]
    fn test_warnings_for_skipped_and_guessed_edges() {
        let (_, warnings) = resolve(&ImportConfig::default());

        assert!(warnings.iter().any(|w| matches!(
            w,
            ImportWarning::UnresolvedRelationship { missing, .. } if missing == "Ghost"
        )));
        assert_eq!(
            warnings
                .iter()
                .filter(|w| matches!(w, ImportWarning::AmbiguousNavigationFallback { .. }))
                .count(),
            2
        );
        assert!(warnings.iter().any(|w| matches!(w, ImportWarning::MalformedFragment { .. })));
    }

    #[test]
    fn test_heuristic_can_be_disabled() {
        let config = ImportConfig::builder().include_heuristic(false).build();
        let (relationships, _) = resolve(&config);
        assert_eq!(relationships.len(), 2);
        assert!(relationships.iter().all(|r| !r.confidence.is_low()));
    }

    #[test]
    fn test_heuristic_target_candidates() {
        let config = ImportConfig::default();
        let resolver = RelationshipResolver::new(&config);
        let names: HashSet<&str> = ["Supplier", "C_Plant"].into_iter().collect();

        assert_eq!(resolver.heuristic_target("NS.Assoc_Supplier", &names).as_deref(), Some("Supplier"));
        assert_eq!(resolver.heuristic_target("NS.Assoc_Plant", &names).as_deref(), Some("C_Plant"));
        assert_eq!(resolver.heuristic_target("NS.AssocSupplier", &names), None);
        assert_eq!(resolver.heuristic_target("NS.Assoc_", &names), None);
        assert_eq!(resolver.heuristic_target("NS.Assoc_Customer", &names), None);
    }

    #[test]
    fn test_typed_navigation_multiplicity() {
        let mut reference = NavigationReference::new("Order", "Lines");
        let many = typed_navigation(&reference, "Collection(Shop.OrderLine)");
        assert_eq!((many.to_entity.as_str(), many.to_multiplicity.as_str()), ("OrderLine", "*"));

        let optional = typed_navigation(&reference, "Shop.Customer");
        assert_eq!(optional.to_multiplicity, "0..1");

        reference.nullable = false;
        let required = typed_navigation(&reference, "Shop.Customer");
        assert_eq!(required.to_multiplicity, "1");
    }
}
