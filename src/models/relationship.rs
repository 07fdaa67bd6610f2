//! Relationships between entities and the navigation rows they come from

use serde::{Deserialize, Serialize};

/// How a relationship was derived
///
/// Consumers that want only confidently resolved edges can drop
/// [`Confidence::Heuristic`] relationships.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum Confidence {
    /// Declared by an association with two typed ends
    #[default]
    Association,
    /// Resolved from a navigation property whose roles matched an association,
    /// or from a typed navigation property
    Navigation,
    /// Guessed from the relationship name when role matching failed
    Heuristic,
}

impl Confidence {
    /// Whether this relationship was guessed rather than resolved
    pub fn is_low(self) -> bool {
        matches!(self, Confidence::Heuristic)
    }
}

/// Deduplication identity of a relationship
pub type RelationshipKey = (String, String, String, String);

/// Binary relationship between two entities
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    /// Association or navigation name, informational only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub from_entity: String,
    pub to_entity: String,
    pub from_multiplicity: String,
    pub to_multiplicity: String,
    #[serde(default)]
    pub confidence: Confidence,
}

impl Relationship {
    pub fn new(
        from_entity: impl Into<String>,
        to_entity: impl Into<String>,
        from_multiplicity: impl Into<String>,
        to_multiplicity: impl Into<String>,
    ) -> Self {
        Self {
            name: None,
            from_entity: from_entity.into(),
            to_entity: to_entity.into(),
            from_multiplicity: from_multiplicity.into(),
            to_multiplicity: to_multiplicity.into(),
            confidence: Confidence::Association,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    /// The (from, to, from-multiplicity, to-multiplicity) identity tuple
    ///
    /// Two relationships with the same key are the same relationship
    /// regardless of name or confidence.
    pub fn key(&self) -> RelationshipKey {
        (
            self.from_entity.clone(),
            self.to_entity.clone(),
            self.from_multiplicity.clone(),
            self.to_multiplicity.clone(),
        )
    }

    pub fn is_self_reference(&self) -> bool {
        self.from_entity == self.to_entity
    }
}

/// Navigation property row read from an entity type
///
/// Intermediate data: consumed by relationship resolution and exposed for
/// explorer-style listings, never stored in a [`super::DataModel`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NavigationReference {
    /// Owning entity name
    pub entity: String,
    /// Navigation property name
    pub name: String,
    /// Association name token (OData v2/v3)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_role: Option<String>,
    /// Target type (OData v4), possibly `Collection(...)`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    /// Declared nullability of a typed navigation (default: true)
    #[serde(default = "default_true")]
    pub nullable: bool,
}

fn default_true() -> bool {
    true
}

impl NavigationReference {
    pub fn new(entity: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            name: name.into(),
            relationship: None,
            from_role: None,
            to_role: None,
            target_type: None,
            nullable: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ignores_name_and_confidence() {
        let a = Relationship::new("Order", "Customer", "*", "1").with_name("FK_Order_Customer");
        let b = Relationship::new("Order", "Customer", "*", "1")
            .with_name("Customer")
            .with_confidence(Confidence::Navigation);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_only_heuristic_is_low_confidence() {
        assert!(!Confidence::Association.is_low());
        assert!(!Confidence::Navigation.is_low());
        assert!(Confidence::Heuristic.is_low());
    }
}
