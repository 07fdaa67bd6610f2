//! Properties of entity types, and qualified-name helpers

use serde::{Deserialize, Serialize};

/// Vendor capability flags carried on a property
///
/// Each flag defaults to a fixed value when the source document does not
/// declare it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFlags {
    /// Whether a value must be supplied (default: false)
    #[serde(default)]
    pub required: bool,
    /// Whether the property may be set on create (default: true)
    #[serde(default = "default_true")]
    pub creatable: bool,
    /// Whether the property may be changed on update (default: true)
    #[serde(default = "default_true")]
    pub updatable: bool,
    /// Whether the property may be used in filters (default: true)
    #[serde(default = "default_true")]
    pub filterable: bool,
}

impl Default for PropertyFlags {
    fn default() -> Self {
        Self {
            required: false,
            creatable: true,
            updatable: true,
            filterable: true,
        }
    }
}

/// Property model representing a field of an entity type
///
/// A property keeps the qualified type name as declared in the metadata
/// document (e.g. `Edm.String`). The key flag is derived from the owning
/// entity's key set and is never supplied independently.
///
/// # Example
///
/// ```rust
/// use odata_erd::models::Property;
///
/// let property = Property::new("Employee", "EmployeeID", "Edm.Int32");
/// assert_eq!(property.type_name(), "Int32");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Name of the entity this property belongs to
    pub entity: String,
    /// Property name
    pub name: String,
    /// Qualified type name (e.g. "Edm.String")
    pub data_type: String,
    /// Whether the property allows null values (default: true)
    #[serde(default = "default_true")]
    pub nullable: bool,
    /// Maximum length, when declared numerically
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    /// Vendor display label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Vendor capability flags
    #[serde(default)]
    pub flags: PropertyFlags,
    /// Whether this property is part of the entity key
    #[serde(default)]
    pub is_key: bool,
}

fn default_true() -> bool {
    true
}

impl Property {
    /// Create a new nullable, non-key property with default flags
    pub fn new(entity: impl Into<String>, name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            max_length: None,
            label: None,
            flags: PropertyFlags::default(),
            is_key: false,
        }
    }

    /// Leaf type name, without namespace qualification
    pub fn type_name(&self) -> &str {
        leaf_name(&self.data_type)
    }
}

/// Final segment of a namespace-qualified identifier
///
/// `Collection(...)` wrappers are removed before the segment is taken, so
/// `Collection(Edm.String)` yields `String`.
pub fn leaf_name(qualified: &str) -> &str {
    let inner = unwrap_collection(qualified);
    match inner.rfind('.') {
        Some(idx) => &inner[idx + 1..],
        None => inner,
    }
}

/// Strip a `Collection(...)` wrapper, if present
pub fn unwrap_collection(qualified: &str) -> &str {
    let trimmed = qualified.trim();
    trimmed
        .strip_prefix("Collection(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(trimmed)
}
