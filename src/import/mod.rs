//! Import functionality
//!
//! Turns OData / EDMX metadata documents into a canonical [`DataModel`]:
//! - `locator` finds schema elements under any namespace declaration
//! - `entities` extracts entity types, keys and vendor metadata
//! - `relationships` derives relationships from associations and navigation
//! - `odata` ties the passes together

pub mod config;
pub mod entities;
pub mod locator;
pub mod odata;
pub mod relationships;

use crate::models::DataModel;
use serde::Serialize;

/// Result of an import operation
#[derive(Debug)]
pub struct ImportResult {
    /// The canonical model
    pub model: DataModel,
    /// Fragments skipped or guessed while importing
    pub warnings: Vec<ImportWarning>,
}

/// Fatal error during import
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("No Schema element found in the OData metadata document")]
    SchemaNotFound,
    #[error("XML parse error: {0}")]
    XmlParse(String),
    #[error("IO error: {0}")]
    Io(String),
}

impl From<roxmltree::Error> for ImportError {
    fn from(err: roxmltree::Error) -> Self {
        ImportError::XmlParse(err.to_string())
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::Io(err.to_string())
    }
}

/// Non-fatal anomaly; the affected fragment is skipped or marked
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ImportWarning {
    /// Element missing a required attribute, or an entity without properties
    #[error("Skipped {element}: {reason}")]
    MalformedFragment { element: String, reason: String },
    /// Relationship whose endpoint is not an entity of the model
    #[error("Dropped relationship {from} -> {to}: unknown entity '{missing}'")]
    UnresolvedRelationship {
        from: String,
        to: String,
        missing: String,
    },
    /// Relationship guessed from a navigation property's relationship name
    #[error("Guessed relationship {entity}.{navigation} -> {target} from '{relationship}'")]
    AmbiguousNavigationFallback {
        entity: String,
        navigation: String,
        relationship: String,
        target: String,
    },
}

impl ImportWarning {
    pub(crate) fn malformed(element: impl Into<String>, reason: impl Into<String>) -> Self {
        ImportWarning::MalformedFragment {
            element: element.into(),
            reason: reason.into(),
        }
    }
}

// Re-export for convenience
pub use config::{ImportConfig, NamespaceBinding};
pub use entities::EntityExtractor;
pub use locator::{NodeKind, SchemaLocator, Strategy};
pub use odata::ODataImporter;
pub use relationships::RelationshipResolver;
