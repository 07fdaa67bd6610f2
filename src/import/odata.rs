//! OData metadata importer
//!
//! Provides functionality to import OData v2/v3/v4 (EDMX / CSDL) metadata
//! documents into a canonical [`DataModel`].

use super::config::{EDMX_NAMESPACE, ImportConfig};
use super::entities::EntityExtractor;
use super::locator::{NodeKind, SchemaLocator};
use super::relationships::RelationshipResolver;
use super::{ImportError, ImportResult};
use crate::models::{DataModel, NavigationReference};
use roxmltree::Document;
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// OData Importer
///
/// Runs schema location, entity extraction and relationship resolution over
/// one document. Each call is independent; the importer holds only its
/// configuration.
#[derive(Debug, Clone, Default)]
pub struct ODataImporter {
    config: ImportConfig,
}

impl ODataImporter {
    /// Create a new ODataImporter with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an importer with a custom configuration
    pub fn with_config(config: ImportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Parse and import metadata XML
    ///
    /// # Errors
    ///
    /// [`ImportError::XmlParse`] for malformed XML and
    /// [`ImportError::SchemaNotFound`] when the document has no schema.
    pub fn import_str(&self, xml_content: &str) -> Result<ImportResult, ImportError> {
        let document = Document::parse(xml_content)?;
        self.import_document(&document)
    }

    /// Read and import a metadata file
    ///
    /// # Errors
    ///
    /// [`ImportError::Io`] when the file cannot be read, otherwise as
    /// [`ODataImporter::import_str`].
    pub fn import_file(&self, path: &Path) -> Result<ImportResult, ImportError> {
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), bytes = content.len(), "Read metadata file");
        self.import_str(&content)
    }

    /// Import an already parsed metadata document
    ///
    /// # Arguments
    ///
    /// * `document` - The parsed metadata document.
    ///
    /// # Returns
    ///
    /// The canonical model plus the fragments that were skipped or guessed.
    pub fn import_document(&self, document: &Document<'_>) -> Result<ImportResult, ImportError> {
        let locator = SchemaLocator::new(&self.config);
        let schemas = locator.locate_schemas(document)?;
        let entity_types = locator.find_in(&schemas, NodeKind::EntityType);
        let entity_sets = locator.find_in(&schemas, NodeKind::EntitySet);
        let associations = locator.find_in(&schemas, NodeKind::Association);

        let mut extractor = EntityExtractor::new(&self.config);
        let entities = DataModel::from_parts(extractor.extract(&schemas, &entity_sets), Vec::new()).entities;

        let mut resolver = RelationshipResolver::new(&self.config);
        let navigation = resolver.navigation_references(&entity_types);
        let relationships = resolver.resolve(&associations, &entities, &navigation);

        let model = DataModel::from_parts(entities, relationships);
        let mut warnings = extractor.warnings;
        warnings.extend(resolver.warnings);

        info!(
            schemas = schemas.len(),
            entities = model.entities.len(),
            relationships = model.relationships.len(),
            warnings = warnings.len(),
            "Imported OData metadata"
        );

        Ok(ImportResult { model, warnings })
    }

    /// Navigation property rows of every entity type in the document
    pub fn navigation_references(&self, document: &Document<'_>) -> Vec<NavigationReference> {
        let locator = SchemaLocator::new(&self.config);
        let entity_types = locator.locate(document, NodeKind::EntityType);
        RelationshipResolver::new(&self.config).navigation_references(&entity_types)
    }

    /// Extract document-level metadata
    ///
    /// Extracts information including:
    /// - EDMX and data service versions
    /// - Schema namespaces
    /// - Entity type, association and entity set counts
    pub fn extract_metadata(&self, document: &Document<'_>) -> HashMap<String, serde_json::Value> {
        let locator = SchemaLocator::new(&self.config);
        let mut metadata = HashMap::new();

        let root = document.root_element();
        if root.tag_name().name() == "Edmx" {
            if let Some(version) = root.attribute("Version") {
                metadata.insert("edmxVersion".to_string(), json!(version));
            }
            if root.tag_name().namespace() == Some(EDMX_NAMESPACE) {
                metadata.insert("edmxNamespace".to_string(), json!(EDMX_NAMESPACE));
            }
        }

        if let Some(data_services) = root
            .descendants()
            .find(|n| n.is_element() && n.tag_name().name() == "DataServices")
        {
            let version = data_services
                .attributes()
                .find(|a| a.name() == "DataServiceVersion")
                .map(|a| a.value());
            if let Some(version) = version {
                metadata.insert("dataServiceVersion".to_string(), json!(version));
            }
        }

        let schemas = locator.locate_schemas(document).unwrap_or_default();
        let namespaces: Vec<&str> = schemas.iter().filter_map(|s| s.attribute("Namespace")).collect();
        metadata.insert("schemaNamespaces".to_string(), json!(namespaces));

        for (key, kind) in [
            ("entityTypeCount", NodeKind::EntityType),
            ("associationCount", NodeKind::Association),
            ("entitySetCount", NodeKind::EntitySet),
        ] {
            metadata.insert(key.to_string(), json!(locator.find_in(&schemas, kind).len()));
        }

        metadata
    }
}
