//! odata-erd: OData metadata to entity-relationship diagrams
//!
//! Provides:
//! - Schema location tolerant of namespace variations (v2/v3/v4, vendor dialects)
//! - Entity, key and relationship extraction into a canonical [`DataModel`]
//! - Mermaid `erDiagram` rendering
//! - Relationship validation and related-entity filtering
//!
//! ```rust
//! use odata_erd::{MermaidExporter, ODataImporter};
//!
//! let xml = r#"<Schema xmlns="http://schemas.microsoft.com/ado/2009/11/edm" Namespace="M">
//!   <EntityType Name="Employee">
//!     <Key><PropertyRef Name="id"/></Key>
//!     <Property Name="id" Type="Edm.String"/>
//!   </EntityType>
//! </Schema>"#;
//!
//! let result = ODataImporter::new().import_str(xml).unwrap();
//! let diagram = MermaidExporter::new().render(&result.model.entities, &result.model.relationships);
//! assert_eq!(diagram, "erDiagram\n    Employee {\n        String id PK\n    }");
//! ```

pub mod cli;
pub mod config;
pub mod export;
pub mod import;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{ConfigError, ToolConfig};
pub use export::{ExportError, ExportResult, MermaidExporter, RenderConfig};
pub use import::{ImportConfig, ImportError, ImportResult, ImportWarning, ODataImporter};
pub use validation::{RelationshipValidationError, RelationshipValidationResult, RelationshipValidator};

// Re-export models
pub use models::{Confidence, DataModel, Entity, NavigationReference, Property, Relationship};
