//! Mermaid ER diagram exporter.
//!
//! Output grammar:
//!
//! ```text
//! erDiagram
//!     Entity {
//!         Type property PK
//!     }
//!     From ||--o{ To : relates
//! ```
//!
//! Names are sanitized the same way in entity blocks and relationship lines,
//! so every relationship line references a block header verbatim.

use super::config::RenderConfig;
use super::types::map_type;
use crate::export::{ExportError, ExportResult};
use crate::models::{DataModel, Entity, Relationship};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// First line of every diagram
pub const DIAGRAM_HEADER: &str = "erDiagram";

const ENTITY_INDENT: &str = "    ";
const PROPERTY_INDENT: &str = "        ";

/// Normalized multiplicity bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    One,
    Many,
}

impl Multiplicity {
    /// `*` and `0..*` are many; everything else (`1`, `0..1`) is one
    pub fn normalize(multiplicity: &str) -> Self {
        match multiplicity.trim() {
            "*" | "0..*" => Multiplicity::Many,
            _ => Multiplicity::One,
        }
    }
}

/// Mermaid cardinality symbol for a pair of multiplicities
pub fn relationship_symbol(from: &str, to: &str) -> &'static str {
    match (Multiplicity::normalize(from), Multiplicity::normalize(to)) {
        (Multiplicity::One, Multiplicity::One) => "||--||",
        (Multiplicity::One, Multiplicity::Many) => "||--o{",
        (Multiplicity::Many, Multiplicity::One) => "}o--||",
        (Multiplicity::Many, Multiplicity::Many) => "}o--o{",
    }
}

/// Replace characters Mermaid does not accept in identifiers
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '-' | ' ' | '(' | ')' => '_',
            other => other,
        })
        .collect()
}

/// Exporter for Mermaid ER diagram text.
#[derive(Debug, Clone, Default)]
pub struct MermaidExporter {
    config: RenderConfig,
}

impl MermaidExporter {
    /// Create an exporter with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an exporter with a custom configuration
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Export a model to Mermaid text.
    ///
    /// # Example
    ///
    /// ```rust
    /// use odata_erd::export::mermaid::MermaidExporter;
    /// use odata_erd::models::{DataModel, Entity, Property};
    ///
    /// let entity = Entity::new(
    ///     "Employee",
    ///     vec![Property::new("Employee", "id", "Edm.String")],
    ///     ["id".to_string()].into_iter().collect(),
    /// );
    /// let model = DataModel::from_parts(vec![entity], vec![]);
    ///
    /// let result = MermaidExporter::new().export(&model).unwrap();
    /// assert_eq!(result.format, "mermaid");
    /// assert!(result.content.contains("String id PK"));
    /// ```
    pub fn export(&self, model: &DataModel) -> Result<ExportResult, ExportError> {
        Ok(ExportResult {
            content: self.render(&model.entities, &model.relationships),
            format: "mermaid".to_string(),
        })
    }

    /// Render entities and relationships to diagram text.
    ///
    /// Entity blocks come first and relationship lines last, each in input
    /// order. Entities without properties and relationships whose endpoints
    /// are not rendered are skipped, so rendering never fails.
    pub fn render(&self, entities: &[Entity], relationships: &[Relationship]) -> String {
        let mut lines: Vec<String> = Vec::new();
        if self.config.fenced {
            lines.push("```mermaid".to_string());
        }
        lines.push(DIAGRAM_HEADER.to_string());

        let mut rendered: HashSet<&str> = HashSet::new();
        for entity in entities {
            if entity.properties.is_empty() {
                debug!(entity = %entity.name, "Not rendering entity without properties");
                continue;
            }
            rendered.insert(entity.name.as_str());
            self.render_entity(entity, &mut lines);
        }

        for rel in relationships {
            if !rendered.contains(rel.from_entity.as_str()) || !rendered.contains(rel.to_entity.as_str()) {
                debug!(from = %rel.from_entity, to = %rel.to_entity, "Not rendering dangling relationship");
                continue;
            }
            if rel.confidence.is_low() && !self.config.include_low_confidence {
                continue;
            }
            lines.push(format!(
                "{}{} {} {} : {}",
                ENTITY_INDENT,
                sanitize_name(&rel.from_entity),
                relationship_symbol(&rel.from_multiplicity, &rel.to_multiplicity),
                sanitize_name(&rel.to_entity),
                self.config.label
            ));
        }

        if self.config.fenced {
            lines.push("```".to_string());
        }
        lines.join("\n")
    }

    /// Entity block with properties deduplicated on (sanitized name, mapped type)
    fn render_entity(&self, entity: &Entity, lines: &mut Vec<String>) {
        lines.push(format!("{}{} {{", ENTITY_INDENT, sanitize_name(&entity.name)));

        let mut seen: BTreeSet<(String, &'static str)> = BTreeSet::new();
        for property in &entity.properties {
            let name = sanitize_name(&property.name);
            let mapped = map_type(&property.data_type);
            if !seen.insert((name.clone(), mapped)) {
                continue;
            }
            let mut line = format!("{}{} {}", PROPERTY_INDENT, mapped, name);
            if property.is_key {
                line.push(' ');
                line.push_str(&self.config.key_marker);
            }
            lines.push(line);
        }

        lines.push(format!("{}}}", ENTITY_INDENT));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_table_is_total() {
        assert_eq!(relationship_symbol("1", "1"), "||--||");
        assert_eq!(relationship_symbol("1", "*"), "||--o{");
        assert_eq!(relationship_symbol("1", "0..*"), relationship_symbol("1", "*"));
        assert_eq!(relationship_symbol("*", "1"), "}o--||");
        assert_eq!(relationship_symbol("0..*", "*"), "}o--o{");
        assert_eq!(relationship_symbol("0..1", "1"), "||--||");
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Sales Order-Item (v2)"), "Sales_Order_Item__v2_");
        assert_eq!(sanitize_name("Plain"), "Plain");
    }

    #[test]
    fn test_fenced_output() {
        let exporter = MermaidExporter::with_config(RenderConfig::builder().fenced(true).build());
        let text = exporter.render(&[], &[]);
        assert_eq!(text, "```mermaid\nerDiagram\n```");
    }
}
