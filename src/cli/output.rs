//! Output formatting for CLI

use crate::cli::commands::inspect::InspectReport;
use crate::export::map_type;
use crate::import::ImportWarning;

/// Format import warnings, one per line
pub fn format_warnings(warnings: &[ImportWarning]) -> String {
    let mut output = String::new();
    output.push_str(&format!("⚠️  {} warning(s):\n", warnings.len()));
    for warning in warnings {
        output.push_str(&format!("  - {}\n", warning));
    }
    output
}

/// Format an inspect report for reading in a terminal
pub fn format_summary(report: &InspectReport) -> String {
    let mut output = String::new();

    if !report.warnings.is_empty() {
        output.push('\n');
        output.push_str(&format_warnings(&report.warnings));
    }

    if !report.validation.is_valid() {
        output.push_str("\n⚠️  Dangling Relationships:\n");
        for dangling in &report.validation.dangling {
            output.push_str(&format!(
                "  - {} -> {} (unknown '{}')\n",
                dangling.relationship.from_entity, dangling.relationship.to_entity, dangling.missing_entity
            ));
        }
    }

    output.push_str(&format!("\n✅ Parsed {} entit(y/ies):\n", report.model.entities.len()));
    for (idx, entity) in report.model.entities.iter().enumerate() {
        output.push_str(&format!("\nEntity {}: {}\n", idx + 1, entity.name));
        if let Some(label) = &entity.label {
            output.push_str(&format!("  Label: {}\n", label));
        }
        let keys: Vec<&str> = entity.keys.iter().map(String::as_str).collect();
        output.push_str(&format!("  Keys: {}\n", keys.join(", ")));

        let columns: Vec<String> = entity
            .properties
            .iter()
            .map(|p| format!("{}:{}", p.name, map_type(&p.data_type)))
            .collect();
        output.push_str(&format!("  Properties: {}\n", columns.join(", ")));
        if !entity.tags.is_empty() {
            let tags: Vec<&str> = entity.tags.iter().map(String::as_str).collect();
            output.push_str(&format!("  Tags: {}\n", tags.join(", ")));
        }
    }

    output.push_str(&format!("\n🔗 {} relationship(s):\n", report.model.relationships.len()));
    for rel in &report.model.relationships {
        let marker = if rel.confidence.is_low() { " (guessed)" } else { "" };
        output.push_str(&format!(
            "  - {} [{}] -> {} [{}]{}\n",
            rel.from_entity, rel.from_multiplicity, rel.to_entity, rel.to_multiplicity, marker
        ));
    }

    if !report.validation.self_references.is_empty() {
        output.push_str(&format!(
            "\nℹ️  {} self reference(s)\n",
            report.validation.self_references.len()
        ));
    }

    if report.warnings.is_empty() && report.validation.is_valid() {
        output.push_str("\n✅ All checks passed!\n");
    }

    output
}
