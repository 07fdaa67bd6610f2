//! Inspect command implementation

use crate::cli::commands::load_input;
use crate::cli::error::CliError;
use crate::cli::output::{format_summary, format_warnings};
use crate::config::ToolConfig;
use crate::import::{ImportError, ImportWarning, ODataImporter};
use crate::models::{DataModel, KeyRow, NavigationReference, TagIndex};
use crate::validation::{RelationshipValidationResult, RelationshipValidator};
use roxmltree::Document;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Everything known about one metadata document
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectReport {
    pub metadata: BTreeMap<String, serde_json::Value>,
    pub model: DataModel,
    pub key_rows: Vec<KeyRow>,
    pub navigation: Vec<NavigationReference>,
    pub tags: TagIndex,
    pub validation: RelationshipValidationResult,
    pub warnings: Vec<ImportWarning>,
}

/// Import a document and collect the report
pub fn build_report(content: &str, config: ToolConfig) -> Result<InspectReport, CliError> {
    let document = Document::parse(content).map_err(ImportError::from)?;
    let importer = ODataImporter::with_config(config.import);
    let result = importer.import_document(&document)?;

    Ok(InspectReport {
        metadata: importer.extract_metadata(&document).into_iter().collect(),
        key_rows: result.model.key_rows(),
        navigation: importer.navigation_references(&document),
        tags: result.model.tag_index(),
        validation: RelationshipValidator::new().validate(&result.model),
        model: result.model,
        warnings: result.warnings,
    })
}

/// Format a report as `json`, `yaml` or `summary`
pub fn format_report(report: &InspectReport, format: &str) -> Result<String, CliError> {
    match format {
        "json" => serde_json::to_string_pretty(report).map_err(|e| CliError::Serialization(e.to_string())),
        "yaml" => serde_yaml::to_string(report).map_err(|e| CliError::Serialization(e.to_string())),
        "summary" => Ok(format_summary(report)),
        _ => Err(CliError::InvalidArgument(format!("Unknown format: {}", format))),
    }
}

/// Handle the inspect command
pub fn handle_inspect(input: &str, format: &str, config: Option<&PathBuf>) -> Result<(), CliError> {
    let config = match config {
        Some(path) => ToolConfig::load(path)?,
        None => ToolConfig::default(),
    };
    let content = load_input(input)?;
    let report = build_report(&content, config)?;

    if format != "summary" && !report.warnings.is_empty() {
        eprint!("{}", format_warnings(&report.warnings));
    }
    println!("{}", format_report(&report, format)?);
    Ok(())
}
