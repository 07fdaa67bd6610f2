//! Render command implementation

use crate::cli::commands::{load_input, parse_entity_list};
use crate::cli::error::CliError;
use crate::cli::output::format_warnings;
use crate::config::ToolConfig;
use crate::export::{ExportResult, MermaidExporter};
use crate::import::{ImportWarning, ODataImporter};
use std::path::PathBuf;
use tracing::info;

/// Options of the render command
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub input: String,
    pub output: Option<PathBuf>,
    pub fenced: bool,
    pub strict: bool,
    pub entities: Option<String>,
    pub include_related: bool,
    pub config: Option<PathBuf>,
}

/// Import metadata and render it, applying the command's selection flags
pub fn render_diagram(
    content: &str,
    options: &RenderOptions,
    mut config: ToolConfig,
) -> Result<(ExportResult, Vec<ImportWarning>), CliError> {
    if options.fenced {
        config.render.fenced = true;
    }
    if options.strict {
        config.import.include_heuristic = false;
    }

    let result = ODataImporter::with_config(config.import).import_str(content)?;
    let mut model = result.model;
    if options.strict {
        model = model.strict();
    }
    if let Some(list) = &options.entities {
        let names = parse_entity_list(list);
        if names.is_empty() {
            return Err(CliError::InvalidArgument("--entities names no entity".to_string()));
        }
        model = model.filter(&names, options.include_related);
    }

    let exported = MermaidExporter::with_config(config.render).export(&model)?;
    Ok((exported, result.warnings))
}

/// Handle the render command
pub fn handle_render(options: &RenderOptions) -> Result<(), CliError> {
    let config = match &options.config {
        Some(path) => ToolConfig::load(path)?,
        None => ToolConfig::default(),
    };
    let content = load_input(&options.input)?;
    let (exported, warnings) = render_diagram(&content, options, config)?;

    if !warnings.is_empty() {
        eprint!("{}", format_warnings(&warnings));
    }

    match &options.output {
        Some(path) => {
            exported.write_to(path)?;
            info!(path = %path.display(), "Wrote diagram");
        }
        None => println!("{}", exported.content),
    }
    Ok(())
}
