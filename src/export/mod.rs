//! Export functionality
//!
//! Provides the Mermaid ER diagram exporter and the EDM type vocabulary it
//! renders with.

pub mod config;
pub mod mermaid;
pub mod types;

use std::path::Path;

/// Result of an export operation
#[derive(Debug)]
pub struct ExportResult {
    /// Exported content
    pub content: String,
    /// Format identifier
    pub format: String,
}

impl ExportResult {
    /// Write the content to a file, terminated by a newline
    pub fn write_to(&self, path: &Path) -> Result<(), ExportError> {
        std::fs::write(path, format!("{}\n", self.content))?;
        Ok(())
    }
}

/// Error during export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::IoError(err.to_string())
    }
}

// Re-export for convenience
pub use config::{RenderConfig, RenderConfigBuilder};
pub use mermaid::{MermaidExporter, Multiplicity, relationship_symbol, sanitize_name};
pub use types::map_type;
