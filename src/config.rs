//! Tool configuration
//!
//! One TOML file configures both the importer and the renderer:
//!
//! ```toml
//! [import]
//! includeHeuristic = false
//!
//! [render]
//! fenced = true
//! label = "has"
//! ```

use crate::export::RenderConfig;
use crate::import::ImportConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Error loading a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, String),
    #[error("Invalid config: {0}")]
    Parse(String),
}

/// Import and render settings loaded together
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolConfig {
    pub import: ImportConfig,
    pub render: RenderConfig,
}

impl ToolConfig {
    /// Parse a TOML document; missing tables and keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a TOML configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e.to_string()))?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(ToolConfig::from_toml_str("").unwrap(), ToolConfig::default());
    }

    #[test]
    fn test_partial_tables() {
        let config = ToolConfig::from_toml_str(
            "[import]\nincludeHeuristic = false\n\n[render]\nfenced = true\nlabel = \"has\"\n",
        )
        .unwrap();
        assert!(!config.import.include_heuristic);
        assert_eq!(config.import.heuristic_separator, '_');
        assert!(config.render.fenced);
        assert_eq!(config.render.label, "has");
        assert_eq!(config.render.key_marker, "PK");
    }

    #[test]
    fn test_invalid_document() {
        let result = ToolConfig::from_toml_str("[render]\nfenced = \"yes\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[render]\nkeyMarker = \"KEY\"").unwrap();

        let config = ToolConfig::load(file.path()).unwrap();
        assert_eq!(config.render.key_marker, "KEY");
    }

    #[test]
    fn test_load_missing_file() {
        let result = ToolConfig::load(Path::new("/nonexistent/odata-erd.toml"));
        assert!(matches!(result, Err(ConfigError::Read(_, _))));
    }
}
