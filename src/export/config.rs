//! Configuration for diagram rendering

use serde::{Deserialize, Serialize};

/// Configuration for Mermaid ER diagram rendering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    /// Token appended to key property lines
    pub key_marker: String,

    /// Wrap the diagram in a ```mermaid fence
    pub fenced: bool,

    /// Label written on every relationship line
    pub label: String,

    /// Render relationships guessed by the navigation heuristic
    pub include_low_confidence: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            key_marker: "PK".to_string(),
            fenced: false,
            label: "relates".to_string(),
            include_low_confidence: true,
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::default()
    }
}

/// Builder for RenderConfig
#[derive(Debug, Default)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    /// Set the key marker token
    pub fn key_marker(mut self, marker: &str) -> Self {
        self.config.key_marker = marker.to_string();
        self
    }

    /// Enable or disable the markdown fence
    pub fn fenced(mut self, fenced: bool) -> Self {
        self.config.fenced = fenced;
        self
    }

    /// Set the relationship label
    pub fn label(mut self, label: &str) -> Self {
        self.config.label = label.to_string();
        self
    }

    /// Enable or disable rendering of heuristic relationships
    pub fn include_low_confidence(mut self, include: bool) -> Self {
        self.config.include_low_confidence = include;
        self
    }

    /// Build the configuration
    pub fn build(self) -> RenderConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.key_marker, "PK");
        assert_eq!(config.label, "relates");
        assert!(!config.fenced);
        assert!(config.include_low_confidence);
    }

    #[test]
    fn test_builder() {
        let config = RenderConfig::builder().fenced(true).label("has").build();
        assert!(config.fenced);
        assert_eq!(config.label, "has");
        assert_eq!(config.key_marker, "PK");
    }
}
