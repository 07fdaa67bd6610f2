//! Configuration for OData metadata import

use serde::{Deserialize, Serialize};

/// EDMX wrapper namespace used by OData v2/v3 service documents
pub const EDMX_NAMESPACE: &str = "http://schemas.microsoft.com/ado/2007/06/edmx";

/// SAP vendor annotation namespace
pub const SAP_NAMESPACE: &str = "http://www.sap.com/Protocols/SAPData";

/// A namespace URI together with the prefix it is registered under
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamespaceBinding {
    pub prefix: String,
    pub uri: String,
}

impl NamespaceBinding {
    pub fn new(prefix: &str, uri: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            uri: uri.to_string(),
        }
    }
}

/// Configuration for OData metadata import
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportConfig {
    /// Known EDM namespaces, tried in order
    pub namespaces: Vec<NamespaceBinding>,

    /// Vendor annotation namespace for labels, capability flags and tags
    pub vendor_namespace: NamespaceBinding,

    /// Whether the navigation name heuristic may add relationships
    pub include_heuristic: bool,

    /// Separator splitting a relationship name into source and target parts
    pub heuristic_separator: char,

    /// Prefixes tried in front of the guessed target name
    pub heuristic_prefixes: Vec<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            namespaces: vec![
                NamespaceBinding::new("edm", "http://schemas.microsoft.com/ado/2009/11/edm"),
                NamespaceBinding::new("edm", "http://schemas.microsoft.com/ado/2008/09/edm"),
                NamespaceBinding::new("edm", "http://schemas.microsoft.com/ado/2008/01/edm"),
                NamespaceBinding::new("edm", "http://schemas.microsoft.com/ado/2007/05/edm"),
                NamespaceBinding::new("edm", "http://schemas.microsoft.com/ado/2006/04/edm"),
                NamespaceBinding::new("edm", "http://docs.oasis-open.org/odata/ns/edm"),
            ],
            vendor_namespace: NamespaceBinding::new("sap", SAP_NAMESPACE),
            include_heuristic: true,
            heuristic_separator: '_',
            heuristic_prefixes: vec!["I_".to_string(), "C_".to_string(), "A_".to_string()],
        }
    }
}

impl ImportConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> ImportConfigBuilder {
        ImportConfigBuilder::default()
    }
}

/// Builder for ImportConfig
#[derive(Debug, Default)]
pub struct ImportConfigBuilder {
    config: ImportConfig,
}

impl ImportConfigBuilder {
    /// Register an additional EDM namespace
    pub fn namespace(mut self, prefix: &str, uri: &str) -> Self {
        self.config.namespaces.push(NamespaceBinding::new(prefix, uri));
        self
    }

    /// Set the vendor annotation namespace
    pub fn vendor_namespace(mut self, prefix: &str, uri: &str) -> Self {
        self.config.vendor_namespace = NamespaceBinding::new(prefix, uri);
        self
    }

    /// Enable or disable heuristic navigation resolution
    pub fn include_heuristic(mut self, include: bool) -> Self {
        self.config.include_heuristic = include;
        self
    }

    /// Set the relationship name separator used by the heuristic
    pub fn heuristic_separator(mut self, separator: char) -> Self {
        self.config.heuristic_separator = separator;
        self
    }

    /// Replace the prefixes tried by the heuristic
    pub fn heuristic_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.heuristic_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Build the configuration
    pub fn build(self) -> ImportConfig {
        self.config
    }
}
