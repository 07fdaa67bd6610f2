//! Schema node lookup
//!
//! Metadata documents declare the EDM namespace under different versions and
//! prefixes, or not at all. Lookups therefore run every [`Strategy`] and
//! union the matches instead of stopping at the first one that succeeds.

use super::ImportError;
use super::config::{ImportConfig, NamespaceBinding};
use roxmltree::{Document, Node, NodeId};
use std::collections::HashSet;
use tracing::debug;

/// Element kinds looked up inside a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Schema,
    EntityType,
    Association,
    EntitySet,
    Key,
    PropertyRef,
    Property,
    NavigationProperty,
    End,
    Documentation,
    Tags,
    Tag,
}

impl NodeKind {
    /// Local tag name of this element kind
    pub fn local_name(self) -> &'static str {
        match self {
            NodeKind::Schema => "Schema",
            NodeKind::EntityType => "EntityType",
            NodeKind::Association => "Association",
            NodeKind::EntitySet => "EntitySet",
            NodeKind::Key => "Key",
            NodeKind::PropertyRef => "PropertyRef",
            NodeKind::Property => "Property",
            NodeKind::NavigationProperty => "NavigationProperty",
            NodeKind::End => "End",
            NodeKind::Documentation => "Documentation",
            NodeKind::Tags => "tags",
            NodeKind::Tag => "tag",
        }
    }
}

/// Independent element predicates, evaluated in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Namespace is a known EDM URI bound to its registered prefix
    /// (or declared as the default namespace)
    RegisteredPrefix,
    /// Namespace is a known EDM URI, whatever prefix binds it
    QualifiedUri,
    /// Element has no namespace
    BareTag,
    /// Any element with the local name, in any namespace
    LocalName,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::RegisteredPrefix,
        Strategy::QualifiedUri,
        Strategy::BareTag,
        Strategy::LocalName,
    ];

    /// Whether `node` is an element named `local` under this strategy
    pub fn matches(self, node: Node<'_, '_>, local: &str, namespaces: &[NamespaceBinding]) -> bool {
        if !node.is_element() || node.tag_name().name() != local {
            return false;
        }
        let namespace = node.tag_name().namespace();
        match self {
            Strategy::RegisteredPrefix => namespaces.iter().any(|ns| {
                namespace == Some(ns.uri.as_str())
                    && (node.lookup_namespace_uri(Some(ns.prefix.as_str())) == Some(ns.uri.as_str())
                        || node.lookup_namespace_uri(None) == Some(ns.uri.as_str()))
            }),
            Strategy::QualifiedUri => namespaces.iter().any(|ns| namespace == Some(ns.uri.as_str())),
            Strategy::BareTag => namespace.is_none(),
            Strategy::LocalName => true,
        }
    }
}

/// Finds schema elements despite inconsistent namespace declarations
#[derive(Debug, Clone)]
pub struct SchemaLocator<'c> {
    namespaces: &'c [NamespaceBinding],
}

impl<'c> SchemaLocator<'c> {
    pub fn new(config: &'c ImportConfig) -> Self {
        Self {
            namespaces: &config.namespaces,
        }
    }

    /// Every schema element of the document
    ///
    /// # Errors
    ///
    /// [`ImportError::SchemaNotFound`] when no strategy finds a schema.
    pub fn locate_schemas<'a, 'input>(
        &self,
        document: &'a Document<'input>,
    ) -> Result<Vec<Node<'a, 'input>>, ImportError> {
        let schemas = self.find_all(document.root(), NodeKind::Schema.local_name());
        if schemas.is_empty() {
            return Err(ImportError::SchemaNotFound);
        }
        debug!(count = schemas.len(), "Located schema elements");
        Ok(schemas)
    }

    /// Elements of one kind across every schema of the document
    ///
    /// A document without schemas yields no elements here; only
    /// [`SchemaLocator::locate_schemas`] treats that as an error.
    pub fn locate<'a, 'input>(
        &self,
        document: &'a Document<'input>,
        kind: NodeKind,
    ) -> Vec<Node<'a, 'input>> {
        let schemas = self.find_all(document.root(), NodeKind::Schema.local_name());
        self.find_in(&schemas, kind)
    }

    /// Elements of one kind below any of the scope nodes, deduplicated
    pub fn find_in<'a, 'input>(&self, scopes: &[Node<'a, 'input>], kind: NodeKind) -> Vec<Node<'a, 'input>> {
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut found: Vec<Node<'a, 'input>> = scopes
            .iter()
            .flat_map(|scope| self.find_all(*scope, kind.local_name()))
            .filter(|node| seen.insert(node.id()))
            .collect();
        found.sort_by_key(|node| node.id().get());
        found
    }

    /// Descendants of `scope` (excluding `scope`) named `local`
    ///
    /// Results of every strategy are unioned, deduplicated by node identity
    /// and returned in document order.
    pub fn find_all<'a, 'input>(&self, scope: Node<'a, 'input>, local: &str) -> Vec<Node<'a, 'input>> {
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut found = Vec::new();

        for strategy in Strategy::ALL {
            for node in scope.descendants().skip(1) {
                if strategy.matches(node, local, self.namespaces) && seen.insert(node.id()) {
                    found.push(node);
                }
            }
        }

        found.sort_by_key(|node| node.id().get());
        found
    }

    /// Direct children of `node` matching `kind` under any strategy
    pub fn children<'a, 'input>(&self, node: Node<'a, 'input>, kind: NodeKind) -> Vec<Node<'a, 'input>> {
        node.children()
            .filter(|child| {
                Strategy::ALL
                    .iter()
                    .any(|s| s.matches(*child, kind.local_name(), self.namespaces))
            })
            .collect()
    }
}

/// Candidate attribute name, tried by [`first_present_attribute`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKey<'k> {
    /// Attribute in an explicit namespace URI
    Qualified { uri: &'k str, name: &'k str },
    /// Attribute in whatever namespace `prefix` is bound to at the node
    Prefixed { prefix: &'k str, name: &'k str },
    /// Unqualified attribute
    Plain(&'k str),
}

impl<'k> AttributeKey<'k> {
    fn lookup<'a>(self, node: Node<'a, '_>) -> Option<&'a str> {
        match self {
            AttributeKey::Qualified { uri, name } => node.attribute((uri, name)),
            AttributeKey::Prefixed { prefix, name } => {
                let uri = node.lookup_namespace_uri(Some(prefix))?;
                node.attribute((uri, name))
            }
            AttributeKey::Plain(name) => node.attribute(name),
        }
    }
}

/// Value of the first candidate attribute present on `node`, else `default`
pub fn first_present_attribute<'a>(node: Node<'a, '_>, candidates: &[AttributeKey<'_>], default: &'a str) -> &'a str {
    candidates
        .iter()
        .find_map(|key| key.lookup(node))
        .unwrap_or(default)
}

/// Vendor attribute lookup: namespace URI form first, then the prefix form
pub fn vendor_attribute<'a>(node: Node<'a, '_>, vendor: &NamespaceBinding, name: &str) -> Option<&'a str> {
    let candidates = [
        AttributeKey::Qualified {
            uri: vendor.uri.as_str(),
            name,
        },
        AttributeKey::Prefixed {
            prefix: vendor.prefix.as_str(),
            name,
        },
    ];
    Some(first_present_attribute(node, &candidates, "")).filter(|v| !v.is_empty())
}

/// Vendor boolean flag with a fixed default for absent or unparsable values
pub fn vendor_flag(node: Node<'_, '_>, vendor: &NamespaceBinding, name: &str, default: bool) -> bool {
    vendor_attribute(node, vendor, name)
        .and_then(parse_bool)
        .unwrap_or(default)
}

/// Parse an XML boolean, case-insensitively
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Nearest enclosing schema element of a node
pub fn enclosing_schema<'a, 'input>(node: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    node.ancestors()
        .skip(1)
        .find(|a| a.is_element() && a.tag_name().name() == NodeKind::Schema.local_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = r#"<?xml version="1.0"?>
<edmx:Edmx xmlns:edmx="http://schemas.microsoft.com/ado/2007/06/edmx">
  <edmx:DataServices>
    <Schema xmlns="http://schemas.microsoft.com/ado/2008/09/edm" Namespace="A">
      <EntityType Name="One"/>
    </Schema>
    <m:Schema xmlns:m="http://schemas.microsoft.com/ado/2009/11/edm" Namespace="B">
      <m:EntityType Name="Two"/>
    </m:Schema>
    <Schema Namespace="C">
      <EntityType Name="Three"/>
    </Schema>
    <x:Schema xmlns:x="urn:unknown" Namespace="D">
      <x:EntityType Name="Four"/>
    </x:Schema>
  </edmx:DataServices>
</edmx:Edmx>"#;

    #[test]
    fn test_union_of_strategies_finds_every_schema() {
        let doc = Document::parse(MIXED).unwrap();
        let config = ImportConfig::default();
        let locator = SchemaLocator::new(&config);

        let schemas = locator.locate_schemas(&doc).unwrap();
        let names: Vec<_> = schemas.iter().map(|s| s.attribute("Namespace").unwrap()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);

        let types = locator.locate(&doc, NodeKind::EntityType);
        assert_eq!(types.len(), 4);
    }

    #[test]
    fn test_strategies_are_independent() {
        let doc = Document::parse(MIXED).unwrap();
        let config = ImportConfig::default();
        let schemas: Vec<_> = doc.descendants().filter(|n| n.has_tag_name("Schema")).collect();

        let hits = |s: Strategy| {
            schemas
                .iter()
                .filter(|n| s.matches(**n, "Schema", &config.namespaces))
                .count()
        };
        // default namespace counts as registered, the "m" prefix does not
        assert_eq!(hits(Strategy::RegisteredPrefix), 1);
        assert_eq!(hits(Strategy::QualifiedUri), 2);
        assert_eq!(hits(Strategy::BareTag), 1);
        assert_eq!(hits(Strategy::LocalName), 4);
    }

    #[test]
    fn test_results_follow_document_order() {
        // only the last-declared elements match the earlier strategies
        let xml = r#"<Root>
  <x:Schema xmlns:x="urn:unknown" Namespace="First">
    <x:EntityType Name="A"/>
    <EntityType Name="B"/>
    <e:EntityType xmlns:e="http://schemas.microsoft.com/ado/2009/11/edm" Name="C"/>
  </x:Schema>
  <Schema Namespace="Second"/>
  <edm:Schema xmlns:edm="http://schemas.microsoft.com/ado/2009/11/edm" Namespace="Third"/>
</Root>"#;
        let doc = Document::parse(xml).unwrap();
        let config = ImportConfig::default();
        let locator = SchemaLocator::new(&config);

        let schemas = locator.locate_schemas(&doc).unwrap();
        let names: Vec<_> = schemas.iter().filter_map(|s| s.attribute("Namespace")).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);

        let types = locator.locate(&doc, NodeKind::EntityType);
        let names: Vec<_> = types.iter().filter_map(|t| t.attribute("Name")).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_nested_schemas_are_deduplicated() {
        let xml = r#"<Root><Schema Namespace="Outer"><Schema Namespace="Inner"><EntityType Name="X"/></Schema></Schema></Root>"#;
        let doc = Document::parse(xml).unwrap();
        let config = ImportConfig::default();
        let locator = SchemaLocator::new(&config);

        assert_eq!(locator.locate_schemas(&doc).unwrap().len(), 2);
        assert_eq!(locator.locate(&doc, NodeKind::EntityType).len(), 1);
    }

    #[test]
    fn test_schema_not_found() {
        let doc = Document::parse("<Edmx><DataServices/></Edmx>").unwrap();
        let config = ImportConfig::default();
        let locator = SchemaLocator::new(&config);

        assert!(matches!(locator.locate_schemas(&doc), Err(ImportError::SchemaNotFound)));
        assert!(locator.locate(&doc, NodeKind::EntityType).is_empty());
    }

    #[test]
    fn test_first_present_attribute_order() {
        let xml = r#"<E xmlns:sap="http://www.sap.com/Protocols/SAPData" xmlns:s2="urn:other"
                        sap:label="Qualified" s2:creatable="false" Name="Plain"/>"#;
        let doc = Document::parse(xml).unwrap();
        let node = doc.root_element();

        let candidates = [
            AttributeKey::Qualified {
                uri: "http://www.sap.com/Protocols/SAPData",
                name: "label",
            },
            AttributeKey::Plain("Name"),
        ];
        assert_eq!(first_present_attribute(node, &candidates, "none"), "Qualified");
        assert_eq!(first_present_attribute(node, &candidates[1..], "none"), "Plain");
        assert_eq!(first_present_attribute(node, &[], "none"), "none");

        let other = NamespaceBinding::new("s2", "urn:missing");
        assert!(!vendor_flag(node, &other, "creatable", true));
        assert!(vendor_flag(node, &other, "deletable", true));
    }
}
