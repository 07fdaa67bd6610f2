//! EDM primitive type to diagram type vocabulary

use crate::models::leaf_name;
use once_cell::sync::Lazy;

/// Diagram type used when nothing in the table matches
pub const DEFAULT_DIAGRAM_TYPE: &str = "String";

/// Qualified EDM primitive types and their diagram types
pub const TYPE_TABLE: &[(&str, &str)] = &[
    ("Edm.String", "String"),
    ("Edm.Int32", "Int"),
    ("Edm.Int64", "Int64"),
    ("Edm.Boolean", "Boolean"),
    ("Edm.DateTime", "DateTime"),
    ("Edm.DateTimeOffset", "DateTime"),
    ("Edm.Time", "Time"),
    ("Edm.Decimal", "Decimal"),
    ("Edm.Double", "Float"),
    ("Edm.Single", "Float"),
    ("Edm.Guid", "String"),
    ("Edm.Binary", "Binary"),
    ("Edm.Int16", "Int"),
    ("Edm.Byte", "Int"),
    ("Edm.Date", "DateTime"),
    ("Edm.TimeOfDay", "Time"),
];

/// Table entries keyed by lowercase leaf segment, longest leaf first
static SUFFIXES: Lazy<Vec<(String, &'static str)>> = Lazy::new(|| {
    let mut suffixes: Vec<(String, &'static str)> = TYPE_TABLE
        .iter()
        .map(|(qualified, mapped)| (leaf_name(qualified).to_ascii_lowercase(), *mapped))
        .collect();
    suffixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    suffixes
});

/// Map a (possibly qualified) type name to the diagram vocabulary
///
/// Exact qualified matches win. Otherwise the type's leaf segment is matched
/// by suffix against the table's leaf segments, longest first, ignoring case.
/// Anything else maps to [`DEFAULT_DIAGRAM_TYPE`].
pub fn map_type(data_type: &str) -> &'static str {
    if let Some((_, mapped)) = TYPE_TABLE.iter().find(|(qualified, _)| *qualified == data_type) {
        return *mapped;
    }

    let leaf = leaf_name(data_type).to_ascii_lowercase();
    SUFFIXES
        .iter()
        .find(|(suffix, _)| leaf.ends_with(suffix.as_str()))
        .map(|(_, mapped)| *mapped)
        .unwrap_or(DEFAULT_DIAGRAM_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_matches() {
        assert_eq!(map_type("Edm.Int32"), "Int");
        assert_eq!(map_type("Edm.DateTimeOffset"), "DateTime");
        assert_eq!(map_type("Edm.Guid"), "String");
        assert_eq!(map_type("Edm.Single"), "Float");
    }

    #[test]
    fn test_suffix_matches() {
        assert_eq!(map_type("String"), "String");
        assert_eq!(map_type("int64"), "Int64");
        assert_eq!(map_type("Vendor.DateTimeOffset"), "DateTime");
        assert_eq!(map_type("Collection(Edm.Decimal)"), "Decimal");
        // longest leaf first: "DateTime" must not fall through to "Time"
        assert_eq!(map_type("Custom.DateTime"), "DateTime");
    }

    #[test]
    fn test_unmapped_defaults_to_string() {
        assert_eq!(map_type("Edm.Stream"), DEFAULT_DIAGRAM_TYPE);
        assert_eq!(map_type("Edm.Geography"), DEFAULT_DIAGRAM_TYPE);
        assert_eq!(map_type(""), DEFAULT_DIAGRAM_TYPE);
    }
}
