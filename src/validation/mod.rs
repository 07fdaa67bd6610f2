//! Validation functionality
//!
//! Provides validation logic for:
//! - Relationship validation (unknown endpoints, self references, guessed edges)
//! - Relationship graph traversal used by entity filtering

pub mod relationships;

pub use relationships::{
    EntityGraph, RelationshipValidationError, RelationshipValidationResult, RelationshipValidator,
};
