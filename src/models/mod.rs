//! Models module
//!
//! Defines the canonical entity-relationship structures produced by import
//! and consumed by export.

pub mod data_model;
pub mod entity;
pub mod property;
pub mod relationship;

pub use data_model::{DataModel, KeyRow, TagIndex};
pub use entity::{Entity, EntityCapabilities};
pub use property::{Property, PropertyFlags, leaf_name};
pub use relationship::{Confidence, NavigationReference, Relationship, RelationshipKey};
