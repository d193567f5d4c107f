//! crdoc Core - data model for versioned CRD documentation
//!
//! This crate provides the foundational types used throughout crdoc:
//! - `Schema`: OpenAPI schema fragments (object, array or primitive)
//! - `field`: uniform display attributes for schema fields
//! - `ResourceCatalog`: the static index of resources and their versions
//! - `ReleaseRegistry`: the ordered list of product releases
//! - `Manifest`: per-release resource listings
//! - `ResourceDocument`: per-version and legacy all-in-one CRD documents

pub mod catalog;
pub mod document;
pub mod error;
pub mod field;
pub mod manifest;
pub mod release;
pub mod schema;

pub use catalog::{ResourceCatalog, ResourceEntry, ResourceVersion};
pub use document::{ResourceDocument, VersionSchemas};
pub use error::{CoreError, Result};
pub use field::FieldView;
pub use manifest::Manifest;
pub use release::{Release, ReleaseConfig, ReleaseRegistry};
pub use schema::{PrimitiveType, Schema, SchemaKind, SchemaMeta};
