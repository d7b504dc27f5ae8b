//! Schema model for schemock.
//!
//! This crate defines the schema tree the generator walks, the named
//! definitions lazy nodes resolve through, consistency registration, and
//! validation helpers for schema documents.

pub mod builders;
pub mod checks;
pub mod definitions;
pub mod document;
pub mod error;
pub mod registry;
pub mod schema;
pub mod validation;

pub use checks::{Check, NumberFormat, Overwrite, StringFormat};
pub use definitions::Definitions;
pub use document::{SchemaDocument, schema_document_json_schema, validate_schema_document};
pub use error::{Error, Result};
pub use registry::SchemaRegistry;
pub use schema::{Field, LiteralValue, NodeId, Schema, SchemaKind, SchemaNode, TemplatePart};
pub use validation::validate_schema;

/// Metadata attribute conventionally used as the consistency key.
pub const DEFAULT_CONSISTENCY_KEY: &str = "consistent";
