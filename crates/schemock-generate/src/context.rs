use schemock_core::{Definitions, Schema, SchemaRegistry};
use tracing::warn;

use crate::consistency::ConsistencyStore;
use crate::errors::GenerationError;
use crate::hook::OverrideHook;
use crate::model::{GenerateOptions, GenerationIssue, GenerationReport};
use crate::provider::ValueProvider;
use crate::transforms::TransformRegistry;

/// Position of the node being generated.
///
/// Extended copies are made when descending; a cursor is never mutated
/// after it is handed to a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Array indices from the root (arrays, tuples, sets, maps, records).
    pub array_path: Vec<usize>,
    /// Number of lazy references unfolded so far.
    pub lazy_depth: usize,
    /// Value path used in diagnostics.
    pub path: String,
    /// Set inside container slots, where an exact-optional node cannot omit.
    pub required: bool,
}

impl Cursor {
    pub fn root() -> Self {
        Self {
            array_path: Vec::new(),
            lazy_depth: 0,
            path: "$".to_string(),
            required: false,
        }
    }

    /// Root cursor for one entry of a multi-schema call.
    pub fn named_root(name: &str) -> Self {
        Self {
            path: format!("$.{name}"),
            ..Self::root()
        }
    }

    pub fn field(&self, name: &str) -> Self {
        Self {
            array_path: self.array_path.clone(),
            lazy_depth: self.lazy_depth,
            path: format!("{}.{name}", self.path),
            required: false,
        }
    }

    pub fn index(&self, index: usize) -> Self {
        let mut array_path = self.array_path.clone();
        array_path.push(index);
        Self {
            array_path,
            lazy_depth: self.lazy_depth,
            path: format!("{}[{index}]", self.path),
            required: false,
        }
    }

    /// Cursor for the key half of an indexed entry.
    pub fn key(&self, index: usize) -> Self {
        let mut cursor = self.index(index);
        cursor.path.push_str("<key>");
        cursor
    }

    /// Same position, but exact-optional wrappers below it must produce a value.
    pub fn required(&self) -> Self {
        Self {
            required: true,
            ..self.clone()
        }
    }

    pub fn lazy(&self) -> Self {
        Self {
            lazy_depth: self.lazy_depth + 1,
            ..self.clone()
        }
    }
}

/// State shared by one top-level generation call.
pub struct GenerationContext<'a> {
    pub options: &'a GenerateOptions,
    pub provider: &'a mut dyn ValueProvider,
    pub hook: Option<&'a dyn OverrideHook>,
    /// Present only when consistency is enabled.
    pub registry: Option<&'a SchemaRegistry>,
    pub definitions: &'a Definitions,
    pub transforms: &'a TransformRegistry,
    pub store: &'a mut ConsistencyStore,
    pub report: &'a mut GenerationReport,
}

impl<'a> GenerationContext<'a> {
    /// Logical consistency name of `schema`, if any.
    pub fn consistency_name(&self, schema: &Schema) -> Option<&'a str> {
        self.registry.and_then(|registry| registry.name_of(schema))
    }

    /// Records and logs a warning.
    pub fn warn(&mut self, code: &str, message: impl Into<String>, cursor: &Cursor) {
        let issue = GenerationIssue::warning(code, message, Some(&cursor.path));
        log_issue(&issue);
        self.report.record_warning(issue);
    }

    /// Degrades an unsupported construct to a fallback, or fails in strict mode.
    pub fn fallback(
        &mut self,
        code: &str,
        message: impl Into<String>,
        cursor: &Cursor,
    ) -> Result<(), GenerationError> {
        let message = message.into();
        if self.options.strict {
            return Err(GenerationError::Unsupported {
                path: cursor.path.clone(),
                message,
            });
        }
        self.report.record_fallback();
        self.warn(code, message, cursor);
        Ok(())
    }
}

fn log_issue(issue: &GenerationIssue) {
    warn!(
        code = %issue.code,
        path = issue.path.as_deref().unwrap_or(""),
        message = %issue.message
    );
}
