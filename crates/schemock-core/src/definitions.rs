use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::Schema;

/// Named schemas that `lazy` nodes refer to.
///
/// Self-referential shapes are expressed by name: a definition may contain
/// `lazy` nodes pointing back at itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Definitions {
    entries: BTreeMap<String, Schema>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.insert(name, schema);
        self
    }

    /// Inserts or replaces a definition, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, schema: Schema) -> Option<Schema> {
        self.entries.insert(name.into(), schema)
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.entries.get(name)
    }

    pub fn resolve(&self, name: &str) -> Result<&Schema> {
        self.get(name)
            .ok_or_else(|| Error::UnresolvedDefinition(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.entries
            .iter()
            .map(|(name, schema)| (name.as_str(), schema))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Schema)> for Definitions {
    fn from_iter<I: IntoIterator<Item = (K, Schema)>>(iter: I) -> Self {
        let mut definitions = Definitions::new();
        for (name, schema) in iter {
            definitions.insert(name, schema);
        }
        definitions
    }
}
