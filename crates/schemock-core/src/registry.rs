use std::collections::{BTreeMap, HashSet};

use crate::definitions::Definitions;
use crate::schema::{NodeId, Schema};

/// Maps schema nodes to the logical names used for cross-field consistency.
///
/// The registry keeps a handle to every registered node so node identities
/// stay valid for as long as the registry lives.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    names: BTreeMap<NodeId, String>,
    anchors: Vec<Schema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every node under `schema` whose metadata carries `key` as a
    /// string attribute. Lazy references are not followed.
    pub fn register(&mut self, schema: &Schema, key: &str) -> &mut Self {
        let mut seen = HashSet::new();
        let mut stack = vec![schema];
        while let Some(node) = stack.pop() {
            if !seen.insert(node.id()) {
                continue;
            }
            if let Some(name) = node.meta_str(key) {
                let name = name.to_string();
                self.insert(node, name);
            }
            stack.extend(node.children());
        }
        self
    }

    /// Registers every definition body the same way as [`Self::register`].
    pub fn register_definitions(&mut self, definitions: &Definitions, key: &str) -> &mut Self {
        for (_, schema) in definitions.iter() {
            self.register(schema, key);
        }
        self
    }

    /// Registers one node under an explicit logical name.
    pub fn insert(&mut self, schema: &Schema, name: impl Into<String>) -> &mut Self {
        if self.names.insert(schema.id(), name.into()).is_none() {
            self.anchors.push(schema.clone());
        }
        self
    }

    /// Logical name of a node, if registered.
    pub fn name_of(&self, schema: &Schema) -> Option<&str> {
        self.names.get(&schema.id()).map(String::as_str)
    }

    pub fn contains(&self, schema: &Schema) -> bool {
        self.names.contains_key(&schema.id())
    }

    /// Distinct logical names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.values().map(String::as_str).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
