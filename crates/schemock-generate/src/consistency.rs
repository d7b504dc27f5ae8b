use std::collections::BTreeMap;

use crate::value::GeneratedValue;

/// Values shared between nodes carrying the same logical name.
///
/// Each name is pinned to the array-index-path depth of its first
/// occurrence. Its values are indexed by the array index at that depth, so
/// sibling occurrences inside the same array element replay one value while
/// different elements get their own. Slots are written once.
#[derive(Debug, Clone, Default)]
pub struct ConsistencyStore {
    values: BTreeMap<String, Vec<Option<GeneratedValue>>>,
    depths: BTreeMap<String, usize>,
}

impl ConsistencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins `name` at `depth` unless it is already pinned; returns the pinned depth.
    pub fn pin(&mut self, name: &str, depth: usize) -> usize {
        *self.depths.entry(name.to_string()).or_insert(depth)
    }

    pub fn pinned_depth(&self, name: &str) -> Option<usize> {
        self.depths.get(name).copied()
    }

    /// Slot index for `name` at `array_path`, or `None` when the path does
    /// not reach the pinned depth.
    pub fn slot_index(&self, name: &str, array_path: &[usize]) -> Option<usize> {
        let depth = self.pinned_depth(name)?;
        if array_path.len() < depth {
            return None;
        }
        Some(if depth == 0 { 0 } else { array_path[depth - 1] })
    }

    /// Previously stored value for the slot, if any.
    pub fn replay(&self, name: &str, array_path: &[usize]) -> Option<&GeneratedValue> {
        let index = self.slot_index(name, array_path)?;
        self.values.get(name)?.get(index)?.as_ref()
    }

    /// Stores `value` in the slot if it is still empty. Returns whether it was stored.
    pub fn record(&mut self, name: &str, array_path: &[usize], value: GeneratedValue) -> bool {
        let Some(index) = self.slot_index(name, array_path) else {
            return false;
        };
        let slots = self.values.entry(name.to_string()).or_default();
        if slots.len() <= index {
            slots.resize(index + 1, None);
        }
        if slots[index].is_some() {
            return false;
        }
        slots[index] = Some(value);
        true
    }

    /// Number of filled slots for `name`.
    pub fn len(&self, name: &str) -> usize {
        self.values
            .get(name)
            .map_or(0, |slots| slots.iter().filter(|slot| slot.is_some()).count())
    }
}
