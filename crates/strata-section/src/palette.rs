//! Block-state symbols and the deduplicated palette that owns them.
//!
//! A [`Palette`] is an ordered table of distinct [`BlockState`] values; the
//! packed index array stores positions as indices into it. Indices, not
//! references, are the stable handle: external code never aliases palette
//! entries, and inserts copy the supplied state. A reverse index keyed by
//! state name narrows equality checks to the few candidates sharing a name,
//! since distinct states of the same block differ only in properties.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use strata_tag::Compound;

/// One block-state symbol: a namespaced block name plus its property map.
///
/// Equality is structural over the full content. The property map is ordered
/// so equality and serialization are deterministic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockState {
    name: String,
    properties: BTreeMap<String, String>,
}

impl BlockState {
    /// A state with the given name and no properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// The ubiquitous empty block, reserved at palette index 0 by convention.
    pub fn air() -> Self {
        Self::new("minecraft:air")
    }

    /// Builder-style property addition.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Sets or replaces a property.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// The namespaced block name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The property value at `key`, if set.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Iterates properties in key order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encodes as a palette record: `Name` plus a `Properties` compound when
    /// any properties are set.
    pub fn to_compound(&self) -> Compound {
        let mut record = Compound::new();
        record.put_string("Name", self.name.clone());
        if !self.properties.is_empty() {
            let mut props = Compound::new();
            for (key, value) in &self.properties {
                props.put_string(key.clone(), value.clone());
            }
            record.put_compound("Properties", props);
        }
        record
    }

    /// Decodes a palette record. `None` when the record has no `Name` string.
    /// Non-string property values are ignored.
    pub fn from_compound(record: &Compound) -> Option<Self> {
        let mut state = Self::new(record.string("Name")?);
        if let Some(props) = record.compound("Properties") {
            for (key, tag) in props.iter() {
                if let Some(value) = tag.as_string() {
                    state.set_property(key, value);
                }
            }
        }
        Some(state)
    }
}

/// Ordered, deduplicated table of the block states a section references.
#[derive(Clone, Debug, Default)]
pub struct Palette {
    entries: Vec<BlockState>,
    /// Name → indices of entries carrying that name.
    by_name: FxHashMap<String, Vec<usize>>,
}

impl Palette {
    /// A palette containing only the given default state at index 0.
    pub fn with_default(state: BlockState) -> Self {
        let mut palette = Self::default();
        palette.register(0, &state);
        palette.entries.push(state);
        palette
    }

    /// Builds a palette from loaded entries, preserving their order and
    /// indexing each for reverse lookup. Structural duplicates in the input
    /// are kept in the table (their slots may be referenced by loaded data)
    /// but resolve to the first occurrence on lookup.
    pub fn from_entries(entries: Vec<BlockState>) -> Self {
        let mut palette = Self {
            entries,
            by_name: FxHashMap::default(),
        };
        for i in 0..palette.entries.len() {
            palette.register_if_new(i);
        }
        palette
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the palette has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The state at `index`.
    pub fn get(&self, index: usize) -> Option<&BlockState> {
        self.entries.get(index)
    }

    /// All entries in index order.
    pub fn entries(&self) -> &[BlockState] {
        &self.entries
    }

    /// The index of a structurally equal entry, if present.
    pub fn index_of(&self, state: &BlockState) -> Option<usize> {
        self.by_name
            .get(state.name())?
            .iter()
            .copied()
            .find(|&i| self.entries[i] == *state)
    }

    /// Returns the index of `state`, appending a copy if absent.
    pub fn insert(&mut self, state: &BlockState) -> usize {
        if let Some(index) = self.index_of(state) {
            return index;
        }
        let index = self.entries.len();
        self.register(index, state);
        self.entries.push(state.clone());
        index
    }

    /// Drops entries whose index is not marked in `used`, keeping index 0
    /// unconditionally and preserving the relative order of survivors.
    ///
    /// Returns the old-index → new-index remap for the survivors; dropped
    /// indices map to 0 and must not be looked up.
    ///
    /// # Panics
    ///
    /// Panics if the palette is empty or `used` is shorter than the palette.
    pub fn compact(&mut self, used: &[bool]) -> Vec<usize> {
        assert!(!self.entries.is_empty(), "cannot compact an empty palette");
        let mut old_to_new = vec![0usize; self.entries.len()];
        let mut survivors = Vec::with_capacity(self.entries.len());
        survivors.push(self.entries[0].clone());
        for (old, entry) in self.entries.iter().enumerate().skip(1) {
            if used[old] {
                old_to_new[old] = survivors.len();
                survivors.push(entry.clone());
            }
        }
        self.entries = survivors;
        self.by_name.clear();
        for i in 0..self.entries.len() {
            self.register_if_new(i);
        }
        old_to_new
    }

    fn register(&mut self, index: usize, state: &BlockState) {
        self.by_name
            .entry(state.name().to_owned())
            .or_default()
            .push(index);
    }

    /// Indexes entry `i` unless a structurally equal entry is already
    /// indexed under the same name.
    fn register_if_new(&mut self, i: usize) {
        let name = self.entries[i].name();
        if let Some(candidates) = self.by_name.get(name) {
            if candidates.iter().any(|&j| self.entries[j] == self.entries[i]) {
                return;
            }
        }
        let key = name.to_owned();
        self.by_name.entry(key).or_default().push(i);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn stone() -> BlockState {
        BlockState::new("minecraft:stone")
    }

    fn oak_log(axis: &str) -> BlockState {
        BlockState::new("minecraft:oak_log").with_property("axis", axis)
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(stone(), stone());
        assert_eq!(oak_log("x"), oak_log("x"));
        assert_ne!(oak_log("x"), oak_log("y"));
        assert_ne!(stone(), BlockState::new("minecraft:granite"));
    }

    #[test]
    fn test_insert_deduplicates() {
        let mut palette = Palette::with_default(BlockState::air());
        let a = palette.insert(&stone());
        let b = palette.insert(&stone());
        assert_eq!(a, 1);
        assert_eq!(b, 1);
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn test_same_name_different_properties_get_distinct_slots() {
        let mut palette = Palette::with_default(BlockState::air());
        let x = palette.insert(&oak_log("x"));
        let y = palette.insert(&oak_log("y"));
        assert_ne!(x, y);
        assert_eq!(palette.index_of(&oak_log("x")), Some(x));
        assert_eq!(palette.index_of(&oak_log("y")), Some(y));
        assert_eq!(palette.len(), 3);
    }

    #[test]
    fn test_insert_copies_the_state() {
        let mut palette = Palette::with_default(BlockState::air());
        let mut caller_owned = stone();
        let index = palette.insert(&caller_owned);
        caller_owned.set_property("weathered", "true");
        assert_eq!(palette.get(index), Some(&stone()));
    }

    #[test]
    fn test_compact_keeps_default_and_order() {
        let mut palette = Palette::with_default(BlockState::air());
        palette.insert(&stone());
        palette.insert(&oak_log("x"));
        palette.insert(&oak_log("y"));

        // Only oak_log("y") (index 3) is still referenced.
        let used = [false, false, false, true];
        let remap = palette.compact(&used);

        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get(0), Some(&BlockState::air()));
        assert_eq!(palette.get(1), Some(&oak_log("y")));
        assert_eq!(remap[3], 1);
        assert_eq!(palette.index_of(&oak_log("y")), Some(1));
        assert_eq!(palette.index_of(&stone()), None);
    }

    #[test]
    fn test_compound_roundtrip() {
        let state = oak_log("z");
        let record = state.to_compound();
        assert_eq!(record.string("Name"), Some("minecraft:oak_log"));
        let restored = BlockState::from_compound(&record).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_compound_without_properties_omits_key() {
        let record = stone().to_compound();
        assert!(!record.contains_key("Properties"));
        assert_eq!(BlockState::from_compound(&record).unwrap(), stone());
    }

    #[test]
    fn test_from_compound_requires_name() {
        let record = Compound::new();
        assert!(BlockState::from_compound(&record).is_none());
    }

    #[test]
    fn test_from_entries_resolves_duplicates_to_first() {
        let palette = Palette::from_entries(vec![BlockState::air(), stone(), stone()]);
        assert_eq!(palette.len(), 3);
        assert_eq!(palette.index_of(&stone()), Some(1));
    }
}
