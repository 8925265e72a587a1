//! Typed tag tree backing section documents.
//!
//! A [`Compound`] is a string-keyed map of [`Tag`] values. The section codec
//! reads and writes sections through the typed accessor surface here
//! (`byte`, `byte_array`, `long_array`, `list`, `compound` and the matching
//! `put_*` writers); it never walks the tree generically. Reads that hit a
//! key holding a different type answer as absent, so malformed documents
//! degrade to missing fields instead of panics.
//!
//! Wire encoding and compression belong to the container layer, not here.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A single typed value in a tag tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Tag {
    /// 8-bit signed integer.
    Byte(i8),
    /// 16-bit signed integer.
    Short(i16),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// UTF-8 string.
    String(String),
    /// Raw byte buffer.
    ByteArray(Vec<u8>),
    /// 32-bit integer array.
    IntArray(Vec<i32>),
    /// 64-bit word array.
    LongArray(Vec<u64>),
    /// Homogeneous-by-convention list of tags.
    List(Vec<Tag>),
    /// Nested compound.
    Compound(Compound),
}

impl Tag {
    /// The nested compound, if this tag is one.
    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }

    /// The string value, if this tag is one.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }
}

/// A string-keyed map of [`Tag`] values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Compound {
    entries: FxHashMap<String, Tag>,
}

impl Compound {
    /// Creates an empty compound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `true` if `key` is present (with any type).
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The raw tag at `key`.
    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.entries.get(key)
    }

    /// Iterates over all entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The byte at `key`, if present with that type.
    pub fn byte(&self, key: &str) -> Option<i8> {
        match self.entries.get(key) {
            Some(Tag::Byte(v)) => Some(*v),
            _ => None,
        }
    }

    /// The short at `key`, if present with that type.
    pub fn short(&self, key: &str) -> Option<i16> {
        match self.entries.get(key) {
            Some(Tag::Short(v)) => Some(*v),
            _ => None,
        }
    }

    /// The int at `key`, if present with that type.
    pub fn int(&self, key: &str) -> Option<i32> {
        match self.entries.get(key) {
            Some(Tag::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// The long at `key`, if present with that type.
    pub fn long(&self, key: &str) -> Option<i64> {
        match self.entries.get(key) {
            Some(Tag::Long(v)) => Some(*v),
            _ => None,
        }
    }

    /// The string at `key`, if present with that type.
    pub fn string(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(Tag::String(v)) => Some(v),
            _ => None,
        }
    }

    /// The byte buffer at `key`, if present with that type.
    pub fn byte_array(&self, key: &str) -> Option<&[u8]> {
        match self.entries.get(key) {
            Some(Tag::ByteArray(v)) => Some(v),
            _ => None,
        }
    }

    /// The int array at `key`, if present with that type.
    pub fn int_array(&self, key: &str) -> Option<&[i32]> {
        match self.entries.get(key) {
            Some(Tag::IntArray(v)) => Some(v),
            _ => None,
        }
    }

    /// The word array at `key`, if present with that type.
    pub fn long_array(&self, key: &str) -> Option<&[u64]> {
        match self.entries.get(key) {
            Some(Tag::LongArray(v)) => Some(v),
            _ => None,
        }
    }

    /// The list at `key`, if present with that type.
    pub fn list(&self, key: &str) -> Option<&[Tag]> {
        match self.entries.get(key) {
            Some(Tag::List(v)) => Some(v),
            _ => None,
        }
    }

    /// The nested compound at `key`, if present with that type.
    pub fn compound(&self, key: &str) -> Option<&Compound> {
        match self.entries.get(key) {
            Some(Tag::Compound(v)) => Some(v),
            _ => None,
        }
    }

    /// Inserts `tag` at `key`, replacing any prior value.
    pub fn put(&mut self, key: impl Into<String>, tag: Tag) {
        self.entries.insert(key.into(), tag);
    }

    /// Inserts a byte at `key`.
    pub fn put_byte(&mut self, key: impl Into<String>, value: i8) {
        self.put(key, Tag::Byte(value));
    }

    /// Inserts an int at `key`.
    pub fn put_int(&mut self, key: impl Into<String>, value: i32) {
        self.put(key, Tag::Int(value));
    }

    /// Inserts a string at `key`.
    pub fn put_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.put(key, Tag::String(value.into()));
    }

    /// Inserts a byte buffer at `key`.
    pub fn put_byte_array(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.put(key, Tag::ByteArray(value));
    }

    /// Inserts a word array at `key`.
    pub fn put_long_array(&mut self, key: impl Into<String>, value: Vec<u64>) {
        self.put(key, Tag::LongArray(value));
    }

    /// Inserts a list at `key`.
    pub fn put_list(&mut self, key: impl Into<String>, value: Vec<Tag>) {
        self.put(key, Tag::List(value));
    }

    /// Inserts a nested compound at `key`.
    pub fn put_compound(&mut self, key: impl Into<String>, value: Compound) {
        self.put(key, Tag::Compound(value));
    }

    /// Removes and returns the tag at `key`.
    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        self.entries.remove(key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_roundtrip() {
        let mut c = Compound::new();
        c.put_byte("Y", -3);
        c.put_string("Status", "full");
        c.put_byte_array("BlockLight", vec![0xAB; 4]);
        c.put_long_array("BlockStates", vec![1, 2, 3]);

        assert_eq!(c.byte("Y"), Some(-3));
        assert_eq!(c.string("Status"), Some("full"));
        assert_eq!(c.byte_array("BlockLight"), Some(&[0xAB; 4][..]));
        assert_eq!(c.long_array("BlockStates"), Some(&[1u64, 2, 3][..]));
        assert_eq!(c.len(), 4);
    }

    #[test]
    fn test_missing_key_reads_absent() {
        let c = Compound::new();
        assert_eq!(c.byte("Y"), None);
        assert_eq!(c.list("Palette"), None);
        assert!(!c.contains_key("Y"));
    }

    #[test]
    fn test_type_mismatch_reads_absent() {
        let mut c = Compound::new();
        c.put_string("Y", "not a byte");
        assert_eq!(c.byte("Y"), None);
        assert_eq!(c.string("Y"), Some("not a byte"));
    }

    #[test]
    fn test_put_replaces_prior_value() {
        let mut c = Compound::new();
        c.put_byte("Y", 1);
        c.put_byte("Y", 2);
        assert_eq!(c.byte("Y"), Some(2));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_nested_compound_and_list() {
        let mut state = Compound::new();
        state.put_string("Name", "minecraft:stone");

        let mut root = Compound::new();
        root.put_list("Palette", vec![Tag::Compound(state.clone())]);

        let list = root.list("Palette").unwrap();
        assert_eq!(list.len(), 1);
        let entry = list[0].as_compound().unwrap();
        assert_eq!(entry.string("Name"), Some("minecraft:stone"));
        assert_eq!(*entry, state);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut c = Compound::new();
        c.put_int("DataVersion", 2586);
        c.put_long_array("BlockStates", vec![u64::MAX, 0, 42]);
        let json = serde_json::to_string(&c).unwrap();
        let restored: Compound = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, c);
    }

    #[test]
    fn test_remove() {
        let mut c = Compound::new();
        c.put_int("DataVersion", 2586);
        assert_eq!(c.remove("DataVersion"), Some(Tag::Int(2586)));
        assert!(c.is_empty());
    }
}
