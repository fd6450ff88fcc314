//! Generic key/value data for project files.
//!
//! Old-style plist data has only three shapes: strings, arrays and
//! dictionaries. Numbers are strings on disk. The same model carries decoded
//! input (no comments) and encoded output (comments derived from the graph).

use std::cmp::Ordering;
use std::fmt;

use rustc_hash::FxHashMap;

use crate::model::ObjectId;

/// A string payload with an optional trailing `/* comment */`.
///
/// Equality, hashing and ordering consider both the payload and the comment;
/// ordering is by payload first so sorted output follows identifier order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommentedString {
    /// The raw payload, unquoted.
    pub value: String,
    /// Annotation rendered after the payload.
    pub comment: Option<String>,
}

impl CommentedString {
    /// Creates an uncommented string.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            comment: None,
        }
    }

    /// Creates a string with a comment.
    pub fn with_comment(value: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            comment: Some(comment.into()),
        }
    }

    /// Creates a string with an optional comment.
    pub fn with_optional_comment(value: impl Into<String>, comment: Option<String>) -> Self {
        Self {
            value: value.into(),
            comment,
        }
    }
}

impl PartialOrd for CommentedString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CommentedString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .cmp(&other.value)
            .then_with(|| self.comment.cmp(&other.comment))
    }
}

impl From<&str> for CommentedString {
    fn from(value: &str) -> Self {
        CommentedString::new(value)
    }
}

impl From<String> for CommentedString {
    fn from(value: String) -> Self {
        CommentedString::new(value)
    }
}

impl From<ObjectId> for CommentedString {
    fn from(id: ObjectId) -> Self {
        CommentedString::new(id.as_str())
    }
}

impl fmt::Display for CommentedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.comment {
            Some(comment) => write!(f, "{} /* {} */", self.value, comment),
            None => f.write_str(&self.value),
        }
    }
}

/// A node of old-style plist data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlistValue {
    String(CommentedString),
    Array(Vec<PlistValue>),
    Dictionary(PlistDict),
}

impl PlistValue {
    /// Creates an uncommented string value.
    pub fn string(value: impl Into<String>) -> Self {
        PlistValue::String(CommentedString::new(value))
    }

    /// Creates a commented string value.
    pub fn commented(value: impl Into<String>, comment: Option<String>) -> Self {
        PlistValue::String(CommentedString::with_optional_comment(value, comment))
    }

    /// Returns the string payload, ignoring any comment.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PlistValue::String(s) => Some(&s.value),
            _ => None,
        }
    }

    /// Returns the array items.
    pub fn as_array(&self) -> Option<&[PlistValue]> {
        match self {
            PlistValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the dictionary.
    pub fn as_dictionary(&self) -> Option<&PlistDict> {
        match self {
            PlistValue::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Returns the value with every comment removed, recursively.
    ///
    /// Comments are derived on write, so two values that differ only in
    /// comments carry the same data.
    pub fn without_comments(&self) -> PlistValue {
        match self {
            PlistValue::String(s) => PlistValue::string(s.value.clone()),
            PlistValue::Array(items) => {
                PlistValue::Array(items.iter().map(PlistValue::without_comments).collect())
            }
            PlistValue::Dictionary(dict) => PlistValue::Dictionary(
                dict.iter()
                    .map(|(k, v)| (CommentedString::new(k.value.clone()), v.without_comments()))
                    .collect(),
            ),
        }
    }
}

impl From<CommentedString> for PlistValue {
    fn from(s: CommentedString) -> Self {
        PlistValue::String(s)
    }
}

impl From<PlistDict> for PlistValue {
    fn from(dict: PlistDict) -> Self {
        PlistValue::Dictionary(dict)
    }
}

/// An insertion-ordered dictionary keyed by commented strings.
///
/// Lookups match on the key payload only. Inserting a key whose payload is
/// already present replaces that entry in place, keeping its position.
#[derive(Debug, Clone, Default)]
pub struct PlistDict {
    entries: Vec<(CommentedString, PlistValue)>,
    /// Key payload to position in `entries`.
    index: FxHashMap<String, usize>,
}

impl PartialEq for PlistDict {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for PlistDict {}

impl PlistDict {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty dictionary with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Inserts an entry, returning the previous value for the same key.
    pub fn insert(
        &mut self,
        key: impl Into<CommentedString>,
        value: impl Into<PlistValue>,
    ) -> Option<PlistValue> {
        let key = key.into();
        let value = value.into();
        match self.position(&key.value) {
            Some(idx) => {
                let slot = &mut self.entries[idx];
                slot.0 = key;
                Some(std::mem::replace(&mut slot.1, value))
            }
            None => {
                self.index.insert(key.value.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Looks up a value by key payload.
    pub fn get(&self, key: &str) -> Option<&PlistValue> {
        self.position(key).map(|idx| &self.entries[idx].1)
    }

    /// Looks up the full entry (key with its comment, and value).
    pub fn get_entry(&self, key: &str) -> Option<(&CommentedString, &PlistValue)> {
        self.position(key).map(|idx| {
            let (k, v) = &self.entries[idx];
            (k, v)
        })
    }

    /// Returns true if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Removes an entry, preserving the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<PlistValue> {
        let idx = self.index.remove(key)?;
        let (_, value) = self.entries.remove(idx);
        for slot in self.index.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        Some(value)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&CommentedString, &PlistValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &CommentedString> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorts entries by key.
    pub fn sort_keys(&mut self) {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(idx, (k, _))| (k.value.clone(), idx))
            .collect();
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }
}

impl FromIterator<(CommentedString, PlistValue)> for PlistDict {
    fn from_iter<I: IntoIterator<Item = (CommentedString, PlistValue)>>(iter: I) -> Self {
        let mut dict = PlistDict::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

impl IntoIterator for PlistDict {
    type Item = (CommentedString, PlistValue);
    type IntoIter = std::vec::IntoIter<(CommentedString, PlistValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commented_string_ordering() {
        let a = CommentedString::with_comment("A", "zzz");
        let b = CommentedString::new("B");
        assert!(a < b);

        let plain = CommentedString::new("A");
        assert!(plain < a);
        assert_ne!(plain, a);
    }

    #[test]
    fn test_dict_preserves_insertion_order() {
        let mut dict = PlistDict::new();
        dict.insert("isa", PlistValue::string("PBXBuildFile"));
        dict.insert("fileRef", PlistValue::string("X"));
        dict.insert("buildActionMask", PlistValue::string("0"));

        let keys: Vec<&str> = dict.keys().map(|k| k.value.as_str()).collect();
        assert_eq!(keys, ["isa", "fileRef", "buildActionMask"]);
    }

    #[test]
    fn test_dict_replace_keeps_position() {
        let mut dict = PlistDict::new();
        dict.insert("a", PlistValue::string("1"));
        dict.insert("b", PlistValue::string("2"));
        let old = dict.insert(CommentedString::with_comment("a", "note"), PlistValue::string("3"));

        assert_eq!(old, Some(PlistValue::string("1")));
        assert_eq!(dict.len(), 2);
        let (key, value) = dict.get_entry("a").unwrap();
        assert_eq!(key.comment.as_deref(), Some("note"));
        assert_eq!(value.as_str(), Some("3"));
        assert_eq!(dict.keys().next().unwrap().value, "a");
    }

    #[test]
    fn test_without_comments() {
        let value = PlistValue::Array(vec![
            PlistValue::commented("A", Some("icon.png".to_string())),
            PlistValue::string("B"),
        ]);
        assert_eq!(
            value.without_comments(),
            PlistValue::Array(vec![PlistValue::string("A"), PlistValue::string("B")])
        );
    }

    #[test]
    fn test_remove() {
        let mut dict = PlistDict::new();
        dict.insert("a", PlistValue::string("1"));
        dict.insert("b", PlistValue::string("2"));
        assert_eq!(dict.remove("a"), Some(PlistValue::string("1")));
        assert!(dict.remove("a").is_none());
        assert!(!dict.contains_key("a"));
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get("b"), Some(&PlistValue::string("2")));
    }

    #[test]
    fn test_sort_keys_keeps_lookup() {
        let mut dict = PlistDict::new();
        dict.insert("b", PlistValue::string("2"));
        dict.insert("a", PlistValue::string("1"));
        dict.sort_keys();

        let keys: Vec<&str> = dict.keys().map(|k| k.value.as_str()).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(dict.get("b"), Some(&PlistValue::string("2")));
    }
}
