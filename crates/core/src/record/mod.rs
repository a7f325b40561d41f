//! One parsed log entry and the field names the tool treats specially.

mod timestamp;
mod value;

pub use timestamp::ParsedTimestamp;
pub use value::Value;

use std::collections::btree_map::{self, BTreeMap};
use serde::Serialize;

/// Timestamp field names, probed in order.
pub const TIME_KEYS: &[&str] = &["time", "ts", "timestamp"];
/// Level field names, probed in order.
pub const LEVEL_KEYS: &[&str] = &["level", "lvl", "severity"];
/// Message field names, probed in order.
pub const MESSAGE_KEYS: &[&str] = &["message", "msg", "text"];

/// Field injected in merge mode; holds the label of the originating source.
pub const SOURCE_FIELD: &str = "_source";

/// Returns true for the timestamp, level and message field names.
pub fn is_canonical_key(key: &str) -> bool {
    TIME_KEYS.contains(&key) || LEVEL_KEYS.contains(&key) || MESSAGE_KEYS.contains(&key)
}

/// A parsed log entry: a mapping of unique field names to values.
///
/// Fields are kept sorted by name, so iteration (and every renderer built on
/// it) is deterministic. Filters and formatters only ever see `&Record`; the
/// one mutation after parsing is the merge loader tagging [`SOURCE_FIELD`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, returning the previous value under that name.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in ascending key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.fields.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// The value of the first of `keys` present in this record.
    pub fn first_of(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().find_map(|key| self.fields.get(*key))
    }

    /// Timestamp derived from the first usable [`TIME_KEYS`] field.
    pub fn timestamp(&self) -> ParsedTimestamp {
        ParsedTimestamp::from_record(self)
    }

    pub(crate) fn tag_source(&mut self, label: &str) {
        self.fields
            .insert(SOURCE_FIELD.to_string(), Value::String(label.to_string()));
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Record {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().collect()
    }
}
