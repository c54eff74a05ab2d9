//! String-keyed field map
//!
//! Keys are case-sensitive and unique; insertion order is not significant.
//! Last write wins on re-set. Clearing consults the well-known table so
//! keys with a documented default stay present.

use hashbrown::HashMap;
use serde::Serialize;

use super::{FieldValue, well_known};

/// Map of field names to tagged values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldMap {
    fields: HashMap<String, FieldValue>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a field. Arbitrary custom keys are permitted;
    /// names are not validated against the well-known set.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Bulk setter; each entry behaves like an individual `set`.
    pub fn set_many<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        for (name, value) in entries {
            self.set(name, value);
        }
    }

    /// Reset a well-known key to its default, or remove the key entirely
    /// if it has none.
    pub fn clear(&mut self, name: &str) {
        match well_known::default_for(name) {
            Some(default) => {
                self.fields.insert(name.to_string(), default);
            }
            None => {
                self.fields.remove(name);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// String representation of a field's current value.
    pub fn get_display(&self, name: &str) -> Option<String> {
        self.fields.get(name).map(|value| value.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Owned copy of the current fields. Mutating the copy does not affect
    /// this map.
    pub fn snapshot(&self) -> FieldMap {
        self.clone()
    }

    /// Overwrite this map's entries with `other`'s. Used for precedence
    /// merging: entries from `other` win on key collision.
    pub fn merge_from(&mut self, other: &FieldMap) {
        for (name, value) in &other.fields {
            self.fields.insert(name.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
