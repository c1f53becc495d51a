//! Ordered accumulators backing the store.
//!
//! [`FieldMap`] keeps every value registered for a name, in registration
//! order, and iterates names in the order they were first seen.
//! [`UnitTable`] keeps one parameter object per unit and merges repeat
//! registrations into it.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::Params;

/// Ordered multi-valued mapping from field name to registered values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldMap {
    entries: IndexMap<String, Vec<Value>>,
}

impl FieldMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the sequence registered under `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use deferred_config::FieldMap;
    /// use serde_json::json;
    ///
    /// let mut fields = FieldMap::new();
    /// fields.push("x", json!(1));
    /// fields.push("x", json!(2));
    /// assert_eq!(fields.get("x"), Some(&[json!(1), json!(2)][..]));
    /// ```
    pub fn push(&mut self, name: &str, value: Value) {
        match self.entries.get_mut(name) {
            Some(values) => values.push(value),
            None => {
                self.entries.insert(name.to_owned(), vec![value]);
            }
        }
    }

    /// Returns the values registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[Value]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Iterates over `(name, values)` in first-registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of distinct field names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no value has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the map as a JSON object of arrays.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .iter()
            .map(|(name, values)| (name.to_owned(), Value::Array(values.to_vec())))
            .collect();
        Value::Object(map)
    }
}

/// Ordered table of extension units and their parameter objects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnitTable {
    units: IndexMap<String, Params>,
}

impl UnitTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `name`, merging `params` into an existing entry when present.
    ///
    /// Keys in `params` overwrite keys already stored for the unit; the unit
    /// keeps the position of its first registration.
    ///
    /// # Examples
    ///
    /// ```
    /// use deferred_config::UnitTable;
    /// use serde_json::json;
    ///
    /// let mut units = UnitTable::new();
    /// units.add("r1", json!({"a": 1}).as_object().cloned().unwrap_or_default());
    /// units.add("r1", json!({"b": 2}).as_object().cloned().unwrap_or_default());
    /// assert_eq!(units.get("r1").map(|p| p.len()), Some(2));
    /// ```
    pub fn add(&mut self, name: &str, params: Params) {
        match self.units.get_mut(name) {
            Some(existing) => merge_params(existing, params),
            None => {
                self.units.insert(name.to_owned(), params);
            }
        }
    }

    /// Returns the parameter object stored for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Params> {
        self.units.get(name)
    }

    /// Iterates over `(name, params)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Params)> {
        self.units
            .iter()
            .map(|(name, params)| (name.as_str(), params))
    }

    /// Number of registered units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether no unit has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Renders the table as a JSON object keyed by unit name.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .iter()
            .map(|(name, params)| (name.to_owned(), Value::Object(params.clone())))
            .collect();
        Value::Object(map)
    }
}

/// Shallow last-write-wins merge of `layer` into `target`.
pub(crate) fn merge_params(target: &mut Params, layer: Params) {
    for (key, value) in layer {
        target.insert(key, value);
    }
}
