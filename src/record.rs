// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The flat normalized record.
//!
//! A [`Record`] is the output of normalization and diffing: an ordered
//! mapping from field name to [`Scalar`]. Ordering is deterministic (sorted
//! by key), so normalizing the same snapshot twice yields byte-identical
//! serialized records.
//!
//! # Examples
//!
//! ```
//! use deltacast::record::Record;
//! use deltacast::types::Scalar;
//!
//! let mut record = Record::new();
//! record.insert("brightness", Scalar::Float(75.0));
//!
//! assert_eq!(record.get("brightness"), Some(&Scalar::Float(75.0)));
//! assert_eq!(record.len(), 1);
//! ```

use std::collections::BTreeMap;

use crate::types::{Measurement, Scalar};

/// Well-known record key holding the entity name.
pub const KEY_NAME: &str = "name";

/// Well-known record key holding the entity identifier.
pub const KEY_ID: &str = "id";

/// Well-known record key holding the measurement classification.
pub const KEY_MEASUREMENT: &str = "measurement";

/// A flat field-name → scalar mapping.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Scalar>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, replacing any previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: Scalar) {
        self.fields.insert(key.into(), value);
    }

    /// Returns the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.fields.get(key)
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, key: &str) -> Option<Scalar> {
        self.fields.remove(key)
    }

    /// Returns `true` if the record holds the key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record holds no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates field names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Merges another record into this one, replacing overlapping keys.
    ///
    /// Keys present here but absent from `other` are retained. This is the
    /// cache update rule: a transient absence of an attribute must not erase
    /// previously observed knowledge of it.
    pub fn merge(&mut self, other: &Record) {
        for (k, v) in &other.fields {
            self.fields.insert(k.clone(), v.clone());
        }
    }

    /// Returns the measurement classification, if the record carries one.
    #[must_use]
    pub fn measurement(&self) -> Option<Measurement> {
        match self.fields.get(KEY_MEASUREMENT)? {
            Scalar::Text(s) => Measurement::parse(s),
            _ => None,
        }
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Scalar);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl FromIterator<(String, Scalar)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Scalar)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
