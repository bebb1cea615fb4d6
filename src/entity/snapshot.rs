// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A concrete, owned entity snapshot.

use std::collections::BTreeMap;

use super::FieldSource;
use crate::types::Value;

/// An owned snapshot of one entity's attributes at one instant.
///
/// Hosts that do not want to implement [`FieldSource`] for their own types
/// build one of these per change notification. The builder seeds the
/// identity attributes (`name`, `id`, `model`) into the field set so the
/// normalizer sees them the same way it sees everything else.
///
/// # Examples
///
/// ```
/// use deltacast::entity::{FieldSource, Snapshot};
/// use deltacast::types::Value;
///
/// let snap = Snapshot::device("Thermostat", 77)
///     .with_field("batteryLevel", Value::Integer(80))
///     .with_state("setpointHeat", Value::Float(20.5))
///     .build();
///
/// assert_eq!(snap.name(), "Thermostat");
/// assert!(snap.states().contains_key("setpointHeat"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    name: String,
    id: i64,
    model: String,
    fields: BTreeMap<String, Value>,
    states: BTreeMap<String, Value>,
}

impl Snapshot {
    /// Starts building a device snapshot.
    #[must_use]
    pub fn device(name: impl Into<String>, id: i64) -> SnapshotBuilder {
        SnapshotBuilder::new(name, id)
    }

    /// Starts building a variable snapshot.
    ///
    /// Variables have no model and no states; their single interesting
    /// attribute is conventionally named `value`.
    #[must_use]
    pub fn variable(name: impl Into<String>, id: i64, value: Value) -> Snapshot {
        SnapshotBuilder::new(name, id).with_field("value", value).build()
    }
}

impl FieldSource for Snapshot {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn fields(&self) -> Vec<(&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    fn states(&self) -> &BTreeMap<String, Value> {
        &self.states
    }
}

/// Builder for [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    name: String,
    id: i64,
    model: String,
    fields: BTreeMap<String, Value>,
    states: BTreeMap<String, Value>,
}

impl SnapshotBuilder {
    fn new(name: impl Into<String>, id: i64) -> Self {
        Self {
            name: name.into(),
            id,
            model: String::new(),
            fields: BTreeMap::new(),
            states: BTreeMap::new(),
        }
    }

    /// Sets the model/category label.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Adds an attribute to the open field set.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Adds a named sub-value to the `states` mapping.
    #[must_use]
    pub fn with_state(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.states.insert(name.into(), value.into());
        self
    }

    /// Finishes the snapshot.
    ///
    /// Identity attributes are mirrored into the field set (without
    /// overwriting host-supplied ones), and the `states` mapping is mirrored
    /// as a structured field under its conventional name so the nested
    /// exclusion rule has something to exclude.
    #[must_use]
    pub fn build(mut self) -> Snapshot {
        self.fields
            .entry("name".to_string())
            .or_insert_with(|| Value::Text(self.name.clone()));
        self.fields
            .entry("id".to_string())
            .or_insert(Value::Integer(self.id));
        if !self.model.is_empty() {
            self.fields
                .entry("model".to_string())
                .or_insert_with(|| Value::Text(self.model.clone()));
        }
        if !self.states.is_empty() {
            self.fields
                .entry("states".to_string())
                .or_insert_with(|| Value::Map(self.states.clone()));
        }

        Snapshot {
            name: self.name,
            id: self.id,
            model: self.model,
            fields: self.fields,
            states: self.states,
        }
    }
}
