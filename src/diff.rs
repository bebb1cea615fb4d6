// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The differ and its last-seen cache.
//!
//! [`DiffEngine`] wraps a [`Normalizer`] with one layer of memory: the last
//! fully-normalized record per entity name. Each [`diff`](DiffEngine::diff)
//! call normalizes the new snapshot, keeps only the fields that are new or
//! changed, and merges the full record back into the cache so a transiently
//! absent attribute does not erase what was known about it.
//!
//! The cache lives for the process; there is no persistence. After a restart
//! the first update per entity is simply a full record, which downstream
//! stores absorb without harm.
//!
//! # Examples
//!
//! ```
//! use deltacast::diff::DiffEngine;
//! use deltacast::entity::Snapshot;
//! use deltacast::types::Value;
//!
//! let engine = DiffEngine::new();
//! let snap = Snapshot::device("Porch Light", 42)
//!     .with_field("brightness", Value::Integer(75))
//!     .build();
//!
//! // First sight: the delta carries everything.
//! let first = engine.diff(&snap);
//! assert!(first.contains_key("brightness"));
//!
//! // Unchanged snapshot: only the forced identity fields remain.
//! let second = engine.diff(&snap);
//! assert_eq!(second.len(), 3);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::entity::FieldSource;
use crate::normalize::Normalizer;
use crate::record::{KEY_ID, KEY_MEASUREMENT, KEY_NAME, Record};
use crate::schema::TypeMap;
use crate::types::Scalar;

/// Computes field-level deltas between successive entity snapshots.
///
/// One engine per process; the cache is guarded by a single coarse mutex so
/// hosts may deliver change notifications from any thread. Entries are small
/// and a diff is sub-millisecond, so finer locking buys nothing.
#[derive(Debug, Default)]
pub struct DiffEngine {
    normalizer: Normalizer,
    cache: Mutex<HashMap<String, Record>>,
    debug: bool,
}

impl DiffEngine {
    /// Creates an engine with a default normalizer and empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine around a configured normalizer.
    #[must_use]
    pub fn with_normalizer(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            cache: Mutex::new(HashMap::new()),
            debug: false,
        }
    }

    /// Enables verbose full-vs-delta record logging.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Returns a handle to the normalizer's column-type memory.
    #[must_use]
    pub fn type_map(&self) -> Arc<TypeMap> {
        self.normalizer.type_map()
    }

    /// Returns a copy of the cached record for an entity, if one exists.
    #[must_use]
    pub fn cached(&self, entity_name: &str) -> Option<Record> {
        self.cache.lock().get(entity_name).cloned()
    }

    /// Returns the number of entities seen so far.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.cache.lock().len()
    }

    /// Normalizes a snapshot and returns only what changed.
    ///
    /// The delta always carries `name`, `id`, and `measurement` regardless
    /// of change, so every emitted record is self-identifying. This method
    /// cannot fail: every per-field conversion miss inside normalization
    /// degrades to an omitted or unchanged field.
    pub fn diff(&self, entity: &impl FieldSource) -> Record {
        let new_record = self.normalizer.normalize(entity);

        let mut cache = self.cache.lock();
        let cached = cache.entry(entity.name().to_string()).or_default();

        let mut delta: Record = new_record
            .iter()
            .filter(|&(key, value)| cached.get(key) != Some(value))
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();

        cached.merge(&new_record);
        drop(cache);

        delta.insert(KEY_NAME, Scalar::text(entity.name()));
        #[allow(clippy::cast_precision_loss)]
        delta.insert(KEY_ID, Scalar::Float(entity.id() as f64));
        if let Some(measurement) = new_record.get(KEY_MEASUREMENT) {
            delta.insert(KEY_MEASUREMENT, measurement.clone());
        }

        if self.debug {
            tracing::debug!(
                entity = %entity.name(),
                full = %serde_json::to_string(&new_record).unwrap_or_default(),
                delta = %serde_json::to_string(&delta).unwrap_or_default(),
                "computed record delta"
            );
        }

        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Snapshot;
    use crate::schema::ColumnType;
    use crate::types::{Measurement, Value};

    fn light(brightness: i64) -> Snapshot {
        Snapshot::device("Porch Light", 42)
            .with_model("Dimmer Switch")
            .with_field("brightness", Value::Integer(brightness))
            .with_field("onState", Value::Bool(brightness > 0))
            .build()
    }

    #[test]
    fn first_sight_emits_full_record() {
        let engine = DiffEngine::new();
        let delta = engine.diff(&light(75));

        assert_eq!(delta.get("brightness"), Some(&Scalar::Float(75.0)));
        assert_eq!(delta.get("onState"), Some(&Scalar::Bool(true)));
        assert_eq!(delta.get("name"), Some(&Scalar::text("Porch Light")));
    }

    #[test]
    fn unchanged_snapshot_yields_identity_only() {
        let engine = DiffEngine::new();
        engine.diff(&light(75));

        let delta = engine.diff(&light(75));

        assert_eq!(delta.len(), 3);
        assert_eq!(delta.get("name"), Some(&Scalar::text("Porch Light")));
        assert_eq!(delta.get("id"), Some(&Scalar::Float(42.0)));
        assert_eq!(delta.measurement(), Some(Measurement::DeviceChanges));
    }

    #[test]
    fn changed_field_appears_alone() {
        let engine = DiffEngine::new();
        engine.diff(&light(75));

        let delta = engine.diff(&light(50));

        assert_eq!(delta.get("brightness"), Some(&Scalar::Float(50.0)));
        assert!(!delta.contains_key("onState"));
    }

    #[test]
    fn delta_keys_are_subset_of_full_record() {
        let engine = DiffEngine::new();
        engine.diff(&light(75));
        let delta = engine.diff(&light(50));

        let full = Normalizer::new().normalize(&light(50));
        for (key, _) in delta.iter() {
            assert!(full.contains_key(key), "unexpected key {key}");
        }
    }

    #[test]
    fn cache_merge_retains_stale_fields() {
        let engine = DiffEngine::new();

        let with_x = Snapshot::device("Sensor", 7)
            .with_field("x", Value::Integer(1))
            .build();
        engine.diff(&with_x);

        let without_x = Snapshot::device("Sensor", 7)
            .with_field("y", Value::Integer(2))
            .build();
        let delta = engine.diff(&without_x);

        assert!(!delta.contains_key("x"));
        let cached = engine.cached("Sensor").unwrap();
        assert_eq!(cached.get("x"), Some(&Scalar::Float(1.0)));
        assert_eq!(cached.get("y"), Some(&Scalar::Float(2.0)));
    }

    #[test]
    fn reappearing_cached_value_is_not_resent() {
        let engine = DiffEngine::new();

        let with_x = Snapshot::device("Sensor", 7)
            .with_field("x", Value::Integer(1))
            .build();
        engine.diff(&with_x);

        let without_x = Snapshot::device("Sensor", 7).build();
        engine.diff(&without_x);

        // x returns with its old value: the merge kept it, so no change.
        let delta = engine.diff(&with_x);
        assert!(!delta.contains_key("x"));
    }

    #[test]
    fn entities_are_cached_independently() {
        let engine = DiffEngine::new();
        engine.diff(&light(75));

        let other = Snapshot::device("Hall Light", 43)
            .with_field("brightness", Value::Integer(75))
            .build();
        let delta = engine.diff(&other);

        // Same field value, different entity: still a first sight.
        assert_eq!(delta.get("brightness"), Some(&Scalar::Float(75.0)));
        assert_eq!(engine.entity_count(), 2);
    }

    #[test]
    fn forced_id_is_float_of_entity_id() {
        let engine = DiffEngine::new();
        let delta = engine.diff(&light(1));
        assert_eq!(delta.get("id"), Some(&Scalar::Float(42.0)));
    }

    #[test]
    fn measurement_survives_every_delta() {
        let engine = DiffEngine::new();
        let thermostat = Snapshot::device("Thermostat", 9)
            .with_state("setpointHeat", Value::Float(20.0))
            .build();

        engine.diff(&thermostat);
        let delta = engine.diff(&thermostat);
        assert_eq!(delta.measurement(), Some(Measurement::ThermostatChanges));
    }

    #[test]
    fn coercion_failure_does_not_poison_diff() {
        let engine = DiffEngine::new();
        engine.type_map().remember("status", ColumnType::Int);

        let snap = Snapshot::device("Garage Door", 11)
            .with_field("status", Value::text("opening"))
            .build();

        let delta = engine.diff(&snap);
        assert_eq!(delta.get("status"), Some(&Scalar::text("opening")));
    }

    #[test]
    fn type_coercion_change_is_reported_once() {
        let engine = DiffEngine::new();
        let snap = Snapshot::device("Lock", 12)
            .with_field("batteryLevel", Value::Integer(80))
            .build();
        engine.diff(&snap);

        // A newly remembered type changes the field's shape; that shape
        // change is itself a delta, then settles.
        engine.type_map().remember("batteryLevel", ColumnType::Int);
        let delta = engine.diff(&snap);
        assert_eq!(delta.get("batteryLevel"), Some(&Scalar::Int(80)));

        let settled = engine.diff(&snap);
        assert!(!settled.contains_key("batteryLevel"));
    }
}
