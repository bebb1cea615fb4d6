// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapshot normalization.
//!
//! The [`Normalizer`] turns one entity snapshot into a flat [`Record`]:
//! every non-structured attribute in its most natural scalar type, a
//! `<name>.num` shadow where a numeric variant exists, `state.<key>` entries
//! for the states sub-mapping, a measurement classification, and a final
//! coercion pass against the column-type memory. It holds no history; given
//! the same snapshot and type map it produces the same record every time.

use std::sync::Arc;

use super::classify::classify;
use crate::entity::FieldSource;
use crate::record::{KEY_MEASUREMENT, KEY_NAME, Record};
use crate::schema::{TypeMap, coerce};
use crate::types::{Measurement, Scalar};

/// Field names that must always stay string-typed in the record.
///
/// These carry display artifacts whose observed runtime type flips between
/// updates (a display value can be `50.0` one update and `"50.0 °F"` the
/// next). Pinning them to text keeps the downstream column stable; they
/// never receive a `.num` shadow.
pub const STRING_ONLY_FIELDS: [&str; 4] = [
    "displayStateValRaw",
    "displayStateValUi",
    "displayStateImageSel",
    "protocol",
];

/// Nested-structure attribute names excluded from the top-level walk.
///
/// `states` is special: its sub-fields are re-emitted individually under the
/// `state.` prefix.
pub const NESTED_FIELDS: [&str; 4] = ["states", "globalProps", "pluginProps", "ownerProps"];

/// The state key whose presence classifies a record as a thermostat update.
const HEAT_SETPOINT_STATE: &str = "setpointHeat";

/// The model label identifying a weather station.
const WEATHER_STATION_MODEL: &str = "Weather Station";

/// Converts entity snapshots to flat records.
///
/// # Examples
///
/// ```
/// use deltacast::entity::Snapshot;
/// use deltacast::normalize::Normalizer;
/// use deltacast::types::{Scalar, Value};
///
/// let normalizer = Normalizer::new();
/// let snap = Snapshot::device("Porch Light", 42)
///     .with_field("brightness", Value::Integer(75))
///     .build();
///
/// let record = normalizer.normalize(&snap);
/// assert_eq!(record.get("brightness"), Some(&Scalar::Float(75.0)));
/// assert_eq!(record.get("id"), Some(&Scalar::Float(42.0)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    type_map: Arc<TypeMap>,
    debug: bool,
}

impl Normalizer {
    /// Creates a normalizer with an empty column-type memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a shared column-type memory.
    #[must_use]
    pub fn with_type_map(mut self, type_map: Arc<TypeMap>) -> Self {
        self.type_map = type_map;
        self
    }

    /// Enables verbose logging of coercion misses.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Returns a handle to the column-type memory.
    #[must_use]
    pub fn type_map(&self) -> Arc<TypeMap> {
        Arc::clone(&self.type_map)
    }

    /// Normalizes one entity snapshot into a flat record.
    ///
    /// Pure given the snapshot and the current column-type memory: no
    /// history, no side effects beyond optional debug logging.
    pub fn normalize(&self, entity: &impl FieldSource) -> Record {
        let mut record = Record::new();
        record.insert(KEY_NAME, Scalar::text(entity.name()));

        // Top-level walk: primary value, then the numeric shadow unless the
        // field is pinned to text. First writer wins on duplicate keys.
        for (key, value) in entity.fields() {
            if record.contains_key(key) || NESTED_FIELDS.contains(&key) {
                continue;
            }
            if let Some(primary) = classify(value, false) {
                record.insert(key, primary);
            }
            if is_string_only(key) {
                continue;
            }
            if let Some(shadow) = classify(value, true) {
                record.insert(format!("{key}.num"), shadow);
            }
        }

        // Pin string-only fields to text regardless of observed type.
        for key in STRING_ONLY_FIELDS {
            if let Some(current) = record.get(key)
                && !current.is_text()
            {
                let forced = Scalar::text(current.to_string());
                record.insert(key, forced);
            }
        }

        // The states sub-mapping gets the same two-pass treatment under the
        // state. prefix; shadow suppression keys on the bare sub-key name.
        for (state, value) in entity.states() {
            if let Some(primary) = classify(value, false) {
                record.insert(format!("state.{state}"), primary);
            }
            if is_string_only(state) {
                continue;
            }
            if let Some(shadow) = classify(value, true) {
                record.insert(format!("state.{state}.num"), shadow);
            }
        }

        record.insert(KEY_MEASUREMENT, Scalar::text(classify_measurement(entity).as_str()));

        // Honor previous downstream complaints about column types. A miss
        // leaves the field in its pre-coercion form.
        for (field, target) in self.type_map.snapshot() {
            let Some(current) = record.get(&field).cloned() else {
                continue;
            };
            match coerce(&current, target) {
                Ok(coerced) => record.insert(field, coerced),
                Err(err) => {
                    if self.debug {
                        tracing::debug!(
                            entity = %entity.name(),
                            field = %field,
                            target = %target,
                            error = %err,
                            "column will not convert to the requested type, leaving as-is"
                        );
                    }
                }
            }
        }

        record
    }
}

/// Returns `true` for fields pinned to text.
fn is_string_only(key: &str) -> bool {
    STRING_ONLY_FIELDS.contains(&key)
}

/// Classifies which measurement a device record belongs to.
///
/// A heat-setpoint state takes precedence over the weather-station model.
fn classify_measurement(entity: &impl FieldSource) -> Measurement {
    if entity.states().contains_key(HEAT_SETPOINT_STATE) {
        Measurement::ThermostatChanges
    } else if entity.model() == WEATHER_STATION_MODEL {
        Measurement::WeatherChanges
    } else {
        Measurement::DeviceChanges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Snapshot;
    use crate::schema::ColumnType;
    use crate::types::{EnumValue, Value};
    use std::collections::BTreeMap;

    fn plain_device() -> Snapshot {
        Snapshot::device("Porch Light", 162)
            .with_model("Dimmer Switch")
            .with_field("brightness", Value::Integer(75))
            .with_field("onState", Value::Bool(true))
            .build()
    }

    #[test]
    fn normalize_is_idempotent() {
        let normalizer = Normalizer::new();
        let snap = plain_device();

        let first = normalizer.normalize(&snap);
        let second = normalizer.normalize(&snap);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn seeds_name_and_widens_id() {
        let record = Normalizer::new().normalize(&plain_device());

        assert_eq!(record.get("name"), Some(&Scalar::text("Porch Light")));
        assert_eq!(record.get("id"), Some(&Scalar::Float(162.0)));
    }

    #[test]
    fn numeric_string_field_gets_shadow() {
        let snap = Snapshot::device("Sensor", 1)
            .with_field("sensorValue", Value::text("42"))
            .build();

        let record = Normalizer::new().normalize(&snap);

        assert_eq!(record.get("sensorValue"), Some(&Scalar::text("42")));
        assert_eq!(record.get("sensorValue.num"), Some(&Scalar::Float(42.0)));
    }

    #[test]
    fn integer_field_gets_no_shadow() {
        let record = Normalizer::new().normalize(&plain_device());

        assert_eq!(record.get("brightness"), Some(&Scalar::Float(75.0)));
        assert!(!record.contains_key("brightness.num"));
    }

    #[test]
    fn boolean_field_stays_boolean_without_shadow() {
        let record = Normalizer::new().normalize(&plain_device());

        assert_eq!(record.get("onState"), Some(&Scalar::Bool(true)));
        assert!(!record.contains_key("onState.num"));
    }

    #[test]
    fn string_only_fields_forced_to_text_and_denied_shadow() {
        let snap = Snapshot::device("Thermometer", 3)
            .with_field("displayStateValRaw", Value::Float(50.0))
            .with_field("displayStateValUi", Value::text("50.0 °F"))
            .with_field("protocol", Value::enumerated("kProtocol", "Insteon"))
            .build();

        let record = Normalizer::new().normalize(&snap);

        assert_eq!(record.get("displayStateValRaw"), Some(&Scalar::text("50")));
        assert_eq!(record.get("displayStateValUi"), Some(&Scalar::text("50.0 °F")));
        assert_eq!(record.get("protocol"), Some(&Scalar::text("Insteon")));
        for key in STRING_ONLY_FIELDS {
            assert!(!record.contains_key(&format!("{key}.num")), "{key}.num leaked");
        }
    }

    #[test]
    fn nested_fields_are_excluded() {
        let mut props = BTreeMap::new();
        props.insert("address".to_string(), Value::text("12.AB.3C"));

        let snap = Snapshot::device("Keypad", 4)
            .with_field("pluginProps", Value::Map(props.clone()))
            .with_field("globalProps", Value::Map(props.clone()))
            .with_field("ownerProps", Value::Map(props))
            .with_state("brightness", Value::Integer(30))
            .build();

        let record = Normalizer::new().normalize(&snap);

        for key in NESTED_FIELDS {
            assert!(!record.contains_key(key), "{key} leaked to top level");
        }
        assert_eq!(record.get("state.brightness"), Some(&Scalar::Float(30.0)));
    }

    #[test]
    fn states_walk_uses_prefix_and_shadow_rules() {
        let snap = Snapshot::device("Multi Sensor", 5)
            .with_state("temperature", Value::text("21.5"))
            .with_state("motion", Value::Bool(false))
            .build();

        let record = Normalizer::new().normalize(&snap);

        assert_eq!(record.get("state.temperature"), Some(&Scalar::text("21.5")));
        assert_eq!(record.get("state.temperature.num"), Some(&Scalar::Float(21.5)));
        assert_eq!(record.get("state.motion"), Some(&Scalar::Bool(false)));
        assert!(!record.contains_key("state.motion.num"));
    }

    #[test]
    fn string_only_state_gets_no_shadow() {
        let snap = Snapshot::device("Display", 6)
            .with_state("displayStateValRaw", Value::text("72"))
            .build();

        let record = Normalizer::new().normalize(&snap);

        assert_eq!(record.get("state.displayStateValRaw"), Some(&Scalar::text("72")));
        assert!(!record.contains_key("state.displayStateValRaw.num"));
    }

    #[test]
    fn reserved_enum_value_is_stringified() {
        let snap = Snapshot::device("Relay", 7)
            .with_field("deviceType", Value::Enum(EnumValue::new("kDeviceType", "Relay")))
            .build();

        let record = Normalizer::new().normalize(&snap);

        assert_eq!(record.get("deviceType"), Some(&Scalar::text("Relay")));
        assert!(!record.contains_key("deviceType.num"));
    }

    #[test]
    fn measurement_thermostat_beats_weather_model() {
        let snap = Snapshot::device("Odd Thermostat", 8)
            .with_model("Weather Station")
            .with_state("setpointHeat", Value::Float(20.0))
            .build();

        let record = Normalizer::new().normalize(&snap);
        assert_eq!(record.measurement(), Some(Measurement::ThermostatChanges));
    }

    #[test]
    fn measurement_weather_station_model() {
        let snap = Snapshot::device("Backyard", 9)
            .with_model("Weather Station")
            .with_state("windSpeed", Value::Float(12.0))
            .build();

        let record = Normalizer::new().normalize(&snap);
        assert_eq!(record.measurement(), Some(Measurement::WeatherChanges));
    }

    #[test]
    fn measurement_defaults_to_device_changes() {
        let record = Normalizer::new().normalize(&plain_device());
        assert_eq!(record.measurement(), Some(Measurement::DeviceChanges));
    }

    #[test]
    fn type_memory_coerces_established_columns() {
        let type_map = Arc::new(TypeMap::new());
        type_map.remember("batteryLevel", ColumnType::Int);

        let normalizer = Normalizer::new().with_type_map(Arc::clone(&type_map));
        let snap = Snapshot::device("Lock", 10)
            .with_field("batteryLevel", Value::Integer(80))
            .build();

        let record = normalizer.normalize(&snap);
        assert_eq!(record.get("batteryLevel"), Some(&Scalar::Int(80)));
    }

    #[test]
    fn type_memory_miss_leaves_field_as_is() {
        let type_map = Arc::new(TypeMap::new());
        type_map.remember("status", ColumnType::Int);

        let normalizer = Normalizer::new()
            .with_type_map(Arc::clone(&type_map))
            .with_debug(true);
        let snap = Snapshot::device("Garage Door", 11)
            .with_field("status", Value::text("opening"))
            .build();

        let record = normalizer.normalize(&snap);
        assert_eq!(record.get("status"), Some(&Scalar::text("opening")));
    }

    #[test]
    fn null_marker_fields_are_omitted() {
        let snap = Snapshot::device("Ghost", 12)
            .with_field("lastComm", Value::text("null"))
            .with_field("note", Value::Null)
            .build();

        let record = Normalizer::new().normalize(&snap);
        assert!(!record.contains_key("lastComm"));
        assert!(!record.contains_key("note"));
    }
}
