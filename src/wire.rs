// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The wire envelope.
//!
//! Downstream collectors expect each datagram to carry a JSON array of
//! points, each with a measurement name, a tag set, and the field mapping.
//! This module is the serialization boundary: the one value JSON cannot
//! express (a non-finite float) is rejected here with an error naming the
//! offending field, never inside the diffing core.
//!
//! # Examples
//!
//! ```
//! use deltacast::record::Record;
//! use deltacast::types::{Measurement, Scalar};
//! use deltacast::wire::Point;
//!
//! let mut fields = Record::new();
//! fields.insert("brightness", Scalar::Float(75.0));
//!
//! let point = Point::new(Measurement::DeviceChanges, fields)
//!     .with_tag("name", "Porch Light");
//!
//! let payload = point.encode().unwrap();
//! assert!(payload.starts_with(b"[{"));
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::SerializeError;
use crate::record::Record;
use crate::types::Measurement;

/// One time-series point: measurement, tags, and fields.
#[derive(Debug, Clone, Serialize)]
pub struct Point {
    /// The measurement the point belongs to.
    measurement: Measurement,
    /// Indexed key/value labels (entity name, folder).
    tags: BTreeMap<String, String>,
    /// The flat field mapping.
    fields: Record,
}

impl Point {
    /// Creates a point with an empty tag set.
    #[must_use]
    pub fn new(measurement: Measurement, fields: Record) -> Self {
        Self {
            measurement,
            tags: BTreeMap::new(),
            fields,
        }
    }

    /// Adds a tag.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Returns the measurement.
    #[must_use]
    pub fn measurement(&self) -> Measurement {
        self.measurement
    }

    /// Returns the tag set.
    #[must_use]
    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /// Returns the field mapping.
    #[must_use]
    pub fn fields(&self) -> &Record {
        &self.fields
    }

    /// Encodes the point as a single-element JSON array payload.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::NonFiniteValue`] naming the first field
    /// whose float JSON cannot carry, or [`SerializeError::Json`] if
    /// encoding itself fails.
    pub fn encode(&self) -> Result<Vec<u8>, SerializeError> {
        for (key, value) in self.fields.iter() {
            if value.is_non_finite() {
                return Err(SerializeError::NonFiniteValue {
                    field: key.to_string(),
                    value: value.as_f64().unwrap_or(f64::NAN),
                });
            }
        }
        serde_json::to_vec(&[self]).map_err(SerializeError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Scalar;

    #[test]
    fn encodes_single_element_array() {
        let mut fields = Record::new();
        fields.insert("brightness", Scalar::Float(75.0));

        let point = Point::new(Measurement::DeviceChanges, fields)
            .with_tag("name", "Porch Light")
            .with_tag("folderId", "3");

        let payload = point.encode().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&payload).unwrap();

        assert_eq!(json[0]["measurement"], "device_changes");
        assert_eq!(json[0]["tags"]["name"], "Porch Light");
        assert_eq!(json[0]["tags"]["folderId"], "3");
        assert_eq!(json[0]["fields"]["brightness"], 75.0);
    }

    #[test]
    fn non_finite_field_is_rejected_by_name() {
        let mut fields = Record::new();
        fields.insert("ok", Scalar::Float(1.0));
        fields.insert("state.dewpoint", Scalar::Float(f64::NAN));

        let err = Point::new(Measurement::WeatherChanges, fields)
            .encode()
            .unwrap_err();

        match err {
            SerializeError::NonFiniteValue { field, .. } => {
                assert_eq!(field, "state.dewpoint");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_tags_serialize_as_empty_object() {
        let point = Point::new(Measurement::VariableChanges, Record::new());
        let payload = point.encode().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&payload).unwrap();

        assert!(json[0]["tags"].as_object().unwrap().is_empty());
        assert!(json[0]["fields"].as_object().unwrap().is_empty());
    }
}
