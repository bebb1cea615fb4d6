// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value classification.
//!
//! [`classify`] is the pure function at the bottom of normalization: it maps
//! one loosely-typed [`Value`] to the scalar that should land in the record,
//! or to nothing at all. It runs in two modes: the primary pass keeps the
//! value in its most natural scalar type, while the `make_numbers` pass asks
//! whether a numeric shadow variant exists.
//!
//! Every conversion miss degrades to `None`; nothing in here can fail.

use chrono::{NaiveDateTime, TimeZone};

use crate::types::{Scalar, Value};

/// Classifies a snapshot value into a record scalar.
///
/// With `make_numbers` false (the primary pass):
///
/// - booleans pass through unchanged
/// - integers widen to float, so every number downstream has one width
/// - timestamps become epoch seconds via local calendar time
/// - enum values become their string label
/// - text passes through, except the literal null markers `"null"`/`"None"`
///
/// With `make_numbers` true (the shadow pass), only numeric *text* produces
/// a value: anything already numeric (float, integer, boolean, timestamp)
/// yields `None` so an already-numeric primary is never duplicated.
///
/// Nulls, lists, and mappings never classify in either mode.
///
/// # Examples
///
/// ```
/// use deltacast::normalize::classify;
/// use deltacast::types::{Scalar, Value};
///
/// assert_eq!(classify(&Value::Integer(75), false), Some(Scalar::Float(75.0)));
/// assert_eq!(classify(&Value::Integer(75), true), None);
/// assert_eq!(classify(&Value::text("21.5"), true), Some(Scalar::Float(21.5)));
/// assert_eq!(classify(&Value::text("dry"), true), None);
/// ```
#[must_use]
pub fn classify(value: &Value, make_numbers: bool) -> Option<Scalar> {
    if value.is_null() || value.is_structured() {
        return None;
    }
    if let Value::Text(s) = value
        && (s == "null" || s == "None")
    {
        return None;
    }

    if make_numbers {
        return match value {
            Value::Text(s) => s.trim().parse::<f64>().ok().map(Scalar::Float),
            // Already numeric or without a numeric variant.
            _ => None,
        };
    }

    match value {
        Value::Bool(b) => Some(Scalar::Bool(*b)),
        #[allow(clippy::cast_precision_loss)]
        Value::Integer(i) => Some(Scalar::Float(*i as f64)),
        Value::Float(f) => Some(Scalar::Float(*f)),
        Value::Timestamp(ts) => Some(Scalar::Float(epoch_seconds(ts))),
        Value::Enum(ev) => Some(Scalar::text(ev.label())),
        Value::Text(s) => Some(Scalar::text(s.clone())),
        Value::Null | Value::List(_) | Value::Map(_) => None,
    }
}

/// Converts a naive calendar timestamp to epoch seconds.
///
/// Hosts report wall-clock time, so the conversion goes through the local
/// timezone rather than UTC. An ambiguous instant (DST fold) resolves to the
/// earlier mapping; a nonexistent one (DST gap) falls back to the UTC
/// reading. Conversion never fails.
#[allow(clippy::cast_precision_loss)]
fn epoch_seconds(ts: &NaiveDateTime) -> f64 {
    chrono::Local
        .from_local_datetime(ts)
        .earliest()
        .map_or_else(|| ts.and_utc().timestamp(), |dt| dt.timestamp()) as f64
}
