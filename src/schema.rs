// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Column-type memory.
//!
//! Downstream time-series stores establish a column type the first time a
//! field is written; later records whose field arrives in a different shape
//! get rejected. The [`TypeMap`] is the relay's memory of those complaints:
//! a shared side table from field name to the [`ColumnType`] the store
//! expects. The normalizer applies it as a final coercion pass, silently
//! leaving a field in its pre-coercion form when the conversion misses.
//!
//! # Examples
//!
//! ```
//! use deltacast::schema::{ColumnType, TypeMap, coerce};
//! use deltacast::types::Scalar;
//!
//! let types = TypeMap::new();
//! types.remember("batteryLevel", ColumnType::Int);
//!
//! assert_eq!(
//!     coerce(&Scalar::Float(80.0), ColumnType::Int),
//!     Ok(Scalar::Int(80))
//! );
//! // A miss is an ordinary value, not a panic.
//! assert!(coerce(&Scalar::text("unknown"), ColumnType::Int).is_err());
//! ```

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::error::CoerceError;
use crate::types::Scalar;

/// A scalar type a downstream column has been established as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// Signed integer column.
    Int,
    /// Floating-point column.
    Float,
    /// Boolean column.
    Bool,
    /// Text column.
    Text,
}

impl ColumnType {
    /// Returns the lowercase type name used in log messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Text => "text",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attempts to coerce a scalar to the remembered column type.
///
/// The rules are a closed match, not a stringify-and-reparse round trip:
///
/// - `Int`: floats with a zero fractional part truncate; text parses as a
///   signed integer; booleans miss.
/// - `Float`: integers widen; text parses; booleans miss.
/// - `Bool`: only the text literals `"true"`/`"false"` (ASCII
///   case-insensitive) convert; numbers miss.
/// - `Text`: the display form, which always succeeds.
///
/// A value already of the requested type is returned unchanged.
///
/// # Errors
///
/// Returns a [`CoerceError`] describing the miss; callers inside the
/// normalizer consume it and keep the pre-coercion value.
pub fn coerce(value: &Scalar, target: ColumnType) -> Result<Scalar, CoerceError> {
    match (value, target) {
        (Scalar::Int(i), ColumnType::Int) => Ok(Scalar::Int(*i)),
        (Scalar::Float(f), ColumnType::Int) => {
            if f.fract() == 0.0 && f.is_finite() {
                #[allow(clippy::cast_possible_truncation)]
                Ok(Scalar::Int(*f as i64))
            } else {
                Err(CoerceError::FractionalInt {
                    value: f.to_string(),
                })
            }
        }
        (Scalar::Text(s), ColumnType::Int) => {
            s.trim()
                .parse::<i64>()
                .map(Scalar::Int)
                .map_err(|_| CoerceError::NotNumeric {
                    value: s.clone(),
                    target: ColumnType::Int.as_str(),
                })
        }
        (Scalar::Bool(b), ColumnType::Int | ColumnType::Float) => Err(CoerceError::NotNumeric {
            value: b.to_string(),
            target: target.as_str(),
        }),

        (Scalar::Float(f), ColumnType::Float) => Ok(Scalar::Float(*f)),
        #[allow(clippy::cast_precision_loss)]
        (Scalar::Int(i), ColumnType::Float) => Ok(Scalar::Float(*i as f64)),
        (Scalar::Text(s), ColumnType::Float) => {
            s.trim()
                .parse::<f64>()
                .map(Scalar::Float)
                .map_err(|_| CoerceError::NotNumeric {
                    value: s.clone(),
                    target: ColumnType::Float.as_str(),
                })
        }

        (Scalar::Bool(b), ColumnType::Bool) => Ok(Scalar::Bool(*b)),
        (Scalar::Text(s), ColumnType::Bool) => {
            if s.eq_ignore_ascii_case("true") {
                Ok(Scalar::Bool(true))
            } else if s.eq_ignore_ascii_case("false") {
                Ok(Scalar::Bool(false))
            } else {
                Err(CoerceError::NotBoolean { value: s.clone() })
            }
        }
        (Scalar::Int(_) | Scalar::Float(_), ColumnType::Bool) => Err(CoerceError::NotBoolean {
            value: value.to_string(),
        }),

        (_, ColumnType::Text) => Ok(Scalar::Text(value.to_string())),
    }
}

/// Shared field-name → column-type side table.
///
/// The normalizer reads it on every record; external code records new
/// expectations as the downstream store complains. Interior mutability keeps
/// the handle cheap to share across the engine and the host glue.
#[derive(Debug, Default)]
pub struct TypeMap {
    entries: RwLock<BTreeMap<String, ColumnType>>,
}

impl TypeMap {
    /// Creates an empty type map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the column type expected for a field.
    pub fn remember(&self, field: impl Into<String>, ty: ColumnType) {
        self.entries.write().insert(field.into(), ty);
    }

    /// Forgets a remembered field.
    pub fn forget(&self, field: &str) -> bool {
        self.entries.write().remove(field).is_some()
    }

    /// Returns the remembered type for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<ColumnType> {
        self.entries.read().get(field).copied()
    }

    /// Returns a point-in-time copy of all entries.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, ColumnType> {
        self.entries.read().clone()
    }

    /// Returns the number of remembered fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if no field types are remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
