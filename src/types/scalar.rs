// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The scalar output type of normalization.
//!
//! A normalized record maps field names to [`Scalar`]s and nothing else:
//! structures cannot appear, which is what lets the differ skip any runtime
//! nested-value guard. Classification only ever produces `Float`, `Bool`,
//! and `Text`; the `Int` variant exists so a column-type memory entry can
//! pin a field to a downstream integer column.

use serde::{Serialize, Serializer};

/// A single normalized field value.
///
/// # Examples
///
/// ```
/// use deltacast::types::Scalar;
///
/// let v = Scalar::Float(21.5);
/// assert_eq!(v.as_f64(), Some(21.5));
/// assert_eq!(v.to_string(), "21.5");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// A signed integer, produced only by column-type coercion.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A boolean flag.
    Bool(bool),
    /// Free-form text.
    Text(String),
}

impl Scalar {
    /// Creates a text scalar.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Returns the numeric value, widening integers.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Bool(_) | Self::Text(_) => None,
        }
    }

    /// Returns the text content, if this is a text scalar.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` if this scalar is already text.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Returns `true` for a float that JSON cannot represent.
    #[must_use]
    pub fn is_non_finite(&self) -> bool {
        matches!(self, Self::Float(f) if !f.is_finite())
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_f64_widens_int() {
        assert_eq!(Scalar::Int(7).as_f64(), Some(7.0));
        assert_eq!(Scalar::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(Scalar::Bool(true).as_f64(), None);
        assert_eq!(Scalar::text("7").as_f64(), None);
    }

    #[test]
    fn display_forms() {
        assert_eq!(Scalar::Int(42).to_string(), "42");
        assert_eq!(Scalar::Float(21.5).to_string(), "21.5");
        assert_eq!(Scalar::Bool(false).to_string(), "false");
        assert_eq!(Scalar::text("on").to_string(), "on");
    }

    #[test]
    fn serializes_as_bare_json_values() {
        assert_eq!(serde_json::to_string(&Scalar::Int(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&Scalar::Float(1.5)).unwrap(), "1.5");
        assert_eq!(serde_json::to_string(&Scalar::Bool(true)).unwrap(), "true");
        assert_eq!(
            serde_json::to_string(&Scalar::text("ok")).unwrap(),
            "\"ok\""
        );
    }

    #[test]
    fn non_finite_detection() {
        assert!(Scalar::Float(f64::NAN).is_non_finite());
        assert!(Scalar::Float(f64::INFINITY).is_non_finite());
        assert!(!Scalar::Float(0.0).is_non_finite());
        assert!(!Scalar::Int(0).is_non_finite());
    }
}
