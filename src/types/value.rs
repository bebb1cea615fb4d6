// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The loosely-typed value model for host entity attributes.
//!
//! Host inventory systems expose entity attributes whose runtime type can
//! change between updates: a state that is a float in one update may arrive
//! as a string-like enum in the next. [`Value`] models that ambiguity as a
//! closed tagged variant so the classification rules in
//! [`normalize`](crate::normalize) can be written as a pure match instead of
//! ad-hoc type inspection.
//!
//! # Examples
//!
//! ```
//! use deltacast::types::Value;
//!
//! let brightness = Value::from(75);
//! let label = Value::enumerated("kDeviceStateType", "On");
//!
//! assert!(!brightness.is_structured());
//! assert!(label.as_enum().is_some());
//! ```

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

/// Prefix marking a host-internal enumeration type.
///
/// Values whose runtime type name carries this prefix are always stringified
/// when classified, never forwarded as opaque objects.
pub const RESERVED_ENUM_PREFIX: &str = "k";

/// A labeled value from a host-side enumeration.
///
/// Carries the host's runtime type name alongside the label so reserved
/// internal enums can be told apart from ordinary ones.
///
/// # Examples
///
/// ```
/// use deltacast::types::EnumValue;
///
/// let ev = EnumValue::new("kDeviceStateType", "On");
/// assert!(ev.is_reserved());
/// assert_eq!(ev.label(), "On");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EnumValue {
    type_name: String,
    label: String,
}

impl EnumValue {
    /// Creates an enum value with the given runtime type name and label.
    #[must_use]
    pub fn new(type_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            label: label.into(),
        }
    }

    /// Returns the host runtime type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns `true` if the type name carries the reserved internal prefix.
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        self.type_name.starts_with(RESERVED_ENUM_PREFIX)
    }
}

impl std::fmt::Display for EnumValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// A snapshot attribute value as delivered by the host.
///
/// The variants cover every shape an entity attribute can take: plain
/// scalars, timestamps, labeled enum values, and nested structures. The
/// structured variants (`List`, `Map`) exist so the normalizer can recognize
/// and exclude them; they are never scalarized.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    /// Explicit absence of a value.
    Null,

    /// A boolean flag.
    Bool(bool),

    /// A signed integer.
    Integer(i64),

    /// A floating-point number.
    Float(f64),

    /// Free-form text.
    Text(String),

    /// A calendar timestamp without timezone, as hosts report them.
    Timestamp(NaiveDateTime),

    /// A labeled value from a host-side enumeration.
    Enum(EnumValue),

    /// A nested list. Never flattened into a record.
    List(Vec<Value>),

    /// A nested mapping. Never flattened into a record.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Creates a text value.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Creates an enum value with the given runtime type name and label.
    #[must_use]
    pub fn enumerated(type_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Enum(EnumValue::new(type_name, label))
    }

    /// Returns `true` for the structured variants that never scalarize.
    #[must_use]
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::List(_) | Self::Map(_))
    }

    /// Returns `true` for `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the enum payload, if this is an enum value.
    #[must_use]
    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Self::Enum(ev) => Some(ev),
            _ => None,
        }
    }

    /// Returns the nested map, if this is a map value.
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::Timestamp(v)
    }
}

impl From<EnumValue> for Value {
    fn from(v: EnumValue) -> Self {
        Self::Enum(v)
    }
}
