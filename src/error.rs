// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `deltacast` library.
//!
//! This module provides the error hierarchy for the serialization and
//! transport boundaries. The normalization and diffing core never fails
//! observably: per-field coercion misses degrade to "field omitted" or
//! "field left as-is" and are modeled as [`CoerceError`] values that are
//! consumed internally, not raised.

use thiserror::Error;

/// The main error type for this library.
///
/// Only the outer layers produce these: encoding a record for the wire and
/// sending it over the network. A diff computation itself cannot fail.
#[derive(Debug, Error)]
pub enum Error {
    /// A record value could not be expressed in the wire format.
    #[error("serialize error: {0}")]
    Serialize(#[from] SerializeError),

    /// Sending a payload over the transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Errors raised at the serialization boundary.
///
/// The normalized record holds only scalars, so the single value JSON cannot
/// represent is a non-finite float. The error names the offending field so
/// the operator can pin a column type for it.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// A field holds a NaN or infinite float, which JSON cannot carry.
    #[error("field '{field}' holds non-finite value {value}")]
    NonFiniteValue {
        /// The record key whose value was rejected.
        field: String,
        /// The rejected float value.
        value: f64,
    },

    /// JSON encoding failed.
    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the transport layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Socket creation or configuration failed.
    #[error("socket setup failed: {0}")]
    Setup(std::io::Error),

    /// Sending a datagram failed.
    #[error("send failed: {0}")]
    Send(std::io::Error),

    /// The destination address could not be parsed.
    #[error("invalid destination address: {0}")]
    InvalidAddress(String),
}

/// A failed column-type coercion attempt.
///
/// These are consumed inside the normalizer (the field keeps its
/// pre-coercion value) and are exposed only so callers driving
/// [`coerce`](crate::schema::coerce) directly can report the miss.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoerceError {
    /// The value does not parse as the requested numeric type.
    #[error("'{value}' does not parse as {target}")]
    NotNumeric {
        /// Display form of the value that failed to convert.
        value: String,
        /// Name of the requested target type.
        target: &'static str,
    },

    /// A float with a fractional part cannot become an integer.
    #[error("{value} has a fractional part")]
    FractionalInt {
        /// Display form of the rejected float.
        value: String,
    },

    /// The value is not a recognized boolean literal.
    #[error("'{value}' is not a boolean literal")]
    NotBoolean {
        /// Display form of the rejected value.
        value: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
