// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for snapshot normalization.
//!
//! This module provides the two halves of the type model:
//!
//! - [`Value`] - the loosely-typed input variant for host entity attributes,
//!   including timestamps, enum labels, and nested structures
//! - [`Scalar`] - the flat output type a normalized record may hold
//!
//! plus [`Measurement`], the classification label attached to every record.

mod measurement;
mod scalar;
mod value;

pub use measurement::Measurement;
pub use scalar::Scalar;
pub use value::{EnumValue, RESERVED_ENUM_PREFIX, Value};
