// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapshot normalization: loosely-typed entity attributes in, flat
//! type-consistent records out.
//!
//! - [`classify`] - the pure per-value classification function
//! - [`Normalizer`] - the per-snapshot walk applying naming, shadow,
//!   string-only, nested-exclusion, measurement, and column-type rules

mod classify;
mod normalizer;

pub use classify::classify;
pub use normalizer::{NESTED_FIELDS, Normalizer, STRING_ONLY_FIELDS};
