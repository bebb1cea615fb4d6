// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The field-access adapter between host inventory systems and the core.
//!
//! Entities carry an open-ended attribute set that only the host can
//! enumerate. A host implements [`FieldSource`] for its own device/variable
//! objects, or builds the bundled [`Snapshot`] from a change notification
//! and hands that to the engine.
//!
//! # Examples
//!
//! ```
//! use deltacast::entity::{FieldSource, Snapshot};
//! use deltacast::types::Value;
//!
//! let snap = Snapshot::device("Porch Light", 162_240_910)
//!     .with_model("Dimmer Switch")
//!     .with_field("brightness", Value::Integer(75))
//!     .with_state("onOffState", Value::Bool(true))
//!     .build();
//!
//! assert_eq!(snap.id(), 162_240_910);
//! ```

mod snapshot;

pub use snapshot::{Snapshot, SnapshotBuilder};

use std::collections::BTreeMap;

use crate::types::Value;

/// Introspection capability over one entity snapshot.
///
/// The core only ever reads an entity through this trait: identity
/// (`name`/`id`/`model`), the open attribute set, and the `states`
/// sub-mapping. Implementations enumerate externally-visible data fields
/// only; methods and host-internal identity plumbing stay out, exactly as
/// the attribute walk expects.
pub trait FieldSource {
    /// The entity's unique name within the host inventory.
    fn name(&self) -> &str;

    /// The host-assigned numeric identifier.
    fn id(&self) -> i64;

    /// The model/category label (e.g. `"Weather Station"`).
    fn model(&self) -> &str;

    /// Enumerates all attributes as name/value pairs.
    ///
    /// Must include the identity attributes (`name`, `id`, `model`) when the
    /// host exposes them as data fields; the normalizer deduplicates.
    fn fields(&self) -> Vec<(&str, &Value)>;

    /// Returns a single attribute by name.
    ///
    /// The default implementation scans [`fields`](Self::fields);
    /// implementations with keyed storage should override it.
    fn field(&self, name: &str) -> Option<&Value> {
        self.fields()
            .into_iter()
            .find_map(|(k, v)| (k == name).then_some(v))
    }

    /// The named sub-values of the entity's `states` mapping.
    ///
    /// Empty for entities without states (e.g. variables).
    fn states(&self) -> &BTreeMap<String, Value>;
}
