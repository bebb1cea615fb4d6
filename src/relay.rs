// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The relay: host change notifications in, delta datagrams out.
//!
//! [`Relay`] is the thin glue between a host inventory system and the
//! transport. The host calls [`device_updated`](Relay::device_updated) or
//! [`variable_updated`](Relay::variable_updated) from its notification
//! thread; the relay diffs, tags, wraps, and sends. A failed send is
//! reported to the caller and nothing else: the next notification starts
//! fresh.
//!
//! # Examples
//!
//! ```no_run
//! use deltacast::config::RelayConfig;
//! use deltacast::entity::Snapshot;
//! use deltacast::relay::Relay;
//! use deltacast::transport::UdpSink;
//! use deltacast::types::Value;
//!
//! # async fn example() -> deltacast::Result<()> {
//! let config = RelayConfig::new();
//! let sink = UdpSink::from_config(&config).await?;
//! let relay = Relay::new(&config, sink);
//!
//! let snap = Snapshot::device("Porch Light", 42)
//!     .with_field("brightness", Value::Integer(75))
//!     .build();
//! relay.device_updated(&snap).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::diff::DiffEngine;
use crate::entity::FieldSource;
use crate::error::{Error, Result};
use crate::normalize::{Normalizer, classify};
use crate::record::{KEY_MEASUREMENT, KEY_NAME, Record};
use crate::transport::Sink;
use crate::types::{Measurement, Scalar, Value};
use crate::wire::Point;

/// Resolves a host folder id to its display name for tagging.
pub type FolderResolver = Arc<dyn Fn(i64) -> Option<String> + Send + Sync>;

/// Relays entity changes to downstream collectors as tagged delta points.
pub struct Relay<S: Sink> {
    engine: DiffEngine,
    sink: S,
    folder_resolver: Option<FolderResolver>,
    debug: bool,
}

impl<S: Sink> Relay<S> {
    /// Creates a relay around a sink, wiring the debug flag through the
    /// engine and normalizer.
    #[must_use]
    pub fn new(config: &RelayConfig, sink: S) -> Self {
        let normalizer = Normalizer::new().with_debug(config.debug());
        let engine = DiffEngine::with_normalizer(normalizer).with_debug(config.debug());
        Self {
            engine,
            sink,
            folder_resolver: None,
            debug: config.debug(),
        }
    }

    /// Supplies a folder-name resolver backed by the host's folder registry.
    ///
    /// When present, devices in a folder (`folderId != 0`) gain a `folder`
    /// tag with the resolved name.
    #[must_use]
    pub fn with_folder_resolver(
        mut self,
        resolver: impl Fn(i64) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.folder_resolver = Some(Arc::new(resolver));
        self
    }

    /// Returns the diff engine, e.g. to reach the column-type memory.
    #[must_use]
    pub fn engine(&self) -> &DiffEngine {
        &self.engine
    }

    /// Handles one device change notification.
    ///
    /// Diffs the snapshot against the cache, moves the measurement
    /// classification out of the fields into the envelope, tags the point
    /// with the entity name and folder, and sends it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialize`] for an unencodable field value or
    /// [`Error::Transport`] when the send fails. The diff cache is updated
    /// either way.
    pub async fn device_updated(&self, snapshot: &impl FieldSource) -> Result<()> {
        let mut delta = self.engine.diff(snapshot);

        let measurement = delta
            .remove(KEY_MEASUREMENT)
            .as_ref()
            .and_then(Scalar::as_text)
            .and_then(Measurement::parse)
            .unwrap_or_default();

        let mut point =
            Point::new(measurement, delta).with_tag("name", snapshot.name());

        if let Some(folder_id) = folder_id(snapshot) {
            point = point.with_tag("folderId", folder_id.to_string());
            if folder_id != 0
                && let Some(resolver) = &self.folder_resolver
                && let Some(folder) = resolver(folder_id)
            {
                point = point.with_tag("folder", folder);
            }
        }

        self.transmit(&point).await
    }

    /// Handles one variable change notification.
    ///
    /// Variables are sent straight through without diffing: the value under
    /// `value`, a `value.num` shadow when a numeric variant exists, and a
    /// `varname` tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialize`] or [`Error::Transport`] as for
    /// [`device_updated`](Self::device_updated).
    pub async fn variable_updated(&self, name: &str, value: &Value) -> Result<()> {
        let mut fields = Record::new();
        fields.insert(KEY_NAME, Scalar::text(name));
        if let Some(primary) = classify(value, false) {
            fields.insert("value", primary);
        }
        if let Some(shadow) = classify(value, true) {
            fields.insert("value.num", shadow);
        }

        let point =
            Point::new(Measurement::VariableChanges, fields).with_tag("varname", name);
        self.transmit(&point).await
    }

    async fn transmit(&self, point: &Point) -> Result<()> {
        let payload = point.encode().map_err(Error::Serialize)?;
        if self.debug {
            tracing::debug!(
                measurement = %point.measurement(),
                payload = %String::from_utf8_lossy(&payload),
                "sending point"
            );
        }
        self.sink.send(&payload).await.map_err(Error::Transport)?;
        Ok(())
    }
}

/// Extracts the numeric folder id from a snapshot, if it carries one.
fn folder_id(snapshot: &impl FieldSource) -> Option<i64> {
    match snapshot.field("folderId")? {
        Value::Integer(i) => Some(*i),
        #[allow(clippy::cast_possible_truncation)]
        Value::Float(f) => Some(*f as i64),
        _ => None,
    }
}
