// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `deltacast` - A Rust library to relay home-automation state changes as
//! time-series deltas.
//!
//! This library watches an inventory of stateful devices and variables and
//! republishes every observed change over multicast UDP, retransmitting only
//! the fields that actually changed.
//!
//! # How It Works
//!
//! - **Normalization**: each entity snapshot becomes a flat field → scalar
//!   record. Numeric strings gain a `<field>.num` shadow, timestamps become
//!   epoch seconds, enum values become their labels, nested structures are
//!   excluded, and display fields stay pinned to text.
//! - **Diffing**: the engine remembers the last record per entity and emits
//!   only new or changed fields, always including `name`, `id`, and the
//!   `measurement` classification.
//! - **Relaying**: deltas are tagged, wrapped in a JSON point envelope, and
//!   multicast to downstream collectors.
//!
//! # Quick Start
//!
//! ## Diffing snapshots
//!
//! ```
//! use deltacast::diff::DiffEngine;
//! use deltacast::entity::Snapshot;
//! use deltacast::types::Value;
//!
//! let engine = DiffEngine::new();
//!
//! let snap = Snapshot::device("Porch Light", 42)
//!     .with_field("brightness", Value::Integer(75))
//!     .with_state("onOffState", Value::Bool(true))
//!     .build();
//!
//! // First sight: full record. Afterwards: changed fields only.
//! let delta = engine.diff(&snap);
//! assert!(delta.contains_key("state.onOffState"));
//! ```
//!
//! ## Relaying over multicast UDP
//!
//! ```no_run
//! use deltacast::config::RelayConfig;
//! use deltacast::entity::Snapshot;
//! use deltacast::relay::Relay;
//! use deltacast::transport::UdpSink;
//! use deltacast::types::Value;
//!
//! #[tokio::main]
//! async fn main() -> deltacast::Result<()> {
//!     let config = RelayConfig::new().with_port(8086);
//!     let sink = UdpSink::from_config(&config).await?;
//!     let relay = Relay::new(&config, sink);
//!
//!     let snap = Snapshot::device("Thermostat", 77)
//!         .with_state("setpointHeat", Value::Float(20.5))
//!         .build();
//!     relay.device_updated(&snap).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Pinning a downstream column type
//!
//! ```
//! use deltacast::diff::DiffEngine;
//! use deltacast::schema::ColumnType;
//!
//! let engine = DiffEngine::new();
//! // The store established batteryLevel as an integer column; honor it.
//! engine.type_map().remember("batteryLevel", ColumnType::Int);
//! ```

pub mod config;
pub mod diff;
pub mod entity;
pub mod error;
pub mod normalize;
pub mod record;
#[cfg(feature = "transport")]
pub mod relay;
pub mod schema;
#[cfg(feature = "transport")]
pub mod transport;
pub mod types;
pub mod wire;

pub use config::RelayConfig;
pub use diff::DiffEngine;
pub use entity::{FieldSource, Snapshot, SnapshotBuilder};
pub use error::{CoerceError, Error, Result, SerializeError, TransportError};
pub use normalize::Normalizer;
pub use record::Record;
#[cfg(feature = "transport")]
pub use relay::Relay;
pub use schema::{ColumnType, TypeMap};
#[cfg(feature = "transport")]
pub use transport::{Sink, UdpSink};
pub use types::{EnumValue, Measurement, Scalar, Value};
pub use wire::Point;
