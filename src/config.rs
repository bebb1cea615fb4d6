// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relay configuration.

use std::net::Ipv4Addr;

/// Default multicast group the relay publishes to.
pub const DEFAULT_GROUP: Ipv4Addr = Ipv4Addr::new(224, 1, 1, 1);

/// Default destination port.
pub const DEFAULT_PORT: u16 = 8086;

/// Default multicast TTL (stays within the local network segment).
pub const DEFAULT_TTL: u32 = 2;

/// Preferences for the relay and its transport.
///
/// The debug flag gates verbose full-vs-delta record dumps to the log sink;
/// it changes no other behavior.
///
/// # Examples
///
/// ```
/// use deltacast::config::RelayConfig;
///
/// let config = RelayConfig::new()
///     .with_port(8087)
///     .with_debug(true);
///
/// assert_eq!(config.port(), 8087);
/// assert!(config.debug());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    group: Ipv4Addr,
    port: u16,
    ttl: u32,
    debug: bool,
}

impl RelayConfig {
    /// Creates a configuration with the default group, port, and TTL.
    #[must_use]
    pub fn new() -> Self {
        Self {
            group: DEFAULT_GROUP,
            port: DEFAULT_PORT,
            ttl: DEFAULT_TTL,
            debug: false,
        }
    }

    /// Sets the multicast group.
    #[must_use]
    pub fn with_group(mut self, group: Ipv4Addr) -> Self {
        self.group = group;
        self
    }

    /// Sets the destination port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the multicast TTL.
    #[must_use]
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Enables verbose record dumps.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Returns the multicast group.
    #[must_use]
    pub fn group(&self) -> Ipv4Addr {
        self.group
    }

    /// Returns the destination port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the multicast TTL.
    #[must_use]
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Returns the debug flag.
    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::new()
    }
}
