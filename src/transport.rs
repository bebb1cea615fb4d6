// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Datagram transport.
//!
//! The relay needs exactly one capability from its transport: send a
//! payload. [`Sink`] is that seam; [`UdpSink`] is the bundled
//! implementation, a UDP socket with a fixed destination. Delivery is
//! fire-and-forget: multicast UDP offers no acknowledgment and the relay
//! wants none.

use std::net::{Ipv4Addr, SocketAddr};

use tokio::net::UdpSocket;

use crate::config::RelayConfig;
use crate::error::TransportError;

/// Capability to send one payload toward downstream collectors.
#[allow(async_fn_in_trait)]
pub trait Sink {
    /// Sends a payload, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the underlying send fails.
    async fn send(&self, payload: &[u8]) -> Result<usize, TransportError>;
}

/// A UDP sender with a fixed destination address.
///
/// # Examples
///
/// ```no_run
/// use deltacast::config::RelayConfig;
/// use deltacast::transport::{Sink, UdpSink};
///
/// # async fn example() -> Result<(), deltacast::error::TransportError> {
/// let sink = UdpSink::from_config(&RelayConfig::new()).await?;
/// sink.send(b"[]").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct UdpSink {
    socket: UdpSocket,
    dest: SocketAddr,
}

impl UdpSink {
    /// Creates a sink targeting a multicast group.
    ///
    /// Binds an ephemeral IPv4 socket and sets the multicast TTL.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Setup`] when binding or socket
    /// configuration fails.
    pub async fn multicast(group: Ipv4Addr, port: u16, ttl: u32) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
            .await
            .map_err(TransportError::Setup)?;
        socket
            .set_multicast_ttl_v4(ttl)
            .map_err(TransportError::Setup)?;

        let dest = SocketAddr::from((group, port));
        tracing::debug!(%dest, ttl, "multicast sink ready");
        Ok(Self { socket, dest })
    }

    /// Creates a sink targeting a single address.
    ///
    /// Useful for tests and for point-to-point collectors.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Setup`] when binding fails.
    pub async fn unicast(dest: SocketAddr) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
            .await
            .map_err(TransportError::Setup)?;
        Ok(Self { socket, dest })
    }

    /// Creates a multicast sink from relay preferences.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Setup`] when binding or socket
    /// configuration fails.
    pub async fn from_config(config: &RelayConfig) -> Result<Self, TransportError> {
        Self::multicast(config.group(), config.port(), config.ttl()).await
    }

    /// Returns the fixed destination address.
    #[must_use]
    pub fn destination(&self) -> SocketAddr {
        self.dest
    }
}

impl Sink for UdpSink {
    async fn send(&self, payload: &[u8]) -> Result<usize, TransportError> {
        self.socket
            .send_to(payload, self.dest)
            .await
            .map_err(TransportError::Send)
    }
}
