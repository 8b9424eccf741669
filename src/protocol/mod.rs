// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remote control transports for Samsung TVs.
//!
//! Samsung TVs speak one of two remote protocols:
//!
//! - [`LegacyConnector`]: binary TCP protocol on port 55000 (TVs up to 2015)
//! - [`WebSocketConnector`]: JSON over WebSocket on port 8001, or TLS on 8002
//!
//! Both are exposed through the [`Connector`] / [`Remote`] pair: a connector
//! holds the configuration and opens connections, a remote is one open
//! connection that sends keys until it is closed. [`SamsungConnector`] picks
//! the transport from a [`Method`] at runtime.

mod config;
#[cfg(feature = "legacy")]
mod legacy;
#[cfg(feature = "websocket")]
mod websocket;

pub use config::{Method, RemoteConfig};
#[cfg(feature = "legacy")]
pub use legacy::{LegacyConnector, LegacyRemote};
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnector, WebSocketRemote};

use std::future::Future;
use std::time::Duration;

use crate::error::ProtocolError;
use crate::types::Key;

/// An open remote control connection.
pub trait Remote: Send {
    /// Sends a single key press.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the key could not be delivered or the TV
    /// answered with an error.
    fn control(&mut self, key: &Key) -> impl Future<Output = Result<(), ProtocolError>> + Send;

    /// Closes the connection.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the connection could not be shut down cleanly.
    fn close(&mut self) -> impl Future<Output = Result<(), ProtocolError>> + Send;
}

/// Opens remote control connections to one TV.
pub trait Connector: Send + Sync {
    /// The connection type produced by this connector.
    type Remote: Remote;

    /// Opens a connection and completes the protocol handshake.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::AccessDenied` if the TV refuses this remote,
    /// `ProtocolError::UnhandledResponse` if it answers unexpectedly, or a
    /// transport error if it cannot be reached.
    fn connect(&self) -> impl Future<Output = Result<Self::Remote, ProtocolError>> + Send;

    /// Returns the protocol used by this connector.
    fn method(&self) -> Method;
}

/// Connector that dispatches to the transport selected by [`Method`].
#[derive(Debug)]
pub enum SamsungConnector {
    /// Legacy TCP transport.
    #[cfg(feature = "legacy")]
    Legacy(LegacyConnector),
    /// WebSocket transport.
    #[cfg(feature = "websocket")]
    WebSocket(WebSocketConnector),
}

impl SamsungConnector {
    /// Creates a connector for `method`.
    ///
    /// If the configuration has no port, the method's default port is used.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::MethodDisabled` if the transport was not compiled in.
    pub fn new(method: Method, config: RemoteConfig) -> Result<Self, ProtocolError> {
        let config = if config.port().is_some() {
            config
        } else {
            config.with_port(method.default_port())
        };

        match method {
            #[cfg(feature = "legacy")]
            Method::Legacy => Ok(Self::Legacy(LegacyConnector::new(config))),
            #[cfg(feature = "websocket")]
            Method::WebSocket => Ok(Self::WebSocket(WebSocketConnector::new(config))),
            #[allow(unreachable_patterns)]
            other => Err(ProtocolError::MethodDisabled(other.as_str())),
        }
    }
}

/// Connection opened by a [`SamsungConnector`].
#[derive(Debug)]
pub enum SamsungRemote {
    /// Legacy TCP connection.
    #[cfg(feature = "legacy")]
    Legacy(LegacyRemote),
    /// WebSocket connection.
    #[cfg(feature = "websocket")]
    WebSocket(WebSocketRemote),
}

impl Remote for SamsungRemote {
    async fn control(&mut self, key: &Key) -> Result<(), ProtocolError> {
        match self {
            #[cfg(feature = "legacy")]
            Self::Legacy(remote) => remote.control(key).await,
            #[cfg(feature = "websocket")]
            Self::WebSocket(remote) => remote.control(key).await,
        }
    }

    async fn close(&mut self) -> Result<(), ProtocolError> {
        match self {
            #[cfg(feature = "legacy")]
            Self::Legacy(remote) => remote.close().await,
            #[cfg(feature = "websocket")]
            Self::WebSocket(remote) => remote.close().await,
        }
    }
}

impl Connector for SamsungConnector {
    type Remote = SamsungRemote;

    async fn connect(&self) -> Result<SamsungRemote, ProtocolError> {
        match self {
            #[cfg(feature = "legacy")]
            Self::Legacy(connector) => connector.connect().await.map(SamsungRemote::Legacy),
            #[cfg(feature = "websocket")]
            Self::WebSocket(connector) => connector.connect().await.map(SamsungRemote::WebSocket),
        }
    }

    fn method(&self) -> Method {
        match self {
            #[cfg(feature = "legacy")]
            Self::Legacy(_) => Method::Legacy,
            #[cfg(feature = "websocket")]
            Self::WebSocket(_) => Method::WebSocket,
        }
    }
}

/// Runs `fut` with a deadline, mapping expiry to `ProtocolError::Timeout`.
pub(crate) async fn with_timeout<T, F>(duration: Duration, fut: F) -> Result<T, ProtocolError>
where
    F: Future<Output = Result<T, ProtocolError>>,
{
    tokio::time::timeout(duration, fut).await.map_err(|_| {
        ProtocolError::Timeout(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    })?
}
