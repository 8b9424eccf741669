// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection parameters shared by both transports.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Remote control protocol spoken by a TV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Binary TCP protocol, port 55000.
    Legacy,
    /// JSON over WebSocket, port 8001 (8002 with TLS).
    #[serde(rename = "websocket")]
    WebSocket,
}

impl Method {
    /// Legacy protocol port.
    pub const LEGACY_PORT: u16 = 55000;
    /// Plain WebSocket port.
    pub const WEBSOCKET_PORT: u16 = 8001;
    /// TLS WebSocket port.
    pub const WEBSOCKET_TLS_PORT: u16 = 8002;

    /// Returns the method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::WebSocket => "websocket",
        }
    }

    /// Returns the port a TV listens on for this method.
    #[must_use]
    pub const fn default_port(&self) -> u16 {
        match self {
            Self::Legacy => Self::LEGACY_PORT,
            Self::WebSocket => Self::WEBSOCKET_PORT,
        }
    }

    /// Infers the method from a well-known port.
    #[must_use]
    pub const fn from_port(port: u16) -> Option<Self> {
        match port {
            Self::LEGACY_PORT => Some(Self::Legacy),
            Self::WEBSOCKET_PORT | Self::WEBSOCKET_TLS_PORT => Some(Self::WebSocket),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "websocket" => Ok(Self::WebSocket),
            _ => Err(ValueError::InvalidMethod(s.to_string())),
        }
    }
}

/// Configuration for a remote control connection.
///
/// The TV shows `name` in its "allow this device" prompt, so it should be
/// stable across restarts; changing it triggers a new prompt.
///
/// # Examples
///
/// ```
/// use samsungtv_lib::protocol::RemoteConfig;
/// use std::time::Duration;
///
/// let config = RemoteConfig::new("192.168.1.20")
///     .with_port(8002)
///     .with_name("Living room hub")
///     .with_timeout(Duration::from_secs(2));
///
/// assert_eq!(config.port(), Some(8002));
/// assert!(config.is_tls());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    host: String,
    port: Option<u16>,
    name: String,
    description: String,
    id: String,
    token: Option<String>,
    timeout: Duration,
}

impl RemoteConfig {
    /// Name announced to the TV when none is set.
    pub const DEFAULT_NAME: &'static str = "Samsung TV Remote";
    /// Default connect and response timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

    /// Creates a configuration for `host` with default settings.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            name: Self::DEFAULT_NAME.to_string(),
            description: Self::DEFAULT_NAME.to_string(),
            id: String::new(),
            token: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the remote name shown on the TV.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the remote description (legacy protocol only).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the remote id (legacy protocol only).
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets a pairing token (WebSocket over TLS only).
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the connect and response timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port, if set.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns the remote name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the remote description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the remote id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the pairing token, if set.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns `true` when the WebSocket connection must use TLS.
    #[must_use]
    pub fn is_tls(&self) -> bool {
        self.port == Some(Method::WEBSOCKET_TLS_PORT)
    }

    /// Returns `host:port`, falling back to `fallback_port` when no port is set.
    #[must_use]
    pub fn socket_address(&self, fallback_port: u16) -> String {
        format!("{}:{}", self.host, self.port.unwrap_or(fallback_port))
    }
}
