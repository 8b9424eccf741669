// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device configuration.
//!
//! A [`DeviceConfig`] describes one TV: where it is, what it is called and how
//! to wake it up. It can be built in code or loaded from JSON:
//!
//! ```
//! use samsungtv_lib::DeviceConfig;
//!
//! let config = DeviceConfig::from_json(r#"{
//!     "host": "192.168.1.20",
//!     "name": "Living room",
//!     "port": 8001,
//!     "on_action": [{"wake_on_lan": "AA:BB:CC:DD:EE:FF"}, {"delay": 1.0}]
//! }"#).unwrap();
//!
//! assert_eq!(config.name, "Living room");
//! assert!(config.on_action.is_some());
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::device::TurnOnStep;
use crate::error::Error;
use crate::protocol::{Method, RemoteConfig};

fn default_name() -> String {
    RemoteConfig::DEFAULT_NAME.to_string()
}

fn default_timeout() -> Duration {
    RemoteConfig::DEFAULT_TIMEOUT
}

/// Serializes a [`Duration`] as fractional seconds.
///
/// Deserialization also accepts a clock string (`"HH:MM:SS"`, `"HH:MM"`) or a
/// human-readable span such as `"1s"` or `"500ms"`.
pub(crate) mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Seconds(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        match RawDuration::deserialize(deserializer)? {
            RawDuration::Seconds(secs) => {
                Duration::try_from_secs_f64(secs).map_err(de::Error::custom)
            }
            RawDuration::Text(text) if text.contains(':') => {
                parse_clock(&text).ok_or_else(|| {
                    de::Error::custom(format!("invalid time period {text:?}, expected HH:MM:SS"))
                })
            }
            RawDuration::Text(text) => {
                humantime::parse_duration(text.trim()).map_err(de::Error::custom)
            }
        }
    }

    /// Parses `HH:MM` or `HH:MM:SS[.fff]`.
    pub(crate) fn parse_clock(text: &str) -> Option<Duration> {
        let parts: Vec<&str> = text.trim().split(':').collect();
        let (hours, minutes, seconds) = match parts.as_slice() {
            [h, m] => (*h, *m, "0"),
            [h, m, s] => (*h, *m, *s),
            _ => return None,
        };

        let hours: u64 = hours.parse().ok()?;
        let minutes: u64 = minutes.parse().ok()?;
        let seconds: f64 = seconds.parse().ok()?;
        if minutes >= 60 || !(0.0..60.0).contains(&seconds) {
            return None;
        }

        let whole = hours.checked_mul(3600)?.checked_add(minutes * 60)?;
        Some(Duration::from_secs(whole) + Duration::try_from_secs_f64(seconds).ok()?)
    }
}

/// Configuration of a single TV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Hostname or IP address.
    pub host: String,
    /// Remote control port; inferred from `method` or probed when absent.
    #[serde(default)]
    pub port: Option<u16>,
    /// Display name, also announced to the TV as the remote name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Remote protocol; inferred from `port` or probed when absent.
    #[serde(default)]
    pub method: Option<Method>,
    /// Pairing token for WebSocket over TLS.
    #[serde(default)]
    pub token: Option<String>,
    /// Connect and response timeout in seconds.
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,
    /// Steps run by `turn_on`. Without them the TV cannot be turned on.
    #[serde(default)]
    pub on_action: Option<Vec<TurnOnStep>>,
}

impl DeviceConfig {
    /// Creates a configuration for `host` with default settings.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            name: default_name(),
            method: None,
            token: None,
            timeout: default_timeout(),
            on_action: None,
        }
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the JSON is malformed or a field is invalid.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(Error::Config)
    }

    /// Sets the port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the remote protocol.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the pairing token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the turn-on steps.
    #[must_use]
    pub fn with_on_action(mut self, steps: Vec<TurnOnStep>) -> Self {
        self.on_action = Some(steps);
        self
    }

    /// Returns the method known without probing, from `method` or `port`.
    #[must_use]
    pub fn known_method(&self) -> Option<Method> {
        self.method.or_else(|| self.port.and_then(Method::from_port))
    }

    /// Builds the connection parameters for this TV.
    #[must_use]
    pub fn remote_config(&self) -> RemoteConfig {
        let mut config = RemoteConfig::new(&self.host)
            .with_name(&self.name)
            .with_timeout(self.timeout);
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(token) = &self.token {
            config = config.with_token(token);
        }
        config
    }
}
