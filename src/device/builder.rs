// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Samsung TV builder.

use crate::config::DeviceConfig;
use crate::device::{SamsungTv, TurnOnAction};
use crate::discovery;
use crate::error::{DeviceError, Error};
use crate::protocol::{Method, SamsungConnector};

/// Builder for [`SamsungTv`] adapters backed by a real TV.
///
/// When the configuration names neither a method nor a well-known port,
/// [`build`](Self::build) probes the TV to find out which protocol it speaks.
///
/// # Examples
///
/// ```no_run
/// use samsungtv_lib::{DeviceConfig, Method, SamsungTv};
///
/// # async fn example() -> samsungtv_lib::Result<()> {
/// // Probe for the protocol
/// let tv = SamsungTv::builder(DeviceConfig::new("192.168.1.20"))
///     .build()
///     .await?;
///
/// // Known protocol, no network access
/// let tv = SamsungTv::builder(DeviceConfig::new("192.168.1.21").with_method(Method::Legacy))
///     .build_without_probe()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SamsungTvBuilder {
    config: DeviceConfig,
    turn_on_action: Option<Box<dyn TurnOnAction>>,
}

impl SamsungTvBuilder {
    pub(crate) fn new(config: DeviceConfig) -> Self {
        Self {
            config,
            turn_on_action: None,
        }
    }

    /// Uses a custom turn-on action instead of the configured steps.
    #[must_use]
    pub fn with_turn_on_action(mut self, action: impl TurnOnAction + 'static) -> Self {
        self.turn_on_action = Some(Box::new(action));
        self
    }

    /// Returns the configuration being built.
    #[must_use]
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Builds the adapter, probing the TV if the protocol is unknown.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::NotSupported` if probing finds no protocol the
    /// TV answers on, or `ProtocolError::MethodDisabled` if the method was
    /// compiled out.
    pub async fn build(self) -> Result<SamsungTv<SamsungConnector>, Error> {
        if let Some(method) = self.config.known_method() {
            return self.assemble(method, None);
        }

        let detected = discovery::detect_method(&self.config.remote_config()).await?;
        tracing::info!(
            host = %self.config.host,
            method = %detected.method,
            port = detected.port,
            "Detected remote protocol"
        );
        self.assemble(detected.method, Some(detected.port))
    }

    /// Builds the adapter without touching the network.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidConfiguration` if neither `method` nor a
    /// well-known `port` is configured.
    pub fn build_without_probe(self) -> Result<SamsungTv<SamsungConnector>, Error> {
        let method = self.config.known_method().ok_or_else(|| {
            DeviceError::InvalidConfiguration(
                "a method or a well-known port is required without probing".to_string(),
            )
        })?;
        self.assemble(method, None)
    }

    fn assemble(
        self,
        method: Method,
        port: Option<u16>,
    ) -> Result<SamsungTv<SamsungConnector>, Error> {
        let mut config = self.config;
        if let Some(port) = port {
            config.port = Some(port);
        }
        config.method = Some(method);

        let connector = SamsungConnector::new(method, config.remote_config())?;
        let mut tv = SamsungTv::new(connector, &config);
        if let Some(action) = self.turn_on_action {
            tv.turn_on_action = Some(action);
        }
        Ok(tv)
    }
}
