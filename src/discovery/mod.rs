// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remote protocol detection.
//!
//! Older TVs only answer the legacy protocol on port 55000, newer ones only
//! the WebSocket API on 8001 (or 8002 over TLS). When the configuration does
//! not say which, each candidate is tried in turn and the first one the TV
//! answers on wins. An answer does not have to be a successful pairing: a TV
//! that denies access is still speaking that protocol.
//!
//! # Examples
//!
//! ```no_run
//! use samsungtv_lib::RemoteConfig;
//! use samsungtv_lib::discovery::detect_method;
//!
//! # async fn example() -> samsungtv_lib::Result<()> {
//! let detected = detect_method(&RemoteConfig::new("192.168.1.20")).await?;
//! println!("{} on port {}", detected.method, detected.port);
//! # Ok(())
//! # }
//! ```

use crate::error::{DeviceError, Error, ProtocolError};
use crate::protocol::{Connector, Method, Remote, RemoteConfig, SamsungConnector};

/// Protocols tried by [`detect_method`], in order.
pub const CANDIDATES: [(Method, u16); 3] = [
    (Method::WebSocket, Method::WEBSOCKET_PORT),
    (Method::WebSocket, Method::WEBSOCKET_TLS_PORT),
    (Method::Legacy, Method::LEGACY_PORT),
];

/// Protocol and port a TV answered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedMethod {
    /// Remote protocol.
    pub method: Method,
    /// Port the TV answered on.
    pub port: u16,
}

/// Returns the protocols worth trying for an optional configured port.
///
/// A well-known port keeps only its own candidates. Any other port is tried
/// with both protocols, WebSocket first.
#[must_use]
pub fn candidates_for(port: Option<u16>) -> Vec<(Method, u16)> {
    let Some(port) = port else {
        return CANDIDATES.to_vec();
    };

    let known: Vec<(Method, u16)> = CANDIDATES
        .into_iter()
        .filter(|&(_, candidate)| candidate == port)
        .collect();
    if known.is_empty() {
        vec![(Method::WebSocket, port), (Method::Legacy, port)]
    } else {
        known
    }
}

/// Finds the remote protocol the TV at `config.host()` speaks.
///
/// The candidates come from [`candidates_for`] applied to the configured port.
/// Candidates whose transport is not compiled in are skipped.
///
/// # Errors
///
/// Returns `DeviceError::NotSupported` if the TV answers on none of them.
pub async fn detect_method(config: &RemoteConfig) -> Result<DetectedMethod, Error> {
    detect_among(config, &candidates_for(config.port())).await
}

/// Tries `candidates` in order against the TV at `config.host()`.
///
/// # Errors
///
/// Returns `DeviceError::NotSupported` if the TV answers on none of them.
pub async fn detect_among(
    config: &RemoteConfig,
    candidates: &[(Method, u16)],
) -> Result<DetectedMethod, Error> {
    tracing::debug!(host = %config.host(), count = candidates.len(), "Probing remote protocols");

    for &(method, port) in candidates {
        let connector = match SamsungConnector::new(method, config.clone().with_port(port)) {
            Ok(connector) => connector,
            Err(e @ ProtocolError::MethodDisabled(_)) => {
                tracing::trace!(method = %method, error = %e, "Skipping candidate");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        match connector.connect().await {
            Ok(mut remote) => {
                if let Err(e) = remote.close().await {
                    tracing::debug!(host = %config.host(), method = %method, error = %e, "Failed to close detection connection");
                }
                tracing::debug!(host = %config.host(), method = %method, port, "TV accepted connection");
                return Ok(DetectedMethod { method, port });
            }
            Err(e) if e.tv_answered() => {
                tracing::debug!(host = %config.host(), method = %method, port, error = %e, "TV answered");
                return Ok(DetectedMethod { method, port });
            }
            Err(e) => {
                tracing::debug!(host = %config.host(), method = %method, port, error = %e, "No answer");
            }
        }
    }

    tracing::warn!(host = %config.host(), "TV answered on no known remote protocol");
    Err(DeviceError::NotSupported {
        host: config.host().to_string(),
    }
    .into())
}
