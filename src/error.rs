// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `samsungtv_lib` library.
//!
//! Failures are split between input validation ([`ValueError`]), the remote
//! control transports ([`ProtocolError`]) and device-level operations
//! ([`DeviceError`]).

use std::io;

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while talking to the TV.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred during device operations.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Errors related to value validation.
///
/// These are returned when a service call carries input the TV cannot act on.
/// Nothing is sent to the TV in that case.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The channel string is not `major` or `major-minor` digits.
    #[error("invalid channel: {0:?}")]
    InvalidChannel(String),

    /// Only channel numbers can be played.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// The source name has no matching key.
    #[error("unknown source: {0}")]
    UnknownSource(String),

    /// A key digit outside 0-9.
    #[error("digit {0} is out of range [0, 9]")]
    InvalidDigit(u8),

    /// A MAC address could not be parsed.
    #[error("invalid MAC address: {0}")]
    InvalidMacAddress(String),

    /// The remote method name is not recognised.
    #[error("invalid method: {0}")]
    InvalidMethod(String),

    /// A polling interval must be longer than zero.
    #[error("polling interval must be non-zero")]
    ZeroInterval,
}

/// Errors raised by the remote control transports.
///
/// The variants mirror the conditions a TV can report. The device adapter maps
/// each of them to a retry, an off state, a reauthorization request, or a log line.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The TV closed the connection or sent an empty response.
    #[error("connection closed")]
    ConnectionClosed,

    /// The TV rejected this remote (user declined the pairing prompt).
    #[error("access denied")]
    AccessDenied,

    /// The TV answered with something the client does not understand.
    #[error("unhandled response: {0}")]
    UnhandledResponse(String),

    /// Socket level failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// WebSocket transport failure.
    #[cfg(feature = "websocket")]
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// TLS setup failed.
    #[cfg(feature = "websocket")]
    #[error("TLS error: {0}")]
    Tls(#[from] native_tls::Error),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// A legacy packet field exceeds the 16-bit length prefix.
    #[error("field of {0} bytes is too long for a legacy packet")]
    FieldTooLong(usize),

    /// The selected method was compiled out.
    #[error("method {0} is not enabled in this build")]
    MethodDisabled(&'static str),
}

impl ProtocolError {
    /// Returns `true` when a fresh connection is worth one more attempt.
    ///
    /// Broken pipes happen when keys are sent too fast and WebSocket errors
    /// when the socket timed out, so both count as a dropped connection.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionClosed => true,
            Self::Io(e) => e.kind() == io::ErrorKind::BrokenPipe,
            #[cfg(feature = "websocket")]
            Self::WebSocket(_) => true,
            _ => false,
        }
    }

    /// Returns `true` when the TV itself produced the error, which means it is on.
    #[must_use]
    pub fn tv_answered(&self) -> bool {
        matches!(self, Self::AccessDenied | Self::UnhandledResponse(_))
    }
}

/// Errors related to device operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// No remote method answered on any known port.
    #[error("no supported remote method found for {host}")]
    NotSupported {
        /// The probed host.
        host: String,
    },

    /// Device configuration is invalid.
    #[error("invalid device configuration: {0}")]
    InvalidConfiguration(String),

    /// A turn-on step failed.
    #[error("turn on action failed: {0}")]
    TurnOnFailed(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::InvalidChannel("2-".to_string());
        assert_eq!(err.to_string(), "invalid channel: \"2-\"");
    }

    #[test]
    fn error_from_value_error() {
        let err: Error = ValueError::UnknownSource("INVALID".to_string()).into();
        assert!(matches!(err, Error::Value(ValueError::UnknownSource(_))));
    }

    #[test]
    fn broken_pipe_is_retryable() {
        let err = ProtocolError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "Boom"));
        assert!(err.is_retryable());
        assert!(ProtocolError::ConnectionClosed.is_retryable());
    }

    #[test]
    fn other_io_errors_are_not_retryable() {
        let err = ProtocolError::Io(io::Error::other("Boom"));
        assert!(!err.is_retryable());
        assert!(!err.tv_answered());
    }

    #[test]
    fn tv_answered_errors() {
        assert!(ProtocolError::AccessDenied.tv_answered());
        assert!(ProtocolError::UnhandledResponse("Boom".into()).tv_answered());
        assert!(!ProtocolError::AccessDenied.is_retryable());
    }

    #[test]
    fn device_error_display() {
        let err = DeviceError::NotSupported {
            host: "fake".to_string(),
        };
        assert_eq!(err.to_string(), "no supported remote method found for fake");
    }
}
