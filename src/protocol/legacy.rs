// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Legacy TCP remote protocol (port 55000).
//!
//! Every packet is `0x00`, an app-name field and a payload field. A field is a
//! little-endian `u16` length followed by the bytes; user strings inside the
//! payload are base64 encoded. The TV answers with the same framing.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::ProtocolError;
use crate::protocol::{Connector, Method, Remote, RemoteConfig, with_timeout};
use crate::types::Key;

const AUTH_APP_NAME: &str = "iphone..iapp.samsung";
const KEY_APP_NAME: &str = "iphone.UN60D6000.iapp.samsung";

const ACCESS_GRANTED: &[u8] = &[0x64, 0x00, 0x01, 0x00];
const ACCESS_DENIED: &[u8] = &[0x64, 0x00, 0x00, 0x00];
const KEY_ACK: &[u8] = &[0x00, 0x00, 0x00, 0x00];
const WAITING_FOR_USER: u8 = 0x0a;
const AUTH_CANCELLED: u8 = 0x65;

/// Classified response payload from the TV.
#[derive(Debug, PartialEq, Eq)]
enum Reply {
    Granted,
    Denied,
    Waiting,
    KeyAck,
    Closed,
    Other(Vec<u8>),
}

impl Reply {
    fn classify(payload: Vec<u8>) -> Self {
        match payload.as_slice() {
            [] => Self::Closed,
            ACCESS_GRANTED => Self::Granted,
            ACCESS_DENIED => Self::Denied,
            KEY_ACK => Self::KeyAck,
            [WAITING_FOR_USER, ..] => Self::Waiting,
            [AUTH_CANCELLED, ..] => Self::Denied,
            _ => Self::Other(payload),
        }
    }
}

fn encode_field(bytes: &[u8], out: &mut Vec<u8>) -> Result<(), ProtocolError> {
    let len = u16::try_from(bytes.len()).map_err(|_| ProtocolError::FieldTooLong(bytes.len()))?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(bytes);
    Ok(())
}

fn encode_base64_field(value: &str, out: &mut Vec<u8>) -> Result<(), ProtocolError> {
    encode_field(BASE64.encode(value).as_bytes(), out)
}

fn packet(app_name: &str, payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let mut packet = vec![0x00];
    encode_field(app_name.as_bytes(), &mut packet)?;
    encode_field(payload, &mut packet)?;
    Ok(packet)
}

/// Builds the pairing request announcing this remote.
fn auth_packet(config: &RemoteConfig) -> Result<Vec<u8>, ProtocolError> {
    let mut payload = vec![0x64, 0x00];
    encode_base64_field(config.description(), &mut payload)?;
    encode_base64_field(config.id(), &mut payload)?;
    encode_base64_field(config.name(), &mut payload)?;
    packet(AUTH_APP_NAME, &payload)
}

/// Builds a key press packet.
fn key_packet(key: &Key) -> Result<Vec<u8>, ProtocolError> {
    let mut payload = vec![0x00, 0x00, 0x00];
    encode_base64_field(key.as_str(), &mut payload)?;
    packet(KEY_APP_NAME, &payload)
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Connector for TVs speaking the legacy protocol.
///
/// # Examples
///
/// ```no_run
/// use samsungtv_lib::protocol::{Connector, LegacyConnector, Remote, RemoteConfig};
/// use samsungtv_lib::types::Key;
///
/// # async fn example() -> Result<(), samsungtv_lib::ProtocolError> {
/// let connector = LegacyConnector::new(RemoteConfig::new("192.168.1.20"));
/// let mut remote = connector.connect().await?;
/// remote.control(&Key::VOLUME_UP).await?;
/// remote.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LegacyConnector {
    config: RemoteConfig,
}

impl LegacyConnector {
    /// Creates a connector; the port defaults to 55000.
    #[must_use]
    pub fn new(config: RemoteConfig) -> Self {
        Self { config }
    }

    /// Returns the connection configuration.
    #[must_use]
    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }
}

impl Connector for LegacyConnector {
    type Remote = LegacyRemote;

    async fn connect(&self) -> Result<LegacyRemote, ProtocolError> {
        let address = self.config.socket_address(Method::LEGACY_PORT);
        let timeout = self.config.timeout();

        tracing::debug!(address = %address, "Opening legacy remote connection");

        let stream = with_timeout(timeout, async {
            TcpStream::connect(&address).await.map_err(ProtocolError::Io)
        })
        .await?;

        let mut remote = LegacyRemote { stream, timeout };
        remote.authenticate(&self.config).await?;
        Ok(remote)
    }

    fn method(&self) -> Method {
        Method::Legacy
    }
}

/// An authenticated legacy protocol connection.
#[derive(Debug)]
pub struct LegacyRemote {
    stream: TcpStream,
    timeout: Duration,
}

impl LegacyRemote {
    async fn authenticate(&mut self, config: &RemoteConfig) -> Result<(), ProtocolError> {
        self.write(&auth_packet(config)?).await?;

        let mut prompted = false;
        loop {
            match self.read_reply().await? {
                Reply::Granted => {
                    tracing::debug!(host = %config.host(), "Legacy remote access granted");
                    return Ok(());
                }
                Reply::Denied => return Err(ProtocolError::AccessDenied),
                Reply::Closed => return Err(ProtocolError::ConnectionClosed),
                Reply::Waiting if !prompted => {
                    tracing::info!(host = %config.host(), "Waiting for the connection to be allowed on the TV");
                    prompted = true;
                }
                Reply::Waiting | Reply::KeyAck => {
                    return Err(ProtocolError::UnhandledResponse(
                        "unexpected reply during authentication".to_string(),
                    ));
                }
                Reply::Other(payload) => {
                    return Err(ProtocolError::UnhandledResponse(hex(&payload)));
                }
            }
        }
    }

    async fn write(&mut self, packet: &[u8]) -> Result<(), ProtocolError> {
        let stream = &mut self.stream;
        with_timeout(self.timeout, async {
            stream.write_all(packet).await.map_err(ProtocolError::Io)
        })
        .await
    }

    async fn read_reply(&mut self) -> Result<Reply, ProtocolError> {
        let stream = &mut self.stream;
        let payload = with_timeout(self.timeout, async {
            let mut header = [0u8; 3];
            read_exact(stream, &mut header).await?;

            let app_name_len = usize::from(u16::from_le_bytes([header[1], header[2]]));
            let mut app_name = vec![0u8; app_name_len];
            read_exact(stream, &mut app_name).await?;

            let mut len = [0u8; 2];
            read_exact(stream, &mut len).await?;

            let mut payload = vec![0u8; usize::from(u16::from_le_bytes(len))];
            read_exact(stream, &mut payload).await?;
            Ok(payload)
        })
        .await?;

        tracing::trace!(payload = %hex(&payload), "Received legacy reply");
        Ok(Reply::classify(payload))
    }
}

// A TV that hangs up mid-frame has closed the connection.
async fn read_exact(stream: &mut TcpStream, buf: &mut [u8]) -> Result<(), ProtocolError> {
    match stream.read_exact(buf).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            Err(ProtocolError::ConnectionClosed)
        }
        Err(e) => Err(ProtocolError::Io(e)),
    }
}

impl Remote for LegacyRemote {
    async fn control(&mut self, key: &Key) -> Result<(), ProtocolError> {
        tracing::debug!(key = %key, "Sending legacy key");
        self.write(&key_packet(key)?).await?;

        match self.read_reply().await? {
            Reply::KeyAck => Ok(()),
            Reply::Closed => Err(ProtocolError::ConnectionClosed),
            Reply::Denied => Err(ProtocolError::AccessDenied),
            Reply::Other(payload) => Err(ProtocolError::UnhandledResponse(hex(&payload))),
            reply => Err(ProtocolError::UnhandledResponse(format!("{reply:?}"))),
        }
    }

    async fn close(&mut self) -> Result<(), ProtocolError> {
        self.stream.shutdown().await.map_err(ProtocolError::Io)
    }
}
