// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WebSocket remote protocol (ports 8001 and 8002).

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::error::ProtocolError;
use crate::protocol::{Connector, Method, Remote, RemoteConfig, with_timeout};
use crate::types::Key;

const EVENT_CONNECT: &str = "ms.channel.connect";
const EVENT_UNAUTHORIZED: &str = "ms.channel.unauthorized";

type Stream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Deserialize)]
struct ChannelEvent {
    event: String,
    #[serde(default)]
    data: Option<ChannelData>,
}

#[derive(Debug, Deserialize)]
struct ChannelData {
    token: Option<String>,
}

/// Outcome of the first frame sent by the TV.
#[derive(Debug, PartialEq, Eq)]
enum Handshake {
    Connected { token: Option<String> },
    Unauthorized,
    Unexpected(String),
}

fn parse_handshake(text: &str) -> Handshake {
    match serde_json::from_str::<ChannelEvent>(text) {
        Ok(event) if event.event == EVENT_CONNECT => Handshake::Connected {
            token: event.data.and_then(|d| d.token),
        },
        Ok(event) if event.event == EVENT_UNAUTHORIZED => Handshake::Unauthorized,
        _ => Handshake::Unexpected(text.to_string()),
    }
}

/// Builds the JSON frame for a key click.
fn key_payload(key: &Key) -> String {
    serde_json::json!({
        "method": "ms.remote.control",
        "params": {
            "Cmd": "Click",
            "DataOfCmd": key.as_str(),
            "Option": "false",
            "TypeOfRemote": "SendRemoteKey",
        }
    })
    .to_string()
}

// Closed sockets are reported like a legacy TV hanging up so retry handling stays uniform.
fn map_ws_error(error: tungstenite::Error) -> ProtocolError {
    match error {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
            ProtocolError::ConnectionClosed
        }
        tungstenite::Error::Io(e) => ProtocolError::Io(e),
        other => ProtocolError::WebSocket(other),
    }
}

/// Connector for TVs speaking the WebSocket protocol.
///
/// On port 8002 the connection uses TLS and the TV hands out a token on the
/// first accepted connection. The token is kept for later connections so the
/// TV does not prompt again.
///
/// # Examples
///
/// ```no_run
/// use samsungtv_lib::protocol::{Connector, Remote, RemoteConfig, WebSocketConnector};
/// use samsungtv_lib::types::Key;
///
/// # async fn example() -> Result<(), samsungtv_lib::ProtocolError> {
/// let connector = WebSocketConnector::new(RemoteConfig::new("192.168.1.20").with_port(8001));
/// let mut remote = connector.connect().await?;
/// remote.control(&Key::MUTE).await?;
/// remote.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct WebSocketConnector {
    config: RemoteConfig,
    token: Mutex<Option<String>>,
}

impl WebSocketConnector {
    /// Creates a connector; the port defaults to 8001.
    #[must_use]
    pub fn new(config: RemoteConfig) -> Self {
        let token = config.token().map(str::to_string);
        Self {
            config,
            token: Mutex::new(token),
        }
    }

    /// Returns the connection configuration.
    #[must_use]
    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Returns the pairing token received from the TV, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token.lock().clone()
    }

    /// Builds the control channel URL.
    #[must_use]
    pub fn url(&self) -> String {
        let scheme = if self.config.is_tls() { "wss" } else { "ws" };
        let address = self.config.socket_address(Method::WEBSOCKET_PORT);
        let name = BASE64.encode(self.config.name());
        let mut url = format!(
            "{scheme}://{address}/api/v2/channels/samsung.remote.control?name={}",
            urlencoding::encode(&name)
        );
        if self.config.is_tls()
            && let Some(token) = self.token()
        {
            url.push_str("&token=");
            url.push_str(&urlencoding::encode(&token));
        }
        url
    }

    fn tls_connector(&self) -> Result<Option<tokio_tungstenite::Connector>, ProtocolError> {
        if !self.config.is_tls() {
            return Ok(None);
        }
        // TVs ship self-signed certificates.
        let tls = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true)
            .build()?;
        Ok(Some(tokio_tungstenite::Connector::NativeTls(tls)))
    }
}

impl Connector for WebSocketConnector {
    type Remote = WebSocketRemote;

    async fn connect(&self) -> Result<WebSocketRemote, ProtocolError> {
        let url = self.url();
        let tls = self.tls_connector()?;
        let timeout = self.config.timeout();

        tracing::debug!(url = %url, "Opening WebSocket remote connection");

        let (stream, _response) = with_timeout(timeout, async {
            tokio_tungstenite::connect_async_tls_with_config(url.as_str(), None, false, tls)
                .await
                .map_err(map_ws_error)
        })
        .await?;

        let mut remote = WebSocketRemote { stream, timeout };
        let text = remote.first_text_frame().await?;

        match parse_handshake(&text) {
            Handshake::Connected { token } => {
                if let Some(token) = token {
                    tracing::debug!(host = %self.config.host(), "Received pairing token");
                    *self.token.lock() = Some(token);
                }
                Ok(remote)
            }
            Handshake::Unauthorized => Err(ProtocolError::AccessDenied),
            Handshake::Unexpected(text) => {
                if let Err(e) = remote.close().await {
                    tracing::debug!(host = %self.config.host(), error = %e, "Failed to close rejected connection");
                }
                Err(ProtocolError::UnhandledResponse(text))
            }
        }
    }

    fn method(&self) -> Method {
        Method::WebSocket
    }
}

/// An open WebSocket control channel.
#[derive(Debug)]
pub struct WebSocketRemote {
    stream: Stream,
    timeout: Duration,
}

impl WebSocketRemote {
    async fn first_text_frame(&mut self) -> Result<String, ProtocolError> {
        let stream = &mut self.stream;
        with_timeout(self.timeout, async {
            loop {
                match stream.next().await {
                    Some(Ok(Message::Text(text))) => return Ok(text.as_str().to_string()),
                    Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => {}
                    Some(Ok(Message::Binary(_))) => {
                        return Err(ProtocolError::UnhandledResponse(
                            "binary frame".to_string(),
                        ));
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        return Err(ProtocolError::ConnectionClosed);
                    }
                    Some(Err(e)) => return Err(map_ws_error(e)),
                }
            }
        })
        .await
    }
}

impl Remote for WebSocketRemote {
    async fn control(&mut self, key: &Key) -> Result<(), ProtocolError> {
        tracing::debug!(key = %key, "Sending WebSocket key");
        let stream = &mut self.stream;
        with_timeout(self.timeout, async {
            stream
                .send(Message::text(key_payload(key)))
                .await
                .map_err(map_ws_error)
        })
        .await
    }

    async fn close(&mut self) -> Result<(), ProtocolError> {
        match self.stream.close(None).await {
            Ok(()) => Ok(()),
            Err(e) => match map_ws_error(e) {
                ProtocolError::ConnectionClosed => Ok(()),
                other => Err(other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_plain() {
        let connector =
            WebSocketConnector::new(RemoteConfig::new("192.168.1.20").with_name("hub"));
        assert_eq!(
            connector.url(),
            "ws://192.168.1.20:8001/api/v2/channels/samsung.remote.control?name=aHVi"
        );
    }

    #[test]
    fn url_tls_with_token() {
        let config = RemoteConfig::new("tv")
            .with_port(8002)
            .with_name("Samsung TV Remote")
            .with_token("123");
        let connector = WebSocketConnector::new(config);
        assert_eq!(
            connector.url(),
            "wss://tv:8002/api/v2/channels/samsung.remote.control?name=U2Ftc3VuZyBUViBSZW1vdGU%3D&token=123"
        );
    }

    #[test]
    fn url_plain_ignores_token() {
        let connector = WebSocketConnector::new(RemoteConfig::new("tv").with_token("123"));
        assert!(!connector.url().contains("token"));
    }

    #[test]
    fn key_payload_format() {
        let value: serde_json::Value = serde_json::from_str(&key_payload(&Key::VOLUME_UP)).unwrap();
        assert_eq!(value["method"], "ms.remote.control");
        assert_eq!(value["params"]["Cmd"], "Click");
        assert_eq!(value["params"]["DataOfCmd"], "KEY_VOLUP");
        assert_eq!(value["params"]["Option"], "false");
        assert_eq!(value["params"]["TypeOfRemote"], "SendRemoteKey");
    }

    #[test]
    fn handshake_connect() {
        assert_eq!(
            parse_handshake(r#"{"event":"ms.channel.connect","data":{"token":"987"}}"#),
            Handshake::Connected {
                token: Some("987".to_string())
            }
        );
        assert_eq!(
            parse_handshake(r#"{"event":"ms.channel.connect"}"#),
            Handshake::Connected { token: None }
        );
    }

    #[test]
    fn handshake_unauthorized() {
        assert_eq!(
            parse_handshake(r#"{"event":"ms.channel.unauthorized"}"#),
            Handshake::Unauthorized
        );
    }

    #[test]
    fn handshake_unexpected() {
        assert!(matches!(
            parse_handshake(r#"{"event":"ms.channel.timeOut"}"#),
            Handshake::Unexpected(_)
        ));
        assert!(matches!(parse_handshake("not json"), Handshake::Unexpected(_)));
    }
}
