// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Turn-on actions.
//!
//! A switched-off TV does not listen on its remote ports, so turning it on
//! needs something outside the remote protocol: a Wake-on-LAN packet, an IR
//! blaster, a smart plug. The configured [`TurnOnStep`]s cover the common case
//! and [`TurnOnAction`] lets callers plug in anything else.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::net::UdpSocket;

use crate::config::duration_secs;
use crate::error::{DeviceError, ValueError};

/// Boxed future returned by [`TurnOnAction::run`].
pub type TurnOnFuture<'a> = Pin<Box<dyn Future<Output = Result<(), DeviceError>> + Send + 'a>>;

/// Something that can switch the TV on.
pub trait TurnOnAction: Send + Sync + fmt::Debug {
    /// Runs the action to completion.
    fn run(&self) -> TurnOnFuture<'_>;
}

/// A MAC address used as Wake-on-LAN target.
///
/// # Examples
///
/// ```
/// use samsungtv_lib::MacAddress;
///
/// let mac: MacAddress = "aa:bb:cc:dd:ee:ff".parse().unwrap();
/// assert_eq!(mac.to_string(), "AA:BB:CC:DD:EE:FF");
/// assert!("aa:bb".parse::<MacAddress>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Returns the address bytes.
    #[must_use]
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Builds the Wake-on-LAN magic packet: six `0xFF` then the MAC 16 times.
    #[must_use]
    pub fn magic_packet(&self) -> Vec<u8> {
        let mut packet = vec![0xFF; 6];
        for _ in 0..16 {
            packet.extend_from_slice(&self.0);
        }
        packet
    }
}

impl FromStr for MacAddress {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::InvalidMacAddress(s.to_string());
        let mut octets = [0u8; 6];
        let mut parts = s.split([':', '-']);
        for octet in &mut octets {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self(octets))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MacAddress> for String {
    fn from(value: MacAddress) -> Self {
        value.to_string()
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// One step of a configured turn-on sequence.
///
/// Serialized as `{"delay": 1.5}` or `{"wake_on_lan": "AA:BB:CC:DD:EE:FF"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOnStep {
    /// Waits before the next step.
    Delay(#[serde(with = "duration_secs")] Duration),
    /// Broadcasts a Wake-on-LAN magic packet.
    WakeOnLan(MacAddress),
}

/// Wake-on-LAN broadcast target.
const WOL_ADDRESS: &str = "255.255.255.255:9";

async fn send_magic_packet(mac: MacAddress) -> Result<(), DeviceError> {
    let failed = |e: std::io::Error| DeviceError::TurnOnFailed(format!("wake on lan: {e}"));

    let socket = UdpSocket::bind("0.0.0.0:0").await.map_err(failed)?;
    socket.set_broadcast(true).map_err(failed)?;
    socket
        .send_to(&mac.magic_packet(), WOL_ADDRESS)
        .await
        .map_err(failed)?;

    tracing::debug!(mac = %mac, "Sent Wake-on-LAN packet");
    Ok(())
}

/// Runs configured [`TurnOnStep`]s in order.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOnScript {
    steps: Vec<TurnOnStep>,
}

impl TurnOnScript {
    /// Creates a script from steps.
    #[must_use]
    pub fn new(steps: Vec<TurnOnStep>) -> Self {
        Self { steps }
    }

    /// Returns the steps.
    #[must_use]
    pub fn steps(&self) -> &[TurnOnStep] {
        &self.steps
    }
}

impl TurnOnAction for TurnOnScript {
    fn run(&self) -> TurnOnFuture<'_> {
        Box::pin(async move {
            for step in &self.steps {
                match step {
                    TurnOnStep::Delay(duration) => tokio::time::sleep(*duration).await,
                    TurnOnStep::WakeOnLan(mac) => send_magic_packet(*mac).await?,
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mac_with_dashes() {
        let mac: MacAddress = "01-23-45-67-89-ab".parse().unwrap();
        assert_eq!(mac.octets(), [0x01, 0x23, 0x45, 0x67, 0x89, 0xab]);
    }

    #[test]
    fn reject_malformed_macs() {
        for input in [
            "",
            "aa:bb:cc:dd:ee",
            "aa:bb:cc:dd:ee:ff:00",
            "aa:bb:cc:dd:ee:gg",
            "a:bb:cc:dd:ee:fff",
        ] {
            assert!(input.parse::<MacAddress>().is_err(), "{input:?}");
        }
    }

    #[test]
    fn magic_packet_layout() {
        let mac: MacAddress = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        let packet = mac.magic_packet();
        assert_eq!(packet.len(), 102);
        assert_eq!(&packet[..6], &[0xFF; 6]);
        assert_eq!(&packet[96..], &mac.octets());
    }

    #[test]
    fn steps_deserialize() {
        let steps: Vec<TurnOnStep> =
            serde_json::from_str(r#"[{"wake_on_lan": "aa:bb:cc:dd:ee:ff"}, {"delay": 0.5}]"#)
                .unwrap();
        assert_eq!(
            steps,
            vec![
                TurnOnStep::WakeOnLan("aa:bb:cc:dd:ee:ff".parse().unwrap()),
                TurnOnStep::Delay(Duration::from_millis(500)),
            ]
        );
    }

    #[test]
    fn invalid_mac_fails_deserialization() {
        let result: Result<TurnOnStep, _> = serde_json::from_str(r#"{"wake_on_lan": "nope"}"#);
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn script_runs_delays() {
        let script = TurnOnScript::new(vec![
            TurnOnStep::Delay(Duration::from_secs(1)),
            TurnOnStep::Delay(Duration::from_secs(2)),
        ]);
        let start = tokio::time::Instant::now();
        script.run().await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(3));
    }
}
