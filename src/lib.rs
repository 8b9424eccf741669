// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `SamsungTV` Lib - A Rust library to control Samsung TVs as media players.
//!
//! This library exposes a Samsung TV to a home automation hub: it turns
//! service calls into remote control key presses and reports whether the TV
//! is on.
//!
//! # Supported Features
//!
//! - **Power control**: Turn off, turn on through Wake-on-LAN or a custom action
//! - **Volume**: Step up/down, mute toggle
//! - **Playback**: Play, pause, next/previous channel
//! - **Sources and channels**: Select TV/HDMI, tune to `major` or `major-minor` channels
//! - **State polling**: Connection probes, state change and reauthorization events
//!
//! # Supported Protocols
//!
//! - Legacy (port 55000): binary TCP protocol, feature `legacy`
//! - WebSocket (port 8001, TLS on 8002): JSON remote API, feature `websocket`
//!
//! # Quick Start
//!
//! ## Protocol Auto-Detection
//!
//! ```no_run
//! use samsungtv_lib::{DeviceConfig, SamsungTv};
//!
//! #[tokio::main]
//! async fn main() -> samsungtv_lib::Result<()> {
//!     let tv = SamsungTv::builder(DeviceConfig::new("192.168.1.20"))
//!         .build()
//!         .await?;
//!
//!     tv.update().await;
//!     if tv.power_state().is_on() {
//!         tv.volume_up().await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Known Protocol with Wake-on-LAN
//!
//! ```no_run
//! use samsungtv_lib::{DeviceConfig, Method, SamsungTv, TurnOnStep};
//!
//! #[tokio::main]
//! async fn main() -> samsungtv_lib::Result<()> {
//!     let config = DeviceConfig::new("192.168.1.20")
//!         .with_method(Method::WebSocket)
//!         .with_on_action(vec![TurnOnStep::WakeOnLan("AA:BB:CC:DD:EE:FF".parse()?)]);
//!
//!     let tv = SamsungTv::builder(config).build_without_probe()?;
//!     tv.turn_on().await?;
//!     tv.select_source("HDMI").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Background Polling
//!
//! ```no_run
//! use std::sync::Arc;
//! use samsungtv_lib::{DeviceConfig, DeviceEvent, SamsungTv, SCAN_INTERVAL};
//!
//! #[tokio::main]
//! async fn main() -> samsungtv_lib::Result<()> {
//!     let tv = Arc::new(SamsungTv::builder(DeviceConfig::new("192.168.1.20")).build().await?);
//!     let mut events = tv.subscribe();
//!     let _poller = tv.spawn_polling(SCAN_INTERVAL)?;
//!
//!     while let Ok(event) = events.recv().await {
//!         if let DeviceEvent::ReauthRequired { host } = event {
//!             println!("{host} needs to be paired again");
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "legacy", feature = "websocket")))]
compile_error!("at least one of the `legacy` or `websocket` features must be enabled");

pub mod config;
mod device;
pub mod discovery;
pub mod error;
pub mod event;
pub mod protocol;
pub mod state;
pub mod types;

pub use config::DeviceConfig;
pub use device::{
    KEY_PRESS_TIMEOUT, MacAddress, POWER_OFF_COOLDOWN, SCAN_INTERVAL, SamsungTv,
    SamsungTvBuilder, TurnOnAction, TurnOnFuture, TurnOnScript, TurnOnStep,
};
pub use error::{DeviceError, Error, ProtocolError, Result, ValueError};
pub use event::{DeviceEvent, EventBus};
pub use protocol::{Connector, Method, Remote, RemoteConfig, SamsungConnector, SamsungRemote};
pub use state::TvState;
pub use types::{Channel, Key, MediaType, PowerState, Source, SupportedFeatures};
