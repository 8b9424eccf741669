// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Media player adapter for a Samsung TV.
//!
//! [`SamsungTv`] turns hub service calls (volume up, play, select source,
//! play a channel, ...) into key presses and keeps track of whether the TV
//! is on.
//!
//! # Connection handling
//!
//! A connection is opened on the first key of a call, reused for the rest of
//! the call and closed at the end. A dropped connection is reopened once per
//! key. Transport failures never surface as errors: a TV that cannot be
//! reached is simply off, and the next [`update`](SamsungTv::update) says so.
//!
//! ```no_run
//! use samsungtv_lib::{DeviceConfig, SamsungTv};
//!
//! # async fn example() -> samsungtv_lib::Result<()> {
//! let tv = SamsungTv::builder(DeviceConfig::new("192.168.1.20"))
//!     .build()
//!     .await?;
//!
//! tv.volume_up().await?;
//! tv.play_media(&"channel".into(), "2-4").await?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod turn_on;

pub use builder::SamsungTvBuilder;
pub use turn_on::{MacAddress, TurnOnAction, TurnOnFuture, TurnOnScript, TurnOnStep};

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;

use crate::config::DeviceConfig;
use crate::error::{Error, ProtocolError, ValueError};
use crate::event::{DeviceEvent, EventBus};
use crate::protocol::{Connector, Method, Remote, SamsungConnector};
use crate::state::{DEVICE_CLASS_TV, DeviceState, TvState};
use crate::types::{Channel, Key, MediaType, PowerState, Source, SupportedFeatures};

/// Pause between consecutive keys of a multi-key call.
pub const KEY_PRESS_TIMEOUT: Duration = Duration::from_millis(1200);

/// How long the TV is reported off after `turn_off`, whatever it answers.
pub const POWER_OFF_COOLDOWN: Duration = Duration::from_secs(15);

/// Default interval between polls.
pub const SCAN_INTERVAL: Duration = Duration::from_secs(10);

/// Number of reconnects per key after a dropped connection.
const RETRY_COUNT: usize = 1;

/// Result of sending one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    /// Delivered, or skipped on purpose; keep going.
    Continue,
    /// Gave up on this key; abandon the rest of the call.
    Abort,
}

/// A Samsung TV exposed as a media player.
///
/// The type parameter selects the transport. [`SamsungConnector`] covers real
/// TVs; any other [`Connector`] can be plugged in with [`SamsungTv::new`].
pub struct SamsungTv<C: Connector> {
    connector: C,
    host: String,
    name: String,
    turn_on_action: Option<Box<dyn TurnOnAction>>,
    remote: Mutex<Option<C::Remote>>,
    state: RwLock<DeviceState>,
    events: EventBus,
}

impl<C: Connector> fmt::Debug for SamsungTv<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SamsungTv")
            .field("host", &self.host)
            .field("name", &self.name)
            .field("method", &self.connector.method())
            .field("turn_on_action", &self.turn_on_action)
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

impl SamsungTv<SamsungConnector> {
    /// Creates a builder for a TV from its configuration.
    #[must_use]
    pub fn builder(config: DeviceConfig) -> SamsungTvBuilder {
        SamsungTvBuilder::new(config)
    }
}

impl<C: Connector> SamsungTv<C> {
    /// Creates an adapter around `connector`.
    ///
    /// Name, host and turn-on steps are taken from `config`.
    #[must_use]
    pub fn new(connector: C, config: &DeviceConfig) -> Self {
        let turn_on_action = config
            .on_action
            .clone()
            .map(|steps| Box::new(TurnOnScript::new(steps)) as Box<dyn TurnOnAction>);

        Self {
            connector,
            host: config.host.clone(),
            name: config.name.clone(),
            turn_on_action,
            remote: Mutex::new(None),
            state: RwLock::new(DeviceState::new()),
            events: EventBus::new(),
        }
    }

    /// Replaces the turn-on action.
    #[must_use]
    pub fn with_turn_on_action(mut self, action: impl TurnOnAction + 'static) -> Self {
        self.turn_on_action = Some(Box::new(action));
        self
    }

    /// Returns the connector.
    #[must_use]
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the remote protocol.
    #[must_use]
    pub fn method(&self) -> Method {
        self.connector.method()
    }

    /// Returns the reported power state.
    #[must_use]
    pub fn power_state(&self) -> PowerState {
        self.state.read().power()
    }

    /// Returns the supported media player features.
    #[must_use]
    pub fn supported_features(&self) -> SupportedFeatures {
        if self.turn_on_action.is_some() {
            SupportedFeatures::SAMSUNGTV | SupportedFeatures::TURN_ON
        } else {
            SupportedFeatures::SAMSUNGTV
        }
    }

    /// Returns a snapshot of the entity state.
    #[must_use]
    pub fn state(&self) -> TvState {
        let state = self.state.read();
        TvState {
            state: state.power(),
            friendly_name: self.name.clone(),
            supported_features: self.supported_features(),
            device_class: DEVICE_CLASS_TV.to_string(),
            source_list: Source::names(),
            is_playing: state.is_playing(),
        }
    }

    /// Subscribes to state changes and reauthorization requests.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.events.subscribe()
    }

    // ========== Power ==========

    /// Runs the configured turn-on action.
    ///
    /// Without one, the TV cannot be turned on and nothing happens.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::TurnOnFailed` if the action fails.
    pub async fn turn_on(&self) -> Result<(), Error> {
        let Some(action) = &self.turn_on_action else {
            tracing::debug!(host = %self.host, "Turn on is not supported without an on action");
            return Ok(());
        };

        action.run().await?;
        self.state.write().clear_power_off();
        Ok(())
    }

    /// Turns the TV off.
    ///
    /// The TV is reported off for [`POWER_OFF_COOLDOWN`] even though it keeps
    /// answering for a while during shutdown.
    ///
    /// # Errors
    ///
    /// This call does not fail; transport errors are logged.
    pub async fn turn_off(&self) -> Result<(), Error> {
        self.state.write().start_power_off(POWER_OFF_COOLDOWN);

        let key = match self.connector.method() {
            Method::Legacy => Key::POWER_OFF,
            Method::WebSocket => Key::POWER,
        };

        let mut slot = self.remote.lock().await;
        self.send_key(&mut slot, &key).await;
        // Closing right away lets the TV drop the session before it powers down.
        self.close_remote(&mut slot).await;
        drop(slot);

        self.set_power(PowerState::Off);
        Ok(())
    }

    // ========== Volume ==========

    /// Raises the volume one step.
    ///
    /// # Errors
    ///
    /// This call does not fail; transport errors are logged.
    pub async fn volume_up(&self) -> Result<(), Error> {
        self.send_keys(&[Key::VOLUME_UP]).await;
        Ok(())
    }

    /// Lowers the volume one step.
    ///
    /// # Errors
    ///
    /// This call does not fail; transport errors are logged.
    pub async fn volume_down(&self) -> Result<(), Error> {
        self.send_keys(&[Key::VOLUME_DOWN]).await;
        Ok(())
    }

    /// Toggles mute. The TV has no discrete mute, so `mute` is ignored.
    ///
    /// # Errors
    ///
    /// This call does not fail; transport errors are logged.
    pub async fn mute_volume(&self, mute: bool) -> Result<(), Error> {
        tracing::trace!(mute, "Toggling mute");
        self.send_keys(&[Key::MUTE]).await;
        Ok(())
    }

    // ========== Playback ==========

    /// Starts playback.
    ///
    /// # Errors
    ///
    /// This call does not fail; transport errors are logged.
    pub async fn media_play(&self) -> Result<(), Error> {
        self.state.write().set_playing(true);
        self.send_keys(&[Key::PLAY]).await;
        Ok(())
    }

    /// Pauses playback.
    ///
    /// # Errors
    ///
    /// This call does not fail; transport errors are logged.
    pub async fn media_pause(&self) -> Result<(), Error> {
        self.state.write().set_playing(false);
        self.send_keys(&[Key::PAUSE]).await;
        Ok(())
    }

    /// Pauses if playing, plays otherwise.
    ///
    /// # Errors
    ///
    /// This call does not fail; transport errors are logged.
    pub async fn media_play_pause(&self) -> Result<(), Error> {
        if self.state.read().is_playing() {
            self.media_pause().await
        } else {
            self.media_play().await
        }
    }

    /// Goes to the next channel.
    ///
    /// # Errors
    ///
    /// This call does not fail; transport errors are logged.
    pub async fn media_next_track(&self) -> Result<(), Error> {
        self.send_keys(&[Key::CHANNEL_UP]).await;
        Ok(())
    }

    /// Goes to the previous channel.
    ///
    /// # Errors
    ///
    /// This call does not fail; transport errors are logged.
    pub async fn media_previous_track(&self) -> Result<(), Error> {
        self.send_keys(&[Key::CHANNEL_DOWN]).await;
        Ok(())
    }

    // ========== Sources and channels ==========

    /// Switches to an input source by name (`"TV"`, `"HDMI"`).
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownSource` if the name is not in the source
    /// list. No connection is opened in that case.
    pub async fn select_source(&self, source: &str) -> Result<(), Error> {
        let source: Source = source.parse().inspect_err(|e| {
            tracing::error!(host = %self.host, error = %e, "Unsupported source");
        })?;

        self.send_keys(&[source.key()]).await;
        Ok(())
    }

    /// Tunes to a channel by typing its number.
    ///
    /// Only [`MediaType::Channel`] is supported. `media_id` must be
    /// `major` or `major-minor` digits. Keys are spaced by
    /// [`KEY_PRESS_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnsupportedMediaType` or
    /// `ValueError::InvalidChannel`. Nothing is sent in either case.
    pub async fn play_media(&self, media_type: &MediaType, media_id: &str) -> Result<(), Error> {
        if *media_type != MediaType::Channel {
            tracing::error!(host = %self.host, media_type = %media_type, "Unsupported media type");
            return Err(ValueError::UnsupportedMediaType(media_type.to_string()).into());
        }

        let channel: Channel = media_id.parse().inspect_err(|e| {
            tracing::error!(host = %self.host, error = %e, "Media ID must be a channel number");
        })?;

        self.send_keys(&channel.keys()).await;
        Ok(())
    }

    // ========== Polling ==========

    /// Refreshes the power state by opening a probe connection.
    ///
    /// - Connection succeeds: on.
    /// - Access denied: on, and a [`DeviceEvent::ReauthRequired`] is published
    ///   once until a later connection succeeds.
    /// - Unhandled response: on.
    /// - Anything else: off.
    ///
    /// During the power-off window the TV is reported off without probing.
    pub async fn update(&self) -> PowerState {
        if self.state.read().power_off_in_progress() {
            self.set_power(PowerState::Off);
            return PowerState::Off;
        }

        let mut slot = self.remote.lock().await;
        self.close_remote(&mut slot).await;

        let power = match self.connector.connect().await {
            Ok(mut probe) => {
                if let Err(e) = probe.close().await {
                    tracing::debug!(host = %self.host, error = %e, "Failed to close probe connection");
                }
                self.state.write().clear_reauth();
                PowerState::On
            }
            Err(ProtocolError::AccessDenied) => {
                if self.state.write().request_reauth() {
                    tracing::warn!(host = %self.host, "Access denied by the TV, reauthorization required");
                    self.events.publish(DeviceEvent::ReauthRequired {
                        host: self.host.clone(),
                    });
                }
                PowerState::On
            }
            Err(e @ ProtocolError::UnhandledResponse(_)) => {
                tracing::debug!(host = %self.host, error = %e, "TV answered unexpectedly");
                PowerState::On
            }
            Err(e) => {
                tracing::debug!(host = %self.host, error = %e, "TV is unreachable");
                PowerState::Off
            }
        };
        drop(slot);

        self.set_power(power);
        power
    }

    // ========== Helpers ==========

    /// Sends `keys` over one connection, pausing between them, then closes it.
    async fn send_keys(&self, keys: &[Key]) {
        let mut slot = self.remote.lock().await;

        for (i, key) in keys.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(KEY_PRESS_TIMEOUT).await;
            }
            if self.send_key(&mut slot, key).await == Delivery::Abort {
                break;
            }
        }

        self.close_remote(&mut slot).await;
        drop(slot);

        if self.state.read().power_off_in_progress() {
            self.set_power(PowerState::Off);
        }
    }

    /// Sends one key, reconnecting once if the connection was dropped.
    async fn send_key(&self, slot: &mut Option<C::Remote>, key: &Key) -> Delivery {
        if self.state.read().power_off_in_progress() && !key.is_power_key() {
            tracing::info!(host = %self.host, key = %key, "TV is powering off, not sending key");
            return Delivery::Continue;
        }

        for attempt in 0..=RETRY_COUNT {
            let result = match slot {
                Some(remote) => remote.control(key).await,
                None => match self.connector.connect().await {
                    Ok(remote) => slot.insert(remote).control(key).await,
                    Err(e) => Err(e),
                },
            };

            match result {
                Ok(()) => {
                    self.set_power(PowerState::On);
                    return Delivery::Continue;
                }
                Err(e) if e.is_retryable() => {
                    tracing::debug!(host = %self.host, key = %key, attempt, error = %e, "Connection dropped");
                    *slot = None;
                }
                Err(e) if e.tv_answered() => {
                    tracing::debug!(host = %self.host, key = %key, error = %e, "Failed sending key");
                    *slot = None;
                    self.set_power(PowerState::On);
                    return Delivery::Abort;
                }
                Err(e) => {
                    tracing::debug!(host = %self.host, key = %key, error = %e, "Could not reach TV");
                    return Delivery::Abort;
                }
            }
        }

        // Retries exhausted on a connection that keeps dropping; the TV is there.
        self.set_power(PowerState::On);
        Delivery::Abort
    }

    async fn close_remote(&self, slot: &mut Option<C::Remote>) {
        if let Some(mut remote) = slot.take()
            && let Err(e) = remote.close().await
        {
            tracing::debug!(host = %self.host, error = %e, "Could not establish connection.");
        }
    }

    fn set_power(&self, power: PowerState) {
        let changed = self.state.write().set_power(power);
        if let Some(old) = changed {
            tracing::info!(host = %self.host, old = %old, new = %power, "TV power state changed");
            self.events.publish(DeviceEvent::StateChanged {
                host: self.host.clone(),
                old,
                new: power,
            });
        }
    }
}

impl<C> SamsungTv<C>
where
    C: Connector + 'static,
{
    /// Polls the TV every `interval` on a background task.
    ///
    /// The task ends when the returned handle is aborted or the last `Arc`
    /// to the TV is dropped.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::ZeroInterval` if `interval` is zero.
    pub fn spawn_polling(self: &Arc<Self>, interval: Duration) -> Result<JoinHandle<()>, Error> {
        if interval.is_zero() {
            return Err(ValueError::ZeroInterval.into());
        }

        let tv: Weak<Self> = Arc::downgrade(self);
        Ok(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(tv) = tv.upgrade() else {
                    break;
                };
                tv.update().await;
            }
        }))
    }
}
