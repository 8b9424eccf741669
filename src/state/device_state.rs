// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mutable state tracked by a TV adapter.

use std::time::Duration;

use tokio::time::Instant;

use crate::types::PowerState;

/// Tracked state of a TV.
///
/// Nothing here is persisted: the power state reflects the most recent poll
/// or command outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceState {
    power: PowerState,
    playing: bool,
    power_off_until: Option<Instant>,
    reauth_requested: bool,
}

impl DeviceState {
    /// Creates a new state. The TV is assumed on until the first poll.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the power state.
    #[must_use]
    pub fn power(&self) -> PowerState {
        self.power
    }

    /// Sets the power state, returning the previous one if it changed.
    pub fn set_power(&mut self, power: PowerState) -> Option<PowerState> {
        let old = std::mem::replace(&mut self.power, power);
        (old != power).then_some(old)
    }

    /// Returns `true` if the last playback key was play.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Records the playback state.
    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Starts the power-off window.
    pub fn start_power_off(&mut self, cooldown: Duration) {
        self.power_off_until = Some(Instant::now() + cooldown);
    }

    /// Ends the power-off window early.
    pub fn clear_power_off(&mut self) {
        self.power_off_until = None;
    }

    /// Returns `true` while the TV is still shutting down.
    #[must_use]
    pub fn power_off_in_progress(&self) -> bool {
        self.power_off_until
            .is_some_and(|until| until > Instant::now())
    }

    /// Marks a reauthorization request as sent. Returns `false` if one was already pending.
    pub fn request_reauth(&mut self) -> bool {
        !std::mem::replace(&mut self.reauth_requested, true)
    }

    /// Clears a pending reauthorization request after a successful connection.
    pub fn clear_reauth(&mut self) {
        self.reauth_requested = false;
    }
}
