// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Events emitted by a TV adapter.
//!
//! The hub reacts to two things it cannot learn from return values: the TV
//! changing power state during a poll, and the TV revoking this remote's
//! access (which needs a new pairing).
//!
//! # Examples
//!
//! ```
//! use samsungtv_lib::event::{DeviceEvent, EventBus};
//! use samsungtv_lib::types::PowerState;
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(DeviceEvent::StateChanged {
//!     host: "192.168.1.20".to_string(),
//!     old: PowerState::On,
//!     new: PowerState::Off,
//! });
//! assert!(rx.try_recv().is_ok());
//! ```

mod event_bus;

pub use event_bus::EventBus;

use serde::Serialize;

use crate::types::PowerState;

/// Event published by a TV adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceEvent {
    /// The reported power state changed.
    StateChanged {
        /// Host of the TV.
        host: String,
        /// Previous state.
        old: PowerState,
        /// New state.
        new: PowerState,
    },

    /// The TV denied access; the remote must be paired again.
    ReauthRequired {
        /// Host of the TV.
        host: String,
    },
}

impl DeviceEvent {
    /// Returns the host the event refers to.
    #[must_use]
    pub fn host(&self) -> &str {
        match self {
            Self::StateChanged { host, .. } | Self::ReauthRequired { host } => host,
        }
    }
}
