// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity snapshot exposed to the hub.

use serde::{Deserialize, Serialize};

use crate::types::{PowerState, SupportedFeatures};

/// Device class reported for every Samsung TV.
pub const DEVICE_CLASS_TV: &str = "tv";

/// Point-in-time view of a TV as a media player entity.
///
/// # Examples
///
/// ```
/// use samsungtv_lib::state::TvState;
/// use samsungtv_lib::types::{PowerState, SupportedFeatures};
///
/// let state = TvState {
///     state: PowerState::On,
///     friendly_name: "Living room".to_string(),
///     supported_features: SupportedFeatures::SAMSUNGTV,
///     device_class: "tv".to_string(),
///     source_list: vec!["TV".to_string(), "HDMI".to_string()],
///     is_playing: false,
/// };
///
/// let json = serde_json::to_value(&state).unwrap();
/// assert_eq!(json["state"], "on");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TvState {
    /// Power state.
    pub state: PowerState,
    /// Display name.
    pub friendly_name: String,
    /// Supported media player features.
    pub supported_features: SupportedFeatures,
    /// Device class, always `"tv"`.
    pub device_class: String,
    /// Selectable input sources.
    pub source_list: Vec<String>,
    /// Whether the last playback key was play.
    pub is_playing: bool,
}
