// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Media player feature flags.

use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Bit set of media player features, using the hub's numeric values.
///
/// # Examples
///
/// ```
/// use samsungtv_lib::types::SupportedFeatures;
///
/// let features = SupportedFeatures::SAMSUNGTV | SupportedFeatures::TURN_ON;
/// assert!(features.contains(SupportedFeatures::PLAY_MEDIA));
/// assert!(features.contains(SupportedFeatures::TURN_ON));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupportedFeatures(u32);

impl SupportedFeatures {
    /// Pause.
    pub const PAUSE: Self = Self(1);
    /// Relative volume steps.
    pub const VOLUME_STEP: Self = Self(1024);
    /// Mute.
    pub const VOLUME_MUTE: Self = Self(8);
    /// Previous track (channel down).
    pub const PREVIOUS_TRACK: Self = Self(16);
    /// Next track (channel up).
    pub const NEXT_TRACK: Self = Self(32);
    /// Turn on.
    pub const TURN_ON: Self = Self(128);
    /// Turn off.
    pub const TURN_OFF: Self = Self(256);
    /// Play media.
    pub const PLAY_MEDIA: Self = Self(512);
    /// Select source.
    pub const SELECT_SOURCE: Self = Self(2048);
    /// Play.
    pub const PLAY: Self = Self(16384);

    /// Features every Samsung TV supports. `TURN_ON` depends on configuration.
    pub const SAMSUNGTV: Self = Self(
        Self::PAUSE.0
            | Self::VOLUME_STEP.0
            | Self::VOLUME_MUTE.0
            | Self::PREVIOUS_TRACK.0
            | Self::SELECT_SOURCE.0
            | Self::NEXT_TRACK.0
            | Self::TURN_OFF.0
            | Self::PLAY.0
            | Self::PLAY_MEDIA.0,
    );

    /// Returns the raw bit value.
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Returns `true` if all bits of `other` are set.
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SupportedFeatures {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SupportedFeatures {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
