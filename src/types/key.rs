// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remote control key codes.

use std::borrow::Cow;
use std::fmt;

use crate::error::ValueError;

/// A remote control key as understood by the TV (`KEY_VOLUP`, `KEY_5`, ...).
///
/// Both transports send the key name verbatim, so the well-known keys are
/// provided as constants and anything else can be built with [`Key::custom`].
///
/// # Examples
///
/// ```
/// use samsungtv_lib::types::Key;
///
/// assert_eq!(Key::VOLUME_UP.as_str(), "KEY_VOLUP");
/// assert_eq!(Key::digit(5).unwrap().as_str(), "KEY_5");
/// assert!(Key::digit(10).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key(Cow<'static, str>);

impl Key {
    /// Power toggle, used by WebSocket TVs to switch off.
    pub const POWER: Self = Self::from_static("KEY_POWER");
    /// Power off, used by legacy TVs.
    pub const POWER_OFF: Self = Self::from_static("KEY_POWEROFF");
    /// Volume up.
    pub const VOLUME_UP: Self = Self::from_static("KEY_VOLUP");
    /// Volume down.
    pub const VOLUME_DOWN: Self = Self::from_static("KEY_VOLDOWN");
    /// Mute toggle.
    pub const MUTE: Self = Self::from_static("KEY_MUTE");
    /// Play.
    pub const PLAY: Self = Self::from_static("KEY_PLAY");
    /// Pause.
    pub const PAUSE: Self = Self::from_static("KEY_PAUSE");
    /// Channel up.
    pub const CHANNEL_UP: Self = Self::from_static("KEY_CHUP");
    /// Channel down.
    pub const CHANNEL_DOWN: Self = Self::from_static("KEY_CHDOWN");
    /// Confirms a typed channel number.
    pub const ENTER: Self = Self::from_static("KEY_ENTER");
    /// Separator between major and minor channel numbers.
    pub const PLUS100: Self = Self::from_static("KEY_PLUS100");
    /// TV tuner source.
    pub const TV: Self = Self::from_static("KEY_TV");
    /// HDMI source.
    pub const HDMI: Self = Self::from_static("KEY_HDMI");

    const DIGITS: [&'static str; 10] = [
        "KEY_0", "KEY_1", "KEY_2", "KEY_3", "KEY_4", "KEY_5", "KEY_6", "KEY_7", "KEY_8", "KEY_9",
    ];

    const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Creates a key from an arbitrary key name.
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Returns the key for a single digit.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidDigit` if `digit` is greater than 9.
    pub fn digit(digit: u8) -> Result<Self, ValueError> {
        Self::DIGITS
            .get(usize::from(digit))
            .map(|name| Self::from_static(name))
            .ok_or(ValueError::InvalidDigit(digit))
    }

    /// Returns the key name sent over the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the keys that switch the TV off.
    #[must_use]
    pub fn is_power_key(&self) -> bool {
        *self == Self::POWER || *self == Self::POWER_OFF
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_keys() {
        for d in 0..=9u8 {
            assert_eq!(Key::digit(d).unwrap().as_str(), format!("KEY_{d}"));
        }
    }

    #[test]
    fn digit_out_of_range() {
        assert_eq!(Key::digit(10), Err(ValueError::InvalidDigit(10)));
    }

    #[test]
    fn custom_key_equals_constant() {
        assert_eq!(Key::custom("KEY_VOLUP"), Key::VOLUME_UP);
    }

    #[test]
    fn power_keys() {
        assert!(Key::POWER.is_power_key());
        assert!(Key::POWER_OFF.is_power_key());
        assert!(!Key::VOLUME_UP.is_power_key());
    }

    #[test]
    fn display() {
        assert_eq!(Key::ENTER.to_string(), "KEY_ENTER");
    }
}
