// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state of a TV.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reported power state of the TV.
///
/// The TV never reports its state directly. It is `On` when a remote
/// connection can be established (or the TV answers at all) and `Off` otherwise.
///
/// # Examples
///
/// ```
/// use samsungtv_lib::types::PowerState;
///
/// assert_eq!(PowerState::On.as_str(), "on");
/// assert_eq!(PowerState::from(false), PowerState::Off);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    /// TV is off or unreachable.
    Off,
    /// TV is on.
    #[default]
    On,
}

impl PowerState {
    /// Returns the state string used by the hub.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
        }
    }

    /// Returns `true` if the TV is on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_on() {
        assert_eq!(PowerState::default(), PowerState::On);
    }

    #[test]
    fn from_bool() {
        assert_eq!(PowerState::from(true), PowerState::On);
        assert!(!PowerState::from(false).is_on());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&PowerState::Off).unwrap(), "\"off\"");
    }
}
