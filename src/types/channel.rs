// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Channel numbers and their keypress sequences.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;
use crate::types::Key;

/// A TV channel number, either `major` or `major-minor` (e.g. `"576"`, `"2-4"`).
///
/// The TV has no "tune to" command, so a channel is entered the way a person
/// would: every digit as a keypress, `KEY_PLUS100` as the sub-channel
/// separator and `KEY_ENTER` to confirm.
///
/// # Examples
///
/// ```
/// use samsungtv_lib::types::{Channel, Key};
///
/// let channel: Channel = "2-4".parse().unwrap();
/// let keys: Vec<_> = channel.keys().iter().map(Key::as_str).map(String::from).collect();
/// assert_eq!(keys, ["KEY_2", "KEY_PLUS100", "KEY_4", "KEY_ENTER"]);
///
/// assert!("-4".parse::<Channel>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    major: String,
    minor: Option<String>,
}

impl Channel {
    /// Returns the major channel digits.
    #[must_use]
    pub fn major(&self) -> &str {
        &self.major
    }

    /// Returns the sub-channel digits, if any.
    #[must_use]
    pub fn minor(&self) -> Option<&str> {
        self.minor.as_deref()
    }

    /// Returns the keys that tune the TV to this channel, ending with `KEY_ENTER`.
    #[must_use]
    pub fn keys(&self) -> Vec<Key> {
        let mut keys: Vec<Key> = digit_keys(&self.major).collect();
        if let Some(minor) = &self.minor {
            keys.push(Key::PLUS100);
            keys.extend(digit_keys(minor));
        }
        keys.push(Key::ENTER);
        keys
    }
}

// Only called on strings already validated as ASCII digits.
fn digit_keys(digits: &str) -> impl Iterator<Item = Key> + '_ {
    digits
        .bytes()
        .filter_map(|b| Key::digit(b.wrapping_sub(b'0')).ok())
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for Channel {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::InvalidChannel(s.to_string());

        let (major, minor) = match s.split_once('-') {
            Some((major, minor)) => (major, Some(minor)),
            None => (s, None),
        };

        if !is_digits(major) {
            return Err(invalid());
        }
        if let Some(minor) = minor
            && !is_digits(minor)
        {
            return Err(invalid());
        }

        Ok(Self {
            major: major.to_string(),
            minor: minor.map(str::to_string),
        })
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.minor {
            Some(minor) => write!(f, "{}-{minor}", self.major),
            None => f.write_str(&self.major),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_names(channel: &str) -> Vec<String> {
        channel
            .parse::<Channel>()
            .unwrap()
            .keys()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn major_only() {
        assert_eq!(key_names("576"), ["KEY_5", "KEY_7", "KEY_6", "KEY_ENTER"]);
    }

    #[test]
    fn major_and_minor() {
        assert_eq!(
            key_names("2-4"),
            ["KEY_2", "KEY_PLUS100", "KEY_4", "KEY_ENTER"]
        );
    }

    #[test]
    fn multi_digit_minor() {
        assert_eq!(
            key_names("12-30"),
            ["KEY_1", "KEY_2", "KEY_PLUS100", "KEY_3", "KEY_0", "KEY_ENTER"]
        );
    }

    #[test]
    fn rejects_malformed_channels() {
        for input in ["", "-4", "2-", "-", "https://example.com", "1-2-3", " 5", "+5", "٣"] {
            assert_eq!(
                input.parse::<Channel>(),
                Err(ValueError::InvalidChannel(input.to_string())),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn accessors_and_display() {
        let channel: Channel = "7-1".parse().unwrap();
        assert_eq!(channel.major(), "7");
        assert_eq!(channel.minor(), Some("1"));
        assert_eq!(channel.to_string(), "7-1");

        let channel: Channel = "007".parse().unwrap();
        assert_eq!(channel.minor(), None);
        assert_eq!(channel.to_string(), "007");
    }
}
