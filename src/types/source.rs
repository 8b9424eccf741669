// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Input sources and media types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;
use crate::types::Key;

/// An input source that can be selected with a single key.
///
/// # Examples
///
/// ```
/// use samsungtv_lib::types::{Key, Source};
///
/// let source: Source = "HDMI".parse().unwrap();
/// assert_eq!(source.key(), Key::HDMI);
/// assert!("INVALID".parse::<Source>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Source {
    /// Built-in tuner.
    Tv,
    /// HDMI input (the TV cycles through HDMI ports on repeated presses).
    Hdmi,
}

impl Source {
    /// All selectable sources, in display order.
    pub const ALL: [Self; 2] = [Self::Tv, Self::Hdmi];

    /// Returns the source name shown in source lists.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tv => "TV",
            Self::Hdmi => "HDMI",
        }
    }

    /// Returns the key that switches to this source.
    #[must_use]
    pub const fn key(&self) -> Key {
        match self {
            Self::Tv => Key::TV,
            Self::Hdmi => Key::HDMI,
        }
    }

    /// Returns the names of all sources.
    #[must_use]
    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|s| s.as_str().to_string()).collect()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| ValueError::UnknownSource(s.to_string()))
    }
}

/// Type of content passed to `play_media`.
///
/// Only [`MediaType::Channel`] can be played on a Samsung TV through the remote
/// protocol; the other variants exist so callers can forward what they receive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// A channel number.
    Channel,
    /// A URL.
    Url,
    /// Music.
    Music,
    /// Video.
    Video,
    /// Anything else, kept verbatim.
    #[serde(untagged)]
    Other(String),
}

impl MediaType {
    /// Returns the media type name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Channel => "channel",
            Self::Url => "url",
            Self::Music => "music",
            Self::Video => "video",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for MediaType {
    fn from(value: &str) -> Self {
        match value {
            "channel" => Self::Channel,
            "url" => Self::Url,
            "music" => Self::Music,
            "video" => Self::Video,
            other => Self::Other(other.to_string()),
        }
    }
}
