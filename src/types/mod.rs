// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Samsung TV control.
//!
//! # Types
//!
//! - [`Key`] - Remote control key names (`KEY_VOLUP`, `KEY_5`, ...)
//! - [`Channel`] - Channel numbers and the keypresses that select them
//! - [`Source`] - Input sources selectable with a single key
//! - [`MediaType`] - Content type passed to `play_media`
//! - [`PowerState`] - Reported on/off state
//! - [`SupportedFeatures`] - Media player feature flags

mod channel;
mod features;
mod key;
mod power;
mod source;

pub use channel::Channel;
pub use features::SupportedFeatures;
pub use key::Key;
pub use power::PowerState;
pub use source::{MediaType, Source};
