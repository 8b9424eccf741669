// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TV state tracking.
//!
//! [`DeviceState`] is the mutable state an adapter keeps between calls.
//! [`TvState`] is the serializable snapshot handed to the hub.

mod device_state;
mod tv_state;

pub use device_state::DeviceState;
pub use tv_state::{DEVICE_CLASS_TV, TvState};
