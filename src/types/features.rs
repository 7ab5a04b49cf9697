// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lock task feature flags.

use std::fmt;

/// Set of system UI features left available while restricted mode is
/// active.
///
/// The platform models these as a bit field; this type wraps the raw
/// bits so callers cannot pass arbitrary integers.
///
/// # Examples
///
/// ```
/// use kiosklock::types::LockTaskFeatures;
///
/// let features = LockTaskFeatures::default_set().with(LockTaskFeatures::NOTIFICATIONS);
/// assert!(features.contains(LockTaskFeatures::HOME));
/// assert!(features.contains(LockTaskFeatures::NOTIFICATIONS));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LockTaskFeatures(u32);

impl LockTaskFeatures {
    /// Status bar system info (clock, battery) stays visible.
    pub const SYSTEM_INFO: Self = Self(1);
    /// Keyguard (lock screen) remains enabled.
    pub const KEYGUARD: Self = Self(1 << 1);
    /// The home button remains usable.
    pub const HOME: Self = Self(1 << 2);
    /// The global actions (power) dialog remains available.
    pub const GLOBAL_ACTIONS: Self = Self(1 << 3);
    /// Notifications are shown inside restricted mode.
    pub const NOTIFICATIONS: Self = Self(1 << 4);

    /// The empty feature set.
    #[must_use]
    pub fn none() -> Self {
        Self(0)
    }

    /// The base feature set applied whenever restricted mode is enabled:
    /// system info, keyguard, home and global actions.
    #[must_use]
    pub fn default_set() -> Self {
        Self(Self::SYSTEM_INFO.0 | Self::KEYGUARD.0 | Self::HOME.0 | Self::GLOBAL_ACTIONS.0)
    }

    /// Returns this set with `other` added.
    #[must_use]
    pub fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `true` if every flag in `other` is present in this set.
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the raw bit representation handed to the platform.
    #[must_use]
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Display for LockTaskFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LockTaskFeatures({:#07b})", self.0)
    }
}
