// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host platform capabilities.
//!
//! The crate decides *what* policy should be active and *when*; the host
//! platform enforces it. These traits are the enforcement seam: a host
//! embeds the crate by implementing them on top of its device-policy,
//! package-query and activity-launch facilities.

use std::fmt;

use crate::types::{ComponentName, LockTaskFeatures};

/// System intent actions the allowlist composer resolves handlers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemAction {
    /// The dial action, handled by the system dialer.
    Dial,
    /// The settings action, handled by the system settings app.
    Settings,
}

impl fmt::Display for SystemAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dial => write!(f, "dial"),
            Self::Settings => write!(f, "settings"),
        }
    }
}

/// Restricted-mode (lock task) enforcement controller.
///
/// Mirrors the platform's device-policy surface: package allowlist,
/// feature flags and the persistent preferred home activity. Setters are
/// infallible: the platform applies whatever it is handed; admission
/// decisions go through [`is_activity_permitted`](Self::is_activity_permitted)
/// before a component is handed over.
pub trait RestrictedMode: Send + Sync {
    /// Programs the set of packages permitted to run in restricted mode.
    ///
    /// An empty list disables the restriction entirely.
    fn set_allowed_packages(&self, packages: &[String]);

    /// Programs the restricted-mode feature flags.
    fn set_feature_flags(&self, features: LockTaskFeatures);

    /// Installs a persistent preferred-activity registration for the
    /// home intent, pointing at `activity`.
    fn set_preferred_home_activity(&self, activity: &ComponentName);

    /// Clears any persistent preferred-activity registration owned by
    /// `package`.
    fn clear_preferred_home_activity(&self, package: &str);

    /// Returns `true` if `activity`'s package is currently permitted
    /// under restricted mode.
    fn is_activity_permitted(&self, activity: &ComponentName) -> bool;
}

/// Read-only system component resolution.
pub trait SystemServices: Send + Sync {
    /// Resolves the system-privileged package handling `action`, if any.
    fn resolve_system_activity(&self, action: SystemAction) -> Option<String>;

    /// Returns the active input method as the platform's raw flattened
    /// component string, if one is set.
    fn default_input_method(&self) -> Option<String>;

    /// Returns the default cell-broadcast-receiver package, if any.
    fn default_cell_broadcast_receiver(&self) -> Option<String>;

    /// Returns the default dialer package, if any.
    fn default_dialer_package(&self) -> Option<String>;

    /// Returns `true` if `package` is currently installed.
    fn is_package_installed(&self, package: &str) -> bool;
}

/// Administrative device actions.
pub trait DeviceAdmin: Send + Sync {
    /// Launches the kiosk application in locked (restricted) mode.
    ///
    /// Returns `true` on success. Failure is reported, not raised; the
    /// caller decides whether it is fatal.
    fn launch_kiosk_in_locked_mode(&self) -> bool;

    /// Wipes the device's data. Irreversible.
    fn wipe_data(&self);
}
