// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device lifecycle states, events and the derived setup status.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a managed device.
///
/// Exactly one value is live at any time. The state is persisted through
/// the parameters store and mutated only by the
/// [`DeviceStateMachine`](super::DeviceStateMachine) in response to
/// validated events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceState {
    /// Device has not started provisioning.
    Unprovisioned,
    /// The setup flow is running.
    SetupInProgress,
    /// The kiosk application is installed and verified.
    SetupSucceeded,
    /// The setup flow failed terminally.
    SetupFailed,
    /// Device is locked into the kiosk application.
    Locked,
    /// Restrictions are lifted; the device is usable normally.
    Unlocked,
    /// Device has left the program; restrictions are permanently gone.
    Cleared,
}

/// Discrete events driving lifecycle transitions.
///
/// Events are transient and consumed immediately by the state machine.
/// `LockDevice`, `UnlockDevice` and `ClearDevice` originate from
/// user/operator action, never from the setup orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceEvent {
    /// Enrollment/provisioning preparation completed.
    ProvisioningSuccess,
    /// The setup task chain finished successfully.
    SetupSuccess,
    /// The setup task chain failed terminally.
    SetupFailure,
    /// Setup has been acknowledged complete; the device locks.
    SetupComplete,
    /// Operator locked the device.
    LockDevice,
    /// Operator unlocked the device.
    UnlockDevice,
    /// Operator cleared the device from the program.
    ClearDevice,
}

/// Coarse view of the setup flow exposed to UI surfaces.
///
/// Derived from [`DeviceState`] when the orchestrator is constructed and
/// updated by orchestrator callbacks afterwards; never independently
/// authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetupStatus {
    /// Setup has not been triggered yet.
    NotStarted,
    /// A setup flow is currently running.
    InProgress,
    /// Setup finished successfully.
    Finished,
    /// Setup failed terminally.
    Failed,
}

impl SetupStatus {
    /// Derives the setup status from a device lifecycle state.
    #[must_use]
    pub fn from_device_state(state: DeviceState) -> Self {
        match state {
            DeviceState::Unprovisioned | DeviceState::SetupInProgress => Self::NotStarted,
            DeviceState::SetupFailed => Self::Failed,
            DeviceState::SetupSucceeded
            | DeviceState::Locked
            | DeviceState::Unlocked
            | DeviceState::Cleared => Self::Finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_status_derivation() {
        assert_eq!(
            SetupStatus::from_device_state(DeviceState::Unprovisioned),
            SetupStatus::NotStarted
        );
        assert_eq!(
            SetupStatus::from_device_state(DeviceState::SetupInProgress),
            SetupStatus::NotStarted
        );
        assert_eq!(
            SetupStatus::from_device_state(DeviceState::SetupFailed),
            SetupStatus::Failed
        );
        assert_eq!(
            SetupStatus::from_device_state(DeviceState::SetupSucceeded),
            SetupStatus::Finished
        );
        assert_eq!(
            SetupStatus::from_device_state(DeviceState::Locked),
            SetupStatus::Finished
        );
    }

    #[test]
    fn device_state_serde_round_trip() {
        let json = serde_json::to_string(&DeviceState::SetupSucceeded).unwrap();
        let back: DeviceState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DeviceState::SetupSucceeded);
    }
}
