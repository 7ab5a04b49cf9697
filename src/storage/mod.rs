// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persisted global parameters.
//!
//! The agent's durable state lives in an external key/value store that is
//! only reachable through an asynchronous client. [`GlobalParameters`] is
//! that client's capability trait; the crate ships [`MemoryParameters`]
//! as an embeddable in-process implementation.
//!
//! Every accessor returns `Result<_, StorageError>`: store failures are
//! generic I/O failures to the rest of the crate, never panics.

mod memory;

pub use memory::MemoryParameters;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::state::DeviceState;

/// Store key names, used in error reporting.
pub mod keys {
    /// Current device lifecycle state.
    pub const DEVICE_STATE: &str = "device-state";
    /// Composed restricted-mode allowlist.
    pub const LOCK_TASK_ALLOWLIST: &str = "lock-task-allowlist";
    /// Package currently overriding the home activity.
    pub const HOME_OVERRIDE_PACKAGE: &str = "home-override-package";
    /// Enrollment token assigned by the backend.
    pub const ENROLLMENT_TOKEN: &str = "enrollment-token";
    /// Device identifier registered with the backend.
    pub const REGISTERED_DEVICE_ID: &str = "registered-device-id";
    /// Whether a backend check-in is still required.
    pub const NEED_CHECK_IN: &str = "need-check-in";
    /// Whether provisioning is forced without delay.
    pub const PROVISION_FORCED: &str = "provision-forced";
}

/// Asynchronous client for the agent's persisted global parameters.
///
/// Implementations wrap whatever storage the host platform provides. All
/// methods are cancel-safe reads/writes of independent keys; the crate
/// never assumes cross-key atomicity.
#[async_trait]
pub trait GlobalParameters: Send + Sync {
    /// Reads the persisted device state, if one was ever written.
    async fn device_state(&self) -> Result<Option<DeviceState>, StorageError>;

    /// Durably writes the device state.
    async fn set_device_state(&self, state: DeviceState) -> Result<(), StorageError>;

    /// Reads the persisted restricted-mode allowlist.
    ///
    /// Returns an empty list when none has been composed yet.
    async fn lock_task_allowlist(&self) -> Result<Vec<String>, StorageError>;

    /// Persists the restricted-mode allowlist.
    async fn set_lock_task_allowlist(&self, allowlist: Vec<String>) -> Result<(), StorageError>;

    /// Reads the package currently overriding the home activity, if any.
    async fn package_overriding_home(&self) -> Result<Option<String>, StorageError>;

    /// Records (or clears, with `None`) the home-override package.
    async fn set_package_overriding_home(
        &self,
        package: Option<String>,
    ) -> Result<(), StorageError>;

    /// Reads the enrollment token assigned by the backend, if any.
    async fn enrollment_token(&self) -> Result<Option<String>, StorageError>;

    /// Stores the enrollment token.
    async fn set_enrollment_token(&self, token: String) -> Result<(), StorageError>;

    /// Reads the backend-registered device identifier, if any.
    async fn registered_device_id(&self) -> Result<Option<String>, StorageError>;

    /// Stores the backend-registered device identifier.
    async fn set_registered_device_id(&self, id: String) -> Result<(), StorageError>;

    /// Returns whether a backend check-in is still required.
    async fn need_check_in(&self) -> Result<bool, StorageError>;

    /// Updates the check-in-required flag.
    async fn set_need_check_in(&self, need: bool) -> Result<(), StorageError>;

    /// Returns whether provisioning is forced without delay.
    async fn is_provision_forced(&self) -> Result<bool, StorageError>;

    /// Updates the forced-provisioning flag.
    async fn set_provision_forced(&self, forced: bool) -> Result<(), StorageError>;
}
