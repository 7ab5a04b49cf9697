// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory global parameters store.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::StorageError;
use crate::state::DeviceState;

use super::GlobalParameters;

/// In-process implementation of [`GlobalParameters`].
///
/// Holds everything under a single `RwLock`. Useful as a default for
/// hosts without a dedicated storage service and as the store used by
/// the crate's own tests. Values do not survive process restart.
#[derive(Debug, Default)]
pub struct MemoryParameters {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    device_state: Option<DeviceState>,
    lock_task_allowlist: Vec<String>,
    home_override_package: Option<String>,
    enrollment_token: Option<String>,
    registered_device_id: Option<String>,
    need_check_in: bool,
    provision_forced: bool,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            device_state: None,
            lock_task_allowlist: Vec::new(),
            home_override_package: None,
            enrollment_token: None,
            registered_device_id: None,
            // A device that has never talked to the backend still owes a
            // check-in.
            need_check_in: true,
            provision_forced: false,
        }
    }
}

impl MemoryParameters {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GlobalParameters for MemoryParameters {
    async fn device_state(&self) -> Result<Option<DeviceState>, StorageError> {
        Ok(self.inner.read().device_state)
    }

    async fn set_device_state(&self, state: DeviceState) -> Result<(), StorageError> {
        self.inner.write().device_state = Some(state);
        Ok(())
    }

    async fn lock_task_allowlist(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.inner.read().lock_task_allowlist.clone())
    }

    async fn set_lock_task_allowlist(&self, allowlist: Vec<String>) -> Result<(), StorageError> {
        self.inner.write().lock_task_allowlist = allowlist;
        Ok(())
    }

    async fn package_overriding_home(&self) -> Result<Option<String>, StorageError> {
        Ok(self.inner.read().home_override_package.clone())
    }

    async fn set_package_overriding_home(
        &self,
        package: Option<String>,
    ) -> Result<(), StorageError> {
        self.inner.write().home_override_package = package;
        Ok(())
    }

    async fn enrollment_token(&self) -> Result<Option<String>, StorageError> {
        Ok(self.inner.read().enrollment_token.clone())
    }

    async fn set_enrollment_token(&self, token: String) -> Result<(), StorageError> {
        self.inner.write().enrollment_token = Some(token);
        Ok(())
    }

    async fn registered_device_id(&self) -> Result<Option<String>, StorageError> {
        Ok(self.inner.read().registered_device_id.clone())
    }

    async fn set_registered_device_id(&self, id: String) -> Result<(), StorageError> {
        self.inner.write().registered_device_id = Some(id);
        Ok(())
    }

    async fn need_check_in(&self) -> Result<bool, StorageError> {
        Ok(self.inner.read().need_check_in)
    }

    async fn set_need_check_in(&self, need: bool) -> Result<(), StorageError> {
        self.inner.write().need_check_in = need;
        Ok(())
    }

    async fn is_provision_forced(&self) -> Result<bool, StorageError> {
        Ok(self.inner.read().provision_forced)
    }

    async fn set_provision_forced(&self, forced: bool) -> Result<(), StorageError> {
        self.inner.write().provision_forced = forced;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn device_state_round_trip() {
        let store = MemoryParameters::new();
        assert_eq!(store.device_state().await.unwrap(), None);

        store
            .set_device_state(DeviceState::SetupInProgress)
            .await
            .unwrap();
        assert_eq!(
            store.device_state().await.unwrap(),
            Some(DeviceState::SetupInProgress)
        );
    }

    #[tokio::test]
    async fn allowlist_defaults_to_empty() {
        let store = MemoryParameters::new();
        assert!(store.lock_task_allowlist().await.unwrap().is_empty());

        store
            .set_lock_task_allowlist(vec!["com.example.kiosk".to_string()])
            .await
            .unwrap();
        assert_eq!(
            store.lock_task_allowlist().await.unwrap(),
            ["com.example.kiosk"]
        );
    }

    #[tokio::test]
    async fn home_override_can_be_cleared() {
        let store = MemoryParameters::new();
        store
            .set_package_overriding_home(Some("com.example.fallback".to_string()))
            .await
            .unwrap();
        assert_eq!(
            store.package_overriding_home().await.unwrap().as_deref(),
            Some("com.example.fallback")
        );

        store.set_package_overriding_home(None).await.unwrap();
        assert_eq!(store.package_overriding_home().await.unwrap(), None);
    }

    #[tokio::test]
    async fn fresh_store_needs_check_in() {
        let store = MemoryParameters::new();
        assert!(store.need_check_in().await.unwrap());
        assert!(!store.is_provision_forced().await.unwrap());

        store.set_need_check_in(false).await.unwrap();
        assert!(!store.need_check_in().await.unwrap());
    }

    #[tokio::test]
    async fn identity_values_round_trip() {
        let store = MemoryParameters::new();
        store
            .set_enrollment_token("token-1".to_string())
            .await
            .unwrap();
        store
            .set_registered_device_id("device-9".to_string())
            .await
            .unwrap();

        assert_eq!(
            store.enrollment_token().await.unwrap().as_deref(),
            Some("token-1")
        );
        assert_eq!(
            store.registered_device_id().await.unwrap().as_deref(),
            Some("device-9")
        );
    }
}
