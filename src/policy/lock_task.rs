// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lock task (restricted mode) policy handler.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::config::ProvisionConfig;
use crate::platform::{RestrictedMode, SystemServices};
use crate::policy::allowlist::push_unique;
use crate::state::DeviceState;
use crate::storage::GlobalParameters;
use crate::types::{ComponentName, LockTaskFeatures};

use super::{PolicyHandler, PolicyResult, compose_allowlist};

/// Applies restricted-mode policy for each lifecycle state.
///
/// For every committed transition the handler decides between three
/// regimes: recompose-and-enable (setup just succeeded), disable
/// (unlocked or cleared), and plain enable (everything else). While
/// setup is in progress it additionally pins a fallback activity as the
/// preferred home, so a reboot mid-setup lands somewhere controlled.
pub struct LockTaskPolicyHandler {
    config: ProvisionConfig,
    store: Arc<dyn GlobalParameters>,
    restricted: Arc<dyn RestrictedMode>,
    system: Arc<dyn SystemServices>,
}

impl LockTaskPolicyHandler {
    /// Creates the handler from its collaborators.
    #[must_use]
    pub fn new(
        config: ProvisionConfig,
        store: Arc<dyn GlobalParameters>,
        restricted: Arc<dyn RestrictedMode>,
        system: Arc<dyn SystemServices>,
    ) -> Self {
        Self {
            config,
            store,
            restricted,
            system,
        }
    }

    /// Recomposes the allowlist and persists it as canonical.
    ///
    /// A store write failure is logged and skipped; the freshly composed
    /// list is still applied by the enable pass that follows, it just
    /// will not survive a restart.
    async fn compose_and_persist_allowlist(&self) {
        let allowlist = compose_allowlist(&self.config, self.system.as_ref());
        info!(len = allowlist.len(), "composed lock task allowlist");
        if let Err(err) = self.store.set_lock_task_allowlist(allowlist).await {
            warn!(%err, "failed to persist composed allowlist");
        }
    }

    /// Enables restricted mode: feature flags plus the persisted
    /// allowlist with the default dialer appended.
    async fn enable_lock_task(&self) {
        let mut features = LockTaskFeatures::default_set();
        if self.config.notifications_in_lock_task() {
            features = features.with(LockTaskFeatures::NOTIFICATIONS);
        }
        self.restricted.set_feature_flags(features);
        self.update_allowlist().await;
    }

    /// Programs the platform allowlist from the persisted list, falling
    /// back to the static base list when nothing was composed yet.
    async fn update_allowlist(&self) {
        let mut allowlist = match self.store.lock_task_allowlist().await {
            Ok(list) => list,
            Err(err) => {
                warn!(%err, "failed to read persisted allowlist");
                Vec::new()
            }
        };
        if allowlist.is_empty() {
            allowlist = self.config.base_allowlist().to_vec();
        }

        if let Some(dialer) = self.system.default_dialer_package() {
            if !allowlist.contains(&dialer) {
                info!(%dialer, "adding default dialer to allowlist");
                push_unique(&mut allowlist, dialer);
            }
        }

        info!(?allowlist, "updating lock task allowlist");
        self.restricted.set_allowed_packages(&allowlist);
    }

    /// Disables restricted mode and clears any home-activity override.
    async fn disable_lock_task(&self) {
        self.restricted.set_allowed_packages(&[]);
        info!("cleared lock task allowlist");

        let current = match self.store.package_overriding_home().await {
            Ok(package) => package,
            Err(err) => {
                warn!(%err, "failed to read home override record");
                None
            }
        };
        if let Some(package) = current {
            self.restricted.clear_preferred_home_activity(&package);
            if let Err(err) = self.store.set_package_overriding_home(None).await {
                warn!(%err, "failed to clear home override record");
            }
        }
    }

    /// Installs `activity` as the persistent preferred home activity.
    ///
    /// The currently recorded override is only cleared after the new
    /// activity is confirmed permitted under restricted mode; a rejected
    /// candidate leaves the old override untouched.
    async fn set_preferred_home_activity(&self, activity: &ComponentName) -> bool {
        if !self.restricted.is_activity_permitted(activity) {
            error!(
                package = activity.package(),
                "activity not permitted in lock task mode"
            );
            return false;
        }

        let current = match self.store.package_overriding_home().await {
            Ok(package) => package,
            Err(err) => {
                warn!(%err, "failed to read home override record");
                None
            }
        };
        if let Some(package) = current {
            self.restricted.clear_preferred_home_activity(&package);
        }
        self.restricted.set_preferred_home_activity(activity);
        if let Err(err) = self
            .store
            .set_package_overriding_home(Some(activity.package().to_string()))
            .await
        {
            warn!(%err, "failed to record home override package");
        }

        true
    }
}

#[async_trait]
impl PolicyHandler for LockTaskPolicyHandler {
    async fn set_policy_for_state(&self, state: DeviceState) -> PolicyResult {
        if state == DeviceState::SetupSucceeded {
            self.compose_and_persist_allowlist().await;
        }

        if matches!(state, DeviceState::Unlocked | DeviceState::Cleared) {
            self.disable_lock_task().await;
        } else {
            self.enable_lock_task().await;
        }

        if state == DeviceState::SetupInProgress {
            let activity = match ComponentName::unflatten(self.config.setup_failed_activity()) {
                Ok(activity) => activity,
                Err(err) => {
                    error!(%err, "activity to override home not found");
                    return PolicyResult::Failure;
                }
            };

            if !self.set_preferred_home_activity(&activity).await {
                return PolicyResult::Failure;
            }
            info!(%activity, "set package override home");
        }

        PolicyResult::Success
    }

    async fn is_compliant(&self, _state: DeviceState) -> bool {
        // TODO: verify the applied platform policy against the expected
        // state on boot instead of assuming compliance.
        true
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use crate::platform::SystemAction;
    use crate::storage::MemoryParameters;

    use super::*;

    #[derive(Default)]
    struct FakeRestricted {
        allowed: Mutex<Vec<Vec<String>>>,
        features: Mutex<Vec<LockTaskFeatures>>,
        preferred: Mutex<Vec<ComponentName>>,
        cleared: Mutex<Vec<String>>,
        deny_activities: Vec<String>,
    }

    impl RestrictedMode for FakeRestricted {
        fn set_allowed_packages(&self, packages: &[String]) {
            self.allowed.lock().push(packages.to_vec());
        }

        fn set_feature_flags(&self, features: LockTaskFeatures) {
            self.features.lock().push(features);
        }

        fn set_preferred_home_activity(&self, activity: &ComponentName) {
            self.preferred.lock().push(activity.clone());
        }

        fn clear_preferred_home_activity(&self, package: &str) {
            self.cleared.lock().push(package.to_string());
        }

        fn is_activity_permitted(&self, activity: &ComponentName) -> bool {
            !self.deny_activities.contains(&activity.package().to_string())
        }
    }

    struct FakeSystem;

    impl SystemServices for FakeSystem {
        fn resolve_system_activity(&self, action: SystemAction) -> Option<String> {
            match action {
                SystemAction::Dial => Some("com.android.dialer".to_string()),
                SystemAction::Settings => Some("com.android.settings".to_string()),
            }
        }

        fn default_input_method(&self) -> Option<String> {
            Some("com.android.ime/.LatinIme".to_string())
        }

        fn default_cell_broadcast_receiver(&self) -> Option<String> {
            None
        }

        fn default_dialer_package(&self) -> Option<String> {
            Some("com.android.dialer".to_string())
        }

        fn is_package_installed(&self, _package: &str) -> bool {
            true
        }
    }

    fn config() -> ProvisionConfig {
        ProvisionConfig::new()
            .with_base_allowlist(["com.android.systemui"])
            .with_kiosk_package("com.example.kiosk")
            .with_setup_failed_activity("com.example.agent/.SetupFailedActivity")
    }

    fn handler(
        config: ProvisionConfig,
        store: Arc<MemoryParameters>,
        restricted: Arc<FakeRestricted>,
    ) -> LockTaskPolicyHandler {
        LockTaskPolicyHandler::new(config, store, restricted, Arc::new(FakeSystem))
    }

    #[tokio::test]
    async fn setup_succeeded_composes_before_enabling() {
        let store = Arc::new(MemoryParameters::new());
        let restricted = Arc::new(FakeRestricted::default());
        let handler = handler(config(), store.clone(), restricted.clone());

        let result = handler
            .set_policy_for_state(DeviceState::SetupSucceeded)
            .await;

        assert_eq!(result, PolicyResult::Success);
        // The composed list was persisted and then applied.
        let persisted = store.lock_task_allowlist().await.unwrap();
        assert!(persisted.contains(&"com.example.kiosk".to_string()));
        let applied = restricted.allowed.lock();
        assert_eq!(applied.len(), 1);
        assert!(applied[0].contains(&"com.example.kiosk".to_string()));
        assert!(applied[0].contains(&"com.android.dialer".to_string()));
    }

    #[tokio::test]
    async fn unlocked_clears_allowlist_and_override() {
        let store = Arc::new(MemoryParameters::new());
        store
            .set_package_overriding_home(Some("com.example.agent".to_string()))
            .await
            .unwrap();
        let restricted = Arc::new(FakeRestricted::default());
        let handler = handler(config(), store.clone(), restricted.clone());

        let result = handler.set_policy_for_state(DeviceState::Unlocked).await;

        assert_eq!(result, PolicyResult::Success);
        assert_eq!(restricted.allowed.lock().as_slice(), [Vec::<String>::new()]);
        assert_eq!(restricted.cleared.lock().as_slice(), ["com.example.agent"]);
        assert_eq!(store.package_overriding_home().await.unwrap(), None);
    }

    #[tokio::test]
    async fn cleared_without_override_only_clears_allowlist() {
        let store = Arc::new(MemoryParameters::new());
        let restricted = Arc::new(FakeRestricted::default());
        let handler = handler(config(), store, restricted.clone());

        handler.set_policy_for_state(DeviceState::Cleared).await;

        assert!(restricted.cleared.lock().is_empty());
        assert_eq!(restricted.allowed.lock().as_slice(), [Vec::<String>::new()]);
    }

    #[tokio::test]
    async fn locked_enables_with_default_features() {
        let store = Arc::new(MemoryParameters::new());
        let restricted = Arc::new(FakeRestricted::default());
        let handler = handler(config(), store, restricted.clone());

        handler.set_policy_for_state(DeviceState::Locked).await;

        assert_eq!(
            restricted.features.lock().as_slice(),
            [LockTaskFeatures::default_set()]
        );
        // No composed list persisted yet: falls back to the base list
        // plus the default dialer.
        let applied = restricted.allowed.lock();
        assert!(applied[0].contains(&"com.android.systemui".to_string()));
        assert!(applied[0].contains(&"com.android.dialer".to_string()));
    }

    #[tokio::test]
    async fn notifications_flag_follows_configuration() {
        let store = Arc::new(MemoryParameters::new());
        let restricted = Arc::new(FakeRestricted::default());
        let handler = handler(
            config().with_notifications_in_lock_task(true),
            store,
            restricted.clone(),
        );

        handler.set_policy_for_state(DeviceState::Locked).await;

        assert!(restricted.features.lock()[0].contains(LockTaskFeatures::NOTIFICATIONS));
    }

    #[tokio::test]
    async fn setup_in_progress_installs_home_override() {
        let store = Arc::new(MemoryParameters::new());
        let restricted = Arc::new(FakeRestricted::default());
        let handler = handler(config(), store.clone(), restricted.clone());

        let result = handler
            .set_policy_for_state(DeviceState::SetupInProgress)
            .await;

        assert_eq!(result, PolicyResult::Success);
        assert_eq!(restricted.preferred.lock().len(), 1);
        assert_eq!(
            store.package_overriding_home().await.unwrap().as_deref(),
            Some("com.example.agent")
        );
    }

    #[tokio::test]
    async fn setup_in_progress_replaces_previous_override() {
        let store = Arc::new(MemoryParameters::new());
        store
            .set_package_overriding_home(Some("com.old.launcher".to_string()))
            .await
            .unwrap();
        let restricted = Arc::new(FakeRestricted::default());
        let handler = handler(config(), store.clone(), restricted.clone());

        handler
            .set_policy_for_state(DeviceState::SetupInProgress)
            .await;

        assert_eq!(restricted.cleared.lock().as_slice(), ["com.old.launcher"]);
        assert_eq!(
            store.package_overriding_home().await.unwrap().as_deref(),
            Some("com.example.agent")
        );
    }

    #[tokio::test]
    async fn rejected_home_activity_fails_and_keeps_old_override() {
        let store = Arc::new(MemoryParameters::new());
        store
            .set_package_overriding_home(Some("com.old.launcher".to_string()))
            .await
            .unwrap();
        let restricted = Arc::new(FakeRestricted {
            deny_activities: vec!["com.example.agent".to_string()],
            ..FakeRestricted::default()
        });
        let handler = handler(config(), store.clone(), restricted.clone());

        let result = handler
            .set_policy_for_state(DeviceState::SetupInProgress)
            .await;

        assert_eq!(result, PolicyResult::Failure);
        assert!(restricted.preferred.lock().is_empty());
        assert!(restricted.cleared.lock().is_empty());
        assert_eq!(
            store.package_overriding_home().await.unwrap().as_deref(),
            Some("com.old.launcher")
        );
    }

    #[tokio::test]
    async fn unparsable_fallback_activity_fails() {
        let store = Arc::new(MemoryParameters::new());
        let restricted = Arc::new(FakeRestricted::default());
        let handler = handler(
            config().with_setup_failed_activity("not-a-component"),
            store,
            restricted,
        );

        let result = handler
            .set_policy_for_state(DeviceState::SetupInProgress)
            .await;

        assert_eq!(result, PolicyResult::Failure);
    }

    #[tokio::test]
    async fn is_compliant_is_a_stub() {
        let store = Arc::new(MemoryParameters::new());
        let restricted = Arc::new(FakeRestricted::default());
        let handler = handler(config(), store, restricted);
        assert!(handler.is_compliant(DeviceState::Locked).await);
    }
}
