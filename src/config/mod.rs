// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Provisioning configuration supplied by the operator.

use serde::{Deserialize, Serialize};

/// Flattened component of the fallback activity installed as the
/// preferred home while setup is in progress. Shown when setup fails and
/// the device boots back into restricted mode with nothing installed.
pub const DEFAULT_SETUP_FAILED_ACTIVITY: &str =
    "com.kiosklock.agent/com.kiosklock.agent.provision.SetupFailedActivity";

/// Operator-provided provisioning configuration.
///
/// Carries everything the setup orchestrator and the policy layer need:
/// which kiosk application to install, where to install it from, which
/// extra packages the operator allows under restricted mode, and the
/// provisioning policy knobs.
///
/// # Examples
///
/// ```
/// use kiosklock::config::ProvisionConfig;
///
/// let config = ProvisionConfig::new()
///     .with_kiosk_package("com.example.kiosk")
///     .with_download_url("https://cdn.example.com/kiosk.apk")
///     .with_extra_allowlist(["com.example.helper"])
///     .with_provision_mandatory(true);
///
/// assert_eq!(config.kiosk_package(), Some("com.example.kiosk"));
/// assert!(config.provision_mandatory());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionConfig {
    /// The kiosk (managed) application package. Setup cannot start
    /// without one.
    #[serde(default)]
    kiosk_package: Option<String>,
    /// Download location for the kiosk package on the URL install path.
    #[serde(default)]
    download_url: Option<String>,
    /// Expected signing-certificate checksum for the downloaded package.
    #[serde(default)]
    signature_checksum: Option<String>,
    /// Name of a registered store-backed installer implementation, if the
    /// device should try a store install before falling back to the URL
    /// path.
    #[serde(default)]
    store_installer: Option<String>,
    /// Static base allowlist from device configuration. Always a subset
    /// of the composed restricted-mode allowlist.
    #[serde(default)]
    base_allowlist: Vec<String>,
    /// Additional operator-allowlisted packages.
    #[serde(default)]
    extra_allowlist: Vec<String>,
    /// Whether a failed provisioning flow must wipe the device.
    #[serde(default)]
    provision_mandatory: bool,
    /// Whether notifications stay visible inside restricted mode.
    #[serde(default)]
    notifications_in_lock_task: bool,
    /// Flattened component of the setup-failed fallback activity.
    #[serde(default = "default_setup_failed_activity")]
    setup_failed_activity: String,
}

fn default_setup_failed_activity() -> String {
    DEFAULT_SETUP_FAILED_ACTIVITY.to_string()
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ProvisionConfig {
    /// Creates an empty configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            kiosk_package: None,
            download_url: None,
            signature_checksum: None,
            store_installer: None,
            base_allowlist: Vec::new(),
            extra_allowlist: Vec::new(),
            provision_mandatory: false,
            notifications_in_lock_task: false,
            setup_failed_activity: default_setup_failed_activity(),
        }
    }

    /// Sets the kiosk application package.
    #[must_use]
    pub fn with_kiosk_package(mut self, package: impl Into<String>) -> Self {
        self.kiosk_package = Some(package.into());
        self
    }

    /// Sets the kiosk package download URL.
    #[must_use]
    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = Some(url.into());
        self
    }

    /// Sets the expected signing-certificate checksum.
    #[must_use]
    pub fn with_signature_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.signature_checksum = Some(checksum.into());
        self
    }

    /// Selects a registered store-backed installer implementation.
    #[must_use]
    pub fn with_store_installer(mut self, name: impl Into<String>) -> Self {
        self.store_installer = Some(name.into());
        self
    }

    /// Sets the static base allowlist.
    #[must_use]
    pub fn with_base_allowlist<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_allowlist = packages.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the operator-provided extra allowlist.
    #[must_use]
    pub fn with_extra_allowlist<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_allowlist = packages.into_iter().map(Into::into).collect();
        self
    }

    /// Marks provisioning as mandatory.
    #[must_use]
    pub fn with_provision_mandatory(mut self, mandatory: bool) -> Self {
        self.provision_mandatory = mandatory;
        self
    }

    /// Keeps notifications visible inside restricted mode.
    #[must_use]
    pub fn with_notifications_in_lock_task(mut self, enabled: bool) -> Self {
        self.notifications_in_lock_task = enabled;
        self
    }

    /// Overrides the setup-failed fallback activity component.
    #[must_use]
    pub fn with_setup_failed_activity(mut self, component: impl Into<String>) -> Self {
        self.setup_failed_activity = component.into();
        self
    }

    /// Returns the kiosk package, if configured.
    #[must_use]
    pub fn kiosk_package(&self) -> Option<&str> {
        self.kiosk_package.as_deref()
    }

    /// Returns the download URL, if configured.
    #[must_use]
    pub fn download_url(&self) -> Option<&str> {
        self.download_url.as_deref()
    }

    /// Returns the signing-certificate checksum, if configured.
    #[must_use]
    pub fn signature_checksum(&self) -> Option<&str> {
        self.signature_checksum.as_deref()
    }

    /// Returns the configured store installer name, if any.
    #[must_use]
    pub fn store_installer(&self) -> Option<&str> {
        self.store_installer.as_deref()
    }

    /// Returns the static base allowlist.
    #[must_use]
    pub fn base_allowlist(&self) -> &[String] {
        &self.base_allowlist
    }

    /// Returns the operator-provided extra allowlist.
    #[must_use]
    pub fn extra_allowlist(&self) -> &[String] {
        &self.extra_allowlist
    }

    /// Returns `true` if a failed provisioning flow must wipe the device.
    #[must_use]
    pub fn provision_mandatory(&self) -> bool {
        self.provision_mandatory
    }

    /// Returns `true` if notifications stay visible in restricted mode.
    #[must_use]
    pub fn notifications_in_lock_task(&self) -> bool {
        self.notifications_in_lock_task
    }

    /// Returns the setup-failed fallback activity component string.
    #[must_use]
    pub fn setup_failed_activity(&self) -> &str {
        &self.setup_failed_activity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_is_empty() {
        let config = ProvisionConfig::new();
        assert!(config.kiosk_package().is_none());
        assert!(config.store_installer().is_none());
        assert!(config.base_allowlist().is_empty());
        assert!(!config.provision_mandatory());
        assert_eq!(config.setup_failed_activity(), DEFAULT_SETUP_FAILED_ACTIVITY);
    }

    #[test]
    fn builder_sets_fields() {
        let config = ProvisionConfig::new()
            .with_kiosk_package("com.example.kiosk")
            .with_download_url("https://cdn.example.com/kiosk.apk")
            .with_signature_checksum("ab:cd")
            .with_store_installer("play")
            .with_base_allowlist(["com.android.systemui"])
            .with_extra_allowlist(["com.example.helper"])
            .with_provision_mandatory(true)
            .with_notifications_in_lock_task(true);

        assert_eq!(config.kiosk_package(), Some("com.example.kiosk"));
        assert_eq!(config.download_url(), Some("https://cdn.example.com/kiosk.apk"));
        assert_eq!(config.signature_checksum(), Some("ab:cd"));
        assert_eq!(config.store_installer(), Some("play"));
        assert_eq!(config.base_allowlist(), ["com.android.systemui"]);
        assert_eq!(config.extra_allowlist(), ["com.example.helper"]);
        assert!(config.provision_mandatory());
        assert!(config.notifications_in_lock_task());
    }

    #[test]
    fn deserialize_fills_defaults() {
        let config: ProvisionConfig =
            serde_json::from_str(r#"{"kiosk_package": "com.example.kiosk"}"#).unwrap();
        assert_eq!(config.kiosk_package(), Some("com.example.kiosk"));
        assert_eq!(config.setup_failed_activity(), DEFAULT_SETUP_FAILED_ACTIVITY);
        assert!(config.extra_allowlist().is_empty());
    }
}
