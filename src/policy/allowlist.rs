// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Restricted-mode allowlist composition.

use tracing::{info, warn};

use crate::config::ProvisionConfig;
use crate::platform::{SystemAction, SystemServices};
use crate::types::ComponentName;

/// Composes the restricted-mode package allowlist.
///
/// The list is built in a fixed order, duplicate-free:
///
/// 1. the static base allowlist from device configuration;
/// 2. the configured kiosk package, if set;
/// 3. the system package handling the dial action;
/// 4. the system package handling the settings action;
/// 5. the package of the active input method;
/// 6. the default cell-broadcast-receiver package;
/// 7. operator-provided extra allowlist entries.
///
/// Steps 3–6 are dynamic lookups; each is independently skipped with a
/// logged omission when the system yields nothing usable. A partial
/// allowlist is acceptable.
#[must_use]
pub fn compose_allowlist(config: &ProvisionConfig, system: &dyn SystemServices) -> Vec<String> {
    let mut allowlist: Vec<String> = Vec::new();
    for package in config.base_allowlist() {
        push_unique(&mut allowlist, package.clone());
    }

    if let Some(kiosk) = config.kiosk_package() {
        push_unique(&mut allowlist, kiosk.to_string());
    }

    for action in [SystemAction::Dial, SystemAction::Settings] {
        match system.resolve_system_activity(action) {
            Some(package) => {
                info!(%action, %package, "allowlisting system handler");
                push_unique(&mut allowlist, package);
            }
            None => warn!(%action, "no system handler found, omitting from allowlist"),
        }
    }

    match system.default_input_method() {
        Some(raw) => match ComponentName::unflatten(&raw) {
            Ok(ime) => push_unique(&mut allowlist, ime.package().to_string()),
            Err(_) => warn!(%raw, "invalid input method component, omitting from allowlist"),
        },
        None => warn!("no default input method, omitting from allowlist"),
    }

    match system.default_cell_broadcast_receiver() {
        Some(package) => push_unique(&mut allowlist, package),
        None => warn!("no default cell broadcast receiver, omitting from allowlist"),
    }

    for package in config.extra_allowlist() {
        push_unique(&mut allowlist, package.clone());
    }

    allowlist
}

/// Appends `package` unless it is already present.
pub(crate) fn push_unique(allowlist: &mut Vec<String>, package: String) {
    if !allowlist.iter().any(|p| *p == package) {
        allowlist.push(package);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeSystem {
        dialer_action: Option<String>,
        settings_action: Option<String>,
        input_method: Option<String>,
        cell_broadcast: Option<String>,
    }

    impl SystemServices for FakeSystem {
        fn resolve_system_activity(&self, action: SystemAction) -> Option<String> {
            match action {
                SystemAction::Dial => self.dialer_action.clone(),
                SystemAction::Settings => self.settings_action.clone(),
            }
        }

        fn default_input_method(&self) -> Option<String> {
            self.input_method.clone()
        }

        fn default_cell_broadcast_receiver(&self) -> Option<String> {
            self.cell_broadcast.clone()
        }

        fn default_dialer_package(&self) -> Option<String> {
            None
        }

        fn is_package_installed(&self, _package: &str) -> bool {
            false
        }
    }

    fn full_system() -> FakeSystem {
        FakeSystem {
            dialer_action: Some("com.android.dialer".to_string()),
            settings_action: Some("com.android.settings".to_string()),
            input_method: Some("com.android.ime/.LatinIme".to_string()),
            cell_broadcast: Some("com.android.cellbroadcast".to_string()),
        }
    }

    fn base_config() -> ProvisionConfig {
        ProvisionConfig::new()
            .with_base_allowlist(["com.android.systemui", "com.android.shell"])
            .with_kiosk_package("com.example.kiosk")
            .with_extra_allowlist(["com.example.helper"])
    }

    #[test]
    fn contains_base_list_as_subset() {
        let config = base_config();
        let allowlist = compose_allowlist(&config, &full_system());
        for base in config.base_allowlist() {
            assert!(allowlist.contains(base));
        }
    }

    #[test]
    fn contains_kiosk_and_extras() {
        let allowlist = compose_allowlist(&base_config(), &full_system());
        assert!(allowlist.contains(&"com.example.kiosk".to_string()));
        assert!(allowlist.contains(&"com.example.helper".to_string()));
    }

    #[test]
    fn contains_resolved_system_packages() {
        let allowlist = compose_allowlist(&base_config(), &full_system());
        assert!(allowlist.contains(&"com.android.dialer".to_string()));
        assert!(allowlist.contains(&"com.android.settings".to_string()));
        assert!(allowlist.contains(&"com.android.ime".to_string()));
        assert!(allowlist.contains(&"com.android.cellbroadcast".to_string()));
    }

    #[test]
    fn never_contains_duplicates() {
        // Kiosk package also present in base list and extras.
        let config = ProvisionConfig::new()
            .with_base_allowlist(["com.example.kiosk", "com.android.systemui"])
            .with_kiosk_package("com.example.kiosk")
            .with_extra_allowlist(["com.example.kiosk", "com.android.systemui"]);

        let allowlist = compose_allowlist(&config, &full_system());
        let mut sorted = allowlist.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(allowlist.len(), sorted.len());
    }

    #[test]
    fn missing_dynamic_categories_are_omitted_cleanly() {
        let allowlist = compose_allowlist(&base_config(), &FakeSystem::default());
        assert!(allowlist.contains(&"com.example.kiosk".to_string()));
        assert!(!allowlist.iter().any(|p| p.starts_with("com.android.dialer")));
    }

    #[test]
    fn malformed_input_method_is_skipped() {
        let system = FakeSystem {
            input_method: Some("not-a-component".to_string()),
            ..FakeSystem::default()
        };
        let allowlist = compose_allowlist(&base_config(), &system);
        assert!(!allowlist.contains(&"not-a-component".to_string()));
    }

    #[test]
    fn no_kiosk_configured_still_composes() {
        let config = ProvisionConfig::new().with_base_allowlist(["com.android.systemui"]);
        let allowlist = compose_allowlist(&config, &full_system());
        assert!(allowlist.contains(&"com.android.systemui".to_string()));
        assert!(!allowlist.contains(&"com.example.kiosk".to_string()));
    }
}
