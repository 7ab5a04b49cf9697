// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Component name type.

use std::fmt;

use crate::error::ConfigError;

/// A platform activity component, identified by package and class name.
///
/// Components are written in flattened form as `package/class`. A class
/// beginning with `.` is shorthand for a class inside the package, the
/// way the host platform abbreviates it.
///
/// # Examples
///
/// ```
/// use kiosklock::types::ComponentName;
///
/// let c = ComponentName::unflatten("com.example.kiosk/.MainActivity")?;
/// assert_eq!(c.package(), "com.example.kiosk");
/// assert_eq!(c.class_name(), "com.example.kiosk.MainActivity");
/// # Ok::<(), kiosklock::error::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ComponentName {
    package: String,
    class: String,
}

impl ComponentName {
    /// Creates a component name from explicit package and class parts.
    #[must_use]
    pub fn new(package: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            class: class.into(),
        }
    }

    /// Parses a flattened `package/class` string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidComponentName`] if the string has no
    /// `/` separator or either side is empty.
    pub fn unflatten(flat: &str) -> Result<Self, ConfigError> {
        let (package, class) = flat
            .split_once('/')
            .ok_or_else(|| ConfigError::InvalidComponentName(flat.to_string()))?;
        if package.is_empty() || class.is_empty() {
            return Err(ConfigError::InvalidComponentName(flat.to_string()));
        }
        let class = if let Some(rest) = class.strip_prefix('.') {
            format!("{package}.{rest}")
        } else {
            class.to_string()
        };
        Ok(Self {
            package: package.to_string(),
            class,
        })
    }

    /// Returns the package part.
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Returns the fully qualified class part.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class
    }

    /// Returns the flattened `package/class` form.
    #[must_use]
    pub fn flatten(&self) -> String {
        format!("{}/{}", self.package, self.class)
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.package, self.class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unflatten_full_class() {
        let c = ComponentName::unflatten("com.example.kiosk/com.example.kiosk.Main").unwrap();
        assert_eq!(c.package(), "com.example.kiosk");
        assert_eq!(c.class_name(), "com.example.kiosk.Main");
    }

    #[test]
    fn unflatten_relative_class() {
        let c = ComponentName::unflatten("com.example.kiosk/.Main").unwrap();
        assert_eq!(c.class_name(), "com.example.kiosk.Main");
    }

    #[test]
    fn unflatten_rejects_missing_separator() {
        let err = ComponentName::unflatten("com.example.kiosk").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidComponentName(_)));
    }

    #[test]
    fn unflatten_rejects_empty_parts() {
        assert!(ComponentName::unflatten("/Main").is_err());
        assert!(ComponentName::unflatten("com.example/").is_err());
    }

    #[test]
    fn flatten_round_trip() {
        let c = ComponentName::new("com.example", "com.example.Main");
        assert_eq!(c.flatten(), "com.example/com.example.Main");
        assert_eq!(ComponentName::unflatten(&c.flatten()).unwrap(), c);
    }

    #[test]
    fn display_matches_flatten() {
        let c = ComponentName::new("a.b", "a.b.C");
        assert_eq!(c.to_string(), c.flatten());
    }
}
