// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `kiosklock` library.
//!
//! This module provides the error hierarchy for failures across the
//! library: illegal lifecycle transitions, parameter-store access, and
//! configuration problems. Policy-application failures and setup-stage
//! failures are deliberately not part of this hierarchy: they are
//! carried as typed results ([`PolicyResult`](crate::policy::PolicyResult),
//! [`FailureType`](crate::setup::FailureType)) because they are tolerated,
//! not propagated.

use thiserror::Error;

use crate::state::{DeviceEvent, DeviceState};

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// An event was applied to a state with no defined transition.
    #[error("state transition error: {0}")]
    StateTransition(#[from] StateTransitionError),

    /// The persisted parameter store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The provisioning configuration is unusable.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The kiosk activity could not be launched.
    #[error("failed to launch kiosk activity: {0}")]
    LaunchFailed(String),

    /// The HTTP backend client could not be built.
    #[cfg(feature = "http-backend")]
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Error raised when a device event is not legal for the current state.
///
/// The lifecycle transition table is fixed; any `(state, event)` pair
/// outside it produces this error and leaves the device state unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("no transition for event {event:?} in state {state:?}")]
pub struct StateTransitionError {
    /// The state the device was in when the event arrived.
    pub state: DeviceState,
    /// The event that had no defined transition.
    pub event: DeviceEvent,
}

/// Errors related to the persisted parameter store.
///
/// The store is an external collaborator reached through an async client;
/// all of its failures surface as a generic I/O failure carrying the
/// underlying description.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// A read operation failed.
    #[error("failed to read key {key}: {message}")]
    Read {
        /// The parameter key that was being read.
        key: &'static str,
        /// Description of the underlying failure.
        message: String,
    },

    /// A write operation failed.
    #[error("failed to write key {key}: {message}")]
    Write {
        /// The parameter key that was being written.
        key: &'static str,
        /// Description of the underlying failure.
        message: String,
    },

    /// A persisted value could not be decoded.
    #[error("corrupt value for key {key}: {message}")]
    Corrupt {
        /// The parameter key holding the corrupt value.
        key: &'static str,
        /// Description of the decoding failure.
        message: String,
    },
}

/// Errors related to provisioning configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No kiosk package has been configured.
    #[error("no kiosk package configured")]
    MissingKioskPackage,

    /// A component string could not be parsed as `package/class`.
    #[error("invalid component name: {0}")]
    InvalidComponentName(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
