// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `KioskLock` - the device-management control plane of a managed-device
//! agent.
//!
//! This library drives a device through an enrollment → provisioning →
//! locked-operation lifecycle. It decides *what* restrictions should be
//! active and *when*; enforcement, storage, package installation and the
//! backend wire protocol stay behind capability traits implemented by
//! the hosting process.
//!
//! # Components
//!
//! - **State machine** ([`state`]): validates lifecycle transitions
//!   against a fixed table, persists committed states, and drives
//!   registered policy handlers.
//! - **Policy** ([`policy`]): composes the restricted-mode package
//!   allowlist and applies/reverts lock task restrictions per state.
//! - **Setup** ([`setup`]): orchestrates the install task chains
//!   (store path with URL fallback), maps stage failures onto a small
//!   taxonomy, and notifies listeners.
//! - **Backend** ([`backend`]): thin check-in/finalize RPC façade with
//!   typed response wrappers.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use kiosklock::config::ProvisionConfig;
//! use kiosklock::policy::LockTaskPolicyHandler;
//! use kiosklock::state::{DeviceEvent, DeviceState, DeviceStateMachine};
//! use kiosklock::storage::MemoryParameters;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> kiosklock::Result<()> {
//! # struct NoRestrictions;
//! # impl kiosklock::platform::RestrictedMode for NoRestrictions {
//! #     fn set_allowed_packages(&self, _: &[String]) {}
//! #     fn set_feature_flags(&self, _: kiosklock::types::LockTaskFeatures) {}
//! #     fn set_preferred_home_activity(&self, _: &kiosklock::types::ComponentName) {}
//! #     fn clear_preferred_home_activity(&self, _: &str) {}
//! #     fn is_activity_permitted(&self, _: &kiosklock::types::ComponentName) -> bool { true }
//! # }
//! # struct NoSystem;
//! # impl kiosklock::platform::SystemServices for NoSystem {
//! #     fn resolve_system_activity(&self, _: kiosklock::platform::SystemAction) -> Option<String> { None }
//! #     fn default_input_method(&self) -> Option<String> { None }
//! #     fn default_cell_broadcast_receiver(&self) -> Option<String> { None }
//! #     fn default_dialer_package(&self) -> Option<String> { None }
//! #     fn is_package_installed(&self, _: &str) -> bool { false }
//! # }
//! let store = Arc::new(MemoryParameters::new());
//! let config = ProvisionConfig::new().with_kiosk_package("com.example.kiosk");
//!
//! // Load persisted state (defaults to Unprovisioned) and attach the
//! // lock task policy handler.
//! let machine = Arc::new(DeviceStateMachine::load(store.clone()).await?);
//! machine.register_policy_handler(Arc::new(LockTaskPolicyHandler::new(
//!     config,
//!     store,
//!     Arc::new(NoRestrictions),
//!     Arc::new(NoSystem),
//! )));
//!
//! machine
//!     .set_next_state_for_event(DeviceEvent::ProvisioningSuccess)
//!     .await?;
//! assert_eq!(machine.state(), DeviceState::SetupInProgress);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod platform;
pub mod policy;
pub mod setup;
pub mod state;
pub mod storage;
pub mod types;

pub use config::ProvisionConfig;
pub use error::{ConfigError, Error, Result, StateTransitionError, StorageError};
pub use policy::{LockTaskPolicyHandler, PolicyHandler, PolicyResult};
pub use setup::{FailureType, SetupOrchestrator, SubscriptionId, TaskChainScheduler};
pub use state::{DeviceEvent, DeviceState, DeviceStateMachine, SetupStatus, TransitionOutcome};
pub use storage::{GlobalParameters, MemoryParameters};
pub use types::{ComponentName, LockTaskFeatures};
