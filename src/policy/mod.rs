// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Policy application.
//!
//! Policy handlers translate a committed lifecycle state into concrete
//! platform restrictions. The state machine invokes every registered
//! handler on every transition; a handler failure is tolerated (logged
//! and surfaced as a warning) rather than reverting the transition.

mod allowlist;
mod lock_task;

pub use allowlist::compose_allowlist;
pub use lock_task::LockTaskPolicyHandler;

use async_trait::async_trait;

use crate::state::DeviceState;

/// Outcome of a single policy application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyResult {
    /// The policy for the state was fully applied.
    Success,
    /// Some part of the policy could not be applied.
    Failure,
}

/// A policy enforcement hook driven by the state machine.
#[async_trait]
pub trait PolicyHandler: Send + Sync {
    /// Applies the policy appropriate for `state`.
    ///
    /// Must not panic; recoverable sub-step problems are logged and
    /// skipped, and only unsatisfiable requirements produce
    /// [`PolicyResult::Failure`].
    async fn set_policy_for_state(&self, state: DeviceState) -> PolicyResult;

    /// Verifies that the currently applied policy matches `state`.
    async fn is_compliant(&self, state: DeviceState) -> bool;
}
