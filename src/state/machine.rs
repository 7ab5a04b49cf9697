// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The device lifecycle state machine.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{Error, StateTransitionError, StorageError};
use crate::policy::{PolicyHandler, PolicyResult};
use crate::storage::GlobalParameters;

use super::{DeviceEvent, DeviceState};

/// Result of a committed lifecycle transition.
///
/// The transition commits even when individual policy handlers fail;
/// those failures surface here as warnings rather than reverting the
/// state, because persisted state is the source of truth for all
/// restart/retry logic.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    /// State before the transition.
    pub previous: DeviceState,
    /// Committed state after the transition.
    pub current: DeviceState,
    /// Per-handler policy results, in registration order.
    pub policy_results: Vec<PolicyResult>,
}

impl TransitionOutcome {
    /// Returns `true` if every registered policy handler applied its
    /// policy successfully.
    #[must_use]
    pub fn fully_applied(&self) -> bool {
        self.policy_results
            .iter()
            .all(|r| *r == PolicyResult::Success)
    }
}

/// Validates and executes lifecycle transitions.
///
/// Holds the current [`DeviceState`], persists every committed
/// transition durably before reporting success, and synchronously drives
/// each registered [`PolicyHandler`] with the new state.
///
/// # Transition table
///
/// | current                        | event               | next            |
/// |--------------------------------|---------------------|-----------------|
/// | Unprovisioned                  | ProvisioningSuccess | SetupInProgress |
/// | Unprovisioned, SetupInProgress | SetupSuccess        | SetupSucceeded  |
/// | any                            | SetupFailure        | SetupFailed     |
/// | SetupSucceeded                 | SetupComplete       | Locked          |
/// | Unlocked                       | LockDevice          | Locked          |
/// | Locked                         | UnlockDevice        | Unlocked        |
/// | Locked, Unlocked               | ClearDevice         | Cleared         |
///
/// Any other pair fails with a [`StateTransitionError`] and leaves the
/// state untouched.
pub struct DeviceStateMachine {
    store: Arc<dyn GlobalParameters>,
    current: RwLock<DeviceState>,
    handlers: RwLock<Vec<Arc<dyn PolicyHandler>>>,
    /// Serializes transitions; the persist + handler sequence must not
    /// interleave between concurrent events.
    transition_guard: Mutex<()>,
}

impl DeviceStateMachine {
    /// Creates a state machine starting from an explicit state.
    ///
    /// Prefer [`load`](Self::load) at agent startup so the persisted
    /// state is honored.
    #[must_use]
    pub fn new(store: Arc<dyn GlobalParameters>, initial: DeviceState) -> Self {
        Self {
            store,
            current: RwLock::new(initial),
            handlers: RwLock::new(Vec::new()),
            transition_guard: Mutex::new(()),
        }
    }

    /// Creates a state machine from the persisted device state,
    /// defaulting to [`DeviceState::Unprovisioned`] when none was ever
    /// written.
    ///
    /// # Errors
    ///
    /// Returns the storage error when the persisted state cannot be
    /// read.
    pub async fn load(store: Arc<dyn GlobalParameters>) -> Result<Self, StorageError> {
        let initial = store
            .device_state()
            .await?
            .unwrap_or(DeviceState::Unprovisioned);
        Ok(Self::new(store, initial))
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        *self.current.read()
    }

    /// Registers a policy handler.
    ///
    /// Handlers are invoked for every subsequent transition, in
    /// registration order.
    pub fn register_policy_handler(&self, handler: Arc<dyn PolicyHandler>) {
        self.handlers.write().push(handler);
    }

    /// Applies `event`, committing the transition defined by the table.
    ///
    /// On a valid transition the new state is durably persisted first;
    /// then every registered policy handler runs with the new state. A
    /// handler reporting [`PolicyResult::Failure`] does not revert the
    /// transition; the failure is carried in the returned
    /// [`TransitionOutcome`].
    ///
    /// # Errors
    ///
    /// [`Error::StateTransition`] when `(state, event)` has no defined
    /// transition; [`Error::Storage`] when persisting the new state
    /// fails. In both cases the in-memory state is unchanged and no
    /// handler runs.
    pub async fn set_next_state_for_event(
        &self,
        event: DeviceEvent,
    ) -> Result<TransitionOutcome, Error> {
        let _guard = self.transition_guard.lock().await;

        let previous = self.state();
        let next = next_state(previous, event)
            .ok_or(StateTransitionError {
                state: previous,
                event,
            })?;

        self.store.set_device_state(next).await?;
        *self.current.write() = next;
        debug!(?previous, ?next, ?event, "device state transition committed");

        let handlers: Vec<Arc<dyn PolicyHandler>> = self.handlers.read().clone();
        let mut policy_results = Vec::with_capacity(handlers.len());
        for handler in handlers {
            let result = handler.set_policy_for_state(next).await;
            if result == PolicyResult::Failure {
                warn!(state = ?next, "policy handler failed to apply state policy");
            }
            policy_results.push(result);
        }

        Ok(TransitionOutcome {
            previous,
            current: next,
            policy_results,
        })
    }
}

impl std::fmt::Debug for DeviceStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceStateMachine")
            .field("state", &self.state())
            .field("handlers", &self.handlers.read().len())
            .finish_non_exhaustive()
    }
}

/// The fixed transition table.
fn next_state(state: DeviceState, event: DeviceEvent) -> Option<DeviceState> {
    use DeviceEvent as E;
    use DeviceState as S;

    match (state, event) {
        (S::Unprovisioned, E::ProvisioningSuccess) => Some(S::SetupInProgress),
        (S::Unprovisioned | S::SetupInProgress, E::SetupSuccess) => Some(S::SetupSucceeded),
        (_, E::SetupFailure) => Some(S::SetupFailed),
        (S::SetupSucceeded, E::SetupComplete) => Some(S::Locked),
        (S::Unlocked, E::LockDevice) => Some(S::Locked),
        (S::Locked, E::UnlockDevice) => Some(S::Unlocked),
        (S::Locked | S::Unlocked, E::ClearDevice) => Some(S::Cleared),
        _ => None,
    }
}
