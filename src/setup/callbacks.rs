// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Listener management for setup progress notifications.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use super::FailureType;

/// Unique identifier for a registered setup listener.
///
/// Returned on registration and used to unsubscribe later. IDs are
/// unique within an orchestrator's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for setup-completed callbacks.
type CompletedCallback = Arc<dyn Fn() + Send + Sync>;

/// Type alias for setup-failed callbacks.
type FailedCallback = Arc<dyn Fn(FailureType) + Send + Sync>;

/// Registry for setup progress listeners.
///
/// Registration and removal are safe against concurrent notification:
/// dispatch snapshots the callbacks under a read lock, so a listener
/// unsubscribing from inside its own callback never deadlocks the
/// notifying thread.
pub struct SetupCallbacks {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// Success listeners.
    completed: RwLock<HashMap<SubscriptionId, CompletedCallback>>,
    /// Failure listeners.
    failed: RwLock<HashMap<SubscriptionId, FailedCallback>>,
}

impl SetupCallbacks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            completed: RwLock::new(HashMap::new()),
            failed: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback invoked when setup completes successfully.
    pub fn on_setup_completed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.completed.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback invoked when setup fails terminally.
    ///
    /// The callback receives the resolved [`FailureType`].
    pub fn on_setup_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(FailureType) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.failed.write().insert(id, Arc::new(callback));
        id
    }

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        if self.completed.write().remove(&id).is_some() {
            return true;
        }
        self.failed.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.completed.write().clear();
        self.failed.write().clear();
    }

    /// Notifies every success listener.
    pub fn dispatch_completed(&self) {
        let callbacks: Vec<CompletedCallback> = self.completed.read().values().cloned().collect();
        for callback in callbacks {
            callback();
        }
    }

    /// Notifies every failure listener with `failure`.
    pub fn dispatch_failed(&self, failure: FailureType) {
        let callbacks: Vec<FailedCallback> = self.failed.read().values().cloned().collect();
        for callback in callbacks {
            callback(failure);
        }
    }

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.completed.read().len() + self.failed.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for SetupCallbacks {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SetupCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetupCallbacks")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}
