// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Setup task chains.
//!
//! Install/verify/cleanup stages run on an external work scheduler. The
//! crate only names the stages, enqueues chains under unique names with
//! keep-if-pending semantics, and awaits the aggregated outcome through
//! a single-delivery [`ChainTicket`].

use std::fmt;

use tokio::sync::watch;

/// Unique name of the URL-based install chain.
pub const SETUP_URL_INSTALL_CHAIN: &str = "setup-url-install";
/// Unique name of the store-based install chain.
pub const SETUP_STORE_INSTALL_CHAIN: &str = "setup-store-install";
/// Unique name of the pre-installed-package verification chain.
pub const SETUP_VERIFY_PRE_INSTALLED_CHAIN: &str = "setup-verify-pre-installed";

/// A setup stage executed by the external scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Install the kiosk package through the store installer.
    InstallFromStore,
    /// Download the kiosk package from the configured URL.
    DownloadPackage,
    /// Verify the downloaded package against the configured checksum.
    VerifyPackage,
    /// Hand the package to the platform installer.
    InstallPackage,
    /// Verify the package ended up installed.
    VerifyInstalled,
    /// Remove staged download artifacts.
    Cleanup,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InstallFromStore => "install-from-store",
            Self::DownloadPackage => "download-package",
            Self::VerifyPackage => "verify-package",
            Self::InstallPackage => "install-package",
            Self::VerifyInstalled => "verify-installed",
            Self::Cleanup => "cleanup",
        };
        write!(f, "{name}")
    }
}

/// Terminal status of a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    /// The stage completed successfully.
    Succeeded,
    /// The stage failed.
    Failed,
    /// The scheduler cancelled the stage.
    Cancelled,
}

/// Terminal result of a single stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    /// Which stage produced this result.
    pub task: TaskKind,
    /// The terminal status.
    pub status: TaskStatus,
    /// Stage error code, when the stage reported one.
    pub error_code: Option<i32>,
}

impl TaskResult {
    /// A successful stage result.
    #[must_use]
    pub fn succeeded(task: TaskKind) -> Self {
        Self {
            task,
            status: TaskStatus::Succeeded,
            error_code: None,
        }
    }

    /// A failed stage result carrying `error_code`.
    #[must_use]
    pub fn failed(task: TaskKind, error_code: i32) -> Self {
        Self {
            task,
            status: TaskStatus::Failed,
            error_code: Some(error_code),
        }
    }

    /// A cancelled stage result.
    #[must_use]
    pub fn cancelled(task: TaskKind) -> Self {
        Self {
            task,
            status: TaskStatus::Cancelled,
            error_code: None,
        }
    }
}

/// Aggregated outcome of one chain run.
///
/// Contains one [`TaskResult`] per stage that reached a terminal status;
/// stages after the first failure never run and therefore never appear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainOutcome {
    results: Vec<TaskResult>,
}

impl ChainOutcome {
    /// Wraps the per-stage results of a finished chain.
    #[must_use]
    pub fn new(results: Vec<TaskResult>) -> Self {
        Self { results }
    }

    /// Returns the per-stage results in execution order.
    #[must_use]
    pub fn results(&self) -> &[TaskResult] {
        &self.results
    }

    /// Returns `true` if every stage succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        !self.results.is_empty()
            && self
                .results
                .iter()
                .all(|r| r.status == TaskStatus::Succeeded)
    }

    /// Returns `true` if at least one stage failed or was cancelled.
    #[must_use]
    pub fn any_failed_or_cancelled(&self) -> bool {
        self.results
            .iter()
            .any(|r| matches!(r.status, TaskStatus::Failed | TaskStatus::Cancelled))
    }

    /// Returns the first stage error code, scanning in execution order.
    #[must_use]
    pub fn first_error_code(&self) -> Option<i32> {
        self.results.iter().find_map(|r| r.error_code)
    }
}

/// Handle onto one enqueued (or joined) chain run.
///
/// The ticket reports whether this enqueue created a new run, and lets
/// any number of joiners await the same single-delivery outcome.
#[derive(Debug)]
pub struct ChainTicket {
    newly_enqueued: bool,
    rx: watch::Receiver<Option<ChainOutcome>>,
}

impl ChainTicket {
    /// Creates a ticket observing `rx`.
    ///
    /// `newly_enqueued` is `true` when this call created the run, and
    /// `false` when an identically named pending run was joined.
    #[must_use]
    pub fn new(newly_enqueued: bool, rx: watch::Receiver<Option<ChainOutcome>>) -> Self {
        Self { newly_enqueued, rx }
    }

    /// Creates a ticket whose outcome is already resolved.
    #[must_use]
    pub fn resolved(newly_enqueued: bool, outcome: ChainOutcome) -> Self {
        let (tx, rx) = watch::channel(Some(outcome));
        drop(tx);
        Self { newly_enqueued, rx }
    }

    /// Returns `true` when this call created the run.
    #[must_use]
    pub fn newly_enqueued(&self) -> bool {
        self.newly_enqueued
    }

    /// Awaits the chain outcome.
    ///
    /// Returns `None` when the scheduler abandoned the run without ever
    /// publishing an outcome. There is no timeout: a chain that never
    /// reports keeps the caller parked, by design.
    pub async fn outcome(mut self) -> Option<ChainOutcome> {
        loop {
            if let Some(outcome) = self.rx.borrow_and_update().clone() {
                return Some(outcome);
            }
            if self.rx.changed().await.is_err() {
                return self.rx.borrow().clone();
            }
        }
    }
}

/// External facility executing setup task chains.
///
/// Implementations run the stages strictly in order, stop at the first
/// stage that does not succeed, and publish exactly one aggregated
/// outcome per run. Enqueueing a name with a run still pending must not
/// start a second run; the returned ticket joins the pending one.
pub trait TaskChainScheduler: Send + Sync {
    /// Enqueues (or joins) the uniquely named chain.
    fn enqueue_unique(&self, name: &str, stages: &[TaskKind]) -> ChainTicket;
}
