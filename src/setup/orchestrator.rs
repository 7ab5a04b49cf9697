// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The setup orchestrator.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::ProvisionConfig;
use crate::platform::{DeviceAdmin, SystemServices};
use crate::state::{DeviceEvent, DeviceStateMachine, SetupStatus};

use super::callbacks::{SetupCallbacks, SubscriptionId};
use super::failure::{FailureType, failure_type_for_code};
use super::task::{
    ChainOutcome, SETUP_STORE_INSTALL_CHAIN, SETUP_URL_INSTALL_CHAIN,
    SETUP_VERIFY_PRE_INSTALLED_CHAIN, TaskChainScheduler, TaskKind,
};

/// Stages of the URL-based install chain, in execution order.
const URL_INSTALL_STAGES: [TaskKind; 5] = [
    TaskKind::DownloadPackage,
    TaskKind::VerifyPackage,
    TaskKind::InstallPackage,
    TaskKind::VerifyInstalled,
    TaskKind::Cleanup,
];

/// Stages of the store-based install chain, in execution order.
const STORE_INSTALL_STAGES: [TaskKind; 2] = [TaskKind::InstallFromStore, TaskKind::VerifyInstalled];

/// Drives the kiosk-app installation flow and reports its outcome.
///
/// The orchestrator selects the install path (store first when one is
/// configured, URL otherwise), enqueues the corresponding task chain on
/// the external scheduler, awaits its outcome, and on a terminal result
/// drives the state machine and notifies registered listeners.
///
/// Re-triggering the flow while an identically named chain is pending
/// joins the existing run; at most one chain per name is ever in flight
/// and each run produces exactly one notification per listener.
pub struct SetupOrchestrator {
    config: ProvisionConfig,
    state_machine: Arc<DeviceStateMachine>,
    scheduler: Arc<dyn TaskChainScheduler>,
    system: Arc<dyn SystemServices>,
    admin: Arc<dyn DeviceAdmin>,
    callbacks: SetupCallbacks,
    status: Mutex<SetupStatus>,
}

impl SetupOrchestrator {
    /// Creates the orchestrator from its collaborators.
    ///
    /// The initial [`SetupStatus`] is derived from the state machine's
    /// current lifecycle state.
    #[must_use]
    pub fn new(
        config: ProvisionConfig,
        state_machine: Arc<DeviceStateMachine>,
        scheduler: Arc<dyn TaskChainScheduler>,
        system: Arc<dyn SystemServices>,
        admin: Arc<dyn DeviceAdmin>,
    ) -> Self {
        let status = SetupStatus::from_device_state(state_machine.state());
        debug!(?status, "setup orchestrator constructed");
        Self {
            config,
            state_machine,
            scheduler,
            system,
            admin,
            callbacks: SetupCallbacks::new(),
            status: Mutex::new(status),
        }
    }

    /// Returns the current setup status.
    #[must_use]
    pub fn status(&self) -> SetupStatus {
        *self.status.lock()
    }

    /// Registers a success listener. See [`SetupCallbacks`].
    pub fn on_setup_completed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.callbacks.on_setup_completed(callback)
    }

    /// Registers a failure listener. See [`SetupCallbacks`].
    pub fn on_setup_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(FailureType) + Send + Sync + 'static,
    {
        self.callbacks.on_setup_failed(callback)
    }

    /// Unregisters a listener.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }

    /// Starts (or joins) the setup flow.
    ///
    /// Resolves once the flow reaches a terminal result. Without a
    /// configured kiosk package the flow fails immediately and no chain
    /// is enqueued.
    pub async fn start_setup_flow(&self) {
        info!("trigger setup flow");
        if self.config.kiosk_package().is_none() {
            warn!("no kiosk package configured, failing setup");
            self.handle_terminal_failure(FailureType::SetupFailed).await;
            return;
        }
        *self.status.lock() = SetupStatus::InProgress;

        if cfg!(debug_assertions)
            && self
                .config
                .kiosk_package()
                .is_some_and(|kiosk| self.system.is_package_installed(kiosk))
        {
            self.verify_pre_installed_package();
        }

        if self.config.store_installer().is_some() {
            self.install_kiosk_from_store().await;
        } else {
            self.install_kiosk_from_url().await;
        }
    }

    /// Finalizes the provisioning flow.
    ///
    /// With a finished setup this locks the device and attempts to
    /// launch the kiosk application; a failed launch is logged, not
    /// fatal. Any other status drives a setup failure. When provisioning
    /// is mandatory and the device did not reach a successful finish,
    /// its data is wiped, an irreversible, fail-closed action.
    pub async fn finish_setup(&self) {
        let status = self.status();
        let mut finished = false;

        if status == SetupStatus::Finished {
            match self
                .state_machine
                .set_next_state_for_event(DeviceEvent::SetupComplete)
                .await
            {
                Ok(_) => {
                    finished = true;
                    if !self.admin.launch_kiosk_in_locked_mode() {
                        warn!("failed to launch kiosk activity");
                    }
                }
                Err(err) => error!(%err, "state transition failed"),
            }
        } else if let Err(err) = self
            .state_machine
            .set_next_state_for_event(DeviceEvent::SetupFailure)
            .await
        {
            error!(%err, "state transition failed");
        }

        if self.config.provision_mandatory() && !finished {
            warn!("mandatory provisioning did not finish, wiping device");
            self.admin.wipe_data();
        }
    }

    /// Launches the observational verification chain for a kiosk package
    /// that is already installed. Debug builds only; the outcome is
    /// logged and gates nothing.
    fn verify_pre_installed_package(&self) {
        info!("verifying pre-installed kiosk package");
        let ticket = self
            .scheduler
            .enqueue_unique(SETUP_VERIFY_PRE_INSTALLED_CHAIN, &[TaskKind::VerifyInstalled]);
        if !ticket.newly_enqueued() {
            return;
        }
        tokio::spawn(async move {
            match ticket.outcome().await {
                Some(outcome) if outcome.all_succeeded() => {
                    info!("pre-installed kiosk package verified");
                }
                Some(outcome) => {
                    warn!(
                        code = ?outcome.first_error_code(),
                        "pre-installed kiosk package failed verification"
                    );
                }
                None => warn!("pre-installed verification chain abandoned"),
            }
        });
    }

    async fn install_kiosk_from_store(&self) {
        info!("installing kiosk app from store");
        let ticket = self
            .scheduler
            .enqueue_unique(SETUP_STORE_INSTALL_CHAIN, &STORE_INSTALL_STAGES);
        if !ticket.newly_enqueued() {
            debug!("store install chain already pending, joining existing run");
            let _ = ticket.outcome().await;
            return;
        }

        match ticket.outcome().await {
            Some(outcome) if outcome.all_succeeded() => self.handle_terminal_success().await,
            Some(_) => {
                info!("store install failed, falling back to URL install");
                self.install_kiosk_from_url().await;
            }
            None => warn!("store install chain abandoned without outcome"),
        }
    }

    async fn install_kiosk_from_url(&self) {
        info!("installing kiosk app from URL");
        let ticket = self
            .scheduler
            .enqueue_unique(SETUP_URL_INSTALL_CHAIN, &URL_INSTALL_STAGES);
        if !ticket.newly_enqueued() {
            debug!("url install chain already pending, joining existing run");
            let _ = ticket.outcome().await;
            return;
        }

        match ticket.outcome().await {
            Some(outcome) if outcome.all_succeeded() => self.handle_terminal_success().await,
            Some(outcome) => {
                let failure = resolve_failure_type(&outcome);
                self.handle_terminal_failure(failure).await;
            }
            None => warn!("url install chain abandoned without outcome"),
        }
    }

    async fn handle_terminal_success(&self) {
        match self
            .state_machine
            .set_next_state_for_event(DeviceEvent::SetupSuccess)
            .await
        {
            Ok(_) => {
                info!("handling successful setup");
                *self.status.lock() = SetupStatus::Finished;
                self.callbacks.dispatch_completed();
            }
            Err(err) => {
                error!(%err, "device state inconsistent, aborting setup");
                *self.status.lock() = SetupStatus::Failed;
                self.callbacks.dispatch_failed(FailureType::SetupFailed);
            }
        }
    }

    async fn handle_terminal_failure(&self, failure: FailureType) {
        let failure = match self
            .state_machine
            .set_next_state_for_event(DeviceEvent::SetupFailure)
            .await
        {
            Ok(_) => failure,
            Err(err) => {
                error!(%err, "device state inconsistent, aborting setup");
                FailureType::SetupFailed
            }
        };
        info!(?failure, "handling failed setup");
        *self.status.lock() = SetupStatus::Failed;
        self.callbacks.dispatch_failed(failure);
    }
}

impl std::fmt::Debug for SetupOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetupOrchestrator")
            .field("status", &self.status())
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

/// Maps a failed chain outcome onto the listener-facing failure type:
/// the first stage error code found wins; a chain without codes is a
/// generic failure.
fn resolve_failure_type(outcome: &ChainOutcome) -> FailureType {
    outcome
        .first_error_code()
        .map_or(FailureType::SetupFailed, failure_type_for_code)
}
