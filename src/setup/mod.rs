// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The setup flow.
//!
//! This module owns the multi-stage installation workflow for the kiosk
//! application: the [`SetupOrchestrator`] selects the install path,
//! drives the external [`TaskChainScheduler`], maps stage failures onto
//! the [`FailureType`] taxonomy, and notifies registered listeners.

mod callbacks;
mod failure;
mod orchestrator;
mod task;

pub use callbacks::{SetupCallbacks, SubscriptionId};
pub use failure::{FailureType, error_codes, failure_type_for_code};
pub use orchestrator::SetupOrchestrator;
pub use task::{
    ChainOutcome, ChainTicket, SETUP_STORE_INSTALL_CHAIN, SETUP_URL_INSTALL_CHAIN,
    SETUP_VERIFY_PRE_INSTALLED_CHAIN, TaskChainScheduler, TaskKind, TaskResult, TaskStatus,
};
