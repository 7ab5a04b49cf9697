// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device lifecycle state management.
//!
//! This module provides the lifecycle enums and the
//! [`DeviceStateMachine`] that validates transitions, persists committed
//! states, and drives registered policy handlers.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use kiosklock::state::{DeviceEvent, DeviceState, DeviceStateMachine};
//! use kiosklock::storage::MemoryParameters;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> kiosklock::Result<()> {
//! let machine = DeviceStateMachine::new(
//!     Arc::new(MemoryParameters::new()),
//!     DeviceState::SetupInProgress,
//! );
//!
//! let outcome = machine
//!     .set_next_state_for_event(DeviceEvent::SetupSuccess)
//!     .await?;
//! assert_eq!(outcome.current, DeviceState::SetupSucceeded);
//! # Ok(())
//! # }
//! ```

mod lifecycle;
mod machine;

pub use lifecycle::{DeviceEvent, DeviceState, SetupStatus};
pub use machine::{DeviceStateMachine, TransitionOutcome};
