// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Check-in/finalize backend client.
//!
//! The backend tracks enrollment, provisioning and program-completion
//! status for the device. This module exposes the client as a capability
//! trait with two calls (report program complete, pause provisioning)
//! whose responses carry either a transport-level status (failure) or a
//! typed payload (success). RPC failures are never raised as `Err`;
//! callers branch on payload presence.
//!
//! Connection parameters are fixed at construction through an explicit
//! [`BackendConfig`]; which implementation backs the trait is chosen by
//! the hosting process at compile time.

#[cfg(feature = "http-backend")]
mod http;

#[cfg(feature = "http-backend")]
pub use http::HttpFinalizeClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Transport status codes for failed backend calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcStatusCode {
    /// The call completed (not used for failures).
    Ok,
    /// The request was malformed.
    InvalidArgument,
    /// The call exceeded its deadline.
    DeadlineExceeded,
    /// The backend does not know this device.
    NotFound,
    /// The device is not allowed to make this call.
    PermissionDenied,
    /// The credentials were rejected.
    Unauthenticated,
    /// The backend is unreachable or overloaded.
    Unavailable,
    /// The backend failed internally.
    Internal,
    /// Anything else.
    Unknown,
}

/// Transport-level status of a failed backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcStatus {
    code: RpcStatusCode,
    message: String,
}

impl RpcStatus {
    /// Creates a status from a code and description.
    #[must_use]
    pub fn new(code: RpcStatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Returns the status code.
    #[must_use]
    pub fn code(&self) -> RpcStatusCode {
        self.code
    }

    /// Returns the status description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for RpcStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

/// Response wrapper for a backend call.
///
/// Exactly one of the two sides is populated: a successful call carries
/// a payload and no status; a failed call carries a status and no
/// payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcResponse<T> {
    status: Option<RpcStatus>,
    payload: Option<T>,
}

impl<T> RpcResponse<T> {
    /// Wraps a successful call's payload.
    #[must_use]
    pub fn success(payload: T) -> Self {
        Self {
            status: None,
            payload: Some(payload),
        }
    }

    /// Wraps a failed call's transport status.
    #[must_use]
    pub fn failure(status: RpcStatus) -> Self {
        Self {
            status: Some(status),
            payload: None,
        }
    }

    /// Returns `true` when the call succeeded and a payload is present.
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.payload.is_some()
    }

    /// Returns the payload of a successful call.
    #[must_use]
    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    /// Returns the transport status of a failed call.
    #[must_use]
    pub fn status(&self) -> Option<&RpcStatus> {
        self.status.as_ref()
    }
}

/// Payload of a successful report-program-complete call.
///
/// The call acknowledges completion; the payload carries no fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportProgramCompletePayload {}

/// Payload of a successful pause-provisioning call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseProvisioningPayload {
    /// Whether the backend requires provisioning to proceed immediately
    /// despite the pause request.
    #[serde(default)]
    pub force_provisioning: bool,
}

/// Response of a report-program-complete call.
pub type ReportProgramCompleteResponse = RpcResponse<ReportProgramCompletePayload>;

/// Response of a pause-provisioning call.
pub type PauseProvisioningResponse = RpcResponse<PauseProvisioningPayload>;

impl RpcResponse<PauseProvisioningPayload> {
    /// Returns `true` when the backend forces provisioning to proceed.
    ///
    /// Always `false` for a failed call; the flag only exists inside a
    /// successful payload.
    #[must_use]
    pub fn should_force_provisioning(&self) -> bool {
        self.payload().is_some_and(|p| p.force_provisioning)
    }
}

/// Connection parameters for the backend, fixed at client construction.
///
/// # Examples
///
/// ```
/// use kiosklock::backend::BackendConfig;
///
/// let config = BackendConfig::new("backend.example.com", 443)
///     .with_api_key("x-api-key", "secret")
///     .with_registered_device_id("device-17")
///     .with_enrollment_token("tok-42");
/// assert_eq!(config.host(), "backend.example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    host: String,
    port: u16,
    api_key: (String, String),
    registered_device_id: String,
    enrollment_token: String,
}

impl BackendConfig {
    /// Creates a configuration for the given backend endpoint.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            api_key: (String::new(), String::new()),
            registered_device_id: String::new(),
            enrollment_token: String::new(),
        }
    }

    /// Sets the API key header name/value pair.
    #[must_use]
    pub fn with_api_key(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.api_key = (name.into(), value.into());
        self
    }

    /// Sets the registered device identifier.
    #[must_use]
    pub fn with_registered_device_id(mut self, id: impl Into<String>) -> Self {
        self.registered_device_id = id.into();
        self
    }

    /// Sets the enrollment token.
    #[must_use]
    pub fn with_enrollment_token(mut self, token: impl Into<String>) -> Self {
        self.enrollment_token = token.into();
        self
    }

    /// Returns the backend host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the backend port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the API key header name/value pair.
    #[must_use]
    pub fn api_key(&self) -> (&str, &str) {
        (&self.api_key.0, &self.api_key.1)
    }

    /// Returns the registered device identifier.
    #[must_use]
    pub fn registered_device_id(&self) -> &str {
        &self.registered_device_id
    }

    /// Returns the enrollment token.
    #[must_use]
    pub fn enrollment_token(&self) -> &str {
        &self.enrollment_token
    }
}

/// Client for the check-in/finalize backend.
#[async_trait]
pub trait FinalizeClient: Send + Sync {
    /// Reports that this device completed its program.
    async fn report_program_complete(&self) -> ReportProgramCompleteResponse;

    /// Asks the backend to pause provisioning for this device.
    async fn pause_provisioning(&self) -> PauseProvisioningResponse;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_response_carries_payload_only() {
        let response = PauseProvisioningResponse::success(PauseProvisioningPayload {
            force_provisioning: true,
        });
        assert!(response.is_successful());
        assert!(response.status().is_none());
        assert_eq!(
            response.payload(),
            Some(&PauseProvisioningPayload {
                force_provisioning: true,
            })
        );
    }

    #[test]
    fn failed_response_carries_status_only() {
        let response = ReportProgramCompleteResponse::failure(RpcStatus::new(
            RpcStatusCode::Unavailable,
            "connection refused",
        ));
        assert!(!response.is_successful());
        assert!(response.payload().is_none());
        assert_eq!(response.status().unwrap().code(), RpcStatusCode::Unavailable);
    }

    #[test]
    fn force_provisioning_false_on_failure() {
        let response = PauseProvisioningResponse::failure(RpcStatus::new(
            RpcStatusCode::DeadlineExceeded,
            "timed out",
        ));
        assert!(!response.should_force_provisioning());
    }

    #[test]
    fn force_provisioning_follows_payload_flag() {
        let off = PauseProvisioningResponse::success(PauseProvisioningPayload::default());
        assert!(!off.should_force_provisioning());

        let on = PauseProvisioningResponse::success(PauseProvisioningPayload {
            force_provisioning: true,
        });
        assert!(on.should_force_provisioning());
    }

    #[test]
    fn rpc_status_display() {
        let status = RpcStatus::new(RpcStatusCode::NotFound, "unknown device");
        assert_eq!(status.to_string(), "NotFound: unknown device");
    }

    #[test]
    fn backend_config_builder() {
        let config = BackendConfig::new("backend.example.com", 8443)
            .with_api_key("x-api-key", "secret")
            .with_registered_device_id("device-17")
            .with_enrollment_token("tok-42");

        assert_eq!(config.host(), "backend.example.com");
        assert_eq!(config.port(), 8443);
        assert_eq!(config.api_key(), ("x-api-key", "secret"));
        assert_eq!(config.registered_device_id(), "device-17");
        assert_eq!(config.enrollment_token(), "tok-42");
    }

    #[test]
    fn pause_payload_deserializes_with_default() {
        let payload: PauseProvisioningPayload = serde_json::from_str("{}").unwrap();
        assert!(!payload.force_provisioning);
    }
}
