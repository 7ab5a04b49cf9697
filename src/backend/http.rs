// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP reference implementation of the finalize client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::Error;

use super::{
    BackendConfig, FinalizeClient, PauseProvisioningPayload, PauseProvisioningResponse,
    ReportProgramCompletePayload, ReportProgramCompleteResponse, RpcResponse, RpcStatus,
    RpcStatusCode,
};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based [`FinalizeClient`].
///
/// Posts the two backend calls as JSON and maps transport and HTTP
/// failures onto [`RpcStatus`] values inside the response wrapper; no
/// call ever returns an `Err`.
#[derive(Debug)]
pub struct HttpFinalizeClient {
    config: BackendConfig,
    base_url: String,
    client: Client,
}

#[derive(Serialize)]
struct ReportProgramCompleteRequest<'a> {
    registered_device_id: &'a str,
}

#[derive(Serialize)]
struct PauseProvisioningRequest<'a> {
    enrollment_token: &'a str,
}

impl HttpFinalizeClient {
    /// Creates a client bound to the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: BackendConfig) -> Result<Self, Error> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        let base_url = format!("https://{}:{}", config.host(), config.port());
        Ok(Self {
            config,
            base_url,
            client,
        })
    }

    /// Creates a client with an explicit base URL, bypassing the
    /// https-from-config construction. Intended for tests and
    /// plain-HTTP deployments behind a local proxy.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_base_url(config: BackendConfig, base_url: impl Into<String>) -> Result<Self, Error> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self {
            config,
            base_url: base_url.into(),
            client,
        })
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> RpcResponse<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let (key_name, key_value) = self.config.api_key();
        let mut request = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body);
        if !key_name.is_empty() {
            request = request.header(key_name, key_value);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(%err, path, "backend request failed to send");
                return RpcResponse::failure(transport_status(&err));
            }
        };

        let status = response.status();
        if !status.is_success() {
            return RpcResponse::failure(RpcStatus::new(
                status_code_for_http(status),
                format!("backend returned HTTP {status}"),
            ));
        }

        match response.json::<T>().await {
            Ok(payload) => RpcResponse::success(payload),
            Err(err) => {
                warn!(%err, path, "backend response body undecodable");
                RpcResponse::failure(RpcStatus::new(
                    RpcStatusCode::Internal,
                    format!("undecodable response body: {err}"),
                ))
            }
        }
    }
}

#[async_trait]
impl FinalizeClient for HttpFinalizeClient {
    async fn report_program_complete(&self) -> ReportProgramCompleteResponse {
        let body = ReportProgramCompleteRequest {
            registered_device_id: self.config.registered_device_id(),
        };
        self.post::<_, ReportProgramCompletePayload>("/v1/reportDeviceProgramComplete", &body)
            .await
    }

    async fn pause_provisioning(&self) -> PauseProvisioningResponse {
        let body = PauseProvisioningRequest {
            enrollment_token: self.config.enrollment_token(),
        };
        self.post::<_, PauseProvisioningPayload>("/v1/pauseDeviceProvisioning", &body)
            .await
    }
}

/// Maps a transport error onto an RPC status.
fn transport_status(err: &reqwest::Error) -> RpcStatus {
    let code = if err.is_timeout() {
        RpcStatusCode::DeadlineExceeded
    } else {
        RpcStatusCode::Unavailable
    };
    RpcStatus::new(code, err.to_string())
}

/// Maps a non-success HTTP status onto an RPC status code.
fn status_code_for_http(status: StatusCode) -> RpcStatusCode {
    match status {
        StatusCode::BAD_REQUEST => RpcStatusCode::InvalidArgument,
        StatusCode::UNAUTHORIZED => RpcStatusCode::Unauthenticated,
        StatusCode::FORBIDDEN => RpcStatusCode::PermissionDenied,
        StatusCode::NOT_FOUND => RpcStatusCode::NotFound,
        StatusCode::GATEWAY_TIMEOUT => RpcStatusCode::DeadlineExceeded,
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => RpcStatusCode::Unavailable,
        status if status.is_server_error() => RpcStatusCode::Internal,
        _ => RpcStatusCode::Unknown,
    }
}
