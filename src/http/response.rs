//! Per-request response record and its success/failure classification.

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

use super::status::ConnectionStatus;

/// Outcome of a single request, filled in by [`RestClient`](super::RestClient).
///
/// Failures never surface as errors; they are recorded here instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestResponse {
    /// Raw response body as UTF-8 text
    pub body: String,
    /// Readable description of what went wrong, if anything
    pub error_message: Option<String>,
    /// HTTP status, absent when no reply was received
    pub status: Option<StatusCode>,
    /// Transport-level outcome
    pub connection_status: ConnectionStatus,
    /// Reserved for callers that implement their own retry policy; never set by the client
    pub should_retry: bool,
}

impl RestResponse {
    /// True if the transport failed or the server did not answer with a 2xx status.
    pub fn request_failed(&self) -> bool {
        self.connection_status != ConnectionStatus::Success
            || !self.status.is_some_and(|s| s.is_success())
    }

    /// True if the server was reached and answered 401.
    pub fn request_was_unauthorized(&self) -> bool {
        self.connection_status.reached_server() && self.status == Some(StatusCode::UNAUTHORIZED)
    }

    /// String map with `errorMessage`, `statusCode` and `connectionStatus`.
    ///
    /// A missing message is `""` and a missing status is `"0"`.
    pub fn diagnostic_info(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (
                "errorMessage".to_string(),
                self.error_message.clone().unwrap_or_default(),
            ),
            (
                "statusCode".to_string(),
                self.status.map(|s| s.as_u16()).unwrap_or(0).to_string(),
            ),
            (
                "connectionStatus".to_string(),
                self.connection_status.to_string(),
            ),
        ])
    }

    pub fn diagnostic_info_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.diagnostic_info())
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).context("Failed to parse JSON response")
    }
}
