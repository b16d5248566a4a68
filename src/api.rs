//! Client abstraction and the fetch-and-decode flow built on it.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::{debug, error, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::http::{RestClient, RestResponse};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestApi: Send + Sync {
    /// True when a base endpoint URL is configured.
    fn has_endpoint(&self) -> bool;
    async fn get(&self, path: &str, extra_query_params: &[String]) -> RestResponse;
    async fn post_json(&self, path: &str, body: &str) -> RestResponse;
    fn has_valid_auth_token(&self) -> bool;
    fn clear_auth_token(&mut self);
}

#[async_trait]
impl RestApi for RestClient {
    fn has_endpoint(&self) -> bool {
        !self.config().endpoint.is_empty()
    }

    async fn get(&self, path: &str, extra_query_params: &[String]) -> RestResponse {
        RestClient::get(self, path, extra_query_params).await
    }

    async fn post_json(&self, path: &str, body: &str) -> RestResponse {
        RestClient::post_json(self, path, body).await
    }

    fn has_valid_auth_token(&self) -> bool {
        RestClient::has_valid_auth_token(self)
    }

    fn clear_auth_token(&mut self) {
        RestClient::clear_auth_token(self)
    }
}

/// GETs `path` and decodes the body as `T`.
///
/// Returns `Ok(None)` when the request failed; details are logged and the
/// stored token is cleared if the server answered 401.
#[tracing::instrument(skip(api))]
pub async fn fetch_json<T, A>(
    api: &mut A,
    path: &str,
    extra_query_params: &[String],
) -> Result<Option<T>>
where
    T: DeserializeOwned,
    A: RestApi + ?Sized,
{
    ensure_ready(api, "fetch_json()")?;
    let response = api.get(path, extra_query_params).await;
    decode(api, "fetch_json()", path, &response)
}

/// POSTs `body` as JSON to `path` and decodes the reply as `T`.
///
/// Failure handling is the same as [`fetch_json`].
#[tracing::instrument(skip(api, body))]
pub async fn submit_json<B, T, A>(api: &mut A, path: &str, body: &B) -> Result<Option<T>>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
    A: RestApi + ?Sized,
{
    ensure_ready(api, "submit_json()")?;
    let body = serde_json::to_string(body).context("Failed to serialize request body")?;
    let response = api.post_json(path, &body).await;
    decode(api, "submit_json()", path, &response)
}

fn ensure_ready<A: RestApi + ?Sized>(api: &A, operation: &str) -> Result<()> {
    if !api.has_endpoint() {
        error!("{} - end point URL not specified", operation);
        bail!("End point URL not specified");
    }

    if !api.has_valid_auth_token() {
        bail!("No valid auth token; refusing to send unauthorized request");
    }

    Ok(())
}

fn decode<T, A>(api: &mut A, operation: &str, path: &str, response: &RestResponse) -> Result<Option<T>>
where
    T: DeserializeOwned,
    A: RestApi + ?Sized,
{
    if response.request_failed() {
        if response.request_was_unauthorized() {
            warn!("Request to {} was unauthorized, clearing auth token", path);
            api.clear_auth_token();
        }
        debug!(
            "{} - request to {} failed: {:?}",
            operation, path, response.error_message
        );
        return Ok(None);
    }

    let value = response
        .json::<T>()
        .with_context(|| format!("Failed to decode response from {}", path))?;

    Ok(Some(value))
}
