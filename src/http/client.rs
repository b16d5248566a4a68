//! REST client that records every failure on the returned response.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{debug, error};
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method, Request, Url};
use serde::Serialize;

use super::events::{Listeners, NetworkErrorListener};
use super::response::RestResponse;
use super::status::{ConnectionStatus, classify_error};
use crate::config::Config;
use crate::query;

/// Header announcing which API revision the client speaks.
pub const CLIENT_VERSION_HEADER: &str = "X-Client-Version";

/// API revision sent with every POST.
pub const CLIENT_VERSION: &str = "2";

/// Client for a single REST endpoint with an optional bearer token.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    config: Config,
    auth_token: Option<String>,
    listeners: Listeners,
}

impl RestClient {
    /// Creates a client with its own reqwest `Client`.
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("game-rest/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a client wrapping the given reqwest `Client`.
    pub fn with_client(client: Client, config: Config) -> Self {
        let auth_token = config.token.clone();
        Self {
            client,
            config,
            auth_token,
            listeners: Listeners::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registers a listener for failures that happen below the HTTP protocol level.
    pub fn add_network_error_listener<L>(&mut self, listener: L)
    where
        L: NetworkErrorListener + 'static,
    {
        self.listeners.add(Arc::new(listener));
    }

    pub fn set_auth_token(&mut self, token: impl Into<String>) {
        self.auth_token = Some(token.into());
    }

    /// Drops the stored token, typically after a 401.
    pub fn clear_auth_token(&mut self) {
        self.auth_token = None;
    }

    /// True when auth is not required, or a non-empty token is stored.
    pub fn has_valid_auth_token(&self) -> bool {
        if !self.config.use_auth_token {
            return true;
        }
        self.auth_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Performs a GET against `path` with the fixed query plus `extra_query_params`.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str, extra_query_params: &[String]) -> RestResponse {
        const OP: &str = "get()";

        let request = match self.build_request(Method::GET, path, extra_query_params, None) {
            Ok(request) => request,
            Err(e) => return self.construction_failure(OP, &e),
        };

        self.perform(OP, request).await
    }

    /// POSTs a JSON document to `path`. An empty body is sent as `Content-Length: 0`.
    #[tracing::instrument(skip(self, body))]
    pub async fn post_json(&self, path: &str, body: &str) -> RestResponse {
        const OP: &str = "post_json()";

        let request = match self.build_request(Method::POST, path, &[], Some(body)) {
            Ok(request) => request,
            Err(e) => return self.construction_failure(OP, &e),
        };

        self.perform(OP, request).await
    }

    /// Serializes `value` and POSTs it to `path`.
    #[tracing::instrument(skip(self, value))]
    pub async fn post_value<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> RestResponse {
        match serde_json::to_string(value).context("Failed to serialize request body") {
            Ok(body) => self.post_json(path, &body).await,
            Err(e) => self.construction_failure("post_value()", &e),
        }
    }

    fn build_url(&self, path: &str, extra_query_params: &[String]) -> Result<Url> {
        let mut url = Url::parse(&self.config.endpoint)
            .with_context(|| format!("Invalid endpoint URL '{}'", self.config.endpoint))?;
        url.set_path(path);

        let query = query::build(&self.config.query, extra_query_params);
        url.set_query((!query.is_empty()).then_some(query.as_str()));

        Ok(url)
    }

    fn auth_header(&self) -> Result<Option<HeaderValue>> {
        if !self.config.use_auth_token {
            return Ok(None);
        }
        match self.auth_token.as_deref() {
            Some(token) if !token.is_empty() => {
                let mut value =
                    HeaderValue::from_str(&format!("{}{}", self.config.auth_header_prefix, token))
                        .context("Invalid auth token for Authorization header")?;
                value.set_sensitive(true);
                Ok(Some(value))
            }
            _ => Ok(None),
        }
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        extra_query_params: &[String],
        body: Option<&str>,
    ) -> Result<Request> {
        let url = self.build_url(path, extra_query_params)?;
        debug!("{} {}", method, url);

        let mut builder = self.client.request(method, url);

        if let Some(auth) = self.auth_header()? {
            builder = builder.header(AUTHORIZATION, auth);
        }

        if let Some(body) = body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .header(CLIENT_VERSION_HEADER, CLIENT_VERSION);

            builder = if body.is_empty() {
                builder.header(CONTENT_LENGTH, "0")
            } else {
                builder.body(body.to_owned())
            };
        }

        builder.build().context("Failed to build request")
    }

    async fn perform(&self, operation: &str, request: Request) -> RestResponse {
        let mut response = RestResponse::default();
        let method = request.method().clone();
        let url = request.url().clone();
        let started = Instant::now();

        match self.client.execute(request).await {
            Ok(reply) => {
                let status = reply.status();
                response.status = Some(status);

                match reply.text().await {
                    Ok(body) => response.body = body,
                    Err(e) => {
                        record_transport_error(&mut response, operation, &e);
                        self.listeners.notify(&response);
                        return response;
                    }
                }

                if status.is_success() {
                    response.connection_status = ConnectionStatus::Success;
                } else {
                    response.connection_status = ConnectionStatus::ProtocolError;
                    response.error_message = Some(format!("Errorcode: {}", status));
                    error!(
                        "{} - {}",
                        operation,
                        response.error_message.as_deref().unwrap_or_default()
                    );
                }
            }
            Err(e) => {
                record_transport_error(&mut response, operation, &e);
                error!("{} - exception for request: {} {}", operation, method, url);
                self.listeners.notify(&response);
            }
        }

        debug!(
            "{} {} {} finished in {:?}",
            operation,
            method,
            url,
            started.elapsed()
        );

        response
    }

    /// Records a failure that happened before any network call.
    fn construction_failure(&self, operation: &str, e: &anyhow::Error) -> RestResponse {
        let response = RestResponse {
            error_message: Some(format!("Exception: {:#}", e)),
            connection_status: ConnectionStatus::UnknownError,
            ..Default::default()
        };
        error!(
            "{} - {}",
            operation,
            response.error_message.as_deref().unwrap_or_default()
        );
        self.listeners.notify(&response);
        response
    }
}

fn record_transport_error(response: &mut RestResponse, operation: &str, e: &reqwest::Error) {
    let status = classify_error(e);
    response.connection_status = status;
    response.error_message = Some(format!("Error: {}", status));
    error!("{} - Error: {} ({})", operation, status, e);
}
